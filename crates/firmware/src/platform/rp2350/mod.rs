//! RP2350 platform support.
//!
//! Embassy tasks and pin wiring for the target board. Everything in this
//! module requires the `rp2350` feature and the embassy-rp HAL.

pub mod tasks;
