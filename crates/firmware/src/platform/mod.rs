//! Platform abstraction layer.
//!
//! Hardware-facing implementations of the core traits live here; the
//! `rp2350` module holds everything that only builds for the target.

pub mod time;

pub use time::EmbassyTime;

#[cfg(feature = "rp2350")]
pub mod rp2350;
