//! Platform-agnostic trait abstractions.
//!
//! These traits decouple the fusion loop from the platform that hosts it,
//! so the same controller runs against the embedded time driver in firmware
//! and against controllable mocks on the host.

pub mod time;

pub use time::{MockTime, TimeSource};
