//! Embassy-based time source implementation.
//!
//! This module provides the `EmbassyTime` implementation of the
//! `TimeSource` trait using Embassy's time driver.

use quatfuse_core::traits::TimeSource;

/// Embassy-based time source using the Embassy time driver.
///
/// Reports the millisecond counter truncated to 32 bits, matching the
/// wrapping arithmetic the fusion timing code uses throughout.
#[derive(Clone, Copy, Default)]
pub struct EmbassyTime;

impl TimeSource for EmbassyTime {
    fn now_ms(&self) -> u32 {
        embassy_time::Instant::now().as_millis() as u32
    }
}
