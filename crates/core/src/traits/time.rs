//! Time abstraction for the fusion loop.
//!
//! The fusion cycle is timed off a monotonic millisecond counter. This
//! module provides the `TimeSource` trait that abstracts over different
//! providers (Embassy, mock, etc.) to enable host testing without
//! embedded dependencies.

use core::cell::Cell;

/// Monotonic millisecond counter for the fusion loop.
///
/// Implementations:
/// - `EmbassyTime` (in the firmware crate) for embedded targets
/// - `MockTime` for host testing with controllable time
///
/// The counter is a `u32` and is assumed never to decrease during normal
/// operation; elapsed intervals are computed with wrapping subtraction so
/// a counter wraparound yields the true elapsed value modulo 2^32 instead
/// of a stall.
pub trait TimeSource: Clone + Send + Sync {
    /// Returns current time in milliseconds since system start.
    fn now_ms(&self) -> u32;

    /// Returns elapsed milliseconds since a reference point.
    fn elapsed_ms(&self, reference_ms: u32) -> u32 {
        self.now_ms().wrapping_sub(reference_ms)
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Mock time source for testing with controllable time advancement.
///
/// # Example
///
/// ```
/// use quatfuse_core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// assert_eq!(time.now_ms(), 0);
///
/// time.advance(9);
/// assert_eq!(time.now_ms(), 9);
/// ```
#[derive(Clone, Default)]
pub struct MockTime {
    current_ms: Cell<u32>,
}

// Safety: MockTime is only used in single-threaded test contexts
// where Cell is safe. The Send+Sync bounds on TimeSource are required
// for embedded contexts, but MockTime is not used there.
unsafe impl Send for MockTime {}
unsafe impl Sync for MockTime {}

impl MockTime {
    /// Creates a new `MockTime` starting at time 0.
    pub fn new() -> Self {
        Self {
            current_ms: Cell::new(0),
        }
    }

    /// Creates a new `MockTime` starting at the specified time.
    pub fn with_initial(ms: u32) -> Self {
        Self {
            current_ms: Cell::new(ms),
        }
    }

    /// Sets the current time to an absolute value.
    pub fn set(&self, ms: u32) {
        self.current_ms.set(ms);
    }

    /// Advances the current time by the specified amount, wrapping at the
    /// counter maximum like the hardware millisecond counter does.
    pub fn advance(&self, ms: u32) {
        self.current_ms.set(self.current_ms.get().wrapping_add(ms));
    }
}

impl TimeSource for MockTime {
    fn now_ms(&self) -> u32 {
        self.current_ms.get()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_time_initial_value() {
        let time = MockTime::new();
        assert_eq!(time.now_ms(), 0);
    }

    #[test]
    fn mock_time_with_initial() {
        let time = MockTime::with_initial(5_000);
        assert_eq!(time.now_ms(), 5_000);
    }

    #[test]
    fn mock_time_set_and_advance() {
        let time = MockTime::new();
        time.set(1_000);
        assert_eq!(time.now_ms(), 1_000);

        time.advance(500);
        assert_eq!(time.now_ms(), 1_500);
    }

    #[test]
    fn mock_time_elapsed_ms() {
        let time = MockTime::new();
        time.set(10_000);
        assert_eq!(time.elapsed_ms(3_000), 7_000);
    }

    #[test]
    fn mock_time_elapsed_across_wraparound() {
        let time = MockTime::with_initial(u32::MAX - 1);
        time.advance(7);
        assert_eq!(time.now_ms(), 5);
        assert_eq!(time.elapsed_ms(u32::MAX - 1), 7);
    }
}
