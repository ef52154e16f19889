//! Telemetry rate limiter.
//!
//! Decouples the transmission cadence from the sampling/interrupt rate:
//! the fusion loop runs at the sensor's data-ready rate while frames go
//! out at a fixed lower cadence.

/// Default emission interval: strictly more than 9 ms between frames,
/// roughly 100 Hz against a 200 Hz sample clock.
pub const DEFAULT_SEND_INTERVAL_MS: u32 = 9;

/// Pure rate limiter over the monotonic millisecond counter.
///
/// Stateless aside from the last-emission timestamp. The boundary rule is
/// strict greater-than: an attempt exactly `interval_ms` after the last
/// emission does not qualify. Elapsed time uses wrapping subtraction, so
/// a counter wraparound produces one early emission instead of a stall.
#[derive(Debug, Clone, Copy)]
pub struct TelemetryThrottle {
    interval_ms: u32,
    last_emit_ms: Option<u32>,
}

impl TelemetryThrottle {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_emit_ms: None,
        }
    }

    /// Answer whether an emission at `now_ms` is due and, if so, record it.
    ///
    /// The first attempt after construction or [`rearm`](Self::rearm)
    /// always emits.
    pub fn try_emit(&mut self, now_ms: u32) -> bool {
        let due = match self.last_emit_ms {
            None => true,
            Some(last) => now_ms.wrapping_sub(last) > self.interval_ms,
        };
        if due {
            self.last_emit_ms = Some(now_ms);
        }
        due
    }

    /// Restart the interval from `now_ms` without emitting, as done when
    /// the fusion loop initializes.
    pub fn rearm(&mut self, now_ms: u32) {
        self.last_emit_ms = Some(now_ms);
    }
}

impl Default for TelemetryThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_SEND_INTERVAL_MS)
    }
}
