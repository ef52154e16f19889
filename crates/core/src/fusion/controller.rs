//! Fusion cycle state machine.
//!
//! One controller value owns the filter backend, the collaborator handles
//! and all loop state; nothing lives in globals, so the whole loop runs
//! under test without a device. Each data-ready interrupt drives exactly
//! one [`run_cycle`](FusionController::run_cycle), which runs to
//! completion before the next one is serviced.

use super::filter::{Attitude, AttitudeFilter};
use super::throttle::{TelemetryThrottle, DEFAULT_SEND_INTERVAL_MS};
use super::traits::{SampleSource, TelemetryFrame, TelemetrySink};
use super::units::{self, Calibration};
use super::{FusionState, SensorFlags};
use crate::traits::TimeSource;
use nalgebra::Vector3;

/// Floor for the elapsed time handed to the filter. A zero or negative
/// elapsed value is a timing fault and must never reach the backend,
/// which may divide by it.
pub const DT_FLOOR_S: f32 = 1e-3;

/// Loop configuration, fixed at startup.
#[derive(Debug, Clone, Copy)]
pub struct FusionConfig {
    /// Tick-to-unit conversion constants
    pub calibration: Calibration,

    /// Minimum gap between telemetry frames (strict ">")
    pub send_interval_ms: u32,

    /// When no fresh compass reading is available, hand the filter the
    /// previous field (`true`) or a zero field it will ignore (`false`)
    pub mag_hold: bool,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            calibration: Calibration::default(),
            send_interval_ms: DEFAULT_SEND_INTERVAL_MS,
            mag_hold: true,
        }
    }
}

/// Last-update and last-transmission timestamps, monotonic milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimingState {
    pub last_update_ms: u32,
    pub last_sent_ms: u32,
}

/// What one fusion cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Sensor read failed; nothing was mutated
    Skipped,
    /// First valid batch initialized the filter
    Initialized,
    /// Steady-state filter update
    Updated {
        /// Whether a telemetry frame went out this cycle
        transmitted: bool,
    },
}

/// The real-time fusion loop controller.
///
/// Generic over the filter backend `F`, the sensor source `S`, the
/// telemetry link `L` and the time source `T`; all four are fixed at
/// construction and never swapped at runtime.
pub struct FusionController<F, S, L, T> {
    filter: F,
    source: S,
    link: L,
    time: T,
    config: FusionConfig,
    state: FusionState,
    timing: TimingState,
    throttle: TelemetryThrottle,
    attitude: Attitude,
    /// Last fresh compass reading, raw ticks (for the telemetry frame)
    mag_raw: [i16; 3],
    /// Last fresh compass reading, scaled (for the filter)
    mag_field: Vector3<f32>,
}

impl<F, S, L, T> FusionController<F, S, L, T>
where
    F: AttitudeFilter,
    S: SampleSource,
    L: TelemetrySink,
    T: TimeSource,
{
    pub fn new(filter: F, source: S, link: L, time: T, config: FusionConfig) -> Self {
        Self {
            filter,
            source,
            link,
            time,
            throttle: TelemetryThrottle::new(config.send_interval_ms),
            config,
            state: FusionState::Uninitialized,
            timing: TimingState::default(),
            attitude: Attitude::ZERO,
            mag_raw: [0; 3],
            mag_field: Vector3::zeros(),
        }
    }

    /// Run one fusion cycle: sense, normalize, init-or-update the filter,
    /// quantize, and maybe transmit.
    ///
    /// A failed batch read, or a failed compass read before the filter
    /// has initialized, abandons the whole iteration with no state
    /// mutation; recovery is waiting for the next interrupt, never an
    /// immediate re-read.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let mut batch = match self.source.read_batch().await {
            Ok(batch) => batch,
            Err(_) => return CycleOutcome::Skipped,
        };

        // The compass goes through a separate register path and may fail
        // on its own. Before initialization that aborts the whole cycle:
        // mag-seeded backends must not initialize from an absent field.
        // In steady state it only means no fresh field this cycle.
        match self.source.read_compass().await {
            Ok(mag) => {
                batch.mag = mag;
                batch.flags |= SensorFlags::COMPASS;
            }
            Err(_) if self.state != FusionState::Steady => return CycleOutcome::Skipped,
            Err(_) => {}
        }

        let sample = units::normalize(&batch, &self.config.calibration);
        let now = self.time.now_ms();

        match sample.mag {
            Some(field) => {
                self.mag_field = field;
                self.mag_raw = batch.mag;
            }
            None if !self.config.mag_hold => self.mag_field = Vector3::zeros(),
            None => {}
        }

        let outcome = match self.state {
            FusionState::Uninitialized | FusionState::Initializing => {
                self.state = FusionState::Initializing;
                self.filter.initialize(&sample);
                self.timing = TimingState {
                    last_update_ms: now,
                    last_sent_ms: now,
                };
                self.throttle.rearm(now);
                self.state = FusionState::Steady;
                CycleOutcome::Initialized
            }
            FusionState::Steady => {
                let dt_s = self.elapsed_seconds(now);
                self.filter
                    .update(sample.gyro, sample.accel, self.mag_field, dt_s);
                self.timing.last_update_ms = now;
                CycleOutcome::Updated { transmitted: false }
            }
        };

        self.attitude = self.filter.attitude();
        let quat_q31 = units::quantize(&self.filter.quaternion());

        if let CycleOutcome::Updated { .. } = outcome {
            let transmitted = self.throttle.try_emit(now);
            if transmitted {
                let frame = TelemetryFrame::new(batch.accel, batch.gyro, self.mag_raw, quat_q31);
                self.link.upload(&frame).await;
                self.timing.last_sent_ms = now;
            }
            return CycleOutcome::Updated { transmitted };
        }

        outcome
    }

    /// Elapsed seconds since the last update, clamped to the positive
    /// floor on a timing fault.
    fn elapsed_seconds(&self, now_ms: u32) -> f32 {
        let elapsed_ms = now_ms.wrapping_sub(self.timing.last_update_ms);
        let dt_s = elapsed_ms as f32 * 1e-3;
        if dt_s < DT_FLOOR_S {
            DT_FLOOR_S
        } else {
            dt_s
        }
    }

    pub fn state(&self) -> FusionState {
        self.state
    }

    pub fn timing(&self) -> TimingState {
        self.timing
    }

    /// Roll/pitch/yaw read back on the most recent cycle.
    pub fn attitude(&self) -> Attitude {
        self.attitude
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    /// Mutable sensor access, for reconfiguration and fault injection.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn link(&self) -> &L {
        &self.link
    }
}
