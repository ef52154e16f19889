//! Attitude fusion pipeline.
//!
//! One fusion cycle runs sense -> normalize -> filter-update -> quantize ->
//! (maybe) transmit, driven by the sensor's data-ready interrupt. This module
//! holds the shared data model plus the pipeline stages:
//!
//! - [`orientation`]: sensor-to-body axis mapping for the motion processor
//! - [`units`]: raw tick to physical unit conversion and Q31 quantization
//! - [`filter`]: the pluggable attitude filter contract
//! - [`complementary`]: default nine-axis complementary backend
//! - [`controller`]: the per-interrupt fusion cycle state machine
//! - [`throttle`]: telemetry rate limiter
//! - [`traits`]: sensor read and telemetry upload boundaries
//!
//! # Coordinate System
//!
//! - Frame: NED (North-East-Down)
//! - Quaternion: scalar-first (w, x, y, z)
//! - Euler sequence: ZYX (yaw-pitch-roll)

pub mod complementary;
pub mod controller;
pub mod filter;
pub mod orientation;
pub mod throttle;
pub mod traits;
pub mod units;

pub use complementary::NineAxisComplementary;
pub use controller::{CycleOutcome, FusionConfig, FusionController, TimingState};
pub use filter::{Attitude, AttitudeFilter, FilterKind, MockFilter};
pub use orientation::{OrientationCode, OrientationError, OrientationMatrix};
pub use throttle::TelemetryThrottle;
pub use traits::{SampleError, SampleSource, TelemetryFrame, TelemetrySink};
pub use units::Calibration;

use nalgebra::{Quaternion, Vector3};

bitflags::bitflags! {
    /// Which sensors contributed fresh data to a sample batch.
    ///
    /// The gyro/accel/quaternion bits mirror the motion processor's FIFO
    /// content mask; `COMPASS` is set by the controller after a successful
    /// magnetometer read, which goes through a separate register path.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SensorFlags: u8 {
        const GYRO = 1 << 0;
        const ACCEL = 1 << 1;
        const QUAT = 1 << 2;
        const COMPASS = 1 << 3;
    }
}

/// One acquisition cycle's raw sensor output.
///
/// Created once per data-ready interrupt and consumed within the same
/// cycle. The quaternion is the motion processor's six-axis estimate in
/// Q30 fixed point, scalar first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSampleBatch {
    /// Gyroscope ticks, sensor frame
    pub gyro: [i16; 3],

    /// Accelerometer ticks, sensor frame
    pub accel: [i16; 3],

    /// Magnetometer ticks; meaningful only when `flags` contains `COMPASS`
    pub mag: [i16; 3],

    /// DMP quaternion, Q30 fixed point, scalar-first (w, x, y, z)
    pub quat_q30: [i32; 4],

    /// Monotonic millisecond timestamp of the batch
    pub timestamp_ms: u32,

    /// Which sensors delivered fresh data this cycle
    pub flags: SensorFlags,
}

impl Default for RawSampleBatch {
    fn default() -> Self {
        Self {
            gyro: [0; 3],
            accel: [0; 3],
            mag: [0; 3],
            // Identity orientation in Q30
            quat_q30: [1 << 30, 0, 0, 0],
            timestamp_ms: 0,
            flags: SensorFlags::GYRO | SensorFlags::ACCEL | SensorFlags::QUAT,
        }
    }
}

/// Calibrated floating-point counterpart of [`RawSampleBatch`].
///
/// Recomputed every cycle; never stored across cycles.
#[derive(Debug, Clone, Copy)]
pub struct PhysicalSample {
    /// Angular rate in rad/s, body frame (Z negated per mounting convention)
    pub gyro: Vector3<f32>,

    /// Linear acceleration in units of g, body frame
    pub accel: Vector3<f32>,

    /// Magnetic field in raw-but-scaled units; `None` when no fresh compass
    /// reading was obtained this cycle (the previous value is retained by
    /// the controller, never overwritten here)
    pub mag: Option<Vector3<f32>>,

    /// DMP orientation estimate as unit-normalized floats, scalar-first
    pub quat: Quaternion<f32>,
}

/// Fusion loop lifecycle.
///
/// `Uninitialized -> Initializing` on the first successfully read batch,
/// `Initializing -> Steady` immediately after the filter's one-time
/// initialization; `Steady` is terminal for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FusionState {
    /// No valid sample batch seen yet
    Uninitialized,
    /// First batch in hand, filter initialization in progress
    Initializing,
    /// Filter initialized; every further cycle is an update
    Steady,
}

impl FusionState {
    /// Return variant name as a static string (usable with defmt on embedded)
    pub fn as_str(&self) -> &'static str {
        match self {
            FusionState::Uninitialized => "Uninitialized",
            FusionState::Initializing => "Initializing",
            FusionState::Steady => "Steady",
        }
    }
}
