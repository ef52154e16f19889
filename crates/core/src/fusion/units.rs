//! Raw tick to physical unit conversion, and Q31 output quantization.
//!
//! The motion processor reports gyro/accel as signed 16-bit ticks and its
//! quaternion in Q30 fixed point. Fused output goes back out as Q31. The
//! Q30-in / Q31-out asymmetry is part of the transport contract and is
//! preserved on purpose.

use super::{PhysicalSample, RawSampleBatch, SensorFlags};
use nalgebra::{Quaternion, Vector3};

/// Radians per gyro tick at the ±2000 °/s full-scale range
/// (2000 / 32768 * pi / 180).
pub const GYRO_SCALE_RAD_PER_TICK: f32 = 0.001_064_225_153_655_079_01;

/// Accelerometer ticks per g at the ±2 g full-scale range.
pub const ACCEL_TICKS_PER_G: f32 = 16384.0;

/// One unit in Q30 fixed point.
const Q30_ONE: f32 = 1_073_741_824.0;

/// One unit in Q31 fixed point.
const Q31_ONE: f32 = 2_147_483_648.0;

/// Fixed conversion constants between sensor ticks and physical units.
#[derive(Debug, Clone, Copy)]
pub struct Calibration {
    /// rad/s per gyro tick
    pub gyro_scale: f32,

    /// Ticks per g of acceleration
    pub accel_divisor: f32,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            gyro_scale: GYRO_SCALE_RAD_PER_TICK,
            accel_divisor: ACCEL_TICKS_PER_G,
        }
    }
}

/// Convert one raw batch into calibrated physical units.
///
/// - Gyro: ticks to rad/s; the body Z reading is negated to align the
///   sensor frame with the NED body convention.
/// - Accel: ticks to units of g.
/// - Magnetometer: passed through as floats only when the batch carries a
///   fresh compass reading; stale values are the caller's to retain.
/// - Quaternion: Q30 components to floats in [-1, 1].
///
/// Always succeeds given a well-formed batch.
pub fn normalize(raw: &RawSampleBatch, cal: &Calibration) -> PhysicalSample {
    let gyro = Vector3::new(
        raw.gyro[0] as f32 * cal.gyro_scale,
        raw.gyro[1] as f32 * cal.gyro_scale,
        -(raw.gyro[2] as f32 * cal.gyro_scale),
    );

    let accel = Vector3::new(
        raw.accel[0] as f32 / cal.accel_divisor,
        raw.accel[1] as f32 / cal.accel_divisor,
        raw.accel[2] as f32 / cal.accel_divisor,
    );

    let mag = raw.flags.contains(SensorFlags::COMPASS).then(|| {
        Vector3::new(raw.mag[0] as f32, raw.mag[1] as f32, raw.mag[2] as f32)
    });

    let quat = Quaternion::new(
        q30_to_f32(raw.quat_q30[0]),
        q30_to_f32(raw.quat_q30[1]),
        q30_to_f32(raw.quat_q30[2]),
        q30_to_f32(raw.quat_q30[3]),
    );

    PhysicalSample {
        gyro,
        accel,
        mag,
        quat,
    }
}

/// One Q30 fixed-point component to a float in [-1, 1].
pub fn q30_to_f32(raw: i32) -> f32 {
    raw as f32 / Q30_ONE
}

/// Quantize a unit quaternion to Q31 fixed point for transmission,
/// scalar-first.
///
/// Truncating conversion; components at the representational boundary
/// (magnitude exactly 1.0) saturate to the representable extreme rather
/// than wrapping.
pub fn quantize(q: &Quaternion<f32>) -> [i32; 4] {
    [
        q31_from_f32(q.w),
        q31_from_f32(q.i),
        q31_from_f32(q.j),
        q31_from_f32(q.k),
    ]
}

fn q31_from_f32(component: f32) -> i32 {
    // `as` saturates at the i32 bounds, which is exactly the contract:
    // 1.0 * 2^31 lands on 2147483647, -1.0 on -2147483648.
    (component * Q31_ONE) as i32
}
