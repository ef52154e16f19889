//! Nine-axis complementary attitude backend.
//!
//! Gyro integration corrected toward the accelerometer's gravity vector
//! and the magnetometer's field direction with proportional feedback.
//! This is the default backend for the loop; the Kalman variants plug in
//! through the same [`AttitudeFilter`] contract from outside.

use super::filter::{Attitude, AttitudeFilter, FilterKind};
use super::PhysicalSample;
use nalgebra::{Quaternion, UnitQuaternion, Vector3};

/// Proportional gain applied to the gravity-vector error.
const DEFAULT_ACCEL_GAIN: f32 = 0.5;

/// Proportional gain applied to the magnetic-field error.
const DEFAULT_MAG_GAIN: f32 = 0.1;

/// Measurements with a norm below this are ignored for correction.
const MEASUREMENT_NORM_FLOOR: f32 = 1e-6;

pub struct NineAxisComplementary {
    q: UnitQuaternion<f32>,
    gyro_bias: Vector3<f32>,
    accel_gain: f32,
    mag_gain: f32,
}

impl Default for NineAxisComplementary {
    fn default() -> Self {
        Self::new(DEFAULT_ACCEL_GAIN, DEFAULT_MAG_GAIN)
    }
}

impl NineAxisComplementary {
    pub fn new(accel_gain: f32, mag_gain: f32) -> Self {
        Self {
            q: UnitQuaternion::identity(),
            gyro_bias: Vector3::zeros(),
            accel_gain,
            mag_gain,
        }
    }

    /// Body-frame correction rate from the gravity and field observations.
    fn correction(&self, accel: Vector3<f32>, mag: Vector3<f32>) -> Vector3<f32> {
        let mut correction = Vector3::zeros();

        if accel.norm() > MEASUREMENT_NORM_FLOOR {
            // Predicted gravity direction in the body frame (NED: down is +Z)
            let predicted = self.q.inverse_transform_vector(&Vector3::new(0.0, 0.0, 1.0));
            correction += self.accel_gain * accel.normalize().cross(&predicted);
        }

        if mag.norm() > MEASUREMENT_NORM_FLOOR {
            let measured = mag.normalize();
            // Reference field: measured field tilted into the world frame,
            // with its horizontal component pointing north
            let world = self.q.transform_vector(&measured);
            let horizontal = libm::sqrtf(world.x * world.x + world.y * world.y);
            let reference = Vector3::new(horizontal, 0.0, world.z);
            let predicted = self.q.inverse_transform_vector(&reference);
            correction += self.mag_gain * measured.cross(&predicted);
        }

        correction
    }
}

impl AttitudeFilter for NineAxisComplementary {
    fn initialize(&mut self, sample: &PhysicalSample) {
        // Seed from the motion processor's six-axis estimate and take the
        // standstill gyro reading as the bias hint.
        self.q = UnitQuaternion::from_quaternion(sample.quat);
        self.gyro_bias = sample.gyro;
    }

    fn update(&mut self, gyro: Vector3<f32>, accel: Vector3<f32>, mag: Vector3<f32>, dt_s: f32) {
        let rate = gyro - self.gyro_bias + self.correction(accel, mag);

        // q_dot = 0.5 * q (X) (0, rate), first-order integration
        let q = *self.q.quaternion();
        let q_dot = q * Quaternion::from_parts(0.0, rate) * 0.5;
        self.q = UnitQuaternion::from_quaternion(q + q_dot * dt_s);
    }

    fn attitude(&self) -> Attitude {
        let (roll, pitch, yaw) = self.q.euler_angles();
        Attitude { roll, pitch, yaw }
    }

    fn quaternion(&self) -> Quaternion<f32> {
        *self.q.quaternion()
    }

    fn kind(&self) -> FilterKind {
        FilterKind::NineAxisComplementary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion::{units, Calibration, RawSampleBatch};

    const EPSILON: f32 = 1e-3;

    fn level_sample() -> PhysicalSample {
        units::normalize(&RawSampleBatch::default(), &Calibration::default())
    }

    #[test]
    fn initialize_seeds_from_dmp_quaternion() {
        let mut filter = NineAxisComplementary::default();
        filter.initialize(&level_sample());

        let att = filter.attitude();
        assert!(att.roll.abs() < EPSILON);
        assert!(att.pitch.abs() < EPSILON);
        assert!(att.yaw.abs() < EPSILON);
        assert_eq!(filter.kind(), FilterKind::NineAxisComplementary);
    }

    #[test]
    fn pure_gyro_integration_accumulates_yaw() {
        // Corrections off: integration only
        let mut filter = NineAxisComplementary::new(0.0, 0.0);
        filter.initialize(&level_sample());

        // 0.1 rad/s about body Z for one second, in 5 ms steps
        for _ in 0..200 {
            filter.update(
                Vector3::new(0.0, 0.0, 0.1),
                Vector3::zeros(),
                Vector3::zeros(),
                0.005,
            );
        }

        let att = filter.attitude();
        assert!(
            (att.yaw - 0.1).abs() < 0.01,
            "expected ~0.1 rad yaw, got {}",
            att.yaw
        );
        assert!(att.roll.abs() < 0.01);
        assert!(att.pitch.abs() < 0.01);
    }

    #[test]
    fn gravity_correction_pulls_back_to_level() {
        let mut filter = NineAxisComplementary::new(2.0, 0.0);

        // Start with a deliberate 0.2 rad roll error
        let mut sample = level_sample();
        sample.quat = *UnitQuaternion::from_euler_angles(0.2, 0.0, 0.0).quaternion();
        filter.initialize(&sample);

        // Stationary, gravity straight down for two seconds
        for _ in 0..400 {
            filter.update(
                Vector3::zeros(),
                Vector3::new(0.0, 0.0, 1.0),
                Vector3::zeros(),
                0.005,
            );
        }

        let att = filter.attitude();
        assert!(
            att.roll.abs() < 0.02,
            "roll error not corrected, still {}",
            att.roll
        );
    }

    #[test]
    fn quaternion_stays_unit_norm() {
        let mut filter = NineAxisComplementary::default();
        filter.initialize(&level_sample());

        for _ in 0..100 {
            filter.update(
                Vector3::new(0.5, -0.3, 0.2),
                Vector3::new(0.1, 0.0, 0.9),
                Vector3::new(200.0, 0.0, -400.0),
                0.005,
            );
        }

        let q = filter.quaternion();
        assert!((q.norm() - 1.0).abs() < 1e-4);
    }
}
