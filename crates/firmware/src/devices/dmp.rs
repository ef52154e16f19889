//! On-chip motion processor (DMP) configuration.
//!
//! The DMP runs the vendor's six-axis quaternion firmware on the sensor
//! itself and streams packed batches through the FIFO. This module holds
//! the feature mask and sample-rate configuration handed to the driver at
//! startup, including the packed mounting-orientation code.

use quatfuse_core::fusion::orientation::{OrientationCode, OrientationError, OrientationMatrix};

bitflags::bitflags! {
    /// DMP firmware feature mask, as written to the feature-enable register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DmpFeatures: u16 {
        const TAP = 0x001;
        const ANDROID_ORIENT = 0x002;
        const LP_QUAT = 0x004;
        const PEDOMETER = 0x008;
        const SIX_X_LP_QUAT = 0x010;
        const GYRO_CAL = 0x020;
        const SEND_RAW_ACCEL = 0x040;
        const SEND_RAW_GYRO = 0x080;
        const SEND_CAL_GYRO = 0x100;
    }
}

impl DmpFeatures {
    /// The fusion loop's working set: six-axis quaternion plus raw accel
    /// and bias-corrected gyro in every FIFO packet.
    pub const FUSION: Self = Self::SIX_X_LP_QUAT
        .union(Self::SEND_RAW_ACCEL)
        .union(Self::SEND_CAL_GYRO);
}

/// Motion processor startup configuration.
///
/// `LP_QUAT` (three-axis) and `SIX_X_LP_QUAT` are mutually exclusive in
/// the vendor firmware; [`DmpFeatures::FUSION`] picks the six-axis one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmpConfig {
    /// FIFO output rate in Hz
    pub sample_rate_hz: u16,

    /// Enabled DMP firmware features
    pub features: DmpFeatures,

    /// Packed mounting-orientation code pushed to the DMP
    pub orientation: OrientationCode,
}

impl Default for DmpConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 200,
            features: DmpFeatures::FUSION,
            orientation: OrientationCode::IDENTITY,
        }
    }
}

impl DmpConfig {
    /// Replace the orientation with the encoding of `matrix`, rejecting
    /// degenerate mounting matrices before they reach the device.
    pub fn with_orientation(self, matrix: &OrientationMatrix) -> Result<Self, OrientationError> {
        Ok(Self {
            orientation: matrix.encode()?,
            ..self
        })
    }
}
