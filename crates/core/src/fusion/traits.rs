//! External collaborator boundaries of the fusion loop.
//!
//! The sensor transport and the telemetry transport live outside this
//! crate; the controller sees them only through these traits, which keeps
//! the loop testable with scripted mocks on the host.

use super::RawSampleBatch;

/// Sensor read failures. Every variant means the same thing to the
/// controller: skip this cycle and wait for the next interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleError {
    /// Bus transaction failed
    Bus,
    /// FIFO had no complete packet / overflowed
    FifoOverflow,
    /// Sensor had no fresh data ready
    NotReady,
    /// Data failed validation
    InvalidData,
}

impl SampleError {
    /// Return variant name as a static string (usable with defmt on embedded)
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleError::Bus => "Bus",
            SampleError::FifoOverflow => "FifoOverflow",
            SampleError::NotReady => "NotReady",
            SampleError::InvalidData => "InvalidData",
        }
    }
}

/// One-batch-per-interrupt sensor read interface.
///
/// `read_batch` drains one packet from the motion processor's FIFO;
/// `read_compass` goes through the separate magnetometer register path
/// and may fail independently. Before filter initialization a compass
/// failure skips the cycle; afterwards the controller reuses the
/// previous field reading.
#[allow(async_fn_in_trait)]
pub trait SampleSource {
    /// Read one raw batch for this cycle.
    async fn read_batch(&mut self) -> Result<RawSampleBatch, SampleError>;

    /// Read the magnetometer triplet for this cycle.
    async fn read_compass(&mut self) -> Result<[i16; 3], SampleError>;
}

/// The fixed six-field telemetry record.
///
/// Raw sensor triplets plus the fused quaternion in Q31; the two reserved
/// fields are always zero in this configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryFrame {
    pub accel: [i16; 3],
    pub gyro: [i16; 3],
    pub mag: [i16; 3],
    pub quat_q31: [i32; 4],
    pub reserved: [i16; 2],
}

impl TelemetryFrame {
    pub fn new(accel: [i16; 3], gyro: [i16; 3], mag: [i16; 3], quat_q31: [i32; 4]) -> Self {
        Self {
            accel,
            gyro,
            mag,
            quat_q31,
            reserved: [0; 2],
        }
    }
}

/// Fire-and-forget telemetry upload. No acknowledgment or retry is
/// modeled; framing below this call is the transport's concern.
#[allow(async_fn_in_trait)]
pub trait TelemetrySink {
    async fn upload(&mut self, frame: &TelemetryFrame);
}
