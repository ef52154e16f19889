//! Attitude filter contract.
//!
//! The fusion loop is polymorphic over its estimator backend. Exactly one
//! backend is selected at build configuration time as the controller's
//! generic parameter; it is never switched at runtime. The loop depends
//! only on the lifecycle below: one `initialize` from the first valid
//! sample, then one `update` per cycle, with the read accessors valid any
//! time after initialization.

use super::PhysicalSample;
use core::cell::RefCell;
use nalgebra::{Quaternion, Vector3};

/// Backend identification for logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    ExtendedKf,
    UnscentedKf,
    CubatureKf,
    SquareRootCubatureKf,
    SixAxisComplementary,
    SixAxisFixedPoint,
    NineAxisComplementary,
}

impl FilterKind {
    /// Return variant name as a static string (usable with defmt on embedded)
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::ExtendedKf => "ExtendedKf",
            FilterKind::UnscentedKf => "UnscentedKf",
            FilterKind::CubatureKf => "CubatureKf",
            FilterKind::SquareRootCubatureKf => "SquareRootCubatureKf",
            FilterKind::SixAxisComplementary => "SixAxisComplementary",
            FilterKind::SixAxisFixedPoint => "SixAxisFixedPoint",
            FilterKind::NineAxisComplementary => "NineAxisComplementary",
        }
    }
}

/// Roll/pitch/yaw in radians, ZYX convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attitude {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl Attitude {
    pub const ZERO: Self = Self {
        roll: 0.0,
        pitch: 0.0,
        yaw: 0.0,
    };
}

/// Pluggable attitude estimator lifecycle.
///
/// The controller guarantees `initialize` is called exactly once, before
/// any `update` or read accessor; `dt_s` passed to `update` is always
/// strictly positive. Accessors are undefined before initialization and
/// must not be called then.
pub trait AttitudeFilter {
    /// One-time state preparation from the first valid sample. Each
    /// backend picks what it needs: the DMP quaternion, the accel/mag
    /// pair, and the current gyro as a bias hint are all present.
    fn initialize(&mut self, sample: &PhysicalSample);

    /// Advance the estimate by one time step of `dt_s` seconds.
    fn update(&mut self, gyro: Vector3<f32>, accel: Vector3<f32>, mag: Vector3<f32>, dt_s: f32);

    /// Current roll/pitch/yaw estimate.
    fn attitude(&self) -> Attitude;

    /// Current orientation estimate, scalar-first unit quaternion.
    fn quaternion(&self) -> Quaternion<f32>;

    /// Which backend this is.
    fn kind(&self) -> FilterKind;
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// One recorded call on a [`MockFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterCall {
    Initialize,
    Update,
    ReadAttitude,
    ReadQuaternion,
}

/// Scripted backend that records its call sequence, for verifying the
/// controller's lifecycle ordering without real numerics.
pub struct MockFilter {
    calls: RefCell<heapless::Vec<FilterCall, 64>>,
    attitude: Attitude,
    quaternion: Quaternion<f32>,
    last_dt: Option<f32>,
    initialized: bool,
}

impl Default for MockFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFilter {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(heapless::Vec::new()),
            attitude: Attitude::ZERO,
            quaternion: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            last_dt: None,
            initialized: false,
        }
    }

    /// Set the attitude and quaternion the read accessors report.
    pub fn set_estimate(&mut self, attitude: Attitude, quaternion: Quaternion<f32>) {
        self.attitude = attitude;
        self.quaternion = quaternion;
    }

    /// The recorded call sequence so far.
    pub fn calls(&self) -> heapless::Vec<FilterCall, 64> {
        self.calls.borrow().clone()
    }

    /// Elapsed seconds passed to the most recent `update`.
    pub fn last_dt(&self) -> Option<f32> {
        self.last_dt
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn record(&self, call: FilterCall) {
        // Overflow just drops the record; 64 calls is plenty for any test
        let _ = self.calls.borrow_mut().push(call);
    }
}

impl AttitudeFilter for MockFilter {
    fn initialize(&mut self, _sample: &PhysicalSample) {
        self.record(FilterCall::Initialize);
        self.initialized = true;
    }

    fn update(
        &mut self,
        _gyro: Vector3<f32>,
        _accel: Vector3<f32>,
        _mag: Vector3<f32>,
        dt_s: f32,
    ) {
        self.record(FilterCall::Update);
        self.last_dt = Some(dt_s);
    }

    fn attitude(&self) -> Attitude {
        self.record(FilterCall::ReadAttitude);
        self.attitude
    }

    fn quaternion(&self) -> Quaternion<f32> {
        self.record(FilterCall::ReadQuaternion);
        self.quaternion
    }

    fn kind(&self) -> FilterKind {
        FilterKind::NineAxisComplementary
    }
}
