//! quatfuse_core - Pure no_std attitude fusion loop for a DMP-equipped IMU
//!
//! This crate contains the platform-agnostic fusion pipeline: orientation
//! encoding for the motion processor, raw-tick normalization, the attitude
//! filter contract, the per-interrupt fusion cycle state machine, and the
//! telemetry rate limiter. Everything here can be tested on host without
//! any feature flags or embassy dependencies.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies
//! - **Trait abstractions**: Platform services injected via traits
//!
//! # Modules
//!
//! - [`traits`]: Platform-agnostic trait abstractions (TimeSource)
//! - [`fusion`]: Orientation mapping, unit normalization, the attitude
//!   filter contract, the fusion cycle controller, and the telemetry throttle

#![no_std]

pub mod fusion;
pub mod traits;
