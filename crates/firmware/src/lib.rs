#![cfg_attr(not(test), no_std)]

//! quatfuse_firmware - Embassy firmware for the quatfuse attitude estimator
//!
//! This crate provides Embassy async wrappers and RP2350-specific
//! implementations for the core fusion logic.
//!
//! # Design Principles
//!
//! - **Embassy tasks**: Async tasks for the interrupt-driven fusion loop
//! - **Platform implementations**: TimeSource and HAL bindings
//! - **Device drivers**: Motion-processor configuration and mock devices

// Platform abstraction layer
pub mod platform;

// Device drivers and mocks using the core trait boundaries
pub mod devices;

// Logging macros (log_info!, log_warn!, log_error!, log_debug!) are
// exported at crate root via #[macro_export] in logging
pub mod logging;
