//! Device drivers and mock devices.
//!
//! Real sensor transports implement the core `SampleSource` / `TelemetrySink`
//! traits; the mocks here implement the same traits for host testing.

pub mod dmp;
pub mod mock;

pub use dmp::{DmpConfig, DmpFeatures};
pub use mock::{MockDmp, MockLink};
