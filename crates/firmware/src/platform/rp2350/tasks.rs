//! Fusion loop tasks.
//!
//! The sensor's data-ready line drives the whole pipeline: a dedicated
//! task forwards each rising edge into a signal, and the fusion loop
//! awaits that signal and runs exactly one cycle per edge. Cycles run to
//! completion before the next edge is serviced; edges arriving mid-cycle
//! collapse into one pending signal.

use embassy_rp::gpio::Input;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use quatfuse_core::fusion::{
    AttitudeFilter, CycleOutcome, FusionController, SampleSource, TelemetrySink,
};
use quatfuse_core::traits::TimeSource;

/// Data-ready edge notification from the interrupt pin to the fusion loop.
pub static DATA_READY: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Forward rising edges on the sensor's interrupt pin into [`DATA_READY`].
#[embassy_executor::task]
pub async fn data_ready_task(mut pin: Input<'static>) {
    crate::log_info!("Data-ready task started");
    loop {
        pin.wait_for_rising_edge().await;
        DATA_READY.signal(());
    }
}

/// Run the fusion loop forever, one cycle per data-ready edge.
///
/// Generic over the concrete backend and transports, so `main` picks the
/// filter at build time and this loop never changes.
pub async fn fusion_loop<F, S, L, T>(mut controller: FusionController<F, S, L, T>) -> !
where
    F: AttitudeFilter,
    S: SampleSource,
    L: TelemetrySink,
    T: TimeSource,
{
    crate::log_info!(
        "Fusion loop started, backend: {}",
        controller.filter().kind().as_str()
    );

    loop {
        DATA_READY.wait().await;
        match controller.run_cycle().await {
            CycleOutcome::Skipped => {
                crate::log_warn!("Sensor read failed, cycle skipped");
            }
            CycleOutcome::Initialized => {
                crate::log_info!("Attitude filter initialized");
            }
            CycleOutcome::Updated { .. } => {}
        }
    }
}
