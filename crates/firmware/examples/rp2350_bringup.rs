//! RP2350 fusion loop bring-up.
//!
//! Wires the mounting-orientation configuration, the data-ready interrupt
//! pin, and the fusion loop together for the target board. Startup halts
//! on a degenerate mounting matrix; the loop must never run with a
//! meaningless orientation.
//!
//! Build with:
//!
//! ```sh
//! cargo build -p quatfuse-firmware --example rp2350_bringup \
//!     --features rp2350 --target thumbv8m.main-none-eabihf
//! ```

#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;

use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Pull};
use quatfuse_core::fusion::{
    FusionConfig, FusionController, NineAxisComplementary, OrientationError, OrientationMatrix,
};
use quatfuse_firmware::devices::{DmpConfig, MockDmp, MockLink};
use quatfuse_firmware::platform::rp2350::tasks::{data_ready_task, fusion_loop};
use quatfuse_firmware::platform::EmbassyTime;
use quatfuse_firmware::{log_error, log_info};

/// How the sensor is mounted relative to the body frame on this board.
const MOUNTING: OrientationMatrix = OrientationMatrix([[1, 0, 0], [0, 1, 0], [0, 0, 1]]);

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    let dmp_config = match DmpConfig::default().with_orientation(&MOUNTING) {
        Ok(config) => config,
        Err(OrientationError::DegenerateRow { row }) => {
            log_error!("Mounting matrix row {} is degenerate, startup halted", row);
            loop {
                core::hint::spin_loop();
            }
        }
    };
    log_info!(
        "DMP: {} Hz, features {:#x}, orientation {:#x}",
        dmp_config.sample_rate_hz,
        dmp_config.features.bits(),
        dmp_config.orientation.value()
    );

    let int_pin = Input::new(p.PIN_22, Pull::Down);
    spawner.spawn(data_ready_task(int_pin)).unwrap();

    // TODO: swap MockDmp/MockLink for the I2C DMP transport and the UART
    // uplink once those drivers land
    let controller = FusionController::new(
        NineAxisComplementary::default(),
        MockDmp::new(),
        MockLink::new(),
        EmbassyTime,
        FusionConfig::default(),
    );

    fusion_loop(controller).await
}
