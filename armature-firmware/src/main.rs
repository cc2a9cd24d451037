//! Armature - Servo Arm Controller Firmware
//!
//! Main firmware binary for RP2040-driven hobby servo arms. Joints are
//! described in `arm.toml`; motion signals and action keys arrive as text
//! lines on UART0 (e.g. from a vision host picking which bin to drop an
//! object in).

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use armature_core::config::ArmConfig;

use crate::board::ServoPeripherals;

mod board;
mod channels;
mod config;
mod tasks;

/// Embedded arm configuration (compiled into firmware)
/// Edit arm.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../arm.toml");

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

// Configuration must live forever for task references
static ARM_CONFIG: StaticCell<ArmConfig> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Armature firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config: &'static ArmConfig = ARM_CONFIG.init(config::load(EMBEDDED_CONFIG, board::SERVO_COUNT));

    let servos = ServoPeripherals {
        slice0: p.PWM_SLICE0,
        pin16: p.PIN_16,
        pin17: p.PIN_17,
        slice1: p.PWM_SLICE1,
        pin18: p.PIN_18,
        pin19: p.PIN_19,
    };
    let channels = board::servo_channels(servos, config);

    // Console UART on GPIO0 (TX) / GPIO1 (RX)
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for console");

    spawner.spawn(tasks::console_tx_task(tx)).unwrap();
    spawner.spawn(tasks::console_rx_task(rx)).unwrap();
    spawner.spawn(tasks::arm_task(config, channels)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
