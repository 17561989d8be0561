//! Floppyctl Firmware — Main Entry Point
//!
//! Single-task loop: sleep until the tick timer fires, catch the drives up
//! on elapsed ticks, then drain the Moppy serial link.
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌─────────────────┐   ┌──────────────┐
//! │ UartSource   │──▶│ SerialHandler │──▶│ LoggingConsumer │──▶│ FloppyDrives │
//! │ (ByteSource) │◀──│ (parse/pong)  │   │                 │   │ (GPIO pins)  │
//! └──────────────┘   └───────────────┘   └─────────────────┘   └──────▲───────┘
//!                                                                      │ tick()
//!                                                      hw_timer ───────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, PinDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_hal::units::Hertz;
use log::{info, warn};

use floppyctl::adapters::log_consumer::LoggingConsumer;
use floppyctl::adapters::uart::UartSource;
use floppyctl::config::{DeviceConfig, MAX_DRIVES, SERIAL_BAUD_RATE};
use floppyctl::drivers::hw_timer;
use floppyctl::error::Error;
use floppyctl::instrument::FloppyDrives;
use floppyctl::pins;
use floppyctl::protocol::SerialHandler;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("floppyctl v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Protocol engine ────────────────────────────────────
    let config = DeviceConfig {
        play_startup_sound: true,
        ..DeviceConfig::default()
    };
    let mut handler = SerialHandler::new(&config)?;
    info!(
        "Device 0x{:02X}, drives {}..={}",
        config.device_address, config.min_sub_address, config.max_sub_address
    );

    // ── 3. Serial link (UART0 over the USB bridge) ────────────
    let peripherals = Peripherals::take()?;
    let uart = UartDriver::new(
        peripherals.uart0,
        peripherals.pins.gpio43,
        peripherals.pins.gpio44,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::new().baudrate(Hertz(SERIAL_BAUD_RATE)),
    )?;
    let mut source = UartSource::new(uart);

    // ── 4. Drive pins ─────────────────────────────────────────
    let mut drive_pins = heapless::Vec::<_, MAX_DRIVES>::new();
    for header_slot in 1..=config.drive_count() as u8 {
        let p = pins::drive_pins(header_slot).ok_or(Error::Init("drive outside pin header"))?;
        // SAFETY: header GPIOs are claimed exactly once, here, and are not
        // taken from `Peripherals` anywhere else.
        let step = PinDriver::output(unsafe { AnyOutputPin::new(p.step) })?;
        let direction = PinDriver::output(unsafe { AnyOutputPin::new(p.direction) })?;
        drive_pins
            .push((step, direction))
            .map_err(|_| Error::Init("drive table full"))?;
    }
    let mut consumer = LoggingConsumer::new(FloppyDrives::new(&config, drive_pins)?);

    // ── 5. Instrument tick ────────────────────────────────────
    hw_timer::start_timer()?;

    info!("Ready, listening at {} baud", SERIAL_BAUD_RATE);

    // ── 6. Main loop ──────────────────────────────────────────
    let mut reported_faults = 0;
    loop {
        hw_timer::wait_for_tick();

        let drives = consumer.inner_mut();
        for _ in 0..hw_timer::take_pending_ticks() {
            drives.tick();
        }

        let faults = drives.pin_faults();
        if faults != reported_faults {
            warn!("{} drive pin writes failed since boot", faults);
            reported_faults = faults;
        }

        handler.drain_messages(&mut source, &mut consumer);
    }
}
