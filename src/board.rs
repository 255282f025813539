//! ESP-IDF bus and pin bring-up
//!
//! Powers the panel, then opens the SPI device and the three control lines of
//! the selected slot and hands them over as `embedded-hal` implementations.

use esp_idf_svc::hal::delay::Delay;
use esp_idf_svc::hal::gpio::{AnyIOPin, AnyInputPin, AnyOutputPin, Input, Output, PinDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::prelude::*;
use esp_idf_svc::hal::spi::{self, config::BitOrder, SpiDeviceDriver, SpiDriver};

use sphere_epd::{BusInitStep, ErrorKind, PanelError, PinSlot, Stage};

/// SPI clock, the panel is specified up to 4 MHz but long slot wiring is not
pub const BUS_SPEED_KHZ: u32 = 400;

/// Time for the module supply to come up after enabling it
pub const POWER_SETTLE_MS: u32 = 100;

/// Opened bus and control lines of one panel slot
pub struct Bus {
    pub spi: SpiDeviceDriver<'static, SpiDriver<'static>>,
    pub busy: PinDriver<'static, AnyInputPin, Input>,
    pub dc: PinDriver<'static, AnyOutputPin, Output>,
    pub rst: PinDriver<'static, AnyOutputPin, Output>,
    /// Panel supply, dropping the driver releases the pin and cuts power
    pub power: PinDriver<'static, AnyOutputPin, Output>,
}

fn bus_error(stage: Stage, step: BusInitStep) -> impl FnOnce(esp_idf_svc::sys::EspError) -> PanelError {
    move |e| {
        log::error!("{} failed at {:?}: {:?}", stage, step, e);
        PanelError::new(stage, ErrorKind::BusInit(step))
    }
}

/// SPI mode 0, MSB first, chip select active low
pub fn open_bus(peripherals: Peripherals, slot: PinSlot) -> Result<Bus, PanelError> {
    let pins = peripherals.pins;
    let wiring = slot.pins();
    log::info!("Opening panel bus on {:?}: {:?}", slot, wiring);

    let (cs, dc, rst, busy): (AnyOutputPin, AnyOutputPin, AnyOutputPin, AnyInputPin) = match slot {
        PinSlot::Slot1 => (
            pins.gpio45.downgrade_output(),
            pins.gpio46.downgrade_output(),
            pins.gpio47.downgrade_output(),
            pins.gpio48.downgrade_input(),
        ),
        PinSlot::Slot2 => (
            pins.gpio10.downgrade_output(),
            pins.gpio4.downgrade_output(),
            pins.gpio5.downgrade_output(),
            pins.gpio6.downgrade_input(),
        ),
    };

    // Pins::POWER
    let mut power = PinDriver::output(pins.gpio7.downgrade_output())
        .map_err(bus_error(Stage::GpioOpen, BusInitStep::Gpio))?;
    power
        .set_high()
        .map_err(bus_error(Stage::GpioOpen, BusInitStep::Gpio))?;
    Delay::default().delay_ms(POWER_SETTLE_MS);
    log::info!("Panel power enabled");

    let driver_config = spi::SpiDriverConfig::new().dma(spi::Dma::Disabled);
    // CS is active low unless cs_active_high() is set
    let config = spi::SpiConfig::new()
        .baudrate(BUS_SPEED_KHZ.kHz().into())
        .data_mode(spi::config::MODE_0)
        .bit_order(BitOrder::MsbFirst);

    // speed and mode are applied when the device is added to the bus
    let spi = SpiDeviceDriver::new_single(
        peripherals.spi2,
        pins.gpio12, // SCK - Pins::SCK
        pins.gpio11, // MOSI - Pins::MOSI
        Option::<AnyIOPin>::None,
        Some(cs),
        &driver_config,
        &config,
    )
    .map_err(bus_error(Stage::BusOpen, BusInitStep::Open))?;

    let busy = PinDriver::input(busy).map_err(bus_error(Stage::GpioOpen, BusInitStep::Gpio))?;
    let dc = PinDriver::output(dc).map_err(bus_error(Stage::GpioOpen, BusInitStep::Gpio))?;
    let rst = PinDriver::output(rst).map_err(bus_error(Stage::GpioOpen, BusInitStep::Gpio))?;

    Ok(Bus {
        spi,
        busy,
        dc,
        rst,
        power,
    })
}
