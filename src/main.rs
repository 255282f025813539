use esp_idf_svc::hal::delay::Delay;
use esp_idf_svc::hal::peripherals::Peripherals;

use sphere_epd::demo::{self, ClockTime, CLOCK_TICKS};
use sphere_epd::{graphics, Config, ExitCode, Il3820, PanelError};

mod board;

// Include the pre-converted logo image binary data (generated at build time)
const LOGO_IMAGE: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/logo.bin"));

/// Time the finished frames stay up before the next step
const SHOW_MS: u32 = 1800;

/// Pause between clock ticks
const TICK_MS: u32 = 500;

// https://docs.esp-rs.org/esp-idf-svc/esp_idf_svc/
fn main() -> anyhow::Result<()> {
    // It is necessary to call this function once. Otherwise some patches to the runtime
    // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
    esp_idf_svc::sys::link_patches();

    // Bind the log crate to the ESP Logging facilities
    esp_idf_svc::log::EspLogger::initialize_default();

    let config = Config::from_build_env()?;
    log::info!("Starting e-paper demo with {:?}", config);

    let peripherals = Peripherals::take()?;

    if let Err(e) = run(peripherals, &config) {
        log::error!("Demo stopped: {}", e);
        std::process::exit(e.exit_code().into());
    }

    log::info!("Demo finished with {:?}", ExitCode::Success);
    Ok(())
}

fn run(peripherals: Peripherals, config: &Config) -> Result<(), PanelError> {
    // power stays on for as long as the binding lives
    let board::Bus {
        spi,
        busy,
        dc,
        rst,
        power: _power,
    } = board::open_bus(peripherals, config.slot)?;
    let delay = Delay::default();

    let mut epd = Il3820::from_config(spi, busy, dc, rst, delay, config);

    if !demo::fits_layout(config.orientation, epd.variant()) {
        let (width, height) = config.orientation.canvas_size(epd.variant());
        log::warn!(
            "Demo artwork is laid out for landscape, the {}x{} {:?} canvas clips it",
            width,
            height,
            config.orientation
        );
    }

    let (full_lut, clock_lut) = demo::refresh_modes(config.lut_mode);

    log::info!("=== Full refresh demo ===");
    epd.begin(full_lut)?;
    epd.clear()?;
    delay.delay_ms(SHOW_MS);

    let mut canvas = graphics::canvas(config.orientation);
    // the in-memory canvas is infallible, a fallible target stops compiling here
    if let Err(e) = demo::draw_gfx_demo(&mut canvas) {
        match e {}
    }
    epd.display_image(canvas.buffer())?;
    delay.delay_ms(SHOW_MS);

    if LOGO_IMAGE.is_empty() {
        log::warn!("Logo image not available (logo.png not found at build time)");
    } else {
        log::info!("Logo image embedded, size: {} bytes", LOGO_IMAGE.len());
        let mut logo = graphics::canvas(config.orientation);
        match demo::draw_logo(&mut logo, LOGO_IMAGE) {
            Ok(true) => {
                epd.display_image(logo.buffer())?;
                delay.delay_ms(SHOW_MS);
            }
            Ok(false) => {}
            Err(e) => match e {},
        }
    }

    log::info!("=== Partial refresh clock ===");
    epd.init(clock_lut)?;
    epd.clear()?;

    let mut canvas = graphics::canvas(config.orientation);
    let mut time = ClockTime::default();
    for tick in 0..CLOCK_TICKS {
        time.tick();
        if let Err(e) = demo::draw_clock(&mut canvas, time) {
            match e {}
        }
        epd.display_image(canvas.buffer())?;
        log::debug!("Clock tick {}: {}", tick, time);
        delay.delay_ms(TICK_MS);
    }

    log::info!("=== Sleep and wake ===");
    epd.clear()?;
    epd.enter_deep_sleep()?;
    delay.delay_ms(SHOW_MS);

    epd.wake()?;
    epd.clear()?;
    epd.enter_deep_sleep()?;

    let reset_reason = esp_idf_svc::hal::reset::ResetReason::get();
    log::info!("Reset reason: {:?}", reset_reason);

    Ok(())
}
