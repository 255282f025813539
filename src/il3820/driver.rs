//! IL3820 Display Driver Implementation
//!
//! This module contains the main driver for the IL3820 e-paper display controller.
//! It sequences the controller protocol on top of [`DisplayInterface`].
//!
//! ## Panel states
//!
//! ```text
//! Uninitialized -> Resetting -> Initializing -> Idle -> Writing -> Activating -> Idle
//!                                                 \-> Sleeping -> (wake) -> Idle
//! ```
//!
//! - `reset_panel()` pulses the reset line
//! - `init()` writes the register set and one of the four LUTs, then waits for
//!   the panel to settle
//! - `set_display_window()` / `set_cursor()` address panel RAM, after which rows
//!   are streamed with the write RAM command
//! - `turn_on_display()` triggers the refresh and blocks on the busy line
//! - `enter_deep_sleep()` / `wake()` handle power down
//!
//! Any failing bus access aborts the sequence in progress and is reported as a
//! [`PanelError`]. The state is left where the failure happened, so a panel
//! that failed mid-init reports `NotReady` until it is initialised again.
//!
//! ## Clearing
//!
//! Writing full frames over and over without ever clearing the panel leaves
//! ghosting behind that can become permanent. Call [`Il3820::clear`] now and
//! then, or put the panel to sleep between sessions.

pub use crate::il3820::error::{ErrorKind, PanelError, Stage};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::config::{Config, PanelVariant};
use crate::il3820::error::StageExt;
use crate::il3820::interface::DisplayInterface;
use crate::il3820::lut::LutMode;
use crate::il3820::{cmd::Cmd, flag::Flag};

/// Settle time after the register set and LUT are written
pub const INIT_SETTLE_MS: u32 = 500;

/// Settle time after leaving deep sleep
pub const WAKE_SETTLE_MS: u32 = 50;

/// Where the panel is in its command sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    /// Nothing sent yet
    Uninitialized,
    /// Reset pulse done, registers not written
    Resetting,
    /// Register set being written
    Initializing,
    /// Ready for RAM writes
    Idle,
    /// RAM window addressed, rows being written
    Writing,
    /// Refresh running
    Activating,
    /// Deep sleep, needs [`Il3820::wake`]
    Sleeping,
}

/// Rectangle of panel RAM, in pixels, both ends inclusive
///
/// X is sent to the controller in byte columns (`x >> 3`), so windows are
/// effectively widened to whole bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// First column
    pub x_start: u16,
    /// First row
    pub y_start: u16,
    /// Last column
    pub x_end: u16,
    /// Last row
    pub y_end: u16,
}

impl Window {
    /// Window from start and end corners
    pub const fn new(x_start: u16, y_start: u16, x_end: u16, y_end: u16) -> Self {
        Window {
            x_start,
            y_start,
            x_end,
            y_end,
        }
    }

    /// Whole panel
    pub const fn full(variant: PanelVariant) -> Self {
        Window::new(0, 0, variant.width() - 1, variant.height() - 1)
    }

    /// Byte columns covered, 1 for an inverted window
    pub const fn width_bytes(&self) -> u16 {
        (self.x_end >> 3).saturating_sub(self.x_start >> 3) + 1
    }

    /// Rows covered, 1 for an inverted window
    pub const fn rows(&self) -> u32 {
        (self.y_end as u32).saturating_sub(self.y_start as u32) + 1
    }

    /// Bytes of framebuffer needed to fill this window
    pub const fn buffer_len(&self) -> usize {
        self.width_bytes() as usize * self.rows() as usize
    }

    /// Non-inverted and inside the panel
    pub const fn fits(&self, variant: PanelVariant) -> bool {
        self.x_start <= self.x_end
            && self.y_start <= self.y_end
            && self.x_end < variant.width()
            && self.y_end < variant.height()
    }
}

/// IL3820 E-Paper Display Driver
///
/// ## Type Parameters
///
/// - `SPI` - SPI device for communication
/// - `BSY` - BUSY input pin
/// - `DC` - Data/Command output pin
/// - `RST` - Reset output pin
/// - `DELAY` - Delay provider for timing
pub struct Il3820<SPI, BSY, DC, RST, DELAY> {
    interface: DisplayInterface<SPI, BSY, DC, RST, DELAY>,
    variant: PanelVariant,
    state: PanelState,
    lut_mode: LutMode,
}

impl<SPI, BSY, DC, RST, DELAY> Il3820<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Driver with the default configuration, nothing is sent to the panel
    pub fn new(spi: SPI, busy: BSY, dc: DC, rst: RST, delay: DELAY) -> Self {
        Self::from_config(spi, busy, dc, rst, delay, &Config::default())
    }

    /// Driver for the panel described by `config`
    pub fn from_config(spi: SPI, busy: BSY, dc: DC, rst: RST, delay: DELAY, config: &Config) -> Self {
        let interface = DisplayInterface::new(spi, busy, dc, rst, delay, config.busy);
        Il3820 {
            interface,
            variant: config.variant,
            state: PanelState::Uninitialized,
            lut_mode: config.lut_mode,
        }
    }

    /// Current panel state
    pub fn state(&self) -> PanelState {
        self.state
    }

    /// LUT of the last init, or the configured one before that
    pub fn lut_mode(&self) -> LutMode {
        self.lut_mode
    }

    /// Panel model
    pub fn variant(&self) -> PanelVariant {
        self.variant
    }

    /// Size of a full framebuffer in bytes
    pub fn buffer_len(&self) -> usize {
        self.variant.buffer_len()
    }

    // ==================== Power up ====================

    /// Pulse the reset line
    pub fn reset_panel(&mut self) -> Result<(), PanelError> {
        log::info!("Resetting panel");
        self.interface.reset().stage(Stage::Reset)?;
        self.state = PanelState::Resetting;
        Ok(())
    }

    /// Reset and initialise with `mode`
    pub fn begin(&mut self, mode: LutMode) -> Result<(), PanelError> {
        self.reset_panel()?;
        self.init(mode)
    }

    /// Write the register set and the LUT for `mode`
    ///
    /// Also used to switch between full and partial refresh on an awake panel.
    pub fn init(&mut self, mode: LutMode) -> Result<(), PanelError> {
        log::info!("Initializing panel with {} LUT", mode);
        self.state = PanelState::Initializing;

        let last_row = self.variant.height() - 1;
        self.cmd_data(
            Stage::Init,
            Cmd::DRIVER_OUTPUT_CONTROL,
            &[
                (last_row & 0xFF) as u8,
                (last_row >> 8) as u8,
                Flag::DRIVER_OUTPUT_SCAN_DEFAULT,
            ],
        )?;
        self.cmd_data(
            Stage::Init,
            Cmd::BOOSTER_SOFT_START_CONTROL,
            &[
                Flag::BOOSTER_SOFT_START_PHASE1,
                Flag::BOOSTER_SOFT_START_PHASE2,
                Flag::BOOSTER_SOFT_START_PHASE3,
            ],
        )?;
        self.cmd_data(Stage::Init, Cmd::WRITE_VCOM_REGISTER, &[Flag::VCOM_DEFAULT])?;
        self.cmd_data(Stage::Init, Cmd::SET_DUMMY_LINE_PERIOD, &[Flag::DUMMY_LINE_PERIOD])?;
        self.cmd_data(Stage::Init, Cmd::SET_GATE_TIME, &[Flag::GATE_LINE_WIDTH])?;
        self.cmd_data(
            Stage::Init,
            Cmd::BORDER_WAVEFORM_CONTROL,
            &[Flag::BORDER_WAVEFORM_DEFAULT],
        )?;
        self.cmd_data(Stage::Init, Cmd::DATA_ENTRY_MODE, &[Flag::DATA_ENTRY_INCRY_INCRX])?;

        self.set_lut(mode)?;
        self.interface.delay_ms(INIT_SETTLE_MS);

        self.lut_mode = mode;
        self.state = PanelState::Idle;
        Ok(())
    }

    /// [`init`](Self::init) with a raw mode byte
    ///
    /// An unknown byte is rejected before anything reaches the bus, so the LUT
    /// register is never written with garbage.
    pub fn init_raw(&mut self, mode: u8) -> Result<(), PanelError> {
        match LutMode::try_from(mode) {
            Ok(mode) => self.init(mode),
            Err(byte) => {
                log::warn!("Unsupported LUT mode {}, LUT register left unwritten", byte);
                Err(PanelError::new(Stage::Lut, ErrorKind::UnsupportedMode(byte)))
            }
        }
    }

    fn set_lut(&mut self, mode: LutMode) -> Result<(), PanelError> {
        log::debug!("Writing {} LUT", mode);
        self.cmd_data(Stage::Lut, Cmd::WRITE_LUT_REGISTER, mode.table())
    }

    // ==================== RAM addressing ====================

    /// Set the RAM window the next writes go to
    pub fn set_display_window(&mut self, window: Window) -> Result<(), PanelError> {
        self.ensure_awake(Stage::Window)?;
        if !window.fits(self.variant) {
            return Err(PanelError::new(Stage::Window, ErrorKind::OutOfBounds(window)));
        }

        self.cmd_data(
            Stage::Window,
            Cmd::SET_RAMX_START_END,
            &[(window.x_start >> 3) as u8, (window.x_end >> 3) as u8],
        )?;
        self.cmd_data(
            Stage::Window,
            Cmd::SET_RAMY_START_END,
            &[
                window.y_start as u8,
                (window.y_start >> 8) as u8,
                window.y_end as u8,
                (window.y_end >> 8) as u8,
            ],
        )?;

        self.state = PanelState::Writing;
        Ok(())
    }

    /// Move the RAM address counters to pixel `(x, y)`
    pub fn set_cursor(&mut self, x: u16, y: u16) -> Result<(), PanelError> {
        self.ensure_awake(Stage::Cursor)?;
        if x >= self.variant.width() || y >= self.variant.height() {
            return Err(PanelError::new(
                Stage::Cursor,
                ErrorKind::OutOfBounds(Window::new(x, y, x, y)),
            ));
        }

        // x is positioned in bytes, the last 3 bits select a pixel inside the byte
        self.cmd_data(Stage::Cursor, Cmd::SET_RAMX_COUNTER, &[(x >> 3) as u8])?;
        // 2 Databytes: A[7:0] & 0..A[8]
        self.cmd_data(Stage::Cursor, Cmd::SET_RAMY_COUNTER, &[y as u8, (y >> 8) as u8])?;

        self.state = PanelState::Writing;
        Ok(())
    }

    // ==================== Frame updates ====================

    /// Write a full frame and refresh
    ///
    /// `buffer` is 1 bit per pixel, row-major, MSB first, `buffer_len()` bytes.
    pub fn display_image(&mut self, buffer: &[u8]) -> Result<(), PanelError> {
        self.display_window_image(buffer, Window::full(self.variant))
    }

    /// Write `buffer` into `window` only and refresh
    ///
    /// `buffer` holds just the window, `window.buffer_len()` bytes. Mostly
    /// useful with one of the partial LUTs.
    pub fn display_window_image(&mut self, buffer: &[u8], window: Window) -> Result<(), PanelError> {
        self.ensure_awake(Stage::WriteRam)?;
        // size arithmetic below assumes a non-inverted window inside the panel
        if !window.fits(self.variant) {
            return Err(PanelError::new(Stage::Window, ErrorKind::OutOfBounds(window)));
        }
        if buffer.len() != window.buffer_len() {
            return Err(PanelError::new(
                Stage::WriteRam,
                ErrorKind::BufferSize {
                    expected: window.buffer_len(),
                    actual: buffer.len(),
                },
            ));
        }

        log::info!("Writing {} bytes to window {:?}", buffer.len(), window);
        self.set_display_window(window)?;

        let row_bytes = usize::from(window.width_bytes());
        for (y, row) in (window.y_start..=window.y_end).zip(buffer.chunks_exact(row_bytes)) {
            self.set_cursor(window.x_start, y)?;
            self.interface.cmd(Cmd::WRITE_RAM).stage(Stage::WriteRam)?;
            self.interface.data(row).stage(Stage::WriteRam)?;
        }

        self.turn_on_display()
    }

    /// Fill the whole panel with white and refresh
    pub fn clear(&mut self) -> Result<(), PanelError> {
        self.ensure_awake(Stage::Clear)?;
        log::info!("Clearing panel to white");

        let full = Window::full(self.variant);
        self.set_display_window(full)?;

        let row_bytes = u32::from(full.width_bytes());
        for y in full.y_start..=full.y_end {
            self.set_cursor(0, y)?;
            self.interface.cmd(Cmd::WRITE_RAM).stage(Stage::Clear)?;
            self.interface
                .data_x_times(Flag::RAM_ALL_WHITE, row_bytes)
                .stage(Stage::Clear)?;
        }

        self.turn_on_display()
    }

    /// Push panel RAM to the glass and wait for the refresh to finish
    pub fn turn_on_display(&mut self) -> Result<(), PanelError> {
        self.ensure_awake(Stage::Activate)?;
        self.state = PanelState::Activating;

        self.cmd_data(
            Stage::Activate,
            Cmd::DISPLAY_UPDATE_CTRL2,
            &[Flag::DISPLAY_UPDATE_PATTERN],
        )?;
        self.interface.cmd(Cmd::MASTER_ACTIVATE).stage(Stage::Activate)?;
        self.interface.cmd(Cmd::TERMINATE_FRAME).stage(Stage::Activate)?;

        let settle_ms = self.interface.busy_config().settle_ms;
        if settle_ms > 0 {
            self.interface.delay_ms(settle_ms);
        }

        let polls = self.interface.wait_until_idle().stage(Stage::Activate)?;
        log::info!("Refresh done after {} busy polls", polls);

        self.state = PanelState::Idle;
        Ok(())
    }

    // ==================== Power management ====================

    /// Enter deep sleep
    ///
    /// The panel does not raise busy while going to sleep, so there is no wait.
    pub fn enter_deep_sleep(&mut self) -> Result<(), PanelError> {
        self.ensure_awake(Stage::Sleep)?;
        log::info!("Entering deep sleep");
        self.cmd_data(Stage::Sleep, Cmd::DEEP_SLEEP_MODE, &[Flag::DEEP_SLEEP_MODE_1])?;
        self.state = PanelState::Sleeping;
        Ok(())
    }

    /// Leave deep sleep: reset, re-init with the last LUT, clear the sleep bit
    pub fn wake(&mut self) -> Result<(), PanelError> {
        log::info!("Waking panel");
        self.reset_panel()?;
        self.init(self.lut_mode)?;

        self.cmd_data(Stage::Wake, Cmd::DEEP_SLEEP_MODE, &[Flag::DEEP_SLEEP_NORMAL_MODE])?;
        self.interface.wait_until_idle().stage(Stage::Wake)?;
        self.interface.delay_ms(WAKE_SETTLE_MS);

        self.state = PanelState::Idle;
        Ok(())
    }

    // ==================== Helpers ====================

    fn cmd_data(&mut self, stage: Stage, command: u8, data: &[u8]) -> Result<(), PanelError> {
        self.interface.cmd_with_data(command, data).stage(stage)?;
        Ok(())
    }

    /// RAM and refresh commands need an initialised, awake panel
    fn ensure_awake(&self, stage: Stage) -> Result<(), PanelError> {
        match self.state {
            PanelState::Idle | PanelState::Writing => Ok(()),
            other => Err(PanelError::new(stage, ErrorKind::NotReady(other))),
        }
    }
}
