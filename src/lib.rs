//! Driver for the Waveshare / Good Display 2.9" e-paper module (IL3820)
//!
//! The crate is split the same way the hardware is:
//!
//! - [`il3820::interface`] talks to the bus: SPI writes, the D/C and reset
//!   lines, and polling the busy line
//! - [`il3820::driver`] sequences the controller: init with one of four LUTs,
//!   RAM windows, refresh, deep sleep
//! - [`il3820::graphics`] provides the `embedded-graphics` surface whose
//!   buffer is sent to the panel
//! - [`config`] collects the board and panel choices
//! - [`demo`] has the drawing routines of the firmware demo
//!
//! Everything is generic over `embedded-hal` 1.0 traits, the ESP-IDF board
//! glue lives in the firmware binary.
//!
//! ```ignore
//! let config = Config::from_build_env()?;
//! let mut epd = Il3820::from_config(spi, busy, dc, rst, delay, &config);
//! epd.begin(LutMode::WaveshareFull)?;
//! epd.clear()?;
//!
//! let mut canvas = graphics::canvas(config.orientation);
//! demo::draw_gfx_demo(&mut canvas)?;
//! epd.display_image(canvas.buffer())?;
//! epd.enter_deep_sleep()?;
//! ```

#![deny(missing_docs)]
#![allow(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod demo;
pub mod il3820;

pub use crate::config::{BusyConfig, BusyPolarity, Config, Orientation, PanelVariant, PinSlot};
pub use crate::il3820::cmd::Cmd;
pub use crate::il3820::driver::{Il3820, PanelState, Window};
pub use crate::il3820::error::{BusInitStep, ErrorKind, ExitCode, PanelError, Stage};
pub use crate::il3820::flag::Flag;
pub use crate::il3820::graphics;
pub use crate::il3820::lut::LutMode;
pub use crate::il3820::pins::{Pins, SlotPins};
