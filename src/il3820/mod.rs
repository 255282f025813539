//! IL3820 ePaper Display Driver
//!
//! Used in the Waveshare / Good Display 2.9" black and white module (128x296).
//!
//! This driver is losely modeled after the
//! [epd-waveshare](https://github.com/caemor/epd-waveshare) drivers but keeps
//! the register sequence of the panel reference code.
//!
//!
//! ### Usage
//! This driver does not hide that you're working with one buffer for black/white. To
//! display something you:
//!
//! 1. first create a buffer and draw things onto it, with [`graphics::canvas`]
//! and [`embedded_graphics`](https://github.com/embedded-graphics/embedded-graphics).
//! 1. then send the frame with [`driver::Il3820::display_image`], which also
//! triggers the refresh
//! 1. clear the panel every now and then with [`driver::Il3820::clear`], or put it
//! to sleep with [`driver::Il3820::enter_deep_sleep`] between sessions
//!
//! ### RAM addressing
//! X addresses are byte columns (pixel x >> 3), Y addresses are pixel rows sent
//! as two bytes, low byte first.
//!

pub mod cmd;
pub mod driver;
pub mod error;
pub mod flag;
pub mod graphics;
pub mod interface;
pub mod lut;
pub mod pins;

/// Display height, pixels vertically
pub const HEIGHT: u16 = 296;

/// Display width, pixels horizontally
pub const WIDTH: u16 = 128;
