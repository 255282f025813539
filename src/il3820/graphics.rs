//! Paint surface for the 2.9" panel
//!
//! Drawing goes through `embedded-graphics` onto an
//! [`epd_waveshare::epd2in9::Display2in9`], whose buffer has the exact RAM
//! layout the IL3820 expects: 16 bytes per row, 296 rows, MSB first,
//! 1 = white. Hand [`Canvas::buffer`] to
//! [`Il3820::display_image`](super::driver::Il3820::display_image).

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use epd_waveshare::color::Color;
use epd_waveshare::epd2in9::Display2in9;
use epd_waveshare::graphics::DisplayRotation;

use crate::config::Orientation;

/// Framebuffer the demo draws into
pub type Canvas = Display2in9;

/// Rotation applied to the canvas for `orientation`
pub const fn rotation(orientation: Orientation) -> DisplayRotation {
    match orientation {
        Orientation::Portrait => DisplayRotation::Rotate0,
        Orientation::Landscape => DisplayRotation::Rotate90,
    }
}

/// White canvas with the rotation for `orientation`
pub fn canvas(orientation: Orientation) -> Canvas {
    let mut canvas = Canvas::default();
    canvas.set_rotation(rotation(orientation));
    // drawing into the in-memory buffer cannot fail
    let _ = canvas.clear(Color::White);
    canvas
}

/// Paint `area` white
pub fn clear_region<D>(target: &mut D, area: Rectangle) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Color>,
{
    target.fill_solid(&area, Color::White)
}
