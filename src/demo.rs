//! Drawing routines used by the firmware demo
//!
//! Kept out of `main.rs` so they run on the host: everything here draws onto
//! any `embedded-graphics` target using the panel's [`Color`].

use core::fmt;

use embedded_graphics::{
    image::{Image, ImageRaw},
    mono_font::{
        ascii::{FONT_10X20, FONT_5X8, FONT_6X10, FONT_9X15},
        MonoFont, MonoTextStyle, MonoTextStyleBuilder,
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use epd_waveshare::color::Color;

use crate::config::{Orientation, PanelVariant};
use crate::il3820::graphics::clear_region;
use crate::il3820::lut::LutMode;

/// Logo bitmap size, landscape
pub const LOGO_SIZE: Size = Size::new(296, 128);

/// Where the clock is drawn on the landscape canvas
pub const CLOCK_ORIGIN: Point = Point::new(100, 50);

/// Font of the clock
pub const CLOCK_FONT: &MonoFont<'static> = &FONT_10X20;

/// Number of partial refreshes the clock runs for
pub const CLOCK_TICKS: u8 = 20;

/// LUTs for the full refresh part and the clock, from the configured mode
///
/// The configured table is used for the part it suits and its sibling from
/// the same family for the other part.
pub fn refresh_modes(configured: LutMode) -> (LutMode, LutMode) {
    let sibling = match configured {
        LutMode::WaveshareFull => LutMode::WavesharePartial,
        LutMode::WavesharePartial => LutMode::WaveshareFull,
        LutMode::U8g2Full => LutMode::U8g2Partial,
        LutMode::U8g2Partial => LutMode::U8g2Full,
    };
    if configured.is_partial() {
        (sibling, configured)
    } else {
        (configured, sibling)
    }
}

/// Whether the canvas for `orientation` has the size the artwork is laid out for
pub fn fits_layout(orientation: Orientation, variant: PanelVariant) -> bool {
    let (width, height) = orientation.canvas_size(variant);
    Size::new(u32::from(width), u32::from(height)) == LOGO_SIZE
}

/// Wall clock time for the partial refresh demo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    /// 0..=23
    pub hour: u8,
    /// 0..=59
    pub minute: u8,
    /// 0..=59
    pub second: u8,
}

impl ClockTime {
    /// New time, fields are not range checked
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        ClockTime {
            hour,
            minute,
            second,
        }
    }

    /// Advance by one second, wrapping at midnight
    pub fn tick(&mut self) {
        self.second += 1;
        if self.second < 60 {
            return;
        }
        self.second = 0;
        self.minute += 1;
        if self.minute < 60 {
            return;
        }
        self.minute = 0;
        self.hour += 1;
        if self.hour == 24 {
            self.hour = 0;
        }
    }
}

impl Default for ClockTime {
    fn default() -> Self {
        ClockTime::new(12, 34, 56)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

fn text_style(font: &'static MonoFont<'static>, inverted: bool) -> MonoTextStyle<'static, Color> {
    let (fg, bg) = if inverted {
        (Color::White, Color::Black)
    } else {
        (Color::Black, Color::White)
    };
    MonoTextStyleBuilder::new()
        .font(font)
        .text_color(fg)
        .background_color(bg)
        .build()
}

/// Square dot of `size` pixels centred on `center`
fn dot<D>(target: &mut D, center: Point, size: u32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Color>,
{
    Rectangle::with_center(center, Size::new(size, size))
        .into_styled(PrimitiveStyle::with_fill(Color::Black))
        .draw(target)
}

/// Line with every third pixel set
fn dotted_line<D>(target: &mut D, start: Point, end: Point) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Color>,
{
    target.draw_iter(
        Line::new(start, end)
            .points()
            .step_by(3)
            .map(|p| Pixel(p, Color::Black)),
    )
}

/// Points, lines, rectangles, circles, strings and numbers
///
/// Laid out for the 296x128 landscape canvas.
pub fn draw_gfx_demo<D>(target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Color>,
{
    let black = PrimitiveStyle::with_stroke(Color::Black, 1);

    dot(target, Point::new(230, 10), 1)?;
    dot(target, Point::new(230, 30), 2)?;
    dot(target, Point::new(260, 20), 3)?;

    Line::new(Point::new(170, 70), Point::new(220, 120))
        .into_styled(black)
        .draw(target)?;
    Line::new(Point::new(220, 70), Point::new(170, 120))
        .into_styled(black)
        .draw(target)?;

    Rectangle::with_corners(Point::new(170, 70), Point::new(220, 120))
        .into_styled(black)
        .draw(target)?;
    Rectangle::with_corners(Point::new(230, 70), Point::new(280, 120))
        .into_styled(PrimitiveStyle::with_fill(Color::Black))
        .draw(target)?;

    Circle::with_center(Point::new(195, 95), 41)
        .into_styled(black)
        .draw(target)?;
    Circle::with_center(Point::new(255, 95), 41)
        .into_styled(PrimitiveStyle::with_fill(Color::White))
        .draw(target)?;

    dotted_line(target, Point::new(230, 95), Point::new(280, 95))?;
    dotted_line(target, Point::new(255, 75), Point::new(255, 115))?;

    Text::with_baseline("Hello From", Point::new(10, 0), text_style(&FONT_10X20, false), Baseline::Top)
        .draw(target)?;
    Text::with_baseline("Rust", Point::new(10, 30), text_style(&FONT_10X20, false), Baseline::Top)
        .draw(target)?;
    Text::with_baseline("IL3820", Point::new(60, 30), text_style(&FONT_10X20, true), Baseline::Top)
        .draw(target)?;

    let numbers: [(i32, u32, &'static MonoFont<'static>, bool); 4] = [
        (60, 123_456_789, &FONT_5X8, true),
        (70, 987_654_321, &FONT_6X10, false),
        (85, 123_456_789, &FONT_9X15, true),
        (100, 987_654_321, &FONT_10X20, false),
    ];
    for (y, n, font, inverted) in numbers {
        let digits = n.to_string();
        Text::with_baseline(&digits, Point::new(10, y), text_style(font, inverted), Baseline::Top)
            .draw(target)?;
    }

    Ok(())
}

/// Erase the clock area and draw `time` into it
pub fn draw_clock<D>(target: &mut D, time: ClockTime) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Color>,
{
    let char_size = CLOCK_FONT.character_size;
    let area = Rectangle::new(
        CLOCK_ORIGIN,
        Size::new(char_size.width * 8, char_size.height),
    );
    clear_region(target, area)?;

    Text::with_baseline(
        &time.to_string(),
        CLOCK_ORIGIN,
        text_style(CLOCK_FONT, false),
        Baseline::Top,
    )
    .draw(target)?;
    Ok(())
}

/// Blit a 296x128 1 bpp logo, bit set = black
///
/// Returns `false` and leaves the target untouched when the target is not a
/// landscape canvas or `logo` is not exactly one landscape frame, e.g. the
/// empty blob written when the build had no `logo.png`.
pub fn draw_logo<D>(target: &mut D, logo: &[u8]) -> Result<bool, D::Error>
where
    D: DrawTarget<Color = Color>,
{
    let canvas = target.bounding_box().size;
    if canvas != LOGO_SIZE {
        log::warn!("Logo needs a {:?} canvas, got {:?}, skipping", LOGO_SIZE, canvas);
        return Ok(false);
    }

    let expected = (LOGO_SIZE.width.div_ceil(8) * LOGO_SIZE.height) as usize;
    if logo.len() != expected {
        log::warn!("Logo is {} bytes, expected {}, skipping", logo.len(), expected);
        return Ok(false);
    }

    let raw = ImageRaw::<BinaryColor>::new(logo, LOGO_SIZE.width);
    Image::new(&raw, Point::zero()).draw(&mut target.color_converted())?;
    Ok(true)
}
