//! Panel and board configuration
//!
//! Everything that used to be a compile time switch (panel variant, which
//! mikroBUS-style slot the panel sits in, busy polarity) is a field here.
//! [`Config::from_build_env`] fills it from variables set when building the
//! firmware, e.g. `EPD_PIN_SLOT=2 cargo build --features esp`.

use core::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::il3820::lut::LutMode;
use crate::il3820::pins::SlotPins;

/// Supported panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelVariant {
    /// Waveshare / Good Display 2.9" bi-colour, IL3820 controller, 128x296
    #[default]
    Epd2in9,
}

impl PanelVariant {
    /// Width in pixels, RAM X direction
    pub const fn width(self) -> u16 {
        match self {
            PanelVariant::Epd2in9 => crate::il3820::WIDTH,
        }
    }

    /// Height in pixels, RAM Y direction
    pub const fn height(self) -> u16 {
        match self {
            PanelVariant::Epd2in9 => crate::il3820::HEIGHT,
        }
    }

    /// Bytes per RAM row, 8 pixels per byte
    pub const fn width_bytes(self) -> u16 {
        self.width().div_ceil(8)
    }

    /// Size of a full framebuffer in bytes
    pub const fn buffer_len(self) -> usize {
        self.width_bytes() as usize * self.height() as usize
    }
}

/// Which slot the panel is plugged into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PinSlot {
    /// First slot
    #[default]
    Slot1,
    /// Second slot
    Slot2,
}

impl PinSlot {
    /// Pin numbers wired to this slot
    pub const fn pins(self) -> SlotPins {
        match self {
            PinSlot::Slot1 => SlotPins::SLOT_1,
            PinSlot::Slot2 => SlotPins::SLOT_2,
        }
    }
}

impl FromStr for PinSlot {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "slot1" => Ok(PinSlot::Slot1),
            "2" | "slot2" => Ok(PinSlot::Slot2),
            other => bail!("unknown pin slot '{}'", other),
        }
    }
}

/// Level of the busy line while the panel is working
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusyPolarity {
    /// HIGH while busy, what the panel does in practice
    #[default]
    ActiveHigh,
    /// LOW while busy, as some datasheet revisions describe it
    ActiveLow,
}

impl FromStr for BusyPolarity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" | "active-high" => Ok(BusyPolarity::ActiveHigh),
            "low" | "active-low" => Ok(BusyPolarity::ActiveLow),
            other => bail!("unknown busy polarity '{}'", other),
        }
    }
}

/// How the driver waits on the busy line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyConfig {
    /// Busy line level meaning "busy"
    pub polarity: BusyPolarity,
    /// Reads before giving up
    pub max_polls: u32,
    /// Pause between reads, 0 spins
    pub poll_interval_us: u32,
    /// Wait after triggering a refresh before the first read, the panel
    /// needs a moment to raise the line
    pub settle_ms: u32,
}

impl BusyConfig {
    /// Budget of `timeout_ms` at the current poll interval
    pub const fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        let interval = if self.poll_interval_us == 0 {
            1
        } else {
            self.poll_interval_us
        };
        let polls = timeout_ms.saturating_mul(1000) / interval;
        self.max_polls = if polls == 0 { 1 } else { polls };
        self
    }
}

impl Default for BusyConfig {
    fn default() -> Self {
        // 50 000 x 100 us = 5 s, a full refresh takes about 2 s
        BusyConfig {
            polarity: BusyPolarity::ActiveHigh,
            max_polls: 50_000,
            poll_interval_us: 100,
            settle_ms: 100,
        }
    }
}

/// Logical orientation of the drawing canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// 128 wide, 296 tall, same as panel RAM
    Portrait,
    /// 296 wide, 128 tall, canvas rotated by 90 degrees
    #[default]
    Landscape,
}

impl Orientation {
    /// Canvas size `(width, height)` for `variant`
    pub const fn canvas_size(self, variant: PanelVariant) -> (u16, u16) {
        match self {
            Orientation::Portrait => (variant.width(), variant.height()),
            Orientation::Landscape => (variant.height(), variant.width()),
        }
    }
}

impl FromStr for Orientation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            other => bail!("unknown orientation '{}'", other),
        }
    }
}

/// Complete panel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    /// Panel model
    pub variant: PanelVariant,
    /// Board slot and therefore pin assignment
    pub slot: PinSlot,
    /// Busy line handling
    pub busy: BusyConfig,
    /// LUT loaded by the first init
    pub lut_mode: LutMode,
    /// Canvas orientation
    pub orientation: Orientation,
}

impl Config {
    /// Use pins of `slot`
    pub const fn with_slot(mut self, slot: PinSlot) -> Self {
        self.slot = slot;
        self
    }

    /// Busy line settings
    pub const fn with_busy(mut self, busy: BusyConfig) -> Self {
        self.busy = busy;
        self
    }

    /// Initial LUT
    pub const fn with_lut_mode(mut self, lut_mode: LutMode) -> Self {
        self.lut_mode = lut_mode;
        self
    }

    /// Canvas orientation
    pub const fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Configuration chosen at build time
    ///
    /// Reads `EPD_PIN_SLOT`, `EPD_BUSY_POLARITY`, `EPD_BUSY_TIMEOUT_MS`,
    /// `EPD_BUSY_SETTLE_MS`, `EPD_LUT_MODE` and `EPD_ORIENTATION`; unset
    /// variables keep defaults.
    pub fn from_build_env() -> Result<Self> {
        Self::from_vars(|key| match key {
            "EPD_PIN_SLOT" => option_env!("EPD_PIN_SLOT"),
            "EPD_BUSY_POLARITY" => option_env!("EPD_BUSY_POLARITY"),
            "EPD_BUSY_TIMEOUT_MS" => option_env!("EPD_BUSY_TIMEOUT_MS"),
            "EPD_BUSY_SETTLE_MS" => option_env!("EPD_BUSY_SETTLE_MS"),
            "EPD_LUT_MODE" => option_env!("EPD_LUT_MODE"),
            "EPD_ORIENTATION" => option_env!("EPD_ORIENTATION"),
            _ => None,
        })
    }

    /// Build from a variable lookup, unset keys keep defaults
    pub fn from_vars<'a>(lookup: impl Fn(&str) -> Option<&'a str>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(slot) = lookup("EPD_PIN_SLOT") {
            config.slot = slot.parse().context("EPD_PIN_SLOT")?;
        }
        if let Some(polarity) = lookup("EPD_BUSY_POLARITY") {
            config.busy.polarity = polarity.parse().context("EPD_BUSY_POLARITY")?;
        }
        if let Some(timeout) = lookup("EPD_BUSY_TIMEOUT_MS") {
            let ms: u32 = timeout
                .trim()
                .parse()
                .with_context(|| format!("EPD_BUSY_TIMEOUT_MS '{}'", timeout))?;
            config.busy = config.busy.with_timeout_ms(ms);
        }
        if let Some(settle) = lookup("EPD_BUSY_SETTLE_MS") {
            config.busy.settle_ms = settle
                .trim()
                .parse()
                .with_context(|| format!("EPD_BUSY_SETTLE_MS '{}'", settle))?;
        }
        if let Some(mode) = lookup("EPD_LUT_MODE") {
            config.lut_mode = mode.parse().context("EPD_LUT_MODE")?;
        }
        if let Some(orientation) = lookup("EPD_ORIENTATION") {
            config.orientation = orientation.parse().context("EPD_ORIENTATION")?;
        }

        log::debug!("Panel configuration: {:?}", config);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_2in9_panel() {
        let config = Config::default();
        assert_eq!(config.variant.width(), 128);
        assert_eq!(config.variant.height(), 296);
        assert_eq!(config.variant.width_bytes(), 16);
        assert_eq!(config.variant.buffer_len(), 4736);
        assert_eq!(config.slot, PinSlot::Slot1);
        assert_eq!(config.busy.polarity, BusyPolarity::ActiveHigh);
        assert_eq!(config.busy.settle_ms, 100);
        assert_eq!(config.lut_mode, LutMode::WaveshareFull);
        assert_eq!(config.orientation, Orientation::Landscape);
    }

    #[test]
    fn orientation_is_honoured() {
        let variant = PanelVariant::Epd2in9;
        assert_eq!(Orientation::Portrait.canvas_size(variant), (128, 296));
        assert_eq!(Orientation::Landscape.canvas_size(variant), (296, 128));
    }

    #[test]
    fn vars_override_defaults() {
        let config = Config::from_vars(|key| match key {
            "EPD_PIN_SLOT" => Some("2"),
            "EPD_BUSY_POLARITY" => Some("low"),
            "EPD_BUSY_TIMEOUT_MS" => Some("1000"),
            "EPD_BUSY_SETTLE_MS" => Some("20"),
            "EPD_LUT_MODE" => Some("u8g2-partial"),
            "EPD_ORIENTATION" => Some("Portrait"),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.slot, PinSlot::Slot2);
        assert_eq!(config.busy.polarity, BusyPolarity::ActiveLow);
        assert_eq!(config.busy.max_polls, 10_000);
        assert_eq!(config.busy.settle_ms, 20);
        assert_eq!(config.lut_mode, LutMode::U8g2Partial);
        assert_eq!(config.orientation, Orientation::Portrait);
    }

    #[test]
    fn bad_values_are_rejected() {
        let err = Config::from_vars(|key| (key == "EPD_PIN_SLOT").then_some("3")).unwrap_err();
        assert!(format!("{:#}", err).contains("EPD_PIN_SLOT"));

        assert!(Config::from_vars(|key| (key == "EPD_BUSY_TIMEOUT_MS").then_some("soon")).is_err());
        assert!(Config::from_vars(|key| (key == "EPD_LUT_MODE").then_some("9")).is_err());
    }

    #[test]
    fn spinning_busy_budget() {
        let busy = BusyConfig {
            poll_interval_us: 0,
            ..BusyConfig::default()
        }
        .with_timeout_ms(2);
        assert_eq!(busy.max_polls, 2000);
        assert_eq!(BusyConfig::default().with_timeout_ms(0).max_polls, 1);
    }

    #[test]
    fn slots_have_distinct_control_lines() {
        let one = PinSlot::Slot1.pins();
        let two = PinSlot::Slot2.pins();
        assert_ne!(one.busy, two.busy);
        assert_ne!(one.rst, two.rst);
    }
}
