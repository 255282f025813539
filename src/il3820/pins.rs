//! Pin definitions for the IL3820 e-paper display
//!
//! SPI clock and data lines are shared; chip select and the three control
//! lines depend on which slot the panel module sits in.

/// Pins shared by both slots
pub struct Pins;

#[allow(dead_code)]
impl Pins {
    /// SPI Clock pin
    pub const SCK: u8 = 12;
    /// SPI Master Out Slave In
    pub const MOSI: u8 = 11;
    /// Panel power enable, high to power the module
    pub const POWER: u8 = 7;
}

/// Per slot control lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPins {
    /// Chip Select pin for SPI display
    pub cs: u8,
    /// Data/Command control pin (High for data, Low for command)
    pub dc: u8,
    /// Reset pin for display
    pub rst: u8,
    /// Busy status pin
    pub busy: u8,
}

impl SlotPins {
    /// Slot 1 wiring
    pub const SLOT_1: SlotPins = SlotPins {
        cs: 45,
        dc: 46,
        rst: 47,
        busy: 48,
    };

    /// Slot 2 wiring
    pub const SLOT_2: SlotPins = SlotPins {
        cs: 10,
        dc: 4,
        rst: 5,
        busy: 6,
    };
}
