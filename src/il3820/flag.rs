//! Data bytes for the IL3820 commands

/// Data byte values sent after the [`Cmd`](super::cmd::Cmd) codes.
///
/// Values are the ones the GDEH029A1 / Waveshare 2.9" module expects; most of
/// them come straight from the panel reference code.
pub struct Flag;

#[allow(missing_docs)]
impl Flag {
    // Driver Output Control (0x01), third byte: GD = 0, SM = 0, TB = 0
    pub const DRIVER_OUTPUT_SCAN_DEFAULT: u8 = 0x00;

    // Booster Soft Start Control (0x0C)
    pub const BOOSTER_SOFT_START_PHASE1: u8 = 0xD7;
    pub const BOOSTER_SOFT_START_PHASE2: u8 = 0xD6;
    pub const BOOSTER_SOFT_START_PHASE3: u8 = 0x9D;

    // Write VCOM register (0x2C)
    pub const VCOM_DEFAULT: u8 = 0xA8;

    // Dummy line period (0x3A): 4 dummy lines per gate
    pub const DUMMY_LINE_PERIOD: u8 = 0x1A;

    // Gate line width (0x3B): 2us per line
    pub const GATE_LINE_WIDTH: u8 = 0x08;

    // Border Waveform Control (0x3C)
    pub const BORDER_WAVEFORM_DEFAULT: u8 = 0x03;

    // Data Entry Mode (0x11)
    pub const DATA_ENTRY_INCRY_INCRX: u8 = 0x03; // Y increment, X increment

    // Display Update Control 2 (0x22)
    pub const DISPLAY_UPDATE_PATTERN: u8 = 0xC4; // Enable clock/analog, display pattern

    // Deep Sleep Mode (0x10)
    pub const DEEP_SLEEP_NORMAL_MODE: u8 = 0x00;
    pub const DEEP_SLEEP_MODE_1: u8 = 0x01;

    // RAM fill value, 1 bit per pixel
    pub const RAM_ALL_WHITE: u8 = 0xFF;
}
