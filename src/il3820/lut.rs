//! Waveform look-up tables
//!
//! The IL3820 takes a 30 byte LUT through [`Cmd::WRITE_LUT_REGISTER`](super::cmd::Cmd).
//! Four fixed tables are built in: the Waveshare reference tables and the
//! ones shipped with u8g2, each in a full and a partial refresh flavour.

use core::fmt;
use core::str::FromStr;

/// Number of data bytes in every LUT
pub const LUT_LEN: usize = 30;

/// Waveshare full update table
pub const LUT_WAVESHARE_FULL: [u8; LUT_LEN] = [
    0x50, 0xAA, 0x55, 0xAA, 0x11, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0xFF, 0xFF, 0x1F, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
];

/// Waveshare partial update table
pub const LUT_WAVESHARE_PARTIAL: [u8; LUT_LEN] = [
    0x10, 0x18, 0x18, 0x08, 0x18, 0x18, //
    0x08, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x13, 0x14, 0x44, 0x12, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
];

/// u8g2 full update table
pub const LUT_U8G2_FULL: [u8; LUT_LEN] = [
    0x02, 0x02, 0x01, 0x11, 0x12, 0x12, //
    0x22, 0x22, 0x66, 0x69, 0x69, 0x59, //
    0x58, 0x99, 0x99, 0x88, 0x00, 0x00, //
    0x00, 0x00, 0xF8, 0xB4, 0x13, 0x51, //
    0x35, 0x51, 0x51, 0x19, 0x01, 0x00, //
];

/// u8g2 partial update table
pub const LUT_U8G2_PARTIAL: [u8; LUT_LEN] = [
    0x10, 0x18, 0x18, 0x08, 0x18, 0x18, //
    0x08, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x13, 0x14, 0x44, 0x12, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
];

/// Which waveform table [`Il3820::init`](super::driver::Il3820::init) loads
///
/// The discriminants are the raw mode bytes accepted by
/// [`Il3820::init_raw`](super::driver::Il3820::init_raw).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum LutMode {
    /// Waveshare full refresh, best contrast, ~2 s
    #[default]
    WaveshareFull = 0,
    /// Waveshare partial refresh
    WavesharePartial = 1,
    /// u8g2 full refresh
    U8g2Full = 2,
    /// u8g2 partial refresh
    U8g2Partial = 3,
}

impl LutMode {
    /// All supported modes, in mode byte order
    pub const ALL: [LutMode; 4] = [
        LutMode::WaveshareFull,
        LutMode::WavesharePartial,
        LutMode::U8g2Full,
        LutMode::U8g2Partial,
    ];

    /// The 30 LUT bytes for this mode, in wire order
    pub const fn table(self) -> &'static [u8; LUT_LEN] {
        match self {
            LutMode::WaveshareFull => &LUT_WAVESHARE_FULL,
            LutMode::WavesharePartial => &LUT_WAVESHARE_PARTIAL,
            LutMode::U8g2Full => &LUT_U8G2_FULL,
            LutMode::U8g2Partial => &LUT_U8G2_PARTIAL,
        }
    }

    /// True for the partial refresh tables
    pub const fn is_partial(self) -> bool {
        matches!(self, LutMode::WavesharePartial | LutMode::U8g2Partial)
    }
}

impl TryFrom<u8> for LutMode {
    /// The rejected mode byte
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LutMode::WaveshareFull),
            1 => Ok(LutMode::WavesharePartial),
            2 => Ok(LutMode::U8g2Full),
            3 => Ok(LutMode::U8g2Partial),
            other => Err(other),
        }
    }
}

impl FromStr for LutMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "full" | "waveshare-full" => Ok(LutMode::WaveshareFull),
            "1" | "partial" | "waveshare-partial" => Ok(LutMode::WavesharePartial),
            "2" | "u8g2-full" => Ok(LutMode::U8g2Full),
            "3" | "u8g2-partial" => Ok(LutMode::U8g2Partial),
            other => Err(anyhow::anyhow!("unknown LUT mode '{}'", other)),
        }
    }
}

impl fmt::Display for LutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LutMode::WaveshareFull => "waveshare-full",
            LutMode::WavesharePartial => "waveshare-partial",
            LutMode::U8g2Full => "u8g2-full",
            LutMode::U8g2Partial => "u8g2-partial",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_bytes_map_to_tables() {
        for (byte, mode) in LutMode::ALL.iter().enumerate() {
            assert_eq!(LutMode::try_from(byte as u8), Ok(*mode));
            assert_eq!(*mode as u8, byte as u8);
        }
        assert_eq!(LutMode::try_from(4), Err(4));
        assert_eq!(LutMode::try_from(0xFF), Err(0xFF));
    }

    #[test]
    fn u8g2_tables_do_not_carry_the_command_byte() {
        assert_ne!(LUT_U8G2_FULL[0], 0x32);
        assert_ne!(LUT_U8G2_PARTIAL[0], 0x32);
        assert_eq!(LUT_U8G2_FULL[LUT_LEN - 1], 0x00);
    }

    #[test]
    fn partial_modes() {
        assert!(!LutMode::WaveshareFull.is_partial());
        assert!(LutMode::WavesharePartial.is_partial());
        assert!(!LutMode::U8g2Full.is_partial());
        assert!(LutMode::U8g2Partial.is_partial());
    }

    #[test]
    fn parse_names_and_numbers() {
        assert_eq!("2".parse::<LutMode>().unwrap(), LutMode::U8g2Full);
        assert_eq!(
            "Waveshare-Partial".parse::<LutMode>().unwrap(),
            LutMode::WavesharePartial
        );
        assert_eq!(
            LutMode::U8g2Partial.to_string().parse::<LutMode>().unwrap(),
            LutMode::U8g2Partial
        );
        assert!("fast".parse::<LutMode>().is_err());
    }
}
