//! Error and exit code types
//!
//! Every driver operation stops at the first failing bus access and reports
//! a single [`PanelError`] naming the [`Stage`] it was in.

use core::fmt;

pub use display_interface::DisplayError;

use crate::il3820::driver::{PanelState, Window};

/// Which part of a command sequence failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Stage {
    BusOpen,
    GpioOpen,
    Reset,
    Init,
    Lut,
    Window,
    Cursor,
    WriteRam,
    Activate,
    Clear,
    Sleep,
    Wake,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::BusOpen => "bus open",
            Stage::GpioOpen => "gpio open",
            Stage::Reset => "reset",
            Stage::Init => "init",
            Stage::Lut => "lut",
            Stage::Window => "display window",
            Stage::Cursor => "cursor",
            Stage::WriteRam => "ram write",
            Stage::Activate => "activate",
            Stage::Clear => "clear",
            Stage::Sleep => "deep sleep",
            Stage::Wake => "wake",
        };
        f.write_str(name)
    }
}

/// Bus bring-up step that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusInitStep {
    /// Building the SPI driver configuration
    Config,
    /// Opening the SPI master
    Open,
    /// Setting the bus speed
    BusSpeed,
    /// Setting SPI mode 0
    Mode,
    /// Opening one of the reset, D/C or busy lines
    Gpio,
}

/// What went wrong
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    /// Bus or pin could not be opened or configured
    #[error("bus init failed at {0:?}")]
    BusInit(BusInitStep),
    /// SPI write, D/C or reset line toggle failed
    #[error("transfer failed: {0:?}")]
    Transfer(DisplayError),
    /// The busy line could not be read
    #[error("busy line read failed")]
    BusyRead,
    /// The panel stayed busy for the whole poll budget
    #[error("panel still busy after {polls} polls")]
    BusyTimeout {
        /// Number of polls made
        polls: u32,
    },
    /// Mode byte does not name a built-in LUT
    #[error("unsupported LUT mode {0}")]
    UnsupportedMode(u8),
    /// Operation not allowed in the current panel state
    #[error("panel not ready ({0:?})")]
    NotReady(PanelState),
    /// Framebuffer does not match the addressed window
    #[error("buffer is {actual} bytes, expected {expected}")]
    BufferSize {
        /// Bytes the window needs
        expected: usize,
        /// Bytes passed in
        actual: usize,
    },
    /// Window does not fit the panel or is inverted
    #[error("window {0:?} outside the panel")]
    OutOfBounds(Window),
}

impl From<DisplayError> for ErrorKind {
    fn from(e: DisplayError) -> Self {
        ErrorKind::Transfer(e)
    }
}

/// A failed panel operation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{stage}: {kind}")]
pub struct PanelError {
    /// Sequence stage the failure happened in
    pub stage: Stage,
    /// Underlying cause
    pub kind: ErrorKind,
}

impl PanelError {
    /// Create a new error
    pub const fn new(stage: Stage, kind: ErrorKind) -> Self {
        PanelError { stage, kind }
    }

    /// Process exit code for this failure
    pub fn exit_code(&self) -> ExitCode {
        match &self.kind {
            ErrorKind::BusInit(BusInitStep::Gpio) => ExitCode::GpioOpen,
            ErrorKind::BusInit(BusInitStep::Config) => ExitCode::SpiInitConfig,
            ErrorKind::BusInit(BusInitStep::Open) => ExitCode::SpiOpen,
            ErrorKind::BusInit(BusInitStep::BusSpeed) => ExitCode::SpiSetBusSpeed,
            ErrorKind::BusInit(BusInitStep::Mode) => ExitCode::SpiSetMode,
            ErrorKind::BusyRead => ExitCode::GpioRead,
            ErrorKind::Transfer(DisplayError::RSError) => ExitCode::Reset,
            ErrorKind::Transfer(_) => ExitCode::SpiWrite,
            ErrorKind::BusyTimeout { .. } => ExitCode::BusyTimeout,
            ErrorKind::UnsupportedMode(_) => ExitCode::UnsupportedMode,
            ErrorKind::NotReady(_) => ExitCode::NotReady,
            ErrorKind::BufferSize { .. } | ErrorKind::OutOfBounds(_) => ExitCode::InvalidArgument,
        }
    }
}

/// Extension for tagging a bus level result with the stage it ran in
pub(crate) trait StageExt<T> {
    fn stage(self, stage: Stage) -> Result<T, PanelError>;
}

impl<T, E: Into<ErrorKind>> StageExt<T> for Result<T, E> {
    fn stage(self, stage: Stage) -> Result<T, PanelError> {
        self.map_err(|e| PanelError::new(stage, e.into()))
    }
}

/// Application exit codes
///
/// Must stay between 0 and 255, zero is reserved for success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum ExitCode {
    Success = 0,
    GpioOpen = 2,
    GpioRead = 3,
    SpiInitConfig = 4,
    SpiOpen = 5,
    SpiSetBusSpeed = 6,
    SpiSetMode = 7,
    Reset = 8,
    SpiWrite = 10,
    BusyTimeout = 11,
    UnsupportedMode = 12,
    NotReady = 13,
    InvalidArgument = 14,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as u8 as i32
    }
}
