//! Display interface using SPI
//!
//! Owns the SPI device, the three auxiliary lines and the delay provider. It
//! knows nothing about the IL3820 command set beyond the D/C convention.
use crate::config::{BusyConfig, BusyPolarity};
use crate::il3820::error::ErrorKind;
use display_interface::DisplayError;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

/// Reset pulse low time
pub const RESET_HOLD_MS: u32 = 200;

/// Bytes per SPI write when repeating a fill value
const CHUNK_SIZE: usize = 32;

/// The panel context: SPI device, busy/D-C/reset lines and a delay source
///
/// Created once at startup and handed to the driver, which owns it for the
/// lifetime of the program.
pub struct DisplayInterface<SPI, BSY, DC, RST, DELAY> {
    /// SPI device
    spi: SPI,
    /// Busy line, polarity set by `busy_config`
    busy: BSY,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Reseting
    rst: RST,
    /// Delay provider
    pub(crate) delay: DELAY,
    busy_config: BusyConfig,
}

impl<SPI, BSY, DC, RST, DELAY> DisplayInterface<SPI, BSY, DC, RST, DELAY> {
    /// Wrap already opened bus and pin handles
    pub fn new(spi: SPI, busy: BSY, dc: DC, rst: RST, delay: DELAY, busy_config: BusyConfig) -> Self {
        DisplayInterface {
            spi,
            busy,
            dc,
            rst,
            delay,
            busy_config,
        }
    }

    /// Busy polling configuration in use
    pub fn busy_config(&self) -> BusyConfig {
        self.busy_config
    }
}

impl<SPI, BSY, DC, RST, DELAY> DisplayInterface<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    RST: OutputPin,
    DC: OutputPin,
    BSY: InputPin,
    DELAY: DelayNs,
{
    /// Send one command byte, D/C low
    pub fn cmd(&mut self, command: u8) -> Result<usize, ErrorKind> {
        // low for commands
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;

        match self.spi.write(&[command]) {
            Ok(_) => Ok(1),
            Err(e) => {
                log::error!("SPI write error for command 0x{:02X}: {:?}", command, e);
                Err(DisplayError::BusWriteError.into())
            }
        }
    }

    /// Send a run of data bytes, D/C high
    pub fn data(&mut self, data: &[u8]) -> Result<usize, ErrorKind> {
        // high for data
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        self.spi.write(data).map_err(|e| {
            log::error!("SPI write error for {} data bytes: {:?}", data.len(), e);
            DisplayError::BusWriteError
        })?;
        Ok(data.len())
    }

    /// Command followed by its data bytes
    pub fn cmd_with_data(&mut self, command: u8, data: &[u8]) -> Result<usize, ErrorKind> {
        let sent = self.cmd(command)?;
        Ok(sent + self.data(data)?)
    }

    /// Send the same data byte `repetitions` times
    pub fn data_x_times(&mut self, val: u8, repetitions: u32) -> Result<usize, ErrorKind> {
        // high for data
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;

        let buffer = [val; CHUNK_SIZE];
        let total = repetitions as usize;
        let full_chunks = total / CHUNK_SIZE;
        let remainder = total % CHUNK_SIZE;

        for _ in 0..full_chunks {
            self.spi
                .write(&buffer)
                .map_err(|_| DisplayError::BusWriteError)?;
        }

        if remainder > 0 {
            self.spi
                .write(&buffer[0..remainder])
                .map_err(|_| DisplayError::BusWriteError)?;
        }

        Ok(total)
    }

    /// Read the busy line once, applying the configured polarity
    pub fn is_busy(&mut self) -> Result<bool, ErrorKind> {
        let high = self.busy.is_high().map_err(|_| ErrorKind::BusyRead)?;
        Ok(match self.busy_config.polarity {
            BusyPolarity::ActiveHigh => high,
            BusyPolarity::ActiveLow => !high,
        })
    }

    /// Block until the panel reports idle
    ///
    /// Returns the number of polls it took, counting the one that saw the
    /// panel idle. Gives up with [`ErrorKind::BusyTimeout`] after
    /// `max_polls` reads that all reported busy.
    pub fn wait_until_idle(&mut self) -> Result<u32, ErrorKind> {
        let BusyConfig {
            max_polls,
            poll_interval_us,
            ..
        } = self.busy_config;

        for poll in 1..=max_polls {
            if !self.is_busy()? {
                log::debug!("Panel idle after {} polls", poll);
                return Ok(poll);
            }
            if poll_interval_us > 0 {
                self.delay.delay_us(poll_interval_us);
            }
        }

        log::error!("Timeout waiting for busy line after {} polls", max_polls);
        Err(ErrorKind::BusyTimeout { polls: max_polls })
    }

    /// Hardware reset: RST high, low for [`RESET_HOLD_MS`], high again
    pub fn reset(&mut self) -> Result<(), ErrorKind> {
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_HOLD_MS);
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        Ok(())
    }

    /// Sleep for `ms` milliseconds
    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    fn spi_device_write(data: &[u8]) -> [SpiTransaction<u8>; 3] {
        [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(data.to_vec()),
            SpiTransaction::transaction_end(),
        ]
    }

    fn busy_config(polarity: BusyPolarity, max_polls: u32) -> BusyConfig {
        BusyConfig {
            polarity,
            max_polls,
            poll_interval_us: 0,
            settle_ms: 0,
        }
    }

    #[test]
    fn command_then_data_toggles_dc() {
        let spi_txns: Vec<SpiTransaction<u8>> = [spi_device_write(&[0x3A]), spi_device_write(&[0x1A])]
            .into_iter()
            .flatten()
            .collect();
        let mut spi = SpiMock::new(&spi_txns);
        let mut dc = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let mut busy = PinMock::new(&[]);
        let mut rst = PinMock::new(&[]);

        let mut interface = DisplayInterface::new(
            spi.clone(),
            busy.clone(),
            dc.clone(),
            rst.clone(),
            NoopDelay,
            BusyConfig::default(),
        );
        assert_eq!(interface.cmd_with_data(0x3A, &[0x1A]), Ok(2));

        spi.done();
        dc.done();
        busy.done();
        rst.done();
    }

    #[test]
    fn repeated_data_is_chunked() {
        let spi_txns: Vec<SpiTransaction<u8>> =
            [spi_device_write(&[0xFF; 32]), spi_device_write(&[0xFF; 8])]
                .into_iter()
                .flatten()
                .collect();
        let mut spi = SpiMock::new(&spi_txns);
        let mut dc = PinMock::new(&[PinTransaction::set(PinState::High)]);
        let mut busy = PinMock::new(&[]);
        let mut rst = PinMock::new(&[]);

        let mut interface = DisplayInterface::new(
            spi.clone(),
            busy.clone(),
            dc.clone(),
            rst.clone(),
            NoopDelay,
            BusyConfig::default(),
        );
        assert_eq!(interface.data_x_times(0xFF, 40), Ok(40));

        spi.done();
        dc.done();
        busy.done();
        rst.done();
    }

    #[test]
    fn reset_pulses_low() {
        let mut spi = SpiMock::new(&[]);
        let mut dc = PinMock::new(&[]);
        let mut busy = PinMock::new(&[]);
        let mut rst = PinMock::new(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);

        let mut interface = DisplayInterface::new(
            spi.clone(),
            busy.clone(),
            dc.clone(),
            rst.clone(),
            NoopDelay,
            BusyConfig::default(),
        );
        assert_eq!(interface.reset(), Ok(()));

        spi.done();
        dc.done();
        busy.done();
        rst.done();
    }

    #[test]
    fn active_low_busy_waits_while_low() {
        let mut spi = SpiMock::new(&[]);
        let mut dc = PinMock::new(&[]);
        let mut rst = PinMock::new(&[]);
        let mut busy = PinMock::new(&[
            PinTransaction::get(PinState::Low),
            PinTransaction::get(PinState::Low),
            PinTransaction::get(PinState::High),
        ]);

        let mut interface = DisplayInterface::new(
            spi.clone(),
            busy.clone(),
            dc.clone(),
            rst.clone(),
            NoopDelay,
            busy_config(BusyPolarity::ActiveLow, 10),
        );
        assert_eq!(interface.wait_until_idle(), Ok(3));

        spi.done();
        dc.done();
        busy.done();
        rst.done();
    }

    #[test]
    fn busy_read_error_is_reported() {
        use embedded_hal_mock::eh1::MockError;
        use std::io::ErrorKind as IoErrorKind;

        let mut spi = SpiMock::new(&[]);
        let mut dc = PinMock::new(&[]);
        let mut rst = PinMock::new(&[]);
        let mut busy = PinMock::new(&[PinTransaction::get(PinState::High)
            .with_error(MockError::Io(IoErrorKind::NotConnected))]);

        let mut interface = DisplayInterface::new(
            spi.clone(),
            busy.clone(),
            dc.clone(),
            rst.clone(),
            NoopDelay,
            busy_config(BusyPolarity::ActiveHigh, 10),
        );
        assert_eq!(interface.wait_until_idle(), Err(ErrorKind::BusyRead));

        spi.done();
        dc.done();
        busy.done();
        rst.done();
    }
}
