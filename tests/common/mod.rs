//! Simulated IL3820 for host tests
//!
//! Implements the `embedded-hal` traits on top of a shared panel model that
//! decodes the command stream: RAM window, address counters, X-then-Y auto
//! increment, refresh busy time and deep sleep.

#![allow(dead_code)]

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::spi::{self, Operation, SpiDevice};

use sphere_epd::{Cmd, Config, Il3820};

/// Bytes per RAM row
pub const ROW_BYTES: usize = 16;
/// RAM rows
pub const ROWS: usize = 296;

/// What the simulated controller has seen and holds
#[derive(Debug)]
pub struct Panel {
    /// Display RAM, `ROW_BYTES` per row
    pub ram: Vec<u8>,
    /// Every command with the data bytes that followed it
    pub log: Vec<(u8, Vec<u8>)>,
    /// Reads of the busy line
    pub busy_reads: u32,
    /// Reads that report busy after each master activation
    pub refresh_busy_reads: u32,
    /// Completed reset pulses
    pub resets: u32,
    /// Sum of all delays
    pub elapsed_ns: u64,
    /// `elapsed_ns` at the most recent busy read
    pub last_busy_read_ns: Option<u64>,
    /// Deep sleep bit
    pub asleep: bool,
    dc_high: bool,
    rst_high: bool,
    busy_left: u32,
    x_range: (usize, usize),
    y_range: (usize, usize),
    x: usize,
    y: usize,
}

impl Panel {
    fn new() -> Self {
        Panel {
            // power-on RAM content is undefined, make it visibly not white
            ram: vec![0xA5; ROW_BYTES * ROWS],
            log: Vec::new(),
            busy_reads: 0,
            refresh_busy_reads: 0,
            resets: 0,
            elapsed_ns: 0,
            last_busy_read_ns: None,
            asleep: false,
            dc_high: false,
            rst_high: true,
            busy_left: 0,
            x_range: (0, ROW_BYTES - 1),
            y_range: (0, ROWS - 1),
            x: 0,
            y: 0,
        }
    }

    /// Command bytes in the order they were sent
    pub fn commands(&self) -> Vec<u8> {
        self.log.iter().map(|(cmd, _)| *cmd).collect()
    }

    /// Data of every occurrence of `cmd`
    pub fn data_of(&self, cmd: u8) -> Vec<Vec<u8>> {
        self.log
            .iter()
            .filter(|(c, _)| *c == cmd)
            .map(|(_, data)| data.clone())
            .collect()
    }

    /// One RAM row
    pub fn row(&self, y: usize) -> &[u8] {
        &self.ram[y * ROW_BYTES..(y + 1) * ROW_BYTES]
    }

    fn byte(&mut self, b: u8) {
        if !self.dc_high {
            self.log.push((b, Vec::new()));
            if b == Cmd::MASTER_ACTIVATE {
                self.busy_left = self.refresh_busy_reads;
            }
            return;
        }

        let Some((cmd, data)) = self.log.last_mut() else {
            return;
        };
        data.push(b);
        let cmd = *cmd;
        let data = data.clone();

        match (cmd, data.as_slice()) {
            (Cmd::SET_RAMX_START_END, [start, end]) => {
                self.x_range = (usize::from(*start), usize::from(*end));
            }
            (Cmd::SET_RAMY_START_END, [s0, s1, e0, e1]) => {
                self.y_range = (
                    usize::from(u16::from_le_bytes([*s0, *s1])),
                    usize::from(u16::from_le_bytes([*e0, *e1])),
                );
            }
            (Cmd::SET_RAMX_COUNTER, [x]) => self.x = usize::from(*x),
            (Cmd::SET_RAMY_COUNTER, [y0, y1]) => {
                self.y = usize::from(u16::from_le_bytes([*y0, *y1]));
            }
            (Cmd::DEEP_SLEEP_MODE, [mode]) => self.asleep = *mode & 0x01 != 0,
            (Cmd::WRITE_RAM, _) => self.write_ram(b),
            _ => {}
        }
    }

    fn write_ram(&mut self, b: u8) {
        if self.x < ROW_BYTES && self.y < ROWS {
            self.ram[self.y * ROW_BYTES + self.x] = b;
        }
        self.x += 1;
        if self.x > self.x_range.1 {
            self.x = self.x_range.0;
            self.y += 1;
            if self.y > self.y_range.1 {
                self.y = self.y_range.0;
            }
        }
    }
}

/// Shared handle to the simulated panel
pub type PanelRef = Rc<RefCell<Panel>>;

/// SPI side of the simulator
pub struct SimSpi(PanelRef);

impl spi::ErrorType for SimSpi {
    type Error = Infallible;
}

impl SpiDevice for SimSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
        let mut panel = self.0.borrow_mut();
        for op in operations {
            match op {
                Operation::Write(bytes) => bytes.iter().for_each(|b| panel.byte(*b)),
                Operation::Transfer(read, write) => {
                    write.iter().for_each(|b| panel.byte(*b));
                    read.fill(0);
                }
                Operation::TransferInPlace(bytes) => {
                    bytes.iter().for_each(|b| panel.byte(*b));
                    bytes.fill(0);
                }
                Operation::Read(read) => read.fill(0),
                Operation::DelayNs(ns) => panel.elapsed_ns += u64::from(*ns),
            }
        }
        Ok(())
    }
}

/// D/C line
pub struct SimDc(PanelRef);

impl digital::ErrorType for SimDc {
    type Error = Infallible;
}

impl OutputPin for SimDc {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().dc_high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().dc_high = true;
        Ok(())
    }
}

/// Reset line, a low to high edge counts as one reset
pub struct SimRst(PanelRef);

impl digital::ErrorType for SimRst {
    type Error = Infallible;
}

impl OutputPin for SimRst {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().rst_high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        let mut panel = self.0.borrow_mut();
        if !panel.rst_high {
            panel.resets += 1;
            panel.asleep = false;
        }
        panel.rst_high = true;
        Ok(())
    }
}

/// Busy line, active high
pub struct SimBusy(PanelRef);

impl digital::ErrorType for SimBusy {
    type Error = Infallible;
}

impl InputPin for SimBusy {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        let mut panel = self.0.borrow_mut();
        panel.busy_reads += 1;
        panel.last_busy_read_ns = Some(panel.elapsed_ns);
        if panel.busy_left > 0 {
            panel.busy_left -= 1;
            return Ok(true);
        }
        Ok(false)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

/// Delay that only adds up the requested time
pub struct SimDelay(PanelRef);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().elapsed_ns += u64::from(ns);
    }
}

/// Driver wired to the simulated panel
pub type SimDriver = Il3820<SimSpi, SimBusy, SimDc, SimRst, SimDelay>;

/// New driver plus a handle to inspect the panel
pub fn sim(config: &Config) -> (SimDriver, PanelRef) {
    let panel = Rc::new(RefCell::new(Panel::new()));
    let driver = Il3820::from_config(
        SimSpi(panel.clone()),
        SimBusy(panel.clone()),
        SimDc(panel.clone()),
        SimRst(panel.clone()),
        SimDelay(panel.clone()),
        config,
    );
    (driver, panel)
}
