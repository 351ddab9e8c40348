//! Bus and pin doubles shared by the driver tests

use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, ErrorType, Operation, SpiDevice};

/// SPI error raised by [`MockSpi`] when `fail` is set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiFault;

impl spi::Error for SpiFault {
    fn kind(&self) -> spi::ErrorKind {
        spi::ErrorKind::Other
    }
}

/// Register-file SPI device
///
/// The first byte of a transaction is an address (bit 7 = write); later
/// bytes read or write consecutive registers. Transactions without a read
/// are logged in `writes`.
pub struct MockSpi {
    pub registers: [u8; 128],
    pub writes: Vec<Vec<u8>>,
    pub fail: bool,
    pub read_only: bool,
}

impl MockSpi {
    pub fn new() -> Self {
        Self {
            registers: [0; 128],
            writes: Vec::new(),
            fail: false,
            read_only: false,
        }
    }
}

impl ErrorType for MockSpi {
    type Error = SpiFault;
}

impl SpiDevice for MockSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), SpiFault> {
        if self.fail {
            return Err(SpiFault);
        }

        let mut addr: Option<usize> = None;
        let mut writing = false;
        let mut written = Vec::new();
        let mut has_read = false;

        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    for &byte in bytes.iter() {
                        written.push(byte);
                        match addr {
                            None => {
                                addr = Some((byte & 0x7F) as usize);
                                writing = byte & 0x80 != 0;
                            }
                            Some(a) => {
                                if writing && !self.read_only {
                                    self.registers[a] = byte;
                                }
                                addr = Some((a + 1) % 128);
                            }
                        }
                    }
                }
                Operation::Read(buf) => {
                    has_read = true;
                    for slot in buf.iter_mut() {
                        let a = addr.unwrap_or(0);
                        *slot = self.registers[a];
                        addr = Some((a + 1) % 128);
                    }
                }
                _ => {}
            }
        }

        if !has_read {
            self.writes.push(written);
        }
        Ok(())
    }
}

/// Pin error raised by [`MockPin`] when `fail` is set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinFault;

impl digital::Error for PinFault {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

/// Output pin that remembers its level
pub struct MockPin {
    pub high: bool,
    pub fail: bool,
}

impl MockPin {
    pub fn new() -> Self {
        Self {
            high: false,
            fail: false,
        }
    }
}

impl digital::ErrorType for MockPin {
    type Error = PinFault;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), PinFault> {
        if self.fail {
            return Err(PinFault);
        }
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), PinFault> {
        if self.fail {
            return Err(PinFault);
        }
        self.high = true;
        Ok(())
    }
}
