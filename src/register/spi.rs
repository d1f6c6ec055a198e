use embedded_hal::spi::{Operation, SpiDevice};

use super::RegisterBus;

/// Set in the first byte of a frame to mark a write.
pub const WRITE_FLAG: u8 = 0x80;

/// Filler clocked out after the offset of a read frame.
const DUMMY: u8 = 0x00;

/// Novatek register framing over a SPI device.
///
/// A write is a single transaction `[offset | 0x80, data...]`. A read clocks
/// out `[offset, dummy]` and then reads the requested bytes within the same
/// chip-select window.
pub struct SpiRegisterBus<SPI> {
    spi: SPI,
}

impl<SPI> SpiRegisterBus<SPI>
where
    SPI: SpiDevice,
{
    /// Create new register bus
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Release the SPI device back
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> RegisterBus for SpiRegisterBus<SPI>
where
    SPI: SpiDevice,
{
    type Error = SPI::Error;

    fn write(&mut self, offset: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.spi.transaction(&mut [
            Operation::Write(&[offset | WRITE_FLAG]),
            Operation::Write(data),
        ])
    }

    fn read(&mut self, offset: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.spi.transaction(&mut [
            Operation::Write(&[offset & !WRITE_FLAG, DUMMY]),
            Operation::Read(buf),
        ])
    }
}
