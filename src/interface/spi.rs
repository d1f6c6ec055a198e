use embedded_hal::{digital::OutputPin, spi::SpiDevice};

use super::Interface;

/// Spi interface error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpiError<SPI, DC> {
    Spi(SPI),
    Dc(DC),
}

/// DCS over SPI with a separate data/command line.
pub struct SpiInterface<SPI, DC> {
    spi: SPI,
    dc: DC,
}

impl<SPI, DC> SpiInterface<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    /// Create new interface
    pub fn new(spi: SPI, dc: DC) -> Self {
        Self { spi, dc }
    }

    /// Release the DC pin and SPI peripheral back, deconstructing the interface
    pub fn release(self) -> (SPI, DC) {
        (self.spi, self.dc)
    }
}

impl<SPI, DC> Interface for SpiInterface<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    type Error = SpiError<SPI::Error, DC::Error>;

    fn send_command(&mut self, command: u8, args: &[u8]) -> Result<(), Self::Error> {
        self.dc.set_low().map_err(SpiError::Dc)?;
        self.spi.write(&[command]).map_err(SpiError::Spi)?;
        if !args.is_empty() {
            self.dc.set_high().map_err(SpiError::Dc)?;
            self.spi.write(args).map_err(SpiError::Spi)?;
        }
        Ok(())
    }
}
