//! Command transport towards the panel.

mod spi;
pub use spi::*;

/// DCS command interface.
///
/// Implemented by the DSI host driving the panel, or by [`SpiInterface`] for
/// hosts that reach the controller over SPI with a D/C line.
pub trait Interface {
    /// Error type
    type Error: core::fmt::Debug;

    /// Send a command with optional parameters.
    fn send_command(&mut self, command: u8, args: &[u8]) -> Result<(), Self::Error>;

    /// Send a complete command buffer: the instruction byte followed by its
    /// parameters. Empty buffers are ignored.
    fn write_buffer(&mut self, buffer: &[u8]) -> Result<(), Self::Error> {
        match buffer.split_first() {
            Some((&command, args)) => self.send_command(command, args),
            None => Ok(()),
        }
    }

    /// Switch between low-power and high-speed transmission of commands.
    ///
    /// Links without such a distinction keep the default no-op.
    fn set_low_power_mode(&mut self, _enabled: bool) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<T: Interface + ?Sized> Interface for &mut T {
    type Error = T::Error;

    fn send_command(&mut self, command: u8, args: &[u8]) -> Result<(), Self::Error> {
        T::send_command(self, command, args)
    }

    fn write_buffer(&mut self, buffer: &[u8]) -> Result<(), Self::Error> {
        T::write_buffer(self, buffer)
    }

    fn set_low_power_mode(&mut self, enabled: bool) -> Result<(), Self::Error> {
        T::set_low_power_mode(self, enabled)
    }
}
