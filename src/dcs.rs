//! MIPI Display Command Set.

use crate::interface::Interface;

/// A DCS command with its parameters.
pub trait DcsCommand {
    /// Returns the instruction code.
    fn instruction(&self) -> u8;

    /// Fills the given buffer with the command parameters and returns
    /// how many bytes were written.
    fn fill_params_buf(&self, buffer: &mut [u8]) -> usize;
}

macro_rules! dcs_basic_command {
    (#[doc = $tt:tt] $instr_name:ident, $instr:expr) => {
        #[doc = $tt]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $instr_name;

        impl DcsCommand for $instr_name {
            fn instruction(&self) -> u8 {
                $instr
            }

            fn fill_params_buf(&self, _buffer: &mut [u8]) -> usize {
                0
            }
        }
    };
}

dcs_basic_command!(
    /// Enter Sleep Mode
    EnterSleepMode,
    0x10
);
dcs_basic_command!(
    /// Exit Sleep Mode
    ExitSleepMode,
    0x11
);
dcs_basic_command!(
    /// Turn Display Off
    SetDisplayOff,
    0x28
);
dcs_basic_command!(
    /// Turn Display On
    SetDisplayOn,
    0x29
);

/// Set display brightness.
///
/// NT36523A panels take a 12-bit value, big endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetDisplayBrightness(pub u16);

impl DcsCommand for SetDisplayBrightness {
    fn instruction(&self) -> u8 {
        0x51
    }

    fn fill_params_buf(&self, buffer: &mut [u8]) -> usize {
        let bytes = self.0.to_be_bytes();
        buffer[..2].copy_from_slice(&bytes);
        2
    }
}

/// DCS helpers on top of [`Interface`].
pub trait InterfaceExt: Interface {
    /// Sends a DCS command.
    fn write_command(&mut self, command: impl DcsCommand) -> Result<(), Self::Error> {
        let mut param_bytes = [0; 16];
        let n = command.fill_params_buf(&mut param_bytes);
        self.write_raw(command.instruction(), &param_bytes[..n])
    }

    /// Sends a raw instruction with parameters.
    fn write_raw(&mut self, instruction: u8, param_bytes: &[u8]) -> Result<(), Self::Error> {
        self.send_command(instruction, param_bytes)
    }
}

impl<T: Interface + ?Sized> InterfaceExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::_mock::{Event, EventLog, MockDisplayInterface};

    #[test]
    fn basic_commands_have_no_parameters() {
        let log = EventLog::default();
        let mut di = MockDisplayInterface::new(&log);

        di.write_command(ExitSleepMode).unwrap();
        di.write_command(SetDisplayOn).unwrap();

        assert_eq!(
            log.events(),
            [Event::Command(vec![0x11]), Event::Command(vec![0x29])]
        );
    }

    #[test]
    fn brightness_is_sent_big_endian() {
        let log = EventLog::default();
        let mut di = MockDisplayInterface::new(&log);

        di.write_command(SetDisplayBrightness(0x0fff)).unwrap();

        assert_eq!(log.events(), [Event::Command(vec![0x51, 0x0f, 0xff])]);
    }
}
