//! Device models.
//!
//! A model is a zero-sized type carrying the compile-time description of one
//! device: its init table, power rails, timings and, for touch controllers,
//! the identification protocol and memory maps.

use embedded_hal::delay::DelayNs;

use crate::{
    command::CommandTable,
    dcs::{EnterSleepMode, ExitSleepMode, InterfaceExt, SetDisplayOff, SetDisplayOn},
    error::{Step, StepError},
    identity::IdentityTemplate,
    interface::Interface,
    options::{DisplayMode, DsiConfig, PanelInfo},
    power::{Rail, ResetTiming},
    sequencer::{self, Protocol},
};

mod nt36523a;
mod nt36xxx;

pub use nt36523a::*;
pub use nt36xxx::*;

/// Display panel model.
pub trait PanelModel {
    /// Device tree compatible string.
    const COMPATIBLE: &'static str;

    const INFO: PanelInfo;

    /// The preferred, and only, display mode.
    const MODE: DisplayMode;

    const DSI: DsiConfig;

    /// Supply rails with their load hints, in enable order.
    const RAILS: &'static [Rail];

    const RESET: ResetTiming;

    /// Vendor init table replayed during prepare.
    const INIT_SEQUENCE: CommandTable;

    /// Wait after `exit_sleep_mode`, `set_display_on` and `set_display_off`
    /// in µs.
    const DCS_SETTLE_US: u32 = 120_000;

    /// Initializes a powered panel.
    ///
    /// Switches the link to low-power mode, replays [`Self::INIT_SEQUENCE`],
    /// then wakes the panel and turns the display on. Stops at the first
    /// failed step.
    fn init<DI, DELAY>(&mut self, di: &mut DI, delay: &mut DELAY) -> Result<(), StepError<DI::Error>>
    where
        DI: Interface,
        DELAY: DelayNs,
    {
        di.set_low_power_mode(true)
            .map_err(StepError::at(Step::LowPowerMode))?;

        sequencer::replay(di, &Self::INIT_SEQUENCE)?;

        di.write_command(ExitSleepMode)
            .map_err(StepError::at(Step::ExitSleepMode))?;
        delay.delay_us(Self::DCS_SETTLE_US);

        di.write_command(SetDisplayOn)
            .map_err(StepError::at(Step::SetDisplayOn))?;
        delay.delay_us(Self::DCS_SETTLE_US);

        Ok(())
    }

    /// Turns the display off and puts the panel to sleep.
    ///
    /// Best effort: every step runs and failures are only logged.
    fn shutdown<DI, DELAY>(&mut self, di: &mut DI, delay: &mut DELAY)
    where
        DI: Interface,
        DELAY: DelayNs,
    {
        if let Err(e) = di.set_low_power_mode(false) {
            log::warn!("leaving low-power mode failed: {:?}", e);
        }

        if let Err(e) = di.write_command(SetDisplayOff) {
            log::warn!("set_display_off failed: {:?}", e);
        }
        delay.delay_us(Self::DCS_SETTLE_US);

        if let Err(e) = di.write_command(EnterSleepMode) {
            log::warn!("enter_sleep_mode failed: {:?}", e);
        }
    }
}

/// Addresses of the firmware buffers of an identified touch controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryMap {
    /// Touch event buffer.
    pub event_buf: u32,
    /// First raw data pipe.
    pub raw_pipe0: u32,
    /// Second raw data pipe.
    pub raw_pipe1: u32,
    /// Flash checksum readout.
    pub read_flash_checksum: u32,
    /// Flash data window.
    pub rw_flash_data: u32,
}

/// Touch controller model.
pub trait TouchModel {
    /// Chip variants the identification can resolve to.
    type Variant: Copy + core::fmt::Debug + PartialEq + 'static;

    /// Device tree compatible string.
    const COMPATIBLE: &'static str;

    const PROTOCOL: Protocol;

    /// Identity templates, in priority order.
    const TRIM_TABLE: &'static [IdentityTemplate<Self::Variant>];

    /// Supply rails, in enable order.
    const RAILS: &'static [Rail];

    const RESET: ResetTiming;

    /// Returns the memory map of `variant`.
    fn memory_map(variant: Self::Variant) -> MemoryMap;
}
