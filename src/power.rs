//! Supply rails, reset line and backlight.

use embedded_hal::{
    delay::DelayNs,
    digital::{self, OutputPin},
};

use crate::error::{Fault, Faults};

/// A regulated supply rail and the load hints used around power transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rail {
    pub name: &'static str,
    /// Load hint applied before the rails are enabled, in µA.
    pub enable_load_ua: Option<u32>,
    /// Load hint applied before the rails are disabled, in µA.
    pub disable_load_ua: Option<u32>,
}

impl Rail {
    /// A rail without load hints.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            enable_load_ua: None,
            disable_load_ua: None,
        }
    }

    #[must_use]
    pub const fn with_loads(mut self, enable_load_ua: u32, disable_load_ua: u32) -> Self {
        self.enable_load_ua = Some(enable_load_ua);
        self.disable_load_ua = Some(disable_load_ua);
        self
    }
}

/// Reset pulse timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetTiming {
    /// Time each phase of the deassert, assert, deassert pulse is held, in µs.
    pub settle_us: u32,
}

/// Bulk control of a device's supply rails.
pub trait Supplies {
    /// Error type
    type Error: core::fmt::Debug;

    /// Sets the expected load on `rail`.
    fn set_load(&mut self, rail: &'static str, load_ua: u32) -> Result<(), Self::Error>;

    /// Enables every rail.
    fn enable(&mut self) -> Result<(), Self::Error>;

    /// Disables every rail.
    fn disable(&mut self) -> Result<(), Self::Error>;
}

/// Auxiliary light source. Failures are never fatal to a transition.
pub trait Backlight {
    /// Error type
    type Error: core::fmt::Debug;

    fn enable(&mut self) -> Result<(), Self::Error>;

    fn disable(&mut self) -> Result<(), Self::Error>;
}

/// Marker type for devices without controllable supplies.
pub enum NoSupplies {}

impl Supplies for NoSupplies {
    type Error = core::convert::Infallible;

    fn set_load(&mut self, _rail: &'static str, _load_ua: u32) -> Result<(), Self::Error> {
        Ok(())
    }
    fn enable(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    fn disable(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Marker type for panels without a backlight.
pub enum NoBacklight {}

impl Backlight for NoBacklight {
    type Error = core::convert::Infallible;

    fn enable(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    fn disable(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Marker type for devices without a reset line.
pub enum NoResetPin {}

impl digital::OutputPin for NoResetPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl digital::ErrorType for NoResetPin {
    type Error = core::convert::Infallible;
}

/// Power-on and power-off sequencing of supplies and the (active low) reset
/// line.
pub struct PowerSequence<PWR, RST> {
    supplies: Option<PWR>,
    rst: Option<RST>,
    rails: &'static [Rail],
    reset: ResetTiming,
}

impl<PWR, RST> PowerSequence<PWR, RST>
where
    PWR: Supplies,
    RST: OutputPin,
{
    pub fn new(
        supplies: Option<PWR>,
        rst: Option<RST>,
        rails: &'static [Rail],
        reset: ResetTiming,
    ) -> Self {
        Self {
            supplies,
            rst,
            rails,
            reset,
        }
    }

    /// Applies the enable loads, enables the rails and pulses reset.
    ///
    /// Stops at the first failure.
    pub fn power_on<DI, DELAY>(
        &mut self,
        delay: &mut DELAY,
    ) -> Result<(), Fault<DI, PWR::Error, RST::Error>>
    where
        DELAY: DelayNs,
    {
        if let Some(supplies) = self.supplies.as_mut() {
            for rail in self.rails {
                if let Some(load) = rail.enable_load_ua {
                    supplies.set_load(rail.name, load).map_err(Fault::Supply)?;
                }
            }
            supplies.enable().map_err(Fault::Supply)?;
        }

        if let Some(rst) = self.rst.as_mut() {
            rst.set_high().map_err(Fault::ResetPin)?;
            delay.delay_us(self.reset.settle_us);
            rst.set_low().map_err(Fault::ResetPin)?;
            delay.delay_us(self.reset.settle_us);
            rst.set_high().map_err(Fault::ResetPin)?;
            delay.delay_us(self.reset.settle_us);
        }

        Ok(())
    }

    /// Asserts reset, applies the disable loads and disables the rails.
    ///
    /// Every step runs even if an earlier one failed; all faults are
    /// returned together.
    pub fn power_off<DI>(&mut self) -> Result<(), Faults<DI, PWR::Error, RST::Error>> {
        let mut faults = Faults::new();
        let mut record = |fault| {
            if faults.push(fault).is_err() {
                log::warn!("power-off fault list full, dropping fault");
            }
        };

        if let Some(rst) = self.rst.as_mut() {
            if let Err(e) = rst.set_low() {
                log::error!("reset assert failed: {:?}", e);
                record(Fault::ResetPin(e));
            }
        }

        if let Some(supplies) = self.supplies.as_mut() {
            for rail in self.rails {
                if let Some(load) = rail.disable_load_ua {
                    if let Err(e) = supplies.set_load(rail.name, load) {
                        log::error!("set_load on {} failed: {:?}", rail.name, e);
                        record(Fault::Supply(e));
                    }
                }
            }
            if let Err(e) = supplies.disable() {
                log::error!("supply disable failed: {:?}", e);
                record(Fault::Supply(e));
            }
        }

        if faults.is_empty() {
            Ok(())
        } else {
            Err(faults)
        }
    }

    pub fn release(self) -> (Option<PWR>, Option<RST>) {
        (self.supplies, self.rst)
    }
}
