//! [super::Panel] and [super::Touchscreen] builder module

use embassy_sync::blocking_mutex::raw::{NoopRawMutex, RawMutex};
use embedded_hal::digital::OutputPin;

use crate::{
    interface::Interface,
    models::{PanelModel, TouchModel},
    power::{Backlight, NoBacklight, NoResetPin, NoSupplies, Supplies},
    register::RegisterBus,
    sequencer::RetryPolicy,
    Panel, Touchscreen,
};

/// Builder for [Panel] instances.
///
/// Exposes all hardware resources a panel can be wired to. Every resource
/// is optional; absent ones are skipped by the power sequence.
///
/// # Examples
///
/// ```
/// use nt36xxx::{models::NT36523A, Builder};
/// # use nt36xxx::interface::Interface;
/// # struct Dsi;
/// # impl Interface for Dsi {
/// #     type Error = core::convert::Infallible;
/// #     fn send_command(&mut self, _: u8, _: &[u8]) -> Result<(), Self::Error> { Ok(()) }
/// # }
/// # let dsi = Dsi;
///
/// let panel = Builder::new(NT36523A, dsi).build().unwrap();
/// assert_eq!(panel.dsi_config().lanes, 3);
/// ```
pub struct Builder<DI, MODEL, PWR, RST, BL>
where
    DI: Interface,
    MODEL: PanelModel,
{
    di: DI,
    model: MODEL,
    supplies: Option<PWR>,
    rst: Option<RST>,
    backlight: Option<BL>,
}

impl<DI, MODEL> Builder<DI, MODEL, NoSupplies, NoResetPin, NoBacklight>
where
    DI: Interface,
    MODEL: PanelModel,
{
    #[must_use]
    pub fn new(model: MODEL, di: DI) -> Self {
        Self {
            di,
            model,
            supplies: None,
            rst: None,
            backlight: None,
        }
    }
}

impl<DI, MODEL, PWR, RST, BL> Builder<DI, MODEL, PWR, RST, BL>
where
    DI: Interface,
    MODEL: PanelModel,
    PWR: Supplies,
    RST: OutputPin,
    BL: Backlight,
{
    #[must_use]
    pub fn supplies<PWR2: Supplies>(self, supplies: PWR2) -> Builder<DI, MODEL, PWR2, RST, BL> {
        Builder {
            di: self.di,
            model: self.model,
            supplies: Some(supplies),
            rst: self.rst,
            backlight: self.backlight,
        }
    }

    #[must_use]
    pub fn reset_pin<RST2: OutputPin>(self, rst: RST2) -> Builder<DI, MODEL, PWR, RST2, BL> {
        Builder {
            di: self.di,
            model: self.model,
            supplies: self.supplies,
            rst: Some(rst),
            backlight: self.backlight,
        }
    }

    #[must_use]
    pub fn backlight<BL2: Backlight>(self, backlight: BL2) -> Builder<DI, MODEL, PWR, RST, BL2> {
        Builder {
            di: self.di,
            model: self.model,
            supplies: self.supplies,
            rst: self.rst,
            backlight: Some(backlight),
        }
    }

    /// Builds a panel for use from a single execution context.
    pub fn build(self) -> Result<Panel<DI, MODEL, PWR, RST, BL>, ConfigurationError> {
        self.build_shared::<NoopRawMutex>()
    }

    /// Builds a panel whose raw accessors are guarded by the raw mutex `M`.
    pub fn build_shared<M: RawMutex>(
        self,
    ) -> Result<Panel<DI, MODEL, PWR, RST, BL, M>, ConfigurationError> {
        let lanes = MODEL::DSI.lanes;
        if !(1..=4).contains(&lanes) {
            return Err(ConfigurationError::InvalidLaneCount(lanes));
        }
        if MODEL::INIT_SEQUENCE.is_empty() {
            return Err(ConfigurationError::EmptyInitSequence);
        }
        if MODEL::MODE.refresh_rate_hz() == 0 {
            return Err(ConfigurationError::InvalidDisplayMode);
        }

        Ok(Panel::new(
            self.di,
            self.model,
            self.supplies,
            self.rst,
            self.backlight,
        ))
    }
}

/// Builder for [Touchscreen] instances.
pub struct TouchscreenBuilder<B, MODEL, PWR, RST>
where
    B: RegisterBus,
    MODEL: TouchModel,
{
    bus: B,
    model: MODEL,
    supplies: Option<PWR>,
    rst: Option<RST>,
    retry: RetryPolicy,
}

impl<B, MODEL> TouchscreenBuilder<B, MODEL, NoSupplies, NoResetPin>
where
    B: RegisterBus,
    MODEL: TouchModel,
{
    #[must_use]
    pub fn new(model: MODEL, bus: B) -> Self {
        Self {
            bus,
            model,
            supplies: None,
            rst: None,
            retry: RetryPolicy::default(),
        }
    }
}

impl<B, MODEL, PWR, RST> TouchscreenBuilder<B, MODEL, PWR, RST>
where
    B: RegisterBus,
    MODEL: TouchModel,
    PWR: Supplies,
    RST: OutputPin,
{
    #[must_use]
    pub fn supplies<PWR2: Supplies>(self, supplies: PWR2) -> TouchscreenBuilder<B, MODEL, PWR2, RST> {
        TouchscreenBuilder {
            bus: self.bus,
            model: self.model,
            supplies: Some(supplies),
            rst: self.rst,
            retry: self.retry,
        }
    }

    #[must_use]
    pub fn reset_pin<RST2: OutputPin>(self, rst: RST2) -> TouchscreenBuilder<B, MODEL, PWR, RST2> {
        TouchscreenBuilder {
            bus: self.bus,
            model: self.model,
            supplies: self.supplies,
            rst: Some(rst),
            retry: self.retry,
        }
    }

    /// Overrides the identification retry policy.
    #[must_use]
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn build(self) -> Result<Touchscreen<B, MODEL, PWR, RST>, ConfigurationError> {
        self.build_shared::<NoopRawMutex>()
    }

    /// Builds a touchscreen whose register accessors are guarded by the raw
    /// mutex `M`.
    pub fn build_shared<M: RawMutex>(
        self,
    ) -> Result<Touchscreen<B, MODEL, PWR, RST, M>, ConfigurationError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigurationError::ZeroRetryAttempts);
        }
        if MODEL::TRIM_TABLE.is_empty() {
            return Err(ConfigurationError::EmptyTrimTable);
        }

        Ok(Touchscreen::new(
            self.bus,
            self.model,
            self.supplies,
            self.rst,
            self.retry,
        ))
    }
}

/// A builder was given a configuration the device cannot run with.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("a DSI link has 1 to 4 data lanes, not {0}")]
    InvalidLaneCount(u8),
    #[error("init sequence is empty")]
    EmptyInitSequence,
    #[error("display mode has no refresh rate")]
    InvalidDisplayMode,
    #[error("retry policy allows no attempts")]
    ZeroRetryAttempts,
    #[error("trim table is empty")]
    EmptyTrimTable,
}
