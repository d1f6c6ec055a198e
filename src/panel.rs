//! DSI panel driver.

use embassy_sync::blocking_mutex::raw::{NoopRawMutex, RawMutex};
use embedded_hal::{
    delay::DelayNs,
    digital::{self, OutputPin},
};

use crate::{
    context::DeviceContext,
    dcs::{InterfaceExt, SetDisplayBrightness},
    error::Error,
    interface::Interface,
    lifecycle::{Lifecycle, LifecycleState},
    models::PanelModel,
    options::{DisplayMode, DsiConfig, PanelInfo},
    power::{Backlight, PowerSequence, Supplies},
};

/// Error type of a [`Panel`].
pub type PanelError<DI, PWR, RST> = Error<
    <DI as Interface>::Error,
    <PWR as Supplies>::Error,
    <RST as digital::ErrorType>::Error,
>;

/// A DSI panel.
///
/// Created with [`Builder`](crate::Builder). Lifecycle transitions take
/// `&mut self`. Raw command access takes `&self` and goes through the
/// device lock, so a shared panel can still be tuned while it runs.
pub struct Panel<DI, MODEL, PWR, RST, BL, M = NoopRawMutex>
where
    DI: Interface,
    MODEL: PanelModel,
    PWR: Supplies,
    RST: OutputPin,
    BL: Backlight,
    M: RawMutex,
{
    ctx: DeviceContext<DI, M>,
    model: MODEL,
    power: PowerSequence<PWR, RST>,
    backlight: Option<BL>,
    mode: DisplayMode,
}

impl<DI, MODEL, PWR, RST, BL, M> Panel<DI, MODEL, PWR, RST, BL, M>
where
    DI: Interface,
    MODEL: PanelModel,
    PWR: Supplies,
    RST: OutputPin,
    BL: Backlight,
    M: RawMutex,
{
    pub(crate) fn new(
        di: DI,
        model: MODEL,
        supplies: Option<PWR>,
        rst: Option<RST>,
        backlight: Option<BL>,
    ) -> Self {
        Self {
            ctx: DeviceContext::new(di),
            model,
            power: PowerSequence::new(supplies, rst, MODEL::RAILS, MODEL::RESET),
            backlight,
            mode: MODEL::MODE,
        }
    }

    pub fn info(&self) -> PanelInfo {
        MODEL::INFO
    }

    /// The preferred display mode.
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Link parameters the DSI host has to be configured with.
    pub fn dsi_config(&self) -> DsiConfig {
        MODEL::DSI
    }

    /// Sends a raw command buffer: instruction byte followed by parameters.
    pub fn write_raw(&self, buffer: &[u8]) -> Result<(), PanelError<DI, PWR, RST>> {
        self.ctx
            .exclusive(|di| di.write_buffer(buffer))
            .map_err(Error::Transport)
    }

    /// Sets the panel's display brightness register.
    pub fn set_brightness(&self, brightness: u16) -> Result<(), PanelError<DI, PWR, RST>> {
        self.ctx
            .exclusive(|di| di.write_command(SetDisplayBrightness(brightness)))
            .map_err(Error::Transport)
    }

    /// Releases the interface, model and hardware resources.
    ///
    /// The panel is released in whatever state it is in.
    #[allow(clippy::type_complexity)]
    pub fn release(self) -> (DI, MODEL, Option<PWR>, Option<RST>, Option<BL>) {
        let (supplies, rst) = self.power.release();
        (self.ctx.release(), self.model, supplies, rst, self.backlight)
    }

    /// Runs the power-off sequence after a failed bring-up and drops to idle.
    fn roll_back(&mut self) {
        if let Err(faults) = self.power.power_off::<DI::Error>() {
            log::error!("rollback power-off incomplete: {:?}", faults);
        }
        self.ctx.set_state(LifecycleState::Idle);
    }

    /// Runs the power-off sequence of an orderly shutdown.
    ///
    /// Ends in idle even if a step failed; the faults are returned.
    fn tear_down(&mut self) -> Result<(), PanelError<DI, PWR, RST>> {
        let result = self.power.power_off::<DI::Error>();
        self.ctx.set_state(LifecycleState::Idle);

        match result {
            Ok(()) => {
                log::info!("{}: powered off", MODEL::INFO.name);
                Ok(())
            }
            Err(faults) => {
                log::error!("power-off incomplete: {:?}", faults);
                Err(Error::PowerOff(faults))
            }
        }
    }
}

impl<DI, MODEL, PWR, RST, BL, M> Lifecycle for Panel<DI, MODEL, PWR, RST, BL, M>
where
    DI: Interface,
    MODEL: PanelModel,
    PWR: Supplies,
    RST: OutputPin,
    BL: Backlight,
    M: RawMutex,
{
    type Error = PanelError<DI, PWR, RST>;

    fn state(&self) -> LifecycleState {
        self.ctx.state()
    }

    fn power_on<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        if self.state() != LifecycleState::Idle {
            log::debug!("power_on: already {:?}", self.state());
            return Ok(());
        }

        if let Err(fault) = self.power.power_on::<DI::Error, _>(delay) {
            log::error!("power-on failed: {:?}", fault);
            self.roll_back();
            return Err(Error::PowerOn(fault));
        }

        self.ctx.set_state(LifecycleState::PoweredOn);
        log::info!("{}: powered on", MODEL::INFO.name);
        Ok(())
    }

    fn prepare<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        if self.state() >= LifecycleState::Prepared {
            log::debug!("prepare: already {:?}", self.state());
            return Ok(());
        }

        self.power_on(delay)?;

        let model = &mut self.model;
        if let Err(e) = self.ctx.exclusive(|di| model.init(di, delay)) {
            log::error!("init failed at {:?}: {:?}", e.step, e.error);
            self.roll_back();
            return Err(Error::aborted(e));
        }

        self.ctx.set_state(LifecycleState::Prepared);
        log::info!("{}: prepared", MODEL::INFO.name);
        Ok(())
    }

    fn enable<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), Self::Error> {
        if self.state() != LifecycleState::Prepared {
            log::debug!("enable: skipped in {:?}", self.state());
            return Ok(());
        }

        if let Some(backlight) = self.backlight.as_mut() {
            if let Err(e) = backlight.enable() {
                log::warn!("backlight enable failed: {:?}", e);
            }
        }

        self.ctx.set_state(LifecycleState::Enabled);
        Ok(())
    }

    fn disable<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), Self::Error> {
        if self.state() != LifecycleState::Enabled {
            log::debug!("disable: skipped in {:?}", self.state());
            return Ok(());
        }

        if let Some(backlight) = self.backlight.as_mut() {
            if let Err(e) = backlight.disable() {
                log::warn!("backlight disable failed: {:?}", e);
            }
        }

        self.ctx.set_state(LifecycleState::Prepared);
        Ok(())
    }

    fn unprepare<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        if self.state() < LifecycleState::Prepared {
            log::debug!("unprepare: skipped in {:?}", self.state());
            return Ok(());
        }

        self.disable(delay)?;

        let model = &mut self.model;
        self.ctx.exclusive(|di| model.shutdown(di, delay));
        self.ctx.set_state(LifecycleState::PoweredOn);
        log::info!("{}: unprepared", MODEL::INFO.name);

        self.tear_down()
    }

    fn power_off<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        match self.state() {
            LifecycleState::Idle => {
                log::debug!("power_off: already idle");
                Ok(())
            }
            LifecycleState::PoweredOn => self.tear_down(),
            LifecycleState::Prepared | LifecycleState::Enabled => self.unprepare(delay),
        }
    }

    fn modes(&self) -> &[DisplayMode] {
        core::slice::from_ref(&self.mode)
    }
}
