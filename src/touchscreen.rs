//! Touch controller driver.

use embassy_sync::blocking_mutex::raw::{NoopRawMutex, RawMutex};
use embedded_hal::{
    delay::DelayNs,
    digital::{self, OutputPin},
};

use crate::{
    context::DeviceContext,
    error::Error,
    lifecycle::{Lifecycle, LifecycleState},
    models::{MemoryMap, TouchModel},
    power::{PowerSequence, Supplies},
    register::{PageChannel, RegisterBus},
    sequencer::{self, RetryPolicy},
};

/// Error type of a [`Touchscreen`].
pub type TouchscreenError<B, PWR, RST> = Error<
    <B as RegisterBus>::Error,
    <PWR as Supplies>::Error,
    <RST as digital::ErrorType>::Error,
>;

/// A page-addressed touch controller.
///
/// Created with [`TouchscreenBuilder`](crate::TouchscreenBuilder). The chip
/// variant, and with it the memory map, is resolved by
/// [`prepare`](Lifecycle::prepare).
///
/// Register accessors take `&self` and hold the device lock across the page
/// select and the access that depends on it. With a raw mutex such as
/// [`CriticalSectionRawMutex`](embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex)
/// the touchscreen can be shared between execution contexts.
pub struct Touchscreen<B, MODEL, PWR, RST, M = NoopRawMutex>
where
    B: RegisterBus,
    MODEL: TouchModel,
    PWR: Supplies,
    RST: OutputPin,
    M: RawMutex,
{
    ctx: DeviceContext<PageChannel<B>, M>,
    model: MODEL,
    power: PowerSequence<PWR, RST>,
    retry: RetryPolicy,
    variant: Option<MODEL::Variant>,
}

impl<B, MODEL, PWR, RST, M> Touchscreen<B, MODEL, PWR, RST, M>
where
    B: RegisterBus,
    MODEL: TouchModel,
    PWR: Supplies,
    RST: OutputPin,
    M: RawMutex,
{
    pub(crate) fn new(
        bus: B,
        model: MODEL,
        supplies: Option<PWR>,
        rst: Option<RST>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            ctx: DeviceContext::new(PageChannel::new(bus)),
            model,
            power: PowerSequence::new(supplies, rst, MODEL::RAILS, MODEL::RESET),
            retry,
            variant: None,
        }
    }

    /// The identified chip variant, `None` before the first successful
    /// identification.
    pub fn variant(&self) -> Option<MODEL::Variant> {
        self.variant
    }

    pub fn memory_map(&self) -> Option<MemoryMap> {
        self.variant.map(MODEL::memory_map)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Reads `buf.len()` bytes starting at `address`.
    ///
    /// Fails with [`Error::NotPoweredOn`] while the device is idle.
    pub fn read_register<D: DelayNs>(
        &self,
        address: u32,
        buf: &mut [u8],
        delay: &mut D,
    ) -> Result<(), TouchscreenError<B, PWR, RST>> {
        self.ensure_powered()?;
        self.ctx
            .exclusive(|channel| {
                channel.select_page(address)?;
                delay.delay_us(MODEL::PROTOCOL.page_settle_us);
                channel.read_block(address, buf)
            })
            .map_err(Error::Transport)
    }

    /// Writes `data` starting at `address`.
    ///
    /// Fails with [`Error::NotPoweredOn`] while the device is idle.
    pub fn write_register<D: DelayNs>(
        &self,
        address: u32,
        data: &[u8],
        delay: &mut D,
    ) -> Result<(), TouchscreenError<B, PWR, RST>> {
        self.ensure_powered()?;
        self.ctx
            .exclusive(|channel| {
                channel.select_page(address)?;
                delay.delay_us(MODEL::PROTOCOL.page_settle_us);
                channel.write_block(address, data)
            })
            .map_err(Error::Transport)
    }

    /// Reads the firmware's touch event buffer.
    pub fn read_event_buffer<D: DelayNs>(
        &self,
        buf: &mut [u8],
        delay: &mut D,
    ) -> Result<(), TouchscreenError<B, PWR, RST>> {
        let map = self.memory_map().ok_or(Error::NotIdentified)?;
        self.read_register(map.event_buf, buf, delay)
    }

    /// Releases the bus, model and hardware resources.
    pub fn release(self) -> (B, MODEL, Option<PWR>, Option<RST>) {
        let (supplies, rst) = self.power.release();
        (self.ctx.release().release(), self.model, supplies, rst)
    }

    fn ensure_powered(&self) -> Result<(), TouchscreenError<B, PWR, RST>> {
        if self.state() == LifecycleState::Idle {
            return Err(Error::NotPoweredOn);
        }
        Ok(())
    }

    fn roll_back(&mut self) {
        if let Err(faults) = self.power.power_off::<B::Error>() {
            log::error!("rollback power-off incomplete: {:?}", faults);
        }
        self.ctx.set_state(LifecycleState::Idle);
    }

    fn tear_down(&mut self) -> Result<(), TouchscreenError<B, PWR, RST>> {
        let result = self.power.power_off::<B::Error>();
        self.ctx.set_state(LifecycleState::Idle);

        result.map_err(|faults| {
            log::error!("power-off incomplete: {:?}", faults);
            Error::PowerOff(faults)
        })
    }

    fn record_variant(&mut self, variant: MODEL::Variant) {
        match self.variant {
            None => {
                log::info!("identified {:?}", variant);
                self.variant = Some(variant);
            }
            Some(known) if known != variant => {
                log::warn!("identified {:?}, keeping {:?}", variant, known);
            }
            Some(_) => {}
        }
    }
}

impl<B, MODEL, PWR, RST, M> Lifecycle for Touchscreen<B, MODEL, PWR, RST, M>
where
    B: RegisterBus,
    MODEL: TouchModel,
    PWR: Supplies,
    RST: OutputPin,
    M: RawMutex,
{
    type Error = TouchscreenError<B, PWR, RST>;

    fn state(&self) -> LifecycleState {
        self.ctx.state()
    }

    fn power_on<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        if self.state() != LifecycleState::Idle {
            log::debug!("power_on: already {:?}", self.state());
            return Ok(());
        }

        if let Err(fault) = self.power.power_on::<B::Error, _>(delay) {
            log::error!("power-on failed: {:?}", fault);
            self.roll_back();
            return Err(Error::PowerOn(fault));
        }

        self.ctx.set_state(LifecycleState::PoweredOn);
        log::info!("{}: powered on", MODEL::COMPATIBLE);
        Ok(())
    }

    fn prepare<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        if self.state() >= LifecycleState::Prepared {
            log::debug!("prepare: already {:?}", self.state());
            return Ok(());
        }

        self.power_on(delay)?;

        let policy = self.retry;
        let identified = self.ctx.exclusive(|channel| {
            sequencer::identify(
                channel,
                delay,
                &MODEL::PROTOCOL,
                MODEL::TRIM_TABLE,
                &policy,
            )
        });

        match identified {
            Ok(variant) => self.record_variant(variant),
            Err(exhausted) => {
                log::error!(
                    "identification failed after {} attempts, last error: {:?}",
                    exhausted.attempts,
                    exhausted.last
                );
                self.roll_back();
                return Err(Error::IdentificationFailed {
                    attempts: exhausted.attempts,
                });
            }
        }

        self.ctx.set_state(LifecycleState::Prepared);
        log::info!("{}: prepared", MODEL::COMPATIBLE);
        Ok(())
    }

    fn enable<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), Self::Error> {
        if self.state() == LifecycleState::Prepared {
            self.ctx.set_state(LifecycleState::Enabled);
        }
        Ok(())
    }

    fn disable<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), Self::Error> {
        if self.state() == LifecycleState::Enabled {
            self.ctx.set_state(LifecycleState::Prepared);
        }
        Ok(())
    }

    fn unprepare<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        if self.state() < LifecycleState::Prepared {
            return Ok(());
        }

        self.disable(delay)?;
        self.ctx.set_state(LifecycleState::PoweredOn);
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
}

#[cfg(test)]
mod tests {
    use super::*;

    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

    use crate::{
        _mock::{BusEvent, Event, EventLog, MockChip, MockDelay, MockResetPin, MockSupplies},
        identity::ID_LEN,
        models::{ChipVariant, NT36XXX},
        power::{NoResetPin, NoSupplies},
        register::{offset_of, page_of},
    };

    type TestTouchscreen = Touchscreen<MockChip, NT36XXX, MockSupplies, MockResetPin>;

    const NT36523_ID: [u8; ID_LEN] = [0x20, 0x01, 0x01, 0x23, 0x65, 0x03];
    const NT36672A_ID: [u8; ID_LEN] = [0x0A, 0x01, 0x01, 0x72, 0x66, 0x03];

    fn touchscreen(log: &EventLog, chip: &MockChip) -> TestTouchscreen {
        Touchscreen::new(
            chip.clone(),
            NT36XXX,
            Some(MockSupplies::new(log)),
            Some(MockResetPin::new(log)),
            RetryPolicy::default(),
        )
    }

    fn responding(id: [u8; ID_LEN]) -> MockChip {
        MockChip::responding(NT36XXX::PROTOCOL.chip_id_addr, id)
    }

    #[test]
    fn prepare_identifies_the_chip() {
        let log = EventLog::default();
        let chip = responding(NT36523_ID);
        let mut ts = touchscreen(&log, &chip);
        let mut delay = MockDelay::silent();

        assert_eq!(ts.memory_map(), None);
        ts.prepare(&mut delay).unwrap();

        assert_eq!(ts.state(), LifecycleState::Prepared);
        assert_eq!(ts.variant(), Some(ChipVariant::Nt36523));
        assert_eq!(ts.memory_map().map(|m| m.event_buf), Some(0x2FE00));
        assert_eq!(chip.boot_resets(), 1);
    }

    #[test]
    fn power_on_pulses_reset_without_load_hints() {
        let log = EventLog::default();
        let chip = MockChip::default();
        let mut ts = touchscreen(&log, &chip);
        let mut delay = MockDelay::silent();

        ts.power_on(&mut delay).unwrap();

        assert_eq!(
            log.actions(),
            [
                Event::SuppliesOn,
                Event::Reset(true),
                Event::Reset(false),
                Event::Reset(true),
            ]
        );
    }

    #[test]
    fn failed_identification_rolls_back() {
        let log = EventLog::default();
        let chip = MockChip::default();
        let mut ts = touchscreen(&log, &chip);
        let mut delay = MockDelay::silent();

        let result = ts.prepare(&mut delay);

        assert_eq!(result, Err(Error::IdentificationFailed { attempts: 5 }));
        assert_eq!(ts.state(), LifecycleState::Idle);
        assert_eq!(ts.variant(), None);
        assert_eq!(chip.boot_resets(), 5);
        assert_eq!(log.count(|e| *e == Event::SuppliesOff), 1);
    }

    #[test]
    fn retry_policy_bounds_identification() {
        let log = EventLog::default();
        let chip = MockChip::default();
        let mut ts: TestTouchscreen = Touchscreen::new(
            chip.clone(),
            NT36XXX,
            Some(MockSupplies::new(&log)),
            Some(MockResetPin::new(&log)),
            RetryPolicy::new(2, 1_000),
        );
        let mut delay = MockDelay::new(&log);

        let result = ts.prepare(&mut delay);

        assert_eq!(result, Err(Error::IdentificationFailed { attempts: 2 }));
        assert_eq!(chip.boot_resets(), 2);
        assert_eq!(log.count(|e| *e == Event::Delay(1_000)), 1);
    }

    #[test]
    fn first_identified_variant_is_kept() {
        let log = EventLog::default();
        let chip = responding(NT36523_ID);
        let mut ts = touchscreen(&log, &chip);
        let mut delay = MockDelay::silent();

        ts.prepare(&mut delay).unwrap();
        ts.power_off(&mut delay).unwrap();

        chip.load(NT36XXX::PROTOCOL.chip_id_addr, &NT36672A_ID);
        ts.prepare(&mut delay).unwrap();

        assert_eq!(ts.variant(), Some(ChipVariant::Nt36523));
    }

    #[test]
    fn lifecycle_walks_up_and_down() {
        let log = EventLog::default();
        let chip = responding(NT36672A_ID);
        let mut ts = touchscreen(&log, &chip);
        let mut delay = MockDelay::silent();

        ts.enable(&mut delay).unwrap();
        assert_eq!(ts.state(), LifecycleState::Idle);

        ts.prepare(&mut delay).unwrap();
        ts.enable(&mut delay).unwrap();
        assert_eq!(ts.state(), LifecycleState::Enabled);
        assert!(ts.modes().is_empty());

        ts.power_off(&mut delay).unwrap();
        assert_eq!(ts.state(), LifecycleState::Idle);
        assert_eq!(log.count(|e| *e == Event::SuppliesOn), 1);
        assert_eq!(log.count(|e| *e == Event::SuppliesOff), 1);
    }

    #[test]
    fn unprepare_powers_off() {
        let log = EventLog::default();
        let chip = responding(NT36523_ID);
        let mut ts = touchscreen(&log, &chip);
        let mut delay = MockDelay::silent();

        ts.prepare(&mut delay).unwrap();
        ts.unprepare(&mut delay).unwrap();
        ts.power_off(&mut delay).unwrap();

        assert_eq!(ts.state(), LifecycleState::Idle);
        assert_eq!(log.count(|e| *e == Event::SuppliesOn), 1);
        assert_eq!(log.count(|e| *e == Event::SuppliesOff), 1);
        assert_eq!(log.actions().last(), Some(&Event::SuppliesOff));
    }

    #[test]
    fn unprepare_reports_power_off_faults() {
        let log = EventLog::default();
        let chip = responding(NT36523_ID);
        let mut ts: TestTouchscreen = Touchscreen::new(
            chip.clone(),
            NT36XXX,
            Some(MockSupplies::new(&log).fail_disable()),
            Some(MockResetPin::new(&log)),
            RetryPolicy::default(),
        );
        let mut delay = MockDelay::silent();

        ts.prepare(&mut delay).unwrap();
        let result = ts.unprepare(&mut delay);

        assert!(matches!(result, Err(Error::PowerOff(_))));
        assert_eq!(ts.state(), LifecycleState::Idle);
    }

    #[test]
    fn register_access_needs_power() {
        let log = EventLog::default();
        let chip = MockChip::default();
        let mut ts = touchscreen(&log, &chip);
        let mut delay = MockDelay::silent();
        let mut buf = [0; 2];

        assert_eq!(
            ts.read_register(0x21C00, &mut buf, &mut delay),
            Err(Error::NotPoweredOn)
        );
        assert_eq!(
            ts.write_register(0x21C00, &buf, &mut delay),
            Err(Error::NotPoweredOn)
        );
        assert!(chip.events().is_empty());

        ts.power_on(&mut delay).unwrap();
        ts.read_register(0x21C00, &mut buf, &mut delay).unwrap();
        ts.power_off(&mut delay).unwrap();

        assert_eq!(
            ts.read_register(0x21C00, &mut buf, &mut delay),
            Err(Error::NotPoweredOn)
        );
    }

    #[test]
    fn event_buffer_needs_identification() {
        let log = EventLog::default();
        let chip = responding(NT36672A_ID);
        let mut ts = touchscreen(&log, &chip);
        let mut delay = MockDelay::silent();
        let mut buf = [0; 4];

        assert_eq!(
            ts.read_event_buffer(&mut buf, &mut delay),
            Err(Error::NotIdentified)
        );

        ts.prepare(&mut delay).unwrap();
        chip.load(0x21C00, &[0xde, 0xad, 0xbe, 0xef]);
        ts.read_event_buffer(&mut buf, &mut delay).unwrap();

        assert_eq!(buf, [0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(
            chip.events().last(),
            Some(&BusEvent::Read(offset_of(0x21C00), 4))
        );
    }

    #[test]
    fn write_register_selects_page_first() {
        let log = EventLog::default();
        let chip = MockChip::default();
        let mut ts = touchscreen(&log, &chip);
        let mut delay = MockDelay::new(&log);

        ts.power_on(&mut MockDelay::silent()).unwrap();
        log.clear();
        ts.write_register(0x03F0FE, &[0x69], &mut delay).unwrap();

        assert_eq!(
            chip.events(),
            [BusEvent::Select(0x07E1), BusEvent::Write(0x7E, vec![0x69])]
        );
        assert_eq!(log.events(), [Event::Delay(200)]);
    }

    #[test]
    fn shared_register_reads_never_interleave() {
        const ADDRESSES: [u32; 2] = [0x2FE00, 0x21C05];
        let chip = MockChip::default();
        let mut ts: Touchscreen<MockChip, NT36XXX, NoSupplies, NoResetPin, CriticalSectionRawMutex> =
            Touchscreen::new(chip.clone(), NT36XXX, None, None, RetryPolicy::default());
        ts.power_on(&mut MockDelay::silent()).unwrap();

        std::thread::scope(|s| {
            for address in ADDRESSES {
                let ts = &ts;
                s.spawn(move || {
                    let mut delay = MockDelay::silent();
                    let mut buf = [0; 8];
                    for _ in 0..200 {
                        ts.read_register(address, &mut buf, &mut delay).unwrap();
                    }
                });
            }
        });

        let events = chip.events();
        assert_eq!(events.len(), 800);
        for pair in events.chunks(2) {
            let [BusEvent::Select(page), BusEvent::Read(offset, 8)] = pair else {
                panic!("interleaved bus access: {:?}", pair);
            };
            let address = ADDRESSES
                .into_iter()
                .find(|a| offset_of(*a) == *offset)
                .unwrap();
            assert_eq!(*page, page_of(address));
        }
    }
}
