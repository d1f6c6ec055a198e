//! Recording test doubles.
//!
//! The panel-side mocks share one [`EventLog`], so a test can assert on the
//! exact interleaving of supply, reset, delay and command activity.
//!
//! `embedded-hal-mock` checks each peripheral against its own expectation
//! list, which cannot express ordering across peripherals. That is why the
//! delay and reset pin are recorded here instead, while transport framing
//! tests keep using `embedded-hal-mock`.

use std::{
    cell::RefCell,
    collections::HashMap,
    rc::Rc,
    sync::{Arc, Mutex},
    vec::Vec,
};

use embedded_hal::{delay::DelayNs, digital};

use crate::{
    identity::ID_LEN,
    interface::Interface,
    power::{Backlight, Supplies},
    register::{RegisterBus, PAGE_SELECT, PAGE_SHIFT},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SetLoad(&'static str, u32),
    SuppliesOn,
    SuppliesOff,
    Reset(bool),
    Delay(u32),
    Command(Vec<u8>),
    LowPower(bool),
    Backlight(bool),
}

#[derive(Debug, Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<Event>>>);

impl EventLog {
    fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.0.borrow().iter().filter(|e| predicate(e)).count()
    }

    pub fn commands(&self) -> Vec<Vec<u8>> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Command(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    /// Events with delays filtered out.
    pub fn actions(&self) -> Vec<Event> {
        self.0
            .borrow()
            .iter()
            .filter(|e| !matches!(e, Event::Delay(_)))
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

impl digital::Error for MockError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

pub struct MockDelay {
    log: Option<EventLog>,
}

impl MockDelay {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: Some(log.clone()),
        }
    }

    /// A delay that records nothing.
    pub fn silent() -> Self {
        Self { log: None }
    }

    fn record(&self, us: u32) {
        if let Some(log) = &self.log {
            log.push(Event::Delay(us));
        }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.record(ns / 1_000);
    }

    fn delay_us(&mut self, us: u32) {
        self.record(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.record(ms * 1_000);
    }
}

pub struct MockDisplayInterface {
    log: EventLog,
    sent: usize,
    fail_at: Option<usize>,
    fail_low_power: bool,
}

impl MockDisplayInterface {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            sent: 0,
            fail_at: None,
            fail_low_power: false,
        }
    }

    /// Fails the command with the given zero based sequence number.
    pub fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    pub fn failing_low_power(mut self) -> Self {
        self.fail_low_power = true;
        self
    }
}

impl Interface for MockDisplayInterface {
    type Error = MockError;

    fn send_command(&mut self, command: u8, args: &[u8]) -> Result<(), Self::Error> {
        let index = self.sent;
        self.sent += 1;
        if self.fail_at == Some(index) {
            return Err(MockError);
        }

        let mut bytes = vec![command];
        bytes.extend_from_slice(args);
        self.log.push(Event::Command(bytes));
        Ok(())
    }

    fn set_low_power_mode(&mut self, enabled: bool) -> Result<(), Self::Error> {
        if self.fail_low_power {
            return Err(MockError);
        }
        self.log.push(Event::LowPower(enabled));
        Ok(())
    }
}

pub struct MockSupplies {
    log: EventLog,
    fail_set_load: bool,
    fail_enable: bool,
    fail_disable: bool,
}

impl MockSupplies {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            fail_set_load: false,
            fail_enable: false,
            fail_disable: false,
        }
    }

    pub fn fail_set_load(mut self) -> Self {
        self.fail_set_load = true;
        self
    }

    pub fn fail_enable(mut self) -> Self {
        self.fail_enable = true;
        self
    }

    pub fn fail_disable(mut self) -> Self {
        self.fail_disable = true;
        self
    }
}

impl Supplies for MockSupplies {
    type Error = MockError;

    fn set_load(&mut self, rail: &'static str, load_ua: u32) -> Result<(), Self::Error> {
        if self.fail_set_load {
            return Err(MockError);
        }
        self.log.push(Event::SetLoad(rail, load_ua));
        Ok(())
    }

    fn enable(&mut self) -> Result<(), Self::Error> {
        if self.fail_enable {
            return Err(MockError);
        }
        self.log.push(Event::SuppliesOn);
        Ok(())
    }

    fn disable(&mut self) -> Result<(), Self::Error> {
        if self.fail_disable {
            return Err(MockError);
        }
        self.log.push(Event::SuppliesOff);
        Ok(())
    }
}

pub struct MockResetPin {
    log: EventLog,
    fail: bool,
}

impl MockResetPin {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            fail: false,
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn set(&mut self, high: bool) -> Result<(), MockError> {
        if self.fail {
            return Err(MockError);
        }
        self.log.push(Event::Reset(high));
        Ok(())
    }
}

impl digital::ErrorType for MockResetPin {
    type Error = MockError;
}

impl digital::OutputPin for MockResetPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true)
    }
}

pub struct MockBacklight {
    log: EventLog,
    fail: bool,
}

impl MockBacklight {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            fail: false,
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn set(&mut self, on: bool) -> Result<(), MockError> {
        if self.fail {
            return Err(MockError);
        }
        self.log.push(Event::Backlight(on));
        Ok(())
    }
}

impl Backlight for MockBacklight {
    type Error = MockError;

    fn enable(&mut self) -> Result<(), Self::Error> {
        self.set(true)
    }

    fn disable(&mut self) -> Result<(), Self::Error> {
        self.set(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    Select(u16),
    Write(u8, Vec<u8>),
    Read(u8, usize),
}

#[derive(Default)]
struct ChipState {
    page: u16,
    memory: HashMap<u32, u8>,
    events: Vec<BusEvent>,
    failing_writes: usize,
    failing_reads: usize,
    failing_page: Option<u16>,
}

/// A simulated page-addressed register file.
///
/// Cloneable and `Send`, so one handle can be given to the driver while the
/// test keeps another for inspection.
#[derive(Clone, Default)]
pub struct MockChip(Arc<Mutex<ChipState>>);

impl MockChip {
    /// A chip answering `id` at `id_addr`.
    pub fn responding(id_addr: u32, id: [u8; ID_LEN]) -> Self {
        let chip = Self::default();
        chip.load(id_addr, &id);
        chip
    }

    pub fn load(&self, address: u32, bytes: &[u8]) {
        let mut state = self.0.lock().unwrap();
        for (address, byte) in (address..).zip(bytes) {
            state.memory.insert(address, *byte);
        }
    }

    pub fn fail_next_writes(&self, count: usize) {
        self.0.lock().unwrap().failing_writes = count;
    }

    /// Rejects every select of `page`.
    pub fn fail_select(&self, page: u16) {
        self.0.lock().unwrap().failing_page = Some(page);
    }

    pub fn fail_next_reads(&self, count: usize) {
        self.0.lock().unwrap().failing_reads = count;
    }

    pub fn events(&self) -> Vec<BusEvent> {
        self.0.lock().unwrap().events.clone()
    }

    /// Number of bootloader reset commands received.
    pub fn boot_resets(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, BusEvent::Write(_, data) if data.as_slice() == [0x69]))
            .count()
    }
}

impl RegisterBus for MockChip {
    type Error = MockError;

    fn write(&mut self, offset: u8, data: &[u8]) -> Result<(), Self::Error> {
        let mut state = self.0.lock().unwrap();
        if state.failing_writes > 0 {
            state.failing_writes -= 1;
            return Err(MockError);
        }

        match data {
            [high, low] if offset == PAGE_SELECT => {
                let page = u16::from_be_bytes([*high, *low]);
                if state.failing_page == Some(page) {
                    return Err(MockError);
                }
                state.page = page;
                state.events.push(BusEvent::Select(page));
            }
            _ => {
                let base = (u32::from(state.page) << PAGE_SHIFT) | u32::from(offset);
                for (address, byte) in (base..).zip(data) {
                    state.memory.insert(address, *byte);
                }
                state.events.push(BusEvent::Write(offset, data.to_vec()));
            }
        }
        Ok(())
    }

    fn read(&mut self, offset: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        let mut state = self.0.lock().unwrap();
        if state.failing_reads > 0 {
            state.failing_reads -= 1;
            return Err(MockError);
        }

        let base = (u32::from(state.page) << PAGE_SHIFT) | u32::from(offset);
        for (address, byte) in (base..).zip(buf.iter_mut()) {
            *byte = state.memory.get(&address).copied().unwrap_or(0);
        }
        state.events.push(BusEvent::Read(offset, buf.len()));
        Ok(())
    }
}
