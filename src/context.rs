//! Per-device session state.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::RawMutex, Mutex};

use crate::LifecycleState;

/// The live state of one physical device.
///
/// Owns the transport behind a blocking mutex and tracks the lifecycle
/// state. The raw mutex `M` decides who the transport may be shared with:
/// [`NoopRawMutex`](embassy_sync::blocking_mutex::raw::NoopRawMutex) keeps the
/// device in one execution context, a
/// [`CriticalSectionRawMutex`](embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex)
/// allows sharing `&self` across threads or interrupts.
pub struct DeviceContext<T, M: RawMutex> {
    transport: Mutex<M, RefCell<T>>,
    state: LifecycleState,
}

impl<T, M: RawMutex> DeviceContext<T, M> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Mutex::new(RefCell::new(transport)),
            state: LifecycleState::Idle,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: LifecycleState) {
        if self.state != state {
            log::debug!("{:?} -> {:?}", self.state, state);
        }
        self.state = state;
    }

    /// Runs `f` with exclusive access to the transport.
    ///
    /// The lock is held for the whole closure, so a multi-step protocol run
    /// inside it cannot be interleaved with another caller's accesses.
    pub fn exclusive<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        self.transport.lock(|transport| f(&mut transport.borrow_mut()))
    }

    /// Consumes the context and returns the transport.
    pub fn release(self) -> T {
        self.transport.into_inner().into_inner()
    }
}
