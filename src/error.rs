//! Driver errors.

/// Upper bound on the faults collected during one power-off sequence.
pub const MAX_FAULTS: usize = 8;

/// The step of a prepare sequence that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Switching the link into low-power command mode.
    LowPowerMode,
    /// Sending entry `index` (zero based) of the init table.
    Command { index: usize },
    /// Sending `exit_sleep_mode`.
    ExitSleepMode,
    /// Sending `set_display_on`.
    SetDisplayOn,
}

/// A failed step together with the transport error that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepError<E> {
    pub step: Step,
    pub error: E,
}

impl<E> StepError<E> {
    /// Returns a `map_err` adapter tagging an error with `step`.
    pub fn at(step: Step) -> impl FnOnce(E) -> Self {
        move |error| Self { step, error }
    }
}

/// A single failed hardware access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Fault<DI, PWR, RST> {
    #[error("transport error: {0:?}")]
    Transport(DI),
    #[error("power supply error: {0:?}")]
    Supply(PWR),
    #[error("reset pin error: {0:?}")]
    ResetPin(RST),
}

/// Faults collected while tearing down.
pub type Faults<DI, PWR, RST> = heapless::Vec<Fault<DI, PWR, RST>, MAX_FAULTS>;

/// Error returned by the lifecycle transitions and register accessors.
///
/// A failed lifecycle transition is reported after the device has been
/// rolled back to [`LifecycleState::Idle`](crate::LifecycleState::Idle).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error<DI, PWR, RST> {
    /// A guarded register or command access failed.
    #[error("transport error: {0:?}")]
    Transport(DI),

    /// The power-on sequence failed.
    #[error("power-on failed: {0:?}")]
    PowerOn(Fault<DI, PWR, RST>),

    /// One or more power-off steps failed. Teardown still completed.
    #[error("power-off incomplete: {0:?}")]
    PowerOff(Faults<DI, PWR, RST>),

    /// No trim table entry matched within the retry budget.
    #[error("chip identification failed after {attempts} attempts")]
    IdentificationFailed { attempts: u8 },

    /// A fatal step of the prepare sequence failed.
    #[error("sequence aborted at {step:?}: {fault:?}")]
    SequenceAborted {
        step: Step,
        fault: Fault<DI, PWR, RST>,
    },

    /// The access needs the memory map of an identified chip.
    #[error("chip not identified")]
    NotIdentified,

    /// A register access was attempted while the device is unpowered.
    #[error("device not powered on")]
    NotPoweredOn,
}

impl<DI, PWR, RST> Error<DI, PWR, RST> {
    pub(crate) fn aborted(StepError { step, error }: StepError<DI>) -> Self {
        Self::SequenceAborted {
            step,
            fault: Fault::Transport(error),
        }
    }
}
