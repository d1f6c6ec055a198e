//! Power and mode lifecycle shared by every device family.

use embedded_hal::delay::DelayNs;

use crate::options::DisplayMode;

/// Where a device stands in its bring-up.
///
/// States are ordered: a device in a later state has completed every
/// transition of the earlier ones.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleState {
    /// Supplies off, reset asserted or floating.
    #[default]
    Idle,
    /// Supplies on and reset released.
    PoweredOn,
    /// Initialised and ready for use.
    Prepared,
    /// Output enabled.
    Enabled,
}

/// The transitions a display host drives a device through.
///
/// Every transition is a no-op returning `Ok(())` when its precondition is
/// not met, except where documented:
///
/// * `prepare` from [`LifecycleState::Idle`] powers the device on first.
/// * `unprepare` from [`LifecycleState::Enabled`] disables first, and runs
///   the power-off sequence after shutdown.
/// * `power_off` from [`LifecycleState::Prepared`] or later unprepares.
///
/// A fatal failure leaves the device in [`LifecycleState::Idle`].
pub trait Lifecycle {
    /// Error type
    type Error;

    /// Returns the current state.
    fn state(&self) -> LifecycleState;

    /// `Idle` → `PoweredOn`.
    fn power_on<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error>;

    /// `PoweredOn` → `Prepared`.
    fn prepare<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error>;

    /// `Prepared` → `Enabled`.
    fn enable<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error>;

    /// `Enabled` → `Prepared`.
    fn disable<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error>;

    /// `Prepared` → `Idle`, passing through `PoweredOn`.
    ///
    /// Shutdown commands are best effort; power-off faults are returned.
    fn unprepare<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error>;

    /// `PoweredOn` → `Idle`.
    fn power_off<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error>;

    /// Display modes offered to the host.
    fn modes(&self) -> &[DisplayMode] {
        &[]
    }
}
