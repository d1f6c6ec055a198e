//! Bring-up sequencing: bounded retry, chip identification and command
//! replay.

use embedded_hal::delay::DelayNs;

use crate::{
    command::CommandTable,
    error::{Step, StepError},
    identity::{resolve, IdentityTemplate, ID_LEN},
    interface::Interface,
    register::{PageChannel, RegisterBus},
};

/// How often, and how patiently, a fallible step is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub max_attempts: u8,
    /// Wait between two attempts, in µs.
    pub backoff_us: u32,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u8, backoff_us: u32) -> Self {
        Self {
            max_attempts,
            backoff_us,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, 10_000)
    }
}

/// Every attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exhausted<E> {
    /// Number of attempts made.
    pub attempts: u8,
    /// Error of the final attempt, `None` if no attempt was allowed.
    pub last: Option<E>,
}

/// Runs `attempt` until it succeeds or `policy` is used up.
///
/// The back-off delay is waited between attempts, never after the last one.
pub fn retry<T, E, DELAY>(
    policy: &RetryPolicy,
    delay: &mut DELAY,
    mut attempt: impl FnMut(&mut DELAY) -> Result<T, E>,
) -> Result<T, Exhausted<E>>
where
    DELAY: DelayNs,
    E: core::fmt::Debug,
{
    let mut last = None;

    for n in 1..=policy.max_attempts {
        match attempt(delay) {
            Ok(value) => return Ok(value),
            Err(e) => {
                log::debug!("attempt {}/{} failed: {:?}", n, policy.max_attempts, e);
                last = Some(e);
            }
        }

        if n < policy.max_attempts {
            delay.delay_us(policy.backoff_us);
        }
    }

    Err(Exhausted {
        attempts: policy.max_attempts,
        last,
    })
}

/// Addresses and timings of the identification handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Protocol {
    /// Software reset register.
    pub swrst_addr: u32,
    /// Value written to [`Self::swrst_addr`] to reboot into the bootloader.
    pub boot_reset_cmd: u8,
    /// Time the MCU needs after a bootloader reset, in µs.
    pub boot_reset_settle_us: u32,
    /// Start of the trim identity block.
    pub chip_id_addr: u32,
    /// Time a page select needs before the new page is accessible, in µs.
    pub page_settle_us: u32,
}

/// Why a single identification attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptError<E> {
    Transport(E),
    /// The trim id read back matched no template.
    Unrecognized([u8; ID_LEN]),
}

/// Reboots the controller MCU into its bootloader.
pub fn bootloader_reset<B, DELAY>(
    channel: &mut PageChannel<B>,
    delay: &mut DELAY,
    protocol: &Protocol,
) -> Result<(), B::Error>
where
    B: RegisterBus,
    DELAY: DelayNs,
{
    channel.select_page(protocol.swrst_addr)?;
    channel.write_block(protocol.swrst_addr, &[protocol.boot_reset_cmd])?;
    delay.delay_us(protocol.boot_reset_settle_us);
    Ok(())
}

/// Identifies the controller against `table`.
///
/// Each attempt resets the MCU into its bootloader, selects the trim id page,
/// reads the identity block and resolves it. The whole retry loop runs on
/// the caller's channel, so hold its lock for the duration.
pub fn identify<B, DELAY, V>(
    channel: &mut PageChannel<B>,
    delay: &mut DELAY,
    protocol: &Protocol,
    table: &[IdentityTemplate<V>],
    policy: &RetryPolicy,
) -> Result<V, Exhausted<AttemptError<B::Error>>>
where
    B: RegisterBus,
    DELAY: DelayNs,
    V: Copy,
{
    retry(policy, delay, |delay| {
        identify_once(channel, delay, protocol, table)
    })
}

fn identify_once<B, DELAY, V>(
    channel: &mut PageChannel<B>,
    delay: &mut DELAY,
    protocol: &Protocol,
    table: &[IdentityTemplate<V>],
) -> Result<V, AttemptError<B::Error>>
where
    B: RegisterBus,
    DELAY: DelayNs,
    V: Copy,
{
    bootloader_reset(channel, delay, protocol).map_err(AttemptError::Transport)?;

    // the settle time applies whether or not the select was acknowledged
    let selected = channel.select_page(protocol.chip_id_addr);
    delay.delay_us(protocol.page_settle_us);
    selected.map_err(AttemptError::Transport)?;

    let mut sample = [0; ID_LEN];
    channel
        .read_block(protocol.chip_id_addr, &mut sample)
        .map_err(AttemptError::Transport)?;

    resolve(table, &sample).ok_or(AttemptError::Unrecognized(sample))
}

/// Sends every entry of `table` in order.
///
/// Stops at the first failure and reports the index of the failed entry;
/// nothing is retried.
pub fn replay<DI>(di: &mut DI, table: &CommandTable) -> Result<(), StepError<DI::Error>>
where
    DI: Interface,
{
    for (index, entry) in table.iter().enumerate() {
        di.write_buffer(entry.payload())
            .map_err(StepError::at(Step::Command { index }))?;
    }
    Ok(())
}
