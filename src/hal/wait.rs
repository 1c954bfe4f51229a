//! Bounded polling.
//!
//! A busy-wait on a hardware line must be able to give up. [`wait_until`]
//! polls a condition until it holds or a [`Deadline`] expires and reports
//! which of the two happened.

use embedded_hal::delay::DelayNs;

/// How a bounded wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitOutcome {
    Satisfied,
    TimedOut,
}

/// A budget consumed once per unsuccessful poll.
pub trait Deadline {
    /// Called after each failed poll. Returns true once the budget is spent;
    /// otherwise consumes one step (and may block for it).
    fn expired(&mut self) -> bool;
}

impl<T: Deadline + ?Sized> Deadline for &mut T {
    fn expired(&mut self) -> bool {
        (**self).expired()
    }
}

/// Deadline counted in polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollBudget {
    remaining: u32,
}

impl PollBudget {
    /// Allows `retries` polls after the first one.
    pub const fn new(retries: u32) -> Self {
        Self { remaining: retries }
    }

    pub const fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl Deadline for PollBudget {
    fn expired(&mut self) -> bool {
        if self.remaining == 0 {
            return true;
        }
        self.remaining -= 1;
        false
    }
}

/// Deadline counted in time, sleeping a fixed step between polls.
pub struct DelayDeadline<D: DelayNs> {
    delay: D,
    step_us: u32,
    remaining_us: u32,
}

impl<D: DelayNs> DelayDeadline<D> {
    /// `step_us` is clamped to at least 1 µs.
    pub fn new(delay: D, timeout_us: u32, step_us: u32) -> Self {
        Self {
            delay,
            step_us: step_us.max(1),
            remaining_us: timeout_us,
        }
    }

    pub fn remaining_us(&self) -> u32 {
        self.remaining_us
    }

    pub fn into_inner(self) -> D {
        self.delay
    }
}

impl<D: DelayNs> Deadline for DelayDeadline<D> {
    fn expired(&mut self) -> bool {
        if self.remaining_us == 0 {
            return true;
        }
        let step = self.step_us.min(self.remaining_us);
        self.delay.delay_us(step);
        self.remaining_us -= step;
        false
    }
}

/// Polls `condition` until it returns `Ok(true)` or `deadline` expires.
///
/// The condition is always polled at least once. Errors from the condition
/// end the wait immediately.
pub fn wait_until<D, E, F>(deadline: &mut D, mut condition: F) -> Result<WaitOutcome, E>
where
    D: Deadline + ?Sized,
    F: FnMut() -> Result<bool, E>,
{
    loop {
        if condition()? {
            return Ok(WaitOutcome::Satisfied);
        }
        if deadline.expired() {
            return Ok(WaitOutcome::TimedOut);
        }
    }
}
