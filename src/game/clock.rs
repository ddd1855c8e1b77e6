use std::time::{Duration, Instant};

/// A repeating timer driven by the event loop.
///
/// The clock is "armed" once something asks how long to wait; the deadline
/// then stays fixed until the tick fires or the clock is stopped, so input
/// arriving between ticks does not push the next tick back.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Clock {
    period: Duration,
    deadline: Option<Instant>,
}

impl Clock {
    pub(crate) fn new(period: Duration) -> Clock {
        Clock {
            period,
            deadline: None,
        }
    }

    pub(crate) fn period(&self) -> Duration {
        self.period
    }

    /// Change the period.  Takes effect from the next time the clock is
    /// armed.
    pub(crate) fn set_period(&mut self, period: Duration) {
        self.period = period;
    }

    /// Return how long to wait from `now` until the next tick, arming the
    /// clock if necessary
    pub(crate) fn remaining(&mut self, now: Instant) -> Duration {
        let deadline = *self.deadline.get_or_insert(now + self.period);
        deadline.saturating_duration_since(now)
    }

    /// If the clock is armed and its deadline has passed as of `now`,
    /// disarm it and return `true`
    pub(crate) fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(when) if when <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Cancel any pending tick
    pub(crate) fn stop(&mut self) {
        self.deadline = None;
    }

    #[cfg(test)]
    pub(crate) fn armed(&self) -> bool {
        self.deadline.is_some()
    }
}
