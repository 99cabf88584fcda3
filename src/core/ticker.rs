//! Fixed-period repeating schedule driven by the caller's loop.
//!
//! The ticker never fires by itself: the main loop asks whether a tick is due,
//! runs the update to completion and only then marks it. Ticks cannot overlap.
//! Polled ticks keep the original phase even when the loop wakes a little late;
//! a loop that stalls a whole period or more produces one late tick, not a
//! burst, and the schedule restarts from there.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    last_tick: Option<Instant>,
    ticks: u64,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_tick: None,
            ticks: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    #[cfg(test)]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The first check is always due
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_tick {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.period,
        }
    }

    /// Record a completed tick at `now`
    pub fn mark(&mut self, now: Instant) {
        self.last_tick = Some(now);
        self.ticks += 1;
    }

    /// `is_due` + `mark` in one step, anchored to the scheduled slot
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.is_due(now) {
            return false;
        }
        let anchor = match self.last_tick {
            Some(last) => {
                let scheduled = last + self.period;
                if now.saturating_duration_since(scheduled) < self.period {
                    scheduled
                } else {
                    now
                }
            }
            None => now,
        };
        self.mark(anchor);
        true
    }

    /// How long the loop may wait before the next tick is due
    pub fn until_next(&self, now: Instant) -> Duration {
        match self.last_tick {
            None => Duration::ZERO,
            Some(last) => (last + self.period).saturating_duration_since(now),
        }
    }
}
