//! Injected time sources.
//!
//! Everything that needs "now" takes a `&dyn Clock` so the countdown and the
//! notice can be rendered for any instant without touching real timers.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeDelta, TimeZone};
use std::cell::Cell;

/// Source of local wall-clock time
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// Reads the system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// System clock shifted by a constant offset.
///
/// Lets the live display start from an arbitrary instant (`--at`) and keep
/// ticking in real time from there.
#[derive(Debug, Clone, Copy)]
pub struct OffsetClock {
    offset: TimeDelta,
}

impl OffsetClock {
    pub fn new(offset: TimeDelta) -> Self {
        Self { offset }
    }

    /// Offset chosen so that `now()` currently reads `start`
    pub fn starting_at(start: DateTime<Local>) -> Self {
        Self::new(start.signed_duration_since(Local::now()))
    }

    pub fn offset(&self) -> TimeDelta {
        self.offset
    }
}

impl Clock for OffsetClock {
    fn now(&self) -> DateTime<Local> {
        Local::now() + self.offset
    }
}

/// Frozen clock that only moves when told to
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<Local>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    #[cfg(test)]
    pub fn set(&self, now: DateTime<Local>) {
        self.now.set(now);
    }

    #[cfg(test)]
    pub fn advance(&self, by: TimeDelta) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.now.get()
    }
}

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse a `--at` argument.
///
/// Accepts RFC 3339 (`2025-03-04T23:59:58-03:00`) or a naive local time
/// (`2025-03-04T23:59:58`, `2025-03-04 23:59:58`, `2025-03-04T23:59`).
pub fn parse_local_time(input: &str) -> Result<DateTime<Local>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Local));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .context(format!("{} does not exist in the local timezone", input));
        }
    }

    bail!(
        "Unrecognized time '{}' (expected RFC 3339 or YYYY-MM-DDTHH:MM:SS)",
        input
    )
}
