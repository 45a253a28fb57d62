//! Clock port — local wall-clock time as seen by the schedule engine.
//!
//! Schedules carry local time-of-day semantics, so the engine works in
//! naive local time rather than UTC. Injecting the clock keeps edge
//! evaluation deterministic under test.

use chrono::NaiveDateTime;

/// Supplies the current local date and time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Production clock backed by the system's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}
