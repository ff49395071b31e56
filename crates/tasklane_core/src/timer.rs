use std::time::{Duration, Instant};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Fixed-cadence deadline tracker for the due poll.
///
/// The owner waits for [`PollTimer::remaining`] and calls [`PollTimer::fire`] when it
/// wakes. Ticks missed while the owner was busy collapse into one.
#[derive(Debug, Clone)]
pub struct PollTimer {
    interval: Duration,
    next_fire: Instant,
}

impl PollTimer {
    pub fn new(interval: Duration, start: Instant) -> Self {
        let interval = interval.max(Duration::from_millis(1));
        Self {
            interval,
            next_fire: start + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_fire.saturating_duration_since(now)
    }

    /// Returns true when a tick is due at `now` and schedules the next one.
    pub fn fire(&mut self, now: Instant) -> bool {
        if now < self.next_fire {
            return false;
        }
        while self.next_fire <= now {
            self.next_fire += self.interval;
        }
        true
    }
}
