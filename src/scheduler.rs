//! Fixed-cadence tick scheduling
//!
//! The host calls [`Scheduler::poll`] from whatever callback it has (animation
//! frame, timer, test loop) with a monotonic timestamp. A tick is due once the
//! interval has elapsed since the last committed tick; at most one tick fires
//! per poll, and the next interval is measured from the poll that fired it, so
//! a stalled tab resumes at normal speed instead of replaying missed ticks.

/// Tick timer driven by a monotonic millisecond clock
#[derive(Debug, Clone, PartialEq)]
pub struct Scheduler {
    interval_ms: f64,
    /// Time of the last committed tick; `None` while cancelled
    last_tick_ms: Option<f64>,
}

impl Scheduler {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_tick_ms: None,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Takes effect from the next poll
    pub fn set_interval_ms(&mut self, interval_ms: f64) {
        self.interval_ms = interval_ms;
    }

    pub fn is_armed(&self) -> bool {
        self.last_tick_ms.is_some()
    }

    /// Start measuring from `now_ms`. No-op if already armed.
    pub fn arm(&mut self, now_ms: f64) {
        if self.last_tick_ms.is_none() {
            self.last_tick_ms = Some(now_ms);
        }
    }

    /// Count a step taken outside [`Scheduler::poll`] as the last tick.
    /// No-op while cancelled.
    pub fn restart(&mut self, now_ms: f64) {
        if self.last_tick_ms.is_some() {
            self.last_tick_ms = Some(now_ms);
        }
    }

    /// Stop ticking. Returns whether the scheduler was armed.
    ///
    /// Once this returns, no later poll fires until the next [`Scheduler::arm`].
    pub fn cancel(&mut self) -> bool {
        self.last_tick_ms.take().is_some()
    }

    /// Returns true when a tick is due at `now_ms`, committing it
    pub fn poll(&mut self, now_ms: f64) -> bool {
        let Some(last) = self.last_tick_ms else {
            return false;
        };

        let elapsed = now_ms - last;
        if elapsed < 0.0 {
            // Clock went backwards (host swapped time sources); restart the interval
            self.last_tick_ms = Some(now_ms);
            return false;
        }
        if elapsed >= self.interval_ms {
            self.last_tick_ms = Some(now_ms);
            return true;
        }
        false
    }

    /// Time left until the next tick is due, if armed
    pub fn remaining_ms(&self, now_ms: f64) -> Option<f64> {
        self.last_tick_ms
            .map(|last| (self.interval_ms - (now_ms - last)).max(0.0))
    }
}
