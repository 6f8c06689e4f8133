//! Self-imposed pacing against the request budget.

use std::time::Duration;

/// Pause for `duration` each time the request counter lands on a multiple of `every`.
#[derive(Debug, Clone)]
pub struct CooldownSchedule {
    every: u64,
    duration: Duration,
    last_triggered: u64,
}

impl CooldownSchedule {
    /// `every == 0` disables the cooldown
    pub fn new(every: u64, duration: Duration) -> Self {
        Self {
            every,
            duration,
            last_triggered: 0,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether a cooldown is due at `requests_sent`.
    ///
    /// Fires on exact nonzero multiples only, and only once per multiple even
    /// if the counter is checked again before it moves.
    pub fn is_due(&mut self, requests_sent: u64) -> bool {
        if self.every == 0 || requests_sent == 0 || requests_sent % self.every != 0 {
            return false;
        }
        if requests_sent == self.last_triggered {
            return false;
        }
        self.last_triggered = requests_sent;
        true
    }
}

impl Default for CooldownSchedule {
    fn default() -> Self {
        Self::new(1500, Duration::from_secs(30))
    }
}
