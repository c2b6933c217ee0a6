//! Countdown round clock, advanced by physics ticks

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundClock {
    left_seconds: u32,
    elapsed_ms: u32,
    expired: bool,
}

impl RoundClock {
    pub fn new(total_seconds: u32) -> Self {
        Self {
            left_seconds: total_seconds,
            elapsed_ms: 0,
            expired: false,
        }
    }

    pub fn left_seconds(&self) -> u32 {
        self.left_seconds
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Add one tick; returns true on the tick the clock expires
    ///
    /// Every whole second subtracts one. A subtraction requested with no
    /// seconds left expires the clock, so a round of N seconds ends on the
    /// (N+1)th second boundary.
    pub fn advance(&mut self, tick_ms: u32) -> bool {
        if self.expired {
            return false;
        }
        self.elapsed_ms += tick_ms;
        while self.elapsed_ms >= 1000 {
            self.elapsed_ms -= 1000;
            if self.left_seconds > 0 {
                self.left_seconds -= 1;
            } else {
                self.expired = true;
                return true;
            }
        }
        false
    }
}
