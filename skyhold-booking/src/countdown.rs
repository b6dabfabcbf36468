use chrono::{DateTime, Utc};

/// `M:SS`, seconds zero-padded: 125 -> "2:05".
pub fn format_remaining(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// The remaining-time display of a seat hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    full_seconds: u32,
    remaining_seconds: u32,
}

impl Countdown {
    pub fn new(full_seconds: u32) -> Self {
        Self {
            full_seconds,
            remaining_seconds: full_seconds,
        }
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn full_seconds(&self) -> u32 {
        self.full_seconds
    }

    /// Back to the full hold length, ready for the next attempt.
    pub fn reset(&mut self) {
        self.remaining_seconds = self.full_seconds;
    }

    /// Recompute the display from the deadline. Partial seconds round up, so
    /// a tick landing a few milliseconds late still shows one less second.
    /// Returns the new value; zero means the hold has lapsed.
    pub fn sync(&mut self, deadline: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
        let millis = (deadline - now).num_milliseconds();
        self.remaining_seconds = if millis <= 0 {
            0
        } else {
            let seconds = (millis + 999) / 1000;
            u32::try_from(seconds).unwrap_or(u32::MAX).min(self.full_seconds)
        };
        self.remaining_seconds
    }

    pub fn label(&self) -> String {
        format_remaining(self.remaining_seconds)
    }

    /// Share of the hold still left, 0.0 to 100.0.
    pub fn progress_percent(&self) -> f64 {
        if self.full_seconds == 0 {
            return 0.0;
        }
        f64::from(self.remaining_seconds) / f64::from(self.full_seconds) * 100.0
    }
}
