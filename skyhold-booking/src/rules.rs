use chrono::Duration;
use serde::Deserialize;

/// What happens to passenger data typed before a hold lapses.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryPolicy {
    /// Drop everything; the next attempt starts blank.
    #[default]
    DiscardDraft,
    /// Keep the passenger draft for exactly one more reservation.
    KeepDraftForRetry,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingRules {
    #[serde(default = "default_hold_seconds")]
    pub hold_seconds: u32,
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
    #[serde(default)]
    pub expiry_policy: ExpiryPolicy,
    #[serde(default = "default_low_seat_threshold")]
    pub low_seat_threshold: u32,
}

fn default_hold_seconds() -> u32 { 120 }
fn default_tick_millis() -> u64 { 1000 }
fn default_low_seat_threshold() -> u32 { 20 }

impl BookingRules {
    pub fn hold_duration(&self) -> Duration {
        Duration::seconds(i64::from(self.hold_seconds))
    }

    pub fn tick_period(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_millis.max(1))
    }
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            hold_seconds: default_hold_seconds(),
            tick_millis: default_tick_millis(),
            expiry_policy: ExpiryPolicy::default(),
            low_seat_threshold: default_low_seat_threshold(),
        }
    }
}
