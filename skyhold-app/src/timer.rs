use chrono::{DateTime, Utc};
use skyhold_core::Clock;
use std::time::Duration;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

/// One beat of a hold timer. `generation` identifies the timer that sent it
/// so ticks still queued from a stopped timer can be ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

/// Periodic tick source bound to a single seat hold. Dropping it aborts the
/// task, so no tick is produced after teardown.
#[derive(Debug)]
pub struct HoldTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

impl HoldTimer {
    /// First tick fires one `period` after start. Fails when called outside
    /// a Tokio runtime.
    pub fn start(generation: u64, period: Duration, ticks: UnboundedSender<Tick>) -> Result<Self, TryCurrentError> {
        let runtime = Handle::try_current()?;
        let handle = runtime.spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if ticks.send(Tick { generation }).is_err() {
                    break;
                }
            }
        });
        debug!(generation, ?period, "Hold timer started");
        Ok(Self { generation, handle })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for HoldTimer {
    fn drop(&mut self) {
        self.handle.abort();
        debug!(generation = self.generation, "Hold timer stopped");
    }
}

/// Wall clock driven by `tokio::time`, so paused-time tests move it too.
#[derive(Debug, Clone)]
pub struct TokioClock {
    origin: Instant,
    origin_wall: DateTime<Utc>,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            origin_wall: Utc::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = chrono::Duration::from_std(self.origin.elapsed()).unwrap_or_else(|_| chrono::Duration::zero());
        self.origin_wall + elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_every_period_until_dropped() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = HoldTimer::start(7, Duration::from_secs(1), tx).unwrap();

        let start = Instant::now();
        for _ in 0..3 {
            assert_eq!(rx.recv().await, Some(Tick { generation: 7 }));
        }
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(3) && elapsed < Duration::from_secs(4));

        drop(timer);
        time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_start_outside_runtime_is_an_error() {
        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(HoldTimer::start(1, Duration::from_secs(1), tx).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_clock_follows_paused_time() {
        let clock = TokioClock::new();
        let before = clock.now();
        time::advance(Duration::from_secs(90)).await;
        assert_eq!(clock.now() - before, chrono::Duration::seconds(90));
    }
}
