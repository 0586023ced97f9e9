//! Startup and periodic update checks.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerTick {
    Startup,
    Interval,
}

/// Two timers (one-shot startup delay, then a fixed interval) that emit
/// ticks until cancelled. Dropping the scheduler cancels both.
pub struct UpdateScheduler {
    cancel: CancellationToken,
}

impl UpdateScheduler {
    /// Spawn both timers. The receiver closes once both have stopped.
    pub fn start(
        startup_delay: Duration,
        interval: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SchedulerTick>) {
        let cancel = CancellationToken::new();
        let (tx, rx) = mpsc::unbounded_channel();

        let token = cancel.clone();
        let startup_tx = tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = time::sleep(startup_delay) => {
                    let _ = startup_tx.send(SchedulerTick::Startup);
                }
            }
        });

        let token = cancel.clone();
        tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if tx.send(SchedulerTick::Interval).is_err() {
                            break;
                        }
                    }
                }
            }
            debug!("Update interval timer stopped");
        });

        (Self { cancel }, rx)
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for UpdateScheduler {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_secs(3);
    const HOUR: Duration = Duration::from_secs(3600);

    fn assert_near(elapsed: Duration, expected: Duration) {
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(10),
            "elapsed {elapsed:?}, expected {expected:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn startup_tick_then_hourly() {
        let start = Instant::now();
        let (_scheduler, mut rx) = UpdateScheduler::start(DELAY, HOUR);

        assert_eq!(rx.recv().await, Some(SchedulerTick::Startup));
        assert_near(start.elapsed(), DELAY);

        assert_eq!(rx.recv().await, Some(SchedulerTick::Interval));
        assert_near(start.elapsed(), HOUR);

        assert_eq!(rx.recv().await, Some(SchedulerTick::Interval));
        assert_near(start.elapsed(), HOUR * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_both_timers() {
        let (scheduler, mut rx) = UpdateScheduler::start(DELAY, HOUR);
        scheduler.cancel();
        assert!(scheduler.is_cancelled());
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels() {
        let (scheduler, mut rx) = UpdateScheduler::start(DELAY, HOUR);
        assert_eq!(rx.recv().await, Some(SchedulerTick::Startup));
        drop(scheduler);
        assert_eq!(rx.recv().await, None);
    }
}
