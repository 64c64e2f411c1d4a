//! UI-loop timers
//!
//! Timers run as small tokio tasks that post [`HudEvent::TimerFired`] back to
//! the UI loop; they never touch HUD state themselves. Every scheduling call
//! returns a [`TimerHandle`] whose cancellation token stops the task. Dropping
//! the handle cancels it too, so a timer lives exactly as long as its owner
//! keeps the handle.
//!
//! A cancelled timer may already have posted an event that is still queued.
//! The controller compares event ids against the handles it currently holds
//! and ignores anything stale.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::HudError;

/// Identity of one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// Events delivered to the UI loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudEvent {
    /// A timer elapsed at `at`
    TimerFired { id: TimerId, at: Instant },
}

/// Ownership of a scheduled timer
#[derive(Debug)]
pub struct TimerHandle {
    id: TimerId,
    token: CancellationToken,
}

impl TimerHandle {
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Stop the timer; no further events are posted for it
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

/// `from + delay`, or roughly thirty years out when that overflows
pub fn deadline_after(from: Instant, delay: Duration) -> Instant {
    from.checked_add(delay).unwrap_or_else(|| far_future(from))
}

fn far_future(from: Instant) -> Instant {
    let years = Duration::from_secs(86400 * 365 * 30);
    from.checked_add(years).unwrap_or(from)
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Spawns timers on a tokio runtime and routes their events to one channel
#[derive(Debug)]
pub struct Scheduler {
    runtime: Handle,
    tx: mpsc::UnboundedSender<HudEvent>,
    next_id: u64,
}

impl Scheduler {
    /// Create a scheduler on the current tokio runtime.
    ///
    /// Returns the receiving end of the event channel for the UI loop.
    pub fn new() -> Result<(Self, mpsc::UnboundedReceiver<HudEvent>), HudError> {
        let runtime = Handle::try_current().map_err(|_| HudError::NoRuntime)?;
        Ok(Self::with_runtime(runtime))
    }

    pub fn with_runtime(runtime: Handle) -> (Self, mpsc::UnboundedReceiver<HudEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            runtime,
            tx,
            next_id: 0,
        };
        (scheduler, rx)
    }

    fn allocate(&mut self) -> (TimerId, CancellationToken) {
        self.next_id += 1;
        (TimerId(self.next_id), CancellationToken::new())
    }

    /// Fire once after `delay`
    pub fn once(&mut self, delay: Duration) -> TimerHandle {
        self.once_at(deadline_after(Instant::now(), delay))
    }

    /// Fire once at `deadline` (immediately if it has passed)
    pub fn once_at(&mut self, deadline: Instant) -> TimerHandle {
        let (id, token) = self.allocate();
        let tx = self.tx.clone();
        let cancelled = token.clone();
        debug!(?id, ?deadline, "scheduling one-shot timer");

        self.runtime.spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep_until(deadline) => {
                    let _ = tx.send(HudEvent::TimerFired { id, at: deadline });
                }
            }
        });

        TimerHandle { id, token }
    }

    /// Fire every `period`, first firing one period from now
    pub fn repeating(&mut self, period: Duration) -> TimerHandle {
        let (id, token) = self.allocate();
        let tx = self.tx.clone();
        let cancelled = token.clone();
        debug!(?id, ?period, "scheduling repeating timer");

        self.runtime.spawn(async move {
            let first = deadline_after(Instant::now(), period);
            let mut interval = tokio::time::interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    at = interval.tick() => {
                        if tx.send(HudEvent::TimerFired { id, at }).is_err() {
                            // UI loop is gone
                            break;
                        }
                    }
                }
            }
        });

        TimerHandle { id, token }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_once_fires_after_delay() {
        let (mut scheduler, mut rx) = Scheduler::new().unwrap();
        let handle = scheduler.once(Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(900)).await;
        settle().await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(200)).await;
        settle().await;
        let HudEvent::TimerFired { id, .. } = rx.try_recv().unwrap();
        assert_eq!(id, handle.id());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_fire() {
        let (mut scheduler, mut rx) = Scheduler::new().unwrap();
        let handle = scheduler.once(Duration::from_secs(1));
        handle.cancel();

        tokio::time::sleep(Duration::from_secs(2)).await;
        settle().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_repeating() {
        let (mut scheduler, mut rx) = Scheduler::new().unwrap();
        let handle = scheduler.repeating(Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(175)).await;
        settle().await;
        let mut fired = 0;
        while rx.try_recv().is_ok() {
            fired += 1;
        }
        assert_eq!(fired, 3);

        drop(handle);
        tokio::time::sleep(Duration::from_millis(500)).await;
        settle().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ids_are_unique() {
        let (mut scheduler, _rx) = Scheduler::new().unwrap();
        let a = scheduler.once(Duration::from_secs(1));
        let b = scheduler.once(Duration::from_secs(1));
        assert_ne!(a.id(), b.id());
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_delay_does_not_overflow() {
        let (mut scheduler, mut rx) = Scheduler::new().unwrap();
        let now = Instant::now();
        assert!(deadline_after(now, Duration::MAX) > now + Duration::from_secs(86400 * 365));

        let _handle = scheduler.once(Duration::MAX);
        tokio::time::sleep(Duration::from_secs(3600)).await;
        settle().await;
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_new_without_runtime_fails() {
        assert!(matches!(Scheduler::new(), Err(HudError::NoRuntime)));
    }
}
