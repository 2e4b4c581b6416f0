//! Periodic Refresh Controller
//!
//! Runs a fetch-and-update action immediately and then on a fixed interval,
//! on its own tokio task, until the returned handle is cancelled or dropped.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

/// Cancellation gate shared by a [`RefreshHandle`] and its task.
///
/// Actions publish results through [`RefreshToken::deliver`]. Delivery and
/// cancellation take the same lock, so once `cancel()` has returned no
/// delivery is running and none will run.
#[derive(Debug, Clone, Default)]
pub struct RefreshToken {
    cancelled: Arc<Mutex<bool>>,
}

impl RefreshToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `update` unless the token has been cancelled.
    ///
    /// Returns `None` when the update was suppressed.
    pub fn deliver<R>(&self, update: impl FnOnce() -> R) -> Option<R> {
        let cancelled = self.cancelled.lock().unwrap_or_else(PoisonError::into_inner);
        if *cancelled {
            None
        } else {
            Some(update())
        }
    }

    fn cancel(&self) {
        *self.cancelled.lock().unwrap_or_else(PoisonError::into_inner) = true;
    }
}

/// Schedules periodic refresh tasks with a fixed interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshController {
    interval: Duration,
}

impl RefreshController {
    /// Create a controller; intervals below 1ms are raised to 1ms
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start a refresh loop.
    ///
    /// `action` runs once right away and then every interval. Ticks missed
    /// while an action is still running are delayed rather than replayed.
    pub fn start<F, Fut>(&self, name: impl Into<String>, mut action: F) -> RefreshHandle
    where
        F: FnMut(RefreshToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let name = name.into();
        let id = Uuid::new_v4();
        let token = RefreshToken::new();
        let task_token = token.clone();
        let period = self.interval;
        let task_name = name.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                if task_token.is_cancelled() {
                    break;
                }

                tracing::debug!(subscription = %task_name, %id, "Refresh tick");
                action(task_token.clone()).await;
            }
        });

        tracing::debug!(subscription = %name, %id, interval_ms = period.as_millis() as u64, "Refresh started");

        RefreshHandle {
            id,
            name,
            token,
            task,
        }
    }
}

/// Owner of one running refresh loop. Dropping it cancels the loop.
#[derive(Debug)]
pub struct RefreshHandle {
    id: Uuid,
    name: String,
    token: RefreshToken,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stop the loop. Synchronous: no update is delivered after this returns.
    pub fn cancel(&self) {
        if !self.token.is_cancelled() {
            tracing::debug!(subscription = %self.name, id = %self.id, "Refresh cancelled");
        }
        self.token.cancel();
        self.task.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether the loop is still scheduled
    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled() && !self.task.is_finished()
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    fn counting(controller: RefreshController) -> (RefreshHandle, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let task_count = count.clone();
        let handle = controller.start("counter", move |token: RefreshToken| {
            let count = task_count.clone();
            async move {
                token.deliver(|| count.fetch_add(1, Ordering::SeqCst));
            }
        });
        (handle, count)
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_immediately_then_on_interval() {
        let (handle, count) = counting(RefreshController::new(Duration::from_millis(60_000)));

        sleep(Duration::from_millis(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        sleep(Duration::from_millis(59_998)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        sleep(Duration::from_millis(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        handle.cancel();
        sleep(Duration::from_millis(120_000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_second_tick() {
        let (handle, count) = counting(RefreshController::new(Duration::from_millis(60_000)));

        sleep(Duration::from_millis(30_000)).await;
        handle.cancel();
        assert!(handle.is_cancelled());
        assert!(!handle.is_active());

        sleep(Duration::from_millis(60_000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let (handle, count) = counting(RefreshController::new(Duration::from_secs(10)));

        sleep(Duration::from_millis(1)).await;
        drop(handle);

        sleep(Duration::from_secs(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_while_action_is_suspended() {
        let count = Arc::new(AtomicUsize::new(0));
        let task_count = count.clone();
        let handle = RefreshController::new(Duration::from_secs(60)).start("slow", move |token: RefreshToken| {
            let count = task_count.clone();
            async move {
                sleep(Duration::from_secs(5)).await;
                token.deliver(|| count.fetch_add(1, Ordering::SeqCst));
            }
        });

        sleep(Duration::from_secs(2)).await;
        handle.cancel();

        sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detached_delivery_is_gated() {
        let count = Arc::new(AtomicUsize::new(0));
        let task_count = count.clone();
        // The delivery outlives the aborted loop task, so only the token stops it
        let handle = RefreshController::new(Duration::from_secs(60)).start("detached", move |token: RefreshToken| {
            let count = task_count.clone();
            tokio::spawn(async move {
                sleep(Duration::from_secs(5)).await;
                token.deliver(|| count.fetch_add(1, Ordering::SeqCst));
            });
            async {}
        });

        sleep(Duration::from_secs(2)).await;
        handle.cancel();

        sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_deliver_after_cancel_is_suppressed() {
        let token = RefreshToken::new();
        assert_eq!(token.deliver(|| 1), Some(1));

        token.cancel();
        assert_eq!(token.deliver(|| 2), None);
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_zero_interval_is_raised() {
        let controller = RefreshController::new(Duration::ZERO);
        assert_eq!(controller.interval(), Duration::from_millis(1));
    }
}
