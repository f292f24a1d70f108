//! Fixed-interval refresh bound to a view's mounted lifetime.
//!
//! Each tick re-fetches the whole collection and hands it to the view,
//! which replaces its local copy wholesale. Failed ticks are logged and
//! surfaced as warnings; the next tick runs on schedule regardless.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::SyncError;
use crate::lifecycle::ScopeHandle;
use crate::notify::{Notifier, Toast};

/// A running refresh timer. Dropping it stops the timer.
pub struct PollingSubscription {
    label: &'static str,
    task: JoinHandle<()>,
}

impl PollingSubscription {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollingSubscription {
    fn drop(&mut self) {
        self.task.abort();
        tracing::debug!(label = self.label, "Polling subscription stopped");
    }
}

/// Owner of at most one polling subscription per view.
#[derive(Default)]
pub struct Poller {
    current: Option<PollingSubscription>,
}

impl Poller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start refreshing every `interval`, replacing any running subscription.
    ///
    /// The first fetch runs immediately. `apply` is only called while the
    /// scope is mounted; once the scope unmounts the loop exits. Must be
    /// called from within a tokio runtime.
    pub fn start<T, F, Fut, A>(
        &mut self,
        label: &'static str,
        scope: ScopeHandle,
        interval: Duration,
        notifier: Arc<dyn Notifier>,
        fetch: F,
        apply: A,
    ) where
        T: Send + 'static,
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, SyncError>> + Send + 'static,
        A: Fn(T) + Send + 'static,
    {
        self.stop();
        tracing::debug!(
            label,
            interval_ms = interval.as_millis() as u64,
            "Polling subscription started"
        );

        let task = tokio::spawn(poll_loop(label, scope, interval, notifier, fetch, apply));
        self.current = Some(PollingSubscription { label, task });
    }

    pub fn stop(&mut self) {
        self.current = None;
    }

    pub fn is_running(&self) -> bool {
        self.current.as_ref().is_some_and(|sub| !sub.is_finished())
    }
}

async fn poll_loop<T, F, Fut, A>(
    label: &'static str,
    scope: ScopeHandle,
    interval: Duration,
    notifier: Arc<dyn Notifier>,
    fetch: F,
    apply: A,
) where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, SyncError>>,
    A: Fn(T),
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = scope.unmounted() => break,
        }

        let result = tokio::select! {
            result = fetch() => result,
            _ = scope.unmounted() => break,
        };

        match result {
            Ok(items) => {
                if scope.run_if_mounted(|| apply(items)).is_none() {
                    break;
                }
            }
            Err(err) => {
                tracing::warn!(
                    label,
                    error_type = err.error_type(),
                    error = %err,
                    "Poll failed, will retry on next tick"
                );
                notifier.notify(Toast::warning(err.user_message(&format!("refresh {}", label))));
            }
        }
    }

    tracing::debug!(label, "Polling loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::ViewScope;
    use crate::notify::ToastQueue;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn ticks_immediately_then_on_interval() {
        let scope = ViewScope::mount();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let counter = Arc::new(AtomicUsize::new(0));
        let mut poller = Poller::new();

        let sink = seen.clone();
        let fetch_counter = counter.clone();
        poller.start(
            "flash sales",
            scope.handle(),
            Duration::from_secs(30),
            Arc::new(ToastQueue::default()),
            move || {
                let n = fetch_counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok(n) }
            },
            move |n| sink.lock().push(n),
        );

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(*seen.lock(), vec![0]);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(*seen.lock(), vec![0, 1]);
        assert!(poller.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn failure_does_not_stop_later_ticks() {
        let scope = ViewScope::mount();
        let toasts = Arc::new(ToastQueue::default());
        let applied = Arc::new(AtomicUsize::new(0));
        let calls = Arc::new(AtomicUsize::new(0));
        let mut poller = Poller::new();

        let applied_sink = applied.clone();
        let fetch_calls = calls.clone();
        poller.start(
            "live streams",
            scope.handle(),
            Duration::from_secs(30),
            toasts.clone(),
            move || {
                let n = fetch_calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(SyncError::Http { status: 503 })
                    } else {
                        Ok(n)
                    }
                }
            },
            move |_| {
                applied_sink.fetch_add(1, Ordering::SeqCst);
            },
        );

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(applied.load(Ordering::SeqCst), 0);
        assert_eq!(toasts.latest().unwrap().message, "Failed to refresh live streams");

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(applied.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn no_apply_after_unmount() {
        let scope = ViewScope::mount();
        let applied = Arc::new(AtomicUsize::new(0));
        let mut poller = Poller::new();

        let sink = applied.clone();
        poller.start(
            "flash sales",
            scope.handle(),
            Duration::from_secs(30),
            Arc::new(ToastQueue::default()),
            || async { Ok(()) },
            move |_| {
                sink.fetch_add(1, Ordering::SeqCst);
            },
        );

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(applied.load(Ordering::SeqCst), 1);

        scope.unmount();
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(applied.load(Ordering::SeqCst), 1);
        assert!(!poller.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_previous_timer() {
        let scope = ViewScope::mount();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let mut poller = Poller::new();

        let sink = first.clone();
        poller.start(
            "a",
            scope.handle(),
            Duration::from_secs(10),
            Arc::new(ToastQueue::default()),
            || async { Ok(()) },
            move |_| {
                sink.fetch_add(1, Ordering::SeqCst);
            },
        );
        tokio::time::sleep(Duration::from_millis(1)).await;

        let sink = second.clone();
        poller.start(
            "b",
            scope.handle(),
            Duration::from_secs(10),
            Arc::new(ToastQueue::default()),
            || async { Ok(()) },
            move |_| {
                sink.fetch_add(1, Ordering::SeqCst);
            },
        );
        tokio::time::sleep(Duration::from_secs(25)).await;

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 3);
    }
}
