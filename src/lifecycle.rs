//! Mount lifecycle for view instances.
//!
//! A [`ViewScope`] is created when a view mounts and unmounted when it goes
//! away. Timers and in-flight requests hold a [`ScopeHandle`] and stop
//! touching view state once the scope is unmounted.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Notify;

struct ScopeInner {
    mounted: RwLock<bool>,
    notify: Notify,
}

/// Owner side of a mounted view. Dropping it unmounts the view.
pub struct ViewScope {
    inner: Arc<ScopeInner>,
}

impl ViewScope {
    pub fn mount() -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                mounted: RwLock::new(true),
                notify: Notify::new(),
            }),
        }
    }

    /// Mark the view as unmounted and wake every waiter.
    ///
    /// Blocks until any callback currently running under
    /// [`ScopeHandle::run_if_mounted`] has finished, so no state update can
    /// start after this returns.
    pub fn unmount(&self) {
        let mut mounted = self.inner.mounted.write();
        if *mounted {
            *mounted = false;
            drop(mounted);
            tracing::debug!("view unmounted");
            self.inner.notify.notify_waiters();
        }
    }

    pub fn is_mounted(&self) -> bool {
        *self.inner.mounted.read()
    }

    pub fn handle(&self) -> ScopeHandle {
        ScopeHandle {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Lightweight handle for checking mount state.
#[derive(Clone)]
pub struct ScopeHandle {
    inner: Arc<ScopeInner>,
}

impl ScopeHandle {
    pub fn is_mounted(&self) -> bool {
        *self.inner.mounted.read()
    }

    /// Run `f` only while the view is still mounted.
    pub fn run_if_mounted<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        let mounted = self.inner.mounted.read();
        if *mounted {
            Some(f())
        } else {
            None
        }
    }

    /// Resolves once the view is unmounted.
    pub async fn unmounted(&self) {
        // Subscribe before checking the flag so an unmount between the
        // check and the await is not lost.
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if !self.is_mounted() {
            return;
        }
        notified.await;
    }
}
