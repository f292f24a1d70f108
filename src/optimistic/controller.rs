use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use scopeguard::ScopeGuard;

use crate::error::SyncError;
use crate::lifecycle::ScopeHandle;
use crate::notify::{Notifier, Toast};
use crate::optimistic::field::{FieldStatus, OptimisticField};

/// How a call to [`Optimistic::mutate`] ended.
#[derive(Debug)]
pub enum MutationOutcome<T> {
    /// The server accepted the change; carries the value now displayed.
    Committed(T),
    /// The server call failed; the prior value is displayed again.
    Reverted(SyncError),
    /// Another mutation of the same field was still pending; nothing was sent.
    Ignored,
    /// The view unmounted before the response arrived; no state was touched.
    Abandoned,
}

impl<T> MutationOutcome<T> {
    pub fn is_committed(&self) -> bool {
        matches!(self, MutationOutcome::Committed(_))
    }

    pub fn is_reverted(&self) -> bool {
        matches!(self, MutationOutcome::Reverted(_))
    }
}

/// Optimistic mutation controller for one displayed field.
///
/// Cloning shares the same field, so every control bound to the same value
/// sees the same pending state.
pub struct Optimistic<T> {
    field: Arc<Mutex<OptimisticField<T>>>,
    scope: ScopeHandle,
    notifier: Arc<dyn Notifier>,
}

impl<T> Clone for Optimistic<T> {
    fn clone(&self) -> Self {
        Self {
            field: Arc::clone(&self.field),
            scope: self.scope.clone(),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<T: Clone + Send + 'static> Optimistic<T> {
    pub fn new(initial: T, scope: ScopeHandle, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            field: Arc::new(Mutex::new(OptimisticField::new(initial))),
            scope,
            notifier,
        }
    }

    /// The value currently displayed.
    pub fn value(&self) -> T {
        self.field.lock().displayed().clone()
    }

    pub fn status(&self) -> FieldStatus {
        self.field.lock().status()
    }

    /// True while a mutation is in flight; controls should be disabled.
    pub fn is_pending(&self) -> bool {
        self.field.lock().is_pending()
    }

    /// Feed a fresh server value from a refresh.
    pub fn sync(&self, value: T) {
        self.field.lock().sync(value);
    }

    /// Run one optimistic mutation.
    ///
    /// `apply` computes the optimistic value from the displayed one, which
    /// is shown immediately. `op` receives that value and performs the
    /// server call; `Ok(Some(v))` commits the server's `v`, `Ok(None)` keeps
    /// the guess, and `Err` reverts and raises an error toast. `action`
    /// names the operation in messages ("like video").
    ///
    /// If the view unmounts first, `op` is dropped mid-flight and the field
    /// is left alone. If the caller drops the returned future before it
    /// settles (a timeout, an aborted task), the field reverts silently so
    /// the control is usable again.
    pub async fn mutate<A, F, Fut>(&self, action: &str, apply: A, op: F) -> MutationOutcome<T>
    where
        A: FnOnce(&T) -> T,
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<Option<T>, SyncError>>,
    {
        let begun = self.field.lock().begin(apply);
        let Some((ticket, next)) = begun else {
            tracing::debug!(action, "Mutation already pending, ignoring trigger");
            return MutationOutcome::Ignored;
        };
        tracing::debug!(action, "Optimistic update applied");

        let unsettled = scopeguard::guard(ticket, |ticket| {
            self.scope.run_if_mounted(|| {
                if self.field.lock().revert(ticket) {
                    tracing::debug!(action, "Mutation dropped before settling, reverted");
                }
            });
        });

        let result = tokio::select! {
            result = op(next) => result,
            _ = self.scope.unmounted() => {
                tracing::debug!(action, "View unmounted before response, skipping reconciliation");
                return MutationOutcome::Abandoned;
            }
        };
        let ticket = ScopeGuard::into_inner(unsettled);

        let settled = self.scope.run_if_mounted(|| {
            let mut field = self.field.lock();
            match result {
                Ok(authoritative) => {
                    if field.commit(ticket, authoritative) {
                        Some(Ok(field.displayed().clone()))
                    } else {
                        None
                    }
                }
                Err(err) => {
                    if field.revert(ticket) {
                        Some(Err(err))
                    } else {
                        None
                    }
                }
            }
        });

        match settled.flatten() {
            Some(Ok(value)) => {
                tracing::info!(action, "Mutation committed");
                MutationOutcome::Committed(value)
            }
            Some(Err(err)) => {
                tracing::warn!(
                    action,
                    error_type = err.error_type(),
                    error = %err,
                    "Mutation failed, reverted"
                );
                self.notifier.notify(Toast::error(err.user_message(action)));
                MutationOutcome::Reverted(err)
            }
            None => MutationOutcome::Abandoned,
        }
    }
}
