//! Transient user-visible notifications (toasts).

use std::collections::VecDeque;

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }
}

/// Sink for non-blocking notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Bounded in-memory toast queue. The oldest toast is dropped past capacity.
pub struct ToastQueue {
    capacity: usize,
    toasts: Mutex<VecDeque<Toast>>,
}

impl ToastQueue {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            toasts: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Take every pending toast, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        self.toasts.lock().drain(..).collect()
    }

    pub fn latest(&self) -> Option<Toast> {
        self.toasts.lock().back().cloned()
    }

    pub fn len(&self) -> usize {
        self.toasts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.lock().is_empty()
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(16)
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, toast: Toast) {
        let mut toasts = self.toasts.lock();
        while toasts.len() >= self.capacity {
            toasts.pop_front();
        }
        toasts.push_back(toast);
    }
}
