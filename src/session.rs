//! Read-only session capability.
//!
//! Views receive a [`Session`] explicitly instead of looking up a global
//! auth context. Token issuance and refresh live elsewhere.

use std::sync::Arc;

use crate::error::SyncError;

/// The signed-in user as far as the views need to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug)]
struct SessionInner {
    user: Option<User>,
    token: Option<String>,
}

/// Cheap-to-clone identity handle injected into every view that needs it.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self {
            inner: Arc::new(SessionInner {
                user: None,
                token: None,
            }),
        }
    }

    pub fn authenticated(user: User, token: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                user: Some(user),
                token: Some(token.into()),
            }),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.inner.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.inner.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.user.is_some()
    }

    /// Precondition for any mutating action.
    pub fn require_user(&self) -> Result<&User, SyncError> {
        self.user().ok_or(SyncError::AuthRequired)
    }
}
