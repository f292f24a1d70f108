//! Error types for API calls and view-model actions.
//!
//! Every failure ends up either reverted locally with a toast or returned
//! to the caller; nothing here is fatal.

use thiserror::Error;

/// Errors that can occur while talking to the platform API.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The request never produced a response.
    #[error("Network error while trying to {action}: {source}")]
    Network {
        action: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success status without a decodable envelope.
    #[error("HTTP {status}")]
    Http { status: u16 },

    /// The envelope reported `success: false`.
    #[error("API error {code}: {message}")]
    Api { code: String, message: String },

    /// The response body could not be decoded.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The action needs a signed-in user.
    #[error("Sign-in required")]
    AuthRequired,

    /// Input rejected before any request was issued.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Read exceeded the configured request timeout.
    #[error("Request timeout after {seconds}s")]
    Timeout { seconds: u64 },
}

impl SyncError {
    /// Text shown to the user when `action` fails.
    ///
    /// Server-supplied messages win; everything else falls back to a
    /// generic "Failed to {action}".
    pub fn user_message(&self, action: &str) -> String {
        match self {
            SyncError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            SyncError::AuthRequired => "Please sign in to continue".to_string(),
            SyncError::Validation(reason) => reason.clone(),
            _ => format!("Failed to {}", action),
        }
    }

    /// Stable error type string for logs.
    pub fn error_type(&self) -> &'static str {
        match self {
            SyncError::Network { .. } => "network_error",
            SyncError::Http { .. } => "http_error",
            SyncError::Api { .. } => "api_error",
            SyncError::Decode(_) => "decode_error",
            SyncError::AuthRequired => "auth_required",
            SyncError::Validation(_) => "validation_error",
            SyncError::Timeout { .. } => "timeout",
        }
    }
}
