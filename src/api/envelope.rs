use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// Error detail carried by a failed envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// `{ success, data?, error? }` wrapper around every API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiErrorBody>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Successful envelopes yield their (optional) data; failed ones
    /// become [`SyncError::Api`].
    pub fn into_result(self) -> Result<Option<T>, SyncError> {
        if self.success {
            return Ok(self.data);
        }
        let body = self.error.unwrap_or_default();
        Err(SyncError::Api {
            code: if body.code.is_empty() {
                "UNKNOWN".to_string()
            } else {
                body.code
            },
            message: body.message,
        })
    }
}
