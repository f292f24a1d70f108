use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, Method, StatusCode, Url};
use serde_json::Value;
use tokio::time::timeout;

use crate::api::envelope::Envelope;
use crate::config::ApiConfig;
use crate::error::SyncError;
use crate::session::Session;

/// JSON client for the platform API.
///
/// Holds the session explicitly; every request carries its bearer token
/// when the session is authenticated.
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: Session,
    read_timeout: Duration,
}

/// Whether a call is bounded by the configured read timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Deadline {
    /// List reads used by refreshes.
    Read,
    /// Mutations: no request-level timeout.
    None,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Session) -> Result<Self, SyncError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds as u64))
            .build()
            .map_err(|e| SyncError::Network {
                action: "build HTTP client".to_string(),
                source: e,
            })?;

        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| SyncError::Validation(format!("invalid API base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(SyncError::Validation(format!(
                "API base URL '{}' cannot hold paths",
                base_url
            )));
        }

        Ok(Self {
            http,
            base_url,
            session,
            read_timeout: Duration::from_secs(config.request_timeout_seconds as u64),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Resolve an endpoint under the base URL.
    ///
    /// Each segment is percent-encoded on its own, so ids containing `/`,
    /// `?` or `#` stay inside their segment.
    pub(crate) fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    /// Send one request and unwrap the response envelope.
    pub(crate) async fn call(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
        action: &str,
        deadline: Deadline,
    ) -> Result<Option<Value>, SyncError> {
        let path = url.path().to_string();
        let request_id = uuid::Uuid::new_v4().to_string();

        let mut builder = self
            .http
            .request(method.clone(), url)
            .header(ACCEPT, "application/json")
            .header("x-request-id", &request_id);
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let exchange = async {
            let response = builder.send().await.map_err(|e| SyncError::Network {
                action: action.to_string(),
                source: e,
            })?;
            let status = response.status();
            let bytes = response.bytes().await.map_err(|e| SyncError::Network {
                action: action.to_string(),
                source: e,
            })?;
            Ok::<_, SyncError>((status, bytes))
        };

        let (status, bytes) = match deadline {
            Deadline::Read => match timeout(self.read_timeout, exchange).await {
                Ok(result) => result?,
                Err(_) => {
                    return Err(SyncError::Timeout {
                        seconds: self.read_timeout.as_secs(),
                    })
                }
            },
            Deadline::None => exchange.await?,
        };

        tracing::debug!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            request_id = %request_id,
            "API response"
        );

        decode_envelope(status, &bytes)
    }
}

/// Interpret a raw response.
///
/// Error statuses that still carry an envelope keep the server message.
fn decode_envelope(status: StatusCode, bytes: &[u8]) -> Result<Option<Value>, SyncError> {
    match serde_json::from_slice::<Envelope<Value>>(bytes) {
        Ok(envelope) => {
            if !status.is_success() && envelope.success {
                return Err(SyncError::Http {
                    status: status.as_u16(),
                });
            }
            envelope.into_result()
        }
        Err(e) => {
            if status.is_success() {
                Err(SyncError::Decode(e.to_string()))
            } else {
                Err(SyncError::Http {
                    status: status.as_u16(),
                })
            }
        }
    }
}
