use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub virtualization: VirtualizationConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

/// Connection settings for the platform API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for the API (e.g., "https://api.example.com").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    /// Timeout for list reads in seconds (default: 10).
    /// Mutations never carry a request-level timeout.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
}

/// Refresh intervals for polled views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Flash-sale stock/countdown refresh interval (default: 30).
    #[serde(default = "default_poll_interval")]
    pub flash_sale_interval_seconds: u64,
    /// Live stream list refresh interval (default: 30).
    #[serde(default = "default_poll_interval")]
    pub live_stream_interval_seconds: u64,
}

/// List windowing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualizationConfig {
    /// Collections with at least this many items are virtualized (default: 50).
    #[serde(default = "default_threshold")]
    pub threshold: usize,
    /// Extra items rendered past each viewport edge (default: 5).
    #[serde(default = "default_overscan")]
    pub overscan: usize,
    /// Estimated item size in pixels before measurement (default: 72).
    #[serde(default = "default_estimate_size")]
    pub estimate_size: f64,
}

/// Toast queue settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Maximum toasts retained before the oldest is dropped (default: 16).
    #[serde(default = "default_toast_capacity")]
    pub capacity: usize,
}

fn default_base_url() -> String {
    "https://api.example.com".to_string()
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_request_timeout() -> u32 {
    10
}

fn default_poll_interval() -> u64 {
    30
}

fn default_threshold() -> usize {
    50
}

fn default_overscan() -> usize {
    5
}

fn default_estimate_size() -> f64 {
    72.0
}

fn default_toast_capacity() -> usize {
    16
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_seconds: default_connect_timeout(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            flash_sale_interval_seconds: default_poll_interval(),
            live_stream_interval_seconds: default_poll_interval(),
        }
    }
}

impl Default for VirtualizationConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            overscan: default_overscan(),
            estimate_size: default_estimate_size(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            capacity: default_toast_capacity(),
        }
    }
}

impl PollingConfig {
    pub fn flash_sale_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.flash_sale_interval_seconds)
    }

    pub fn live_stream_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.live_stream_interval_seconds)
    }
}
