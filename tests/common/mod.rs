//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_api;

use creator_sync::api::ApiClient;
use creator_sync::config::ApiConfig;
use creator_sync::notify::ToastQueue;
use creator_sync::session::{Session, User};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub use mock_api::{CapturedRequest, MockApi, MockResponse};

pub fn user(id: &str) -> User {
    User {
        id: id.to_string(),
        display_name: id.to_uppercase(),
    }
}

pub fn signed_in(id: &str) -> Session {
    Session::authenticated(user(id), format!("token-{}", id))
}

/// API client pointed at the mock server.
pub fn client(mock: &MockApi, session: Session) -> Arc<ApiClient> {
    let config = ApiConfig {
        base_url: mock.base_url(),
        connect_timeout_seconds: 2,
        request_timeout_seconds: 2,
    };
    Arc::new(ApiClient::new(&config, session).expect("Failed to build client"))
}

pub fn toasts() -> Arc<ToastQueue> {
    Arc::new(ToastQueue::new(16))
}

/// Write a config file into a fresh temp dir.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

/// Poll `check` until it holds or `timeout` elapses.
pub async fn wait_until(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
