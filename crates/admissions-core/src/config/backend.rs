//! REST backend connection configuration.

use serde::{Deserialize, Serialize};

/// Settings for reaching the admissions backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend, without the `/api` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Session cookie value issued by the backend after login.
    #[serde(default)]
    pub session_cookie: Option<String>,
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub session_cookie_name: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_seconds: default_request_timeout(),
            session_cookie: None,
            session_cookie_name: default_cookie_name(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_cookie_name() -> String {
    "session".to_string()
}
