//! Remote item gateway configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where a client finds the item API and who it acts as.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the DiagramHub server, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Owner identity sent with every request.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl GatewayConfig {
    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_id: None,
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}
