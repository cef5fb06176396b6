//! Content cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Sizing of the client-side file content cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached file contents.
    #[serde(default = "default_max_capacity")]
    pub content_max_capacity: u64,
    /// Time-to-live of a cached content entry, in seconds.
    #[serde(default = "default_ttl")]
    pub content_ttl_seconds: u64,
}

impl CacheConfig {
    /// TTL as a [`Duration`].
    pub fn content_ttl(&self) -> Duration {
        Duration::from_secs(self.content_ttl_seconds)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            content_max_capacity: default_max_capacity(),
            content_ttl_seconds: default_ttl(),
        }
    }
}

fn default_max_capacity() -> u64 {
    256
}

fn default_ttl() -> u64 {
    300
}
