//! Editor configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Editor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Idle time after the last edit before content is saved.
    #[serde(default = "default_autosave_delay")]
    pub autosave_delay_ms: u64,
}

impl EditorConfig {
    /// The auto-save idle window as a [`Duration`].
    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_delay_ms: default_autosave_delay(),
        }
    }
}

fn default_autosave_delay() -> u64 {
    1000
}
