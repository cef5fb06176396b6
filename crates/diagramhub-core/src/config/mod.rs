//! Application configuration schemas.
//!
//! All sections deserialize from TOML through the `config` crate and carry
//! serde defaults, so an empty configuration is a valid one.

pub mod app;
pub mod cache;
pub mod editor;
pub mod gateway;
pub mod logging;
pub mod workspace;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::cache::CacheConfig;
pub use self::editor::EditorConfig;
pub use self::gateway::GatewayConfig;
pub use self::logging::LoggingConfig;
pub use self::workspace::WorkspaceConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Naming and URL conventions of the item tree.
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    /// Editor behaviour.
    #[serde(default)]
    pub editor: EditorConfig,
    /// Client-side content cache.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Remote item gateway used by clients.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default`, the `config/{env}` overlay, and environment
    /// variables prefixed with `DIAGRAMHUB__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("DIAGRAMHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.workspace.file_extension, ".mmd");
        assert_eq!(cfg.workspace.default_file_name, "Untitled");
        assert_eq!(cfg.editor.autosave_delay_ms, 1000);
        assert_eq!(cfg.server.port, 3000);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let cfg: AppConfig =
            serde_json::from_str(r#"{"workspace": {"file_extension": ".diagram"}}"#).unwrap();
        assert_eq!(cfg.workspace.file_extension, ".diagram");
        assert_eq!(cfg.workspace.url_prefix, "/files");
    }
}
