//! Item naming and URL conventions.

use serde::{Deserialize, Serialize};

/// Workspace conventions shared by the store, the cache, and the tree codec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Extension every file name carries, including the leading dot.
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
    /// Placeholder name for a freshly created file.
    #[serde(default = "default_file_name")]
    pub default_file_name: String,
    /// Placeholder name for a freshly created folder.
    #[serde(default = "default_folder_name")]
    pub default_folder_name: String,
    /// Prefix of file page URLs.
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            file_extension: default_file_extension(),
            default_file_name: default_file_name(),
            default_folder_name: default_folder_name(),
            url_prefix: default_url_prefix(),
        }
    }
}

fn default_file_extension() -> String {
    ".mmd".to_string()
}

fn default_file_name() -> String {
    "Untitled".to_string()
}

fn default_folder_name() -> String {
    "New Folder".to_string()
}

fn default_url_prefix() -> String {
    "/files".to_string()
}
