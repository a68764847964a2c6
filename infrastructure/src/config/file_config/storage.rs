//! Conversation storage from TOML (`[storage]` section)

use crate::config::validation::{ConfigIssue, ConfigIssueCode, Severity};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local; conversations are lost on exit
    Memory,
    /// One JSON file per conversation under `dir`
    File,
}

/// ```toml
/// [storage]
/// backend = "file"                          # "memory" or "file"
/// dir = "~/.local/share/parley/conversations"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    pub backend: String,
    pub dir: Option<PathBuf>,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            backend: "file".to_string(),
            dir: None,
        }
    }
}

impl FileStorageConfig {
    /// Parse `backend`, falling back to the file backend with a warning.
    pub fn parse_backend(&self) -> (StorageBackend, Vec<ConfigIssue>) {
        match self.backend.trim().to_lowercase().as_str() {
            "memory" => (StorageBackend::Memory, vec![]),
            "file" => (StorageBackend::File, vec![]),
            _ => {
                let issue = ConfigIssue {
                    severity: Severity::Warning,
                    code: ConfigIssueCode::InvalidEnumValue {
                        field: "storage.backend".to_string(),
                        value: self.backend.clone(),
                        valid_values: vec!["memory".to_string(), "file".to_string()],
                    },
                    message: format!(
                        "storage.backend: unknown value '{}', falling back to 'file'",
                        self.backend
                    ),
                };
                (StorageBackend::File, vec![issue])
            }
        }
    }

    /// `dir`, or `<data dir>/parley/conversations`
    pub fn resolve_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("parley")
                .join("conversations")
        })
    }
}
