//! Catalog location (`[catalog]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ```toml
/// [catalog]
/// path = "~/.config/parley/models.json"   # omit to use the built-in catalog
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCatalogConfig {
    pub path: Option<PathBuf>,
}
