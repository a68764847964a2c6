//! Model catalog loading
//!
//! The catalog document is read once at startup. A broken catalog is fatal:
//! duplicate identifiers or an unknown vendor key stop the process before any
//! request is served.

use parley_domain::{DomainError, ModelCatalog};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Catalog shipped with the binary
pub const DEFAULT_CATALOG: &str = include_str!("../../assets/model_catalog.json");

#[derive(Error, Debug)]
pub enum CatalogLoadError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog {origin}: {source}")]
    Invalid {
        origin: String,
        #[source]
        source: DomainError,
    },
}

/// Parse the built-in catalog
pub fn default_catalog() -> Result<ModelCatalog, CatalogLoadError> {
    ModelCatalog::from_json_str(DEFAULT_CATALOG).map_err(|source| CatalogLoadError::Invalid {
        origin: "(built-in)".to_string(),
        source,
    })
}

/// Read and validate a catalog document from disk
pub fn from_json_file(path: &Path) -> Result<ModelCatalog, CatalogLoadError> {
    let json = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog =
        ModelCatalog::from_json_str(&json).map_err(|source| CatalogLoadError::Invalid {
            origin: path.display().to_string(),
            source,
        })?;
    info!("Loaded model catalog from {}", path.display());
    Ok(catalog)
}

/// The catalog at `path`, or the built-in one
pub fn load_catalog(path: Option<&Path>) -> Result<ModelCatalog, CatalogLoadError> {
    match path {
        Some(path) => from_json_file(path),
        None => {
            debug!("Using built-in model catalog");
            default_catalog()
        }
    }
}
