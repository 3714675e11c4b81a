//! Storage configuration.

use std::path::{Path, PathBuf};
use sprout_core::MilestoneCatalog;
use super::Result;

/// Where data lives and which catalog seeds it.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Data directory
    pub root: PathBuf,

    /// Catalog file used on first init and on reset. The built-in catalog
    /// is used when unset.
    pub catalog_source: Option<PathBuf>,
}

impl StorageConfig {
    /// Config rooted at `root` with the built-in catalog.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            catalog_source: None,
        }
    }

    /// Seed from a catalog file instead of the built-in one.
    pub fn with_catalog(mut self, path: impl AsRef<Path>) -> Self {
        self.catalog_source = Some(path.as_ref().to_path_buf());
        self
    }

    /// Read and validate the seed catalog.
    pub async fn seed_catalog(&self) -> Result<MilestoneCatalog> {
        match &self.catalog_source {
            Some(path) => {
                let json = tokio::fs::read_to_string(path).await?;
                Ok(MilestoneCatalog::from_json(&json)?)
            }
            None => Ok(MilestoneCatalog::builtin()?),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(".sprout")
    }
}
