//! JSON file storage implementation.
//!
//! Keeps the catalog and the full state as two JSON documents under the data
//! directory. Writes go to a temporary file that is renamed over the target,
//! and every write path holds one mutex so load-mutate-save cycles never
//! interleave.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use async_trait::async_trait;
use sprout_core::{FullState, MilestoneCatalog};
use tokio::fs;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use super::{Result, StateMutation, Storage, StorageConfig};

const STATE_FILE: &str = "state.json";
const CATALOG_FILE: &str = "catalog.json";

/// File-based JSON storage backend.
pub struct JsonStorage {
    config: StorageConfig,
    catalog: RwLock<Arc<MilestoneCatalog>>,
    write_lock: Mutex<()>,
}

impl JsonStorage {
    /// Open storage, creating the data directory, catalog and an empty state
    /// on first use.
    pub async fn new(config: StorageConfig) -> Result<Self> {
        fs::create_dir_all(&config.root).await?;

        let catalog_path = config.root.join(CATALOG_FILE);
        let catalog = match read_json::<MilestoneCatalog>(&catalog_path).await? {
            Some(catalog) => catalog,
            None => {
                let catalog = config.seed_catalog().await?;
                write_json(&catalog_path, &catalog).await?;
                info!("Initialized catalog at {}", catalog_path.display());
                catalog
            }
        };

        let state_path = config.root.join(STATE_FILE);
        if fs::metadata(&state_path).await.is_err() {
            write_json(&state_path, &FullState::new()).await?;
            info!("Initialized empty state at {}", state_path.display());
        }

        debug!("Loaded catalog with {} milestones", catalog.len());

        Ok(Self {
            config,
            catalog: RwLock::new(Arc::new(catalog)),
            write_lock: Mutex::new(()),
        })
    }

    /// Open storage at `root` with the built-in catalog as seed.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        Self::new(StorageConfig::new(root)).await
    }

    /// Data directory.
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    fn state_path(&self) -> PathBuf {
        self.config.root.join(STATE_FILE)
    }

    fn catalog_path(&self) -> PathBuf {
        self.config.root.join(CATALOG_FILE)
    }

    async fn read_state(&self) -> Result<FullState> {
        Ok(read_json(&self.state_path()).await?.unwrap_or_default())
    }
}

#[async_trait]
impl Storage for JsonStorage {
    async fn load_catalog(&self) -> Result<Arc<MilestoneCatalog>> {
        Ok(self.catalog.read().await.clone())
    }

    async fn load(&self) -> Result<FullState> {
        self.read_state().await
    }

    async fn save(&self, state: &FullState) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        write_json(&self.state_path(), state).await?;
        debug!("Saved state with {} observations", state.tracking_data.len());
        Ok(())
    }

    async fn update(&self, mutation: StateMutation) -> Result<FullState> {
        let _guard = self.write_lock.lock().await;
        let mut state = self.read_state().await?;
        mutation(&mut state)?;
        write_json(&self.state_path(), &state).await?;
        debug!("Updated state, {} observations", state.tracking_data.len());
        Ok(state)
    }

    async fn reset(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let catalog = self.config.seed_catalog().await?;
        write_json(&self.catalog_path(), &catalog).await?;
        write_json(&self.state_path(), &FullState::new()).await?;
        *self.catalog.write().await = Arc::new(catalog);
        info!("Reset storage at {}", self.config.root.display());
        Ok(())
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json.as_bytes()).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}
