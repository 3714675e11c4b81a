//! In-memory storage, for tests and embedding.

use std::sync::Arc;
use async_trait::async_trait;
use sprout_core::{FullState, MilestoneCatalog};
use tokio::sync::Mutex;
use super::{Result, StateMutation, Storage};

/// Storage that keeps the state in process memory.
pub struct MemoryStorage {
    seed: Arc<MilestoneCatalog>,
    state: Mutex<FullState>,
}

impl MemoryStorage {
    /// Create storage over `catalog` with an empty state.
    pub fn new(catalog: MilestoneCatalog) -> Self {
        Self::with_state(catalog, FullState::new())
    }

    /// Create storage over `catalog` starting from `state`.
    pub fn with_state(catalog: MilestoneCatalog, state: FullState) -> Self {
        Self {
            seed: Arc::new(catalog),
            state: Mutex::new(state),
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn load_catalog(&self) -> Result<Arc<MilestoneCatalog>> {
        Ok(self.seed.clone())
    }

    async fn load(&self) -> Result<FullState> {
        Ok(self.state.lock().await.clone())
    }

    async fn save(&self, state: &FullState) -> Result<()> {
        *self.state.lock().await = state.clone();
        Ok(())
    }

    async fn update(&self, mutation: StateMutation) -> Result<FullState> {
        let mut guard = self.state.lock().await;
        let mut next = guard.clone();
        mutation(&mut next)?;
        *guard = next.clone();
        Ok(next)
    }

    async fn reset(&self) -> Result<()> {
        *self.state.lock().await = FullState::new();
        Ok(())
    }
}
