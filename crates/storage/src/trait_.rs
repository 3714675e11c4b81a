//! Storage trait abstraction.

use std::sync::Arc;
use async_trait::async_trait;
use sprout_core::{CoreError, FullState, MilestoneCatalog};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Data model rejected the change
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// A change applied to the state inside [`Storage::update`].
///
/// Returning an error aborts the update and leaves the stored state as it was.
pub type StateMutation = Box<dyn FnOnce(&mut FullState) -> sprout_core::Result<()> + Send>;

/// Box a closure as a [`StateMutation`].
pub fn mutation<F>(f: F) -> StateMutation
where
    F: FnOnce(&mut FullState) -> sprout_core::Result<()> + Send + 'static,
{
    Box::new(f)
}

/// Persistence collaborator for the tracker.
///
/// Implementations must serialize [`update`](Storage::update) calls: the
/// load, mutation and save of one call may not interleave with another
/// writer. Concurrent updates to the same observation resolve as last write
/// wins, and updates to different observations are never lost. A save either
/// fully replaces the stored state or leaves it untouched.
#[async_trait]
pub trait Storage: Send + Sync {
    /// The milestone catalog. Immutable until [`reset`](Storage::reset).
    async fn load_catalog(&self) -> Result<Arc<MilestoneCatalog>>;

    /// Snapshot of the current state.
    async fn load(&self) -> Result<FullState>;

    /// Replace the whole state.
    async fn save(&self, state: &FullState) -> Result<()>;

    /// Load, mutate and save as one step. Returns the state after the change.
    async fn update(&self, mutation: StateMutation) -> Result<FullState>;

    /// Restore the configured catalog and an empty state.
    async fn reset(&self) -> Result<()>;
}
