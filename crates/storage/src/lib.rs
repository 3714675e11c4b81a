//! Storage abstraction and implementations for Sprout.
//!
//! This crate provides the persistence collaborator: a trait with a single
//! read-modify-write seam, a JSON file backend and an in-memory backend.

#![warn(missing_docs)]

pub mod config;
pub mod json_storage;
pub mod memory;
pub mod trait_;

pub use config::StorageConfig;
pub use json_storage::JsonStorage;
pub use memory::MemoryStorage;
pub use trait_::{mutation, Result, StateMutation, Storage, StorageError};
