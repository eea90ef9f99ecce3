//! Chunk record persistence boundary.
//!
//! Storage is an opaque external collaborator: the trait takes ready-made
//! record batches and either commits them or fails the call. Replacement
//! semantics (per-document cleanup, upserts) belong to the backend.

mod jsonl;
mod memory;
mod writer;

use async_trait::async_trait;
use thiserror::Error;

use adcraft_core::ChunkRecord;

pub use jsonl::JsonlStore;
pub use memory::MemoryStore;
pub use writer::{BatchWriter, WriteRunError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Backend(String),
}

/// Trait for chunk-record sinks (files, databases, vector stores).
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Persist one batch atomically-enough for the backend. Order within the
    /// batch must be preserved.
    async fn write_batch(&self, records: &[ChunkRecord]) -> Result<(), StoreError>;
}
