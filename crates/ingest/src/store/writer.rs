use std::sync::Arc;

use tracing::debug;

use adcraft_core::ChunkRecord;

use super::{ChunkStore, StoreError};
use crate::pipeline::CancelFlag;

/// Why a persistence run stopped early. Both variants carry the number of
/// records already committed — partial writes are surfaced, never rolled
/// back here.
#[derive(Debug)]
pub enum WriteRunError {
    Cancelled { stored: usize },
    Failed { stored: usize, source: StoreError },
}

/// Writes chunk records in fixed-size sequential batches; the first failed
/// batch aborts the remainder.
pub struct BatchWriter {
    store: Arc<dyn ChunkStore>,
    batch_size: usize,
}

impl BatchWriter {
    pub fn new(store: Arc<dyn ChunkStore>, batch_size: usize) -> Self {
        Self {
            store,
            batch_size: batch_size.max(1),
        }
    }

    /// Returns the number of records stored (always `records.len()` on
    /// success).
    pub async fn write_all(
        &self,
        records: &[ChunkRecord],
        cancel: &CancelFlag,
    ) -> Result<usize, WriteRunError> {
        let mut stored = 0usize;

        for (batch_index, batch) in records.chunks(self.batch_size).enumerate() {
            if cancel.is_cancelled() {
                return Err(WriteRunError::Cancelled { stored });
            }
            self.store
                .write_batch(batch)
                .await
                .map_err(|source| WriteRunError::Failed { stored, source })?;
            stored += batch.len();
            debug!(batch_index, size = batch.len(), "store batch committed");
        }
        Ok(stored)
    }
}
