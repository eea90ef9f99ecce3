use std::sync::Mutex;

use async_trait::async_trait;

use adcraft_core::ChunkRecord;

use super::{ChunkStore, StoreError};

/// In-memory chunk store for tests and dry runs.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ChunkRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ChunkRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ChunkStore for MemoryStore {
    async fn write_batch(&self, records: &[ChunkRecord]) -> Result<(), StoreError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Backend("memory store poisoned".to_string()))?;
        guard.extend_from_slice(records);
        Ok(())
    }
}
