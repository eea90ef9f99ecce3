use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::traits::{Embedder, EmbeddingError};
use crate::pipeline::CancelFlag;

/// A failed embedding batch, with how far the run got before it.
#[derive(Debug, thiserror::Error)]
#[error("embedding batch {batch_index} failed after {embedded} chunks: {source}")]
pub struct BatchFailure {
    pub batch_index: usize,
    pub embedded: usize,
    #[source]
    pub source: EmbeddingError,
}

/// Why an embedding run stopped early.
#[derive(Debug)]
pub enum EmbedRunError {
    /// The caller's cancel flag was raised between batches.
    Cancelled { embedded: usize },
    /// A batch failed; nothing after it was attempted.
    Failed(BatchFailure),
}

/// Walks an ordered content list in fixed-size batches against an embedding
/// backend, pausing between batches to respect provider rate limits.
///
/// Vectors are paired back to their texts strictly by batch-relative index;
/// a batch whose response length differs from its input length is fatal.
pub struct EmbeddingBatcher {
    embedder: Arc<dyn Embedder>,
    batch_size: usize,
    batch_delay: Duration,
}

impl EmbeddingBatcher {
    pub fn new(embedder: Arc<dyn Embedder>, batch_size: usize, batch_delay: Duration) -> Self {
        Self {
            embedder,
            batch_size: batch_size.max(1),
            batch_delay,
        }
    }

    /// Embed every text, in order. Batches are sequential — one in flight at
    /// a time — and the run stops at the first failure or raised cancel flag.
    pub async fn embed_all(
        &self,
        texts: &[String],
        cancel: &CancelFlag,
    ) -> Result<Vec<Vec<f32>>, EmbedRunError> {
        let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(texts.len());

        for (batch_index, batch) in texts.chunks(self.batch_size).enumerate() {
            if cancel.is_cancelled() {
                return Err(EmbedRunError::Cancelled {
                    embedded: vectors.len(),
                });
            }
            if batch_index > 0 && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }

            let refs: Vec<&str> = batch.iter().map(String::as_str).collect();
            let embedded = self.embedder.embed_batch(&refs).await.map_err(|source| {
                EmbedRunError::Failed(BatchFailure {
                    batch_index,
                    embedded: vectors.len(),
                    source,
                })
            })?;

            if embedded.len() != batch.len() {
                return Err(EmbedRunError::Failed(BatchFailure {
                    batch_index,
                    embedded: vectors.len(),
                    source: EmbeddingError::BatchMismatch {
                        sent: batch.len(),
                        received: embedded.len(),
                    },
                }));
            }

            debug!(batch_index, size = batch.len(), "embedding batch complete");
            vectors.extend(embedded);
        }
        Ok(vectors)
    }

    /// Number of batches a run over `count` texts will issue.
    pub fn batch_count(&self, count: usize) -> usize {
        count.div_ceil(self.batch_size)
    }
}
