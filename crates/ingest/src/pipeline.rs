//! Ingestion pipeline driver.
//!
//! Validate → chunk → embed → persist. The chunking stage is pure and
//! synchronous; only the embedding and storage batches suspend, and they run
//! strictly one at a time. Every failure past validation carries how much
//! partial progress was made.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use adcraft_core::{
    Chunk, ChunkRecord, ChunkStats, Config, DocumentCategory, DocumentId, SourceId,
};

use crate::document::chunker::{chunk_document, ChunkerConfig};
use crate::embedding::batcher::{EmbedRunError, EmbeddingBatcher};
use crate::embedding::{Embedder, EmbeddingError};
use crate::store::{BatchWriter, ChunkStore, StoreError, WriteRunError};

/// Cooperative cancellation shared between the caller and a running
/// pipeline. Raised flags stop the run at the next batch boundary; committed
/// batches stay committed.
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ── Request / response shapes ───────────────────────────────────────────────

/// One ingestion call: a raw text blob plus its identifiers.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    pub raw_text: String,
    pub community_name: Option<String>,
    pub category: DocumentCategory,
    pub document_id: DocumentId,
    pub source_id: SourceId,
}

impl IngestRequest {
    /// Parse and validate the raw request edge: non-empty text and a
    /// recognized category, rejected before any chunking work.
    pub fn parse(
        raw_text: impl Into<String>,
        community_name: Option<String>,
        category: &str,
        document_id: DocumentId,
        source_id: SourceId,
    ) -> Result<Self, IngestError> {
        let raw_text = raw_text.into();
        if raw_text.trim().is_empty() {
            return Err(IngestError::EmptyInput);
        }
        let category = category
            .parse::<DocumentCategory>()
            .map_err(IngestError::UnknownCategory)?;
        Ok(Self {
            raw_text,
            community_name,
            category,
            document_id,
            source_id,
        })
    }

    fn validate(&self) -> Result<(), IngestError> {
        if self.raw_text.trim().is_empty() {
            return Err(IngestError::EmptyInput);
        }
        Ok(())
    }
}

/// What a successful run looked like, for observability.
#[derive(Debug, Clone)]
pub struct IngestSummary {
    pub community_name: String,
    pub category: DocumentCategory,
    pub stats: ChunkStats,
    pub chunks_stored: usize,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("raw_text must not be empty")]
    EmptyInput,

    #[error("{0}")]
    UnknownCategory(String),

    #[error("no chunks could be produced from the document")]
    NoChunks,

    #[error("embedding batch {batch_index} failed after {chunks_embedded} chunks: {source}")]
    Embedding {
        batch_index: usize,
        chunks_embedded: usize,
        source: EmbeddingError,
    },

    #[error("storage write failed after {chunks_stored} chunks stored: {source}")]
    Store {
        chunks_stored: usize,
        source: StoreError,
    },

    #[error("cancelled after {chunks_embedded} chunks embedded, {chunks_stored} stored")]
    Cancelled {
        chunks_embedded: usize,
        chunks_stored: usize,
    },
}

// ── Driver ──────────────────────────────────────────────────────────────────

pub struct Pipeline {
    chunker: ChunkerConfig,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn ChunkStore>,
    embed_batch_size: usize,
    embed_batch_delay: Duration,
    write_batch_size: usize,
}

impl Pipeline {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn ChunkStore>) -> Self {
        Self {
            chunker: ChunkerConfig::default(),
            embedder,
            store,
            embed_batch_size: 50,
            embed_batch_delay: Duration::from_millis(200),
            write_batch_size: 25,
        }
    }

    /// Apply batch sizing and cadence from the environment-backed config.
    pub fn with_config(mut self, config: &Config) -> Self {
        self.embed_batch_size = config.embedding.batch_size;
        self.embed_batch_delay = Duration::from_millis(config.embedding.batch_delay_ms);
        self.write_batch_size = config.storage.write_batch_size;
        self
    }

    pub fn with_chunker_config(mut self, chunker: ChunkerConfig) -> Self {
        self.chunker = chunker;
        self
    }

    /// The pure stage alone: chunk and summarize without touching the
    /// embedding or storage collaborators.
    pub fn chunk_only(&self, request: &IngestRequest) -> Result<(Vec<Chunk>, ChunkStats), IngestError> {
        request.validate()?;
        let chunks = chunk_document(
            &request.raw_text,
            request.community_name.as_deref(),
            &self.chunker,
        );
        if chunks.is_empty() {
            return Err(IngestError::NoChunks);
        }
        let stats = ChunkStats::from_chunks(&chunks);
        info!(
            count = stats.count,
            min = stats.min_chars,
            max = stats.max_chars,
            avg = stats.avg_chars,
            category = %request.category,
            "chunking complete"
        );
        Ok((chunks, stats))
    }

    /// Full run: chunk, embed in order, pair vectors by index, persist.
    pub async fn run(
        &self,
        request: &IngestRequest,
        cancel: &CancelFlag,
    ) -> Result<IngestSummary, IngestError> {
        let (chunks, stats) = self.chunk_only(request)?;
        let community_name = chunks[0].community_name.clone();

        let contents: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let batcher = EmbeddingBatcher::new(
            self.embedder.clone(),
            self.embed_batch_size,
            self.embed_batch_delay,
        );
        let vectors = batcher
            .embed_all(&contents, cancel)
            .await
            .map_err(|e| match e {
                EmbedRunError::Cancelled { embedded } => IngestError::Cancelled {
                    chunks_embedded: embedded,
                    chunks_stored: 0,
                },
                EmbedRunError::Failed(failure) => IngestError::Embedding {
                    batch_index: failure.batch_index,
                    chunks_embedded: failure.embedded,
                    source: failure.source,
                },
            })?;
        info!(
            batches = batcher.batch_count(contents.len()),
            vectors = vectors.len(),
            "embedding complete"
        );

        let records: Vec<ChunkRecord> = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, embedding)| ChunkRecord {
                chunk,
                embedding,
                document_id: request.document_id,
                source_id: request.source_id,
            })
            .collect();

        let writer = BatchWriter::new(self.store.clone(), self.write_batch_size);
        let chunks_stored = writer.write_all(&records, cancel).await.map_err(|e| match e {
            WriteRunError::Cancelled { stored } => IngestError::Cancelled {
                chunks_embedded: records.len(),
                chunks_stored: stored,
            },
            WriteRunError::Failed { stored, source } => IngestError::Store {
                chunks_stored: stored,
                source,
            },
        })?;
        info!(chunks_stored, community = %community_name, "persistence complete");

        Ok(IngestSummary {
            community_name,
            category: request.category,
            stats,
            chunks_stored,
        })
    }
}
