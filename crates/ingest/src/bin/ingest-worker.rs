//! ingest-worker — chunk one client document and store retrieval records.
//!
//! Reads a text file (extraction happens upstream), runs the chunking and
//! classification engine, and either prints the result (`--dry-run`) or
//! embeds and appends chunk records to the configured JSONL store.

use std::sync::Arc;

use clap::Parser;
use tracing::info;
use uuid::Uuid;

use adcraft_core::config::{load_dotenv, Config};
use adcraft_ingest::embedding::OpenAiEmbedder;
use adcraft_ingest::pipeline::{CancelFlag, IngestRequest, Pipeline};
use adcraft_ingest::store::JsonlStore;

// ── CLI ─────────────────────────────────────────────────────────────

/// Chunk a client document into atomic facts and narrative passages.
#[derive(Parser, Debug)]
#[command(name = "ingest-worker", version, about)]
struct Cli {
    /// Path to the extracted document text.
    #[arg(long)]
    file: String,

    /// Community/property name; detected from the text when omitted.
    #[arg(long)]
    community: Option<String>,

    /// Document category: analytics-report, brand-asset, property-profile.
    #[arg(long, env = "INGEST_CATEGORY", default_value = "property-profile")]
    category: String,

    /// Chunk and print, skipping embedding and storage.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Override the configured output path for chunk records.
    #[arg(long)]
    out: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    load_dotenv();
    let config = Config::from_env();
    config.log_summary();

    let cli = Cli::parse();
    let raw_text = std::fs::read_to_string(&cli.file)?;

    let request = IngestRequest::parse(
        raw_text,
        cli.community.clone(),
        &cli.category,
        Uuid::new_v4(),
        Uuid::new_v4(),
    )?;

    if cli.dry_run {
        // A dry run never needs the embedder; a placeholder store keeps the
        // pipeline shape without touching disk.
        let store = Arc::new(adcraft_ingest::store::MemoryStore::new());
        let embedder = Arc::new(NoopEmbedder);
        let pipeline = Pipeline::new(embedder, store).with_config(&config);

        let (chunks, stats) = pipeline.chunk_only(&request)?;
        for chunk in &chunks {
            println!("{}", serde_json::to_string(chunk)?);
        }
        info!(
            count = stats.count,
            min = stats.min_chars,
            max = stats.max_chars,
            avg = stats.avg_chars,
            "dry run complete"
        );
        return Ok(());
    }

    let embedder = OpenAiEmbedder::from_config(&config.embedding)
        .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY is not configured"))?;
    let out_path = cli
        .out
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| config.storage.out_path.clone());
    let store = Arc::new(JsonlStore::new(&out_path));

    let pipeline = Pipeline::new(Arc::new(embedder), store).with_config(&config);
    let summary = pipeline.run(&request, &CancelFlag::new()).await?;

    info!(
        chunks_stored = summary.chunks_stored,
        community = %summary.community_name,
        category = %summary.category,
        out = %out_path.display(),
        "ingest complete"
    );
    Ok(())
}

/// Stand-in embedder for dry runs; the pipeline never calls it.
struct NoopEmbedder;

#[async_trait::async_trait]
impl adcraft_ingest::embedding::Embedder for NoopEmbedder {
    async fn embed_batch(
        &self,
        texts: &[&str],
    ) -> Result<Vec<Vec<f32>>, adcraft_ingest::embedding::EmbeddingError> {
        Ok(texts.iter().map(|_| Vec::new()).collect())
    }

    fn dimensions(&self) -> usize {
        0
    }
}
