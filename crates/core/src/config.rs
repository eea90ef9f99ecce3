use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_usize(key: &str, default: usize) -> usize {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub embedding: EmbeddingConfig,
    pub storage: StorageConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            embedding: EmbeddingConfig::from_env(),
            storage: StorageConfig::from_env(),
        }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  embedding: model={}, dimensions={}, batch_size={}, batch_delay_ms={}",
            self.embedding.model,
            self.embedding.dimensions,
            self.embedding.batch_size,
            self.embedding.batch_delay_ms,
        );
        tracing::info!(
            "  storage:   out_path={}, write_batch_size={}",
            self.storage.out_path.display(),
            self.storage.write_batch_size,
        );
    }
}

// ── Embedding ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: Option<String>,
    pub dimensions: usize,
    /// Texts per embedding request.
    pub batch_size: usize,
    /// Pause between embedding batches, to respect provider rate limits.
    pub batch_delay_ms: u64,
}

impl EmbeddingConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env_opt("OPENAI_API_KEY"),
            model: env_or("EMBEDDING_MODEL", "text-embedding-3-small"),
            base_url: env_opt("EMBEDDING_BASE_URL"),
            dimensions: env_usize("EMBEDDING_DIMENSIONS", 1536),
            batch_size: env_usize("EMBEDDING_BATCH_SIZE", 50),
            batch_delay_ms: env_u64("EMBEDDING_BATCH_DELAY_MS", 200),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

// ── Storage ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Destination for chunk records written by the worker binary.
    pub out_path: PathBuf,
    /// Records per storage write.
    pub write_batch_size: usize,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            out_path: PathBuf::from(env_or("CHUNK_OUT_PATH", "data/chunks.jsonl")),
            write_batch_size: env_usize("STORE_WRITE_BATCH_SIZE", 25),
        }
    }
}
