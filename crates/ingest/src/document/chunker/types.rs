//! Chunker configuration and error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

// ── Configuration ───────────────────────────────────────────────────────────

/// Tuning thresholds for the chunking engine.
///
/// Every hard bound the engine enforces is a named field here, so callers can
/// tighten or relax behavior without touching strategy code.
#[derive(Debug, Clone)]
pub struct ChunkerConfig {
    /// Maximum characters per structural chunk (default: 1500).
    pub max_chunk_chars: usize,
    /// Greedy packing target for regrouped lines and fixed-width slices
    /// (default: 800).
    pub target_chunk_chars: usize,
    /// Minimum characters for a structural chunk to survive post-processing
    /// (default: 60).
    pub min_chunk_chars: usize,
    /// Inclusive length bounds for atomic fact snippets (default: 8..=90).
    pub atomic_min_chars: usize,
    pub atomic_max_chars: usize,
    /// Hard floor for narrative chunks (default: 400).
    pub narrative_min_chars: usize,
    /// Soft cap the narrative assembler packs toward (default: 800).
    pub narrative_target_chars: usize,
    /// Narrative segments longer than this are force-split before assembly
    /// (default: 1000).
    pub narrative_segment_cap: usize,
    /// A lone narrative chunk longer than this is re-split by sentence
    /// packing (default: 1200).
    pub narrative_overflow_chars: usize,
    /// Flush the running narrative chunk when the topical focus set changes.
    /// On topically noisy input this can over-split; disable to bound chunks
    /// by size alone (default: true).
    pub split_on_focus_change: bool,
    /// Fraction of a fixed-width slice searched backwards for a space, to
    /// avoid mid-word cuts (default: 0.2).
    pub slice_backoff_fraction: f64,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: 1500,
            target_chunk_chars: 800,
            min_chunk_chars: 60,
            atomic_min_chars: 8,
            atomic_max_chars: 90,
            narrative_min_chars: 400,
            narrative_target_chars: 800,
            narrative_segment_cap: 1000,
            narrative_overflow_chars: 1200,
            split_on_focus_change: true,
            slice_backoff_fraction: 0.2,
        }
    }
}

// ── Strategy tag ────────────────────────────────────────────────────────────

/// Which segmentation strategy produced a structural chunk list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentationStrategy {
    Section,
    List,
    Table,
    Paragraph,
    Sentence,
    FixedWidth,
}

impl std::fmt::Display for SegmentationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentationStrategy::Section => write!(f, "section"),
            SegmentationStrategy::List => write!(f, "list"),
            SegmentationStrategy::Table => write!(f, "table"),
            SegmentationStrategy::Paragraph => write!(f, "paragraph"),
            SegmentationStrategy::Sentence => write!(f, "sentence"),
            SegmentationStrategy::FixedWidth => write!(f, "fixed_width"),
        }
    }
}
