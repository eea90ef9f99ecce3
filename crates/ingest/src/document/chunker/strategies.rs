//! Segmentation strategy cascade.
//!
//! Primary strategy is picked from the structural index (sections → lists →
//! tables → paragraphs); the driver then walks an explicit fallback ladder
//! (sentence packing, fixed-width slicing) while the result stays degenerate.

use std::collections::HashSet;

use tracing::warn;

use super::helpers::{
    char_len, normalize, pack_greedy, pack_sentences, postprocess, slice_fixed_width,
};
use super::structure::{analyze_structure, StructureIndex};
use super::types::{ChunkerConfig, SegmentationStrategy};

/// Segment raw text into structural chunks, reporting the strategy that
/// produced the final result. Never panics; an empty result is logged and
/// returned as-is.
pub fn segment_text(text: &str, config: &ChunkerConfig) -> (Vec<String>, SegmentationStrategy) {
    let normalized = normalize(text);
    let index = analyze_structure(&normalized);
    let primary = select_primary(&index);

    let ladder = [
        primary,
        SegmentationStrategy::Sentence,
        SegmentationStrategy::FixedWidth,
    ];

    let mut chunks = Vec::new();
    let mut chosen = primary;
    for strategy in ladder {
        chunks = postprocess(
            run_strategy(strategy, &normalized, &index, config),
            config.min_chunk_chars,
        );
        chosen = strategy;
        if !is_degenerate(&chunks, &normalized, config) {
            break;
        }
    }

    if chunks.is_empty() {
        warn!(
            strategy = %chosen,
            input_chars = char_len(&normalized),
            "segmentation produced no chunks"
        );
    }
    (chunks, chosen)
}

/// A result is degenerate when one chunk (or none) stands in for text that
/// is too large to be a single chunk.
fn is_degenerate(chunks: &[String], text: &str, config: &ChunkerConfig) -> bool {
    chunks.len() <= 1 && char_len(text) > config.max_chunk_chars
}

fn select_primary(index: &StructureIndex) -> SegmentationStrategy {
    if index.has_headings() {
        SegmentationStrategy::Section
    } else if index.has_list_items() {
        SegmentationStrategy::List
    } else if index.has_table_rows() {
        SegmentationStrategy::Table
    } else {
        SegmentationStrategy::Paragraph
    }
}

fn run_strategy(
    strategy: SegmentationStrategy,
    text: &str,
    index: &StructureIndex,
    config: &ChunkerConfig,
) -> Vec<String> {
    match strategy {
        SegmentationStrategy::Section => section_chunks(text, index, config),
        SegmentationStrategy::List => {
            transition_chunks(text, &index.list_items.iter().copied().collect(), config)
        }
        SegmentationStrategy::Table => {
            transition_chunks(text, &index.table_rows.iter().copied().collect(), config)
        }
        SegmentationStrategy::Paragraph => paragraph_chunks(text, config),
        SegmentationStrategy::Sentence => pack_sentences(text, config.max_chunk_chars),
        SegmentationStrategy::FixedWidth => {
            slice_fixed_width(text, config.target_chunk_chars, config.slice_backoff_fraction)
        }
    }
}

// ── Section strategy ────────────────────────────────────────────────────────

/// Split at heading lines; each section runs from its heading to the line
/// before the next. Content before the first heading becomes its own leading
/// chunk. Oversized sections are re-split by paragraph, then by sentence.
fn section_chunks(text: &str, index: &StructureIndex, config: &ChunkerConfig) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let mut boundaries: Vec<usize> = index.headings.iter().map(|h| h.line).collect();
    boundaries.push(lines.len());

    let mut sections = Vec::new();
    if let Some(&first) = boundaries.first() {
        if first > 0 {
            sections.push(lines[..first].join("\n"));
        }
    }
    for pair in boundaries.windows(2) {
        sections.push(lines[pair[0]..pair[1]].join("\n"));
    }

    let mut chunks = Vec::new();
    for section in sections {
        if char_len(&section) <= config.max_chunk_chars {
            chunks.push(section);
            continue;
        }
        let paras: Vec<String> = section
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        let pieces = pack_greedy(paras, config.max_chunk_chars, "\n\n");
        if pieces.len() > 1 {
            chunks.extend(pieces);
        } else {
            chunks.extend(pack_sentences(&section, config.max_chunk_chars));
        }
    }
    chunks
}

// ── List / table strategies ─────────────────────────────────────────────────

/// Partition lines into "member" runs (list items or table rows) and
/// non-member runs. A state transition flushes the current run when it meets
/// the minimum size.
fn transition_chunks(
    text: &str,
    members: &HashSet<usize>,
    config: &ChunkerConfig,
) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut in_run = false;

    let mut flush = |buf: &mut String, out: &mut Vec<String>| {
        let trimmed = buf.trim();
        if char_len(trimmed) >= config.min_chunk_chars {
            out.push(trimmed.to_string());
        }
        buf.clear();
    };

    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                current.push('\n');
            }
            continue;
        }
        let member = members.contains(&i);
        if member != in_run && !current.is_empty() {
            flush(&mut current, &mut chunks);
        }
        in_run = member;
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }
    flush(&mut current, &mut chunks);
    chunks
}

// ── Paragraph strategy ──────────────────────────────────────────────────────

/// Blank-line paragraphs first; when the document has no real paragraph
/// breaks (OCR/PDF-flattened text yields ≤2), fall back to regrouping
/// individual lines toward the target size. Results are greedily packed up
/// to the maximum.
fn paragraph_chunks(text: &str, config: &ChunkerConfig) -> Vec<String> {
    let paras: Vec<String> = text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    let pieces = if paras.len() <= 2 {
        regroup_lines(text, config.target_chunk_chars)
    } else {
        paras
    };
    pack_greedy(pieces, config.max_chunk_chars, "\n\n")
}

/// Treat every non-trivial line as a unit and greedily group consecutive
/// lines up to `target` characters.
fn regroup_lines(text: &str, target: usize) -> Vec<String> {
    let lines: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|l| char_len(l) >= 3)
        .map(str::to_string)
        .collect();
    pack_greedy(lines, target, "\n")
}
