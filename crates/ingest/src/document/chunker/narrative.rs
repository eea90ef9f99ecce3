//! Narrative passage assembly.
//!
//! Segments the raw text (paragraphs → form fields → sentences), scores each
//! segment's topical focus, and packs segments into 400–800 character chunks.
//! A focus change or the size cap closes the running chunk; the 400-char
//! floor is never violated — a terminal remainder below it is dropped.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use adcraft_core::{CampaignFocus, Chunk, ChunkMetadata, NarrativeSubtype};
use regex::Regex;

use super::helpers::{char_len, pack_sentences, split_sentences};
use super::patterns::{
    FOCUS_KEYWORDS, NARRATIVE_AMENITY_KEYWORDS, NARRATIVE_LIFESTYLE_KEYWORDS,
    NARRATIVE_LOCATION_KEYWORDS,
};
use super::types::{ChunkError, ChunkerConfig};

/// `Label: value` lines common to pasted intake forms.
static FORM_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[A-Za-z][\w /&-]{0,39}:\s").unwrap());

/// Build narrative chunks from `text`. Returns an empty list (not an error)
/// when nothing meets the floor.
pub fn build_narrative_chunks(
    text: &str,
    community_name: &str,
    config: &ChunkerConfig,
) -> Result<Vec<Chunk>, ChunkError> {
    let segments = segment_for_narrative(text, config);
    let mut chunks = assemble(segments, community_name, config);

    // A single oversized chunk means the whole document collapsed into one
    // passage; re-split it and re-derive taxonomy per piece.
    if chunks.len() == 1 && chunks[0].char_count > config.narrative_overflow_chars {
        let content = chunks.remove(0).content;
        chunks = pack_sentences(&content, config.narrative_target_chars)
            .into_iter()
            .filter(|piece| char_len(piece) >= config.narrative_min_chars)
            .map(|piece| {
                let focus = focus_of(&piece);
                let subtype = classify_subtype(&piece);
                Chunk::new(
                    piece,
                    ChunkMetadata::Narrative {
                        subtype,
                        campaign_focus: focus,
                    },
                    community_name,
                )
            })
            .collect();
    }

    Ok(chunks)
}

// ── Segmentation cascade ────────────────────────────────────────────────────

/// First splitter producing more than two segments wins: blank-line
/// paragraphs, form-field headings, sentences. Oversized segments are then
/// force-split alone.
fn segment_for_narrative(text: &str, config: &ChunkerConfig) -> Vec<String> {
    let paragraphs: Vec<String> = text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    let segments = if paragraphs.len() > 2 {
        paragraphs
    } else {
        let fields = split_form_fields(text);
        if fields.len() > 2 {
            fields
        } else {
            split_sentences(text)
        }
    };

    segments
        .into_iter()
        .flat_map(|seg| {
            if char_len(&seg) > config.narrative_segment_cap {
                pack_sentences(&seg, config.narrative_target_chars)
            } else {
                vec![seg]
            }
        })
        .collect()
}

/// Split before each `Label:` line, keeping the label with its value.
fn split_form_fields(text: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if FORM_FIELD.is_match(line) && !current.trim().is_empty() {
            fields.push(current.trim().to_string());
            current.clear();
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }
    if !current.trim().is_empty() {
        fields.push(current.trim().to_string());
    }
    fields
}

// ── Assembly ────────────────────────────────────────────────────────────────

fn assemble(segments: Vec<String>, community_name: &str, config: &ChunkerConfig) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_focus: BTreeSet<CampaignFocus> = BTreeSet::new();

    for segment in segments {
        let segment_focus = focus_of(&segment);
        if current.is_empty() {
            current = segment;
            current_focus = segment_focus;
            continue;
        }

        let would_overflow =
            char_len(&current) + 1 + char_len(&segment) > config.narrative_target_chars;
        let focus_changed = config.split_on_focus_change && segment_focus != current_focus;

        if (would_overflow || focus_changed) && char_len(&current) >= config.narrative_min_chars {
            flush(&mut current, &mut current_focus, community_name, &mut chunks);
            current = segment;
            current_focus = segment_focus;
        } else {
            // Below the floor the boundary is ignored: keep accumulating and
            // widen the focus set.
            current.push(' ');
            current.push_str(&segment);
            current_focus.extend(segment_focus);
        }
    }

    if char_len(&current) >= config.narrative_min_chars {
        flush(&mut current, &mut current_focus, community_name, &mut chunks);
    }
    chunks
}

fn flush(
    current: &mut String,
    current_focus: &mut BTreeSet<CampaignFocus>,
    community_name: &str,
    chunks: &mut Vec<Chunk>,
) {
    let content = std::mem::take(current);
    let mut focus = std::mem::take(current_focus);
    if focus.is_empty() {
        focus.insert(CampaignFocus::Lifestyle);
    }
    // Subtype comes from the chunk's own text, not from the focus set.
    let subtype = classify_subtype(&content);
    chunks.push(Chunk::new(
        content,
        ChunkMetadata::Narrative {
            subtype,
            campaign_focus: focus,
        },
        community_name,
    ));
}

// ── Classification ──────────────────────────────────────────────────────────

/// Keyword scoring across the five focus categories. A segment may match
/// several; zero matches defaults to lifestyle.
fn focus_of(text: &str) -> BTreeSet<CampaignFocus> {
    let lower = text.to_lowercase();
    let mut focus: BTreeSet<CampaignFocus> = FOCUS_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(f, _)| *f)
        .collect();
    if focus.is_empty() {
        focus.insert(CampaignFocus::Lifestyle);
    }
    focus
}

/// Amenities → location → lifestyle keyword clusters, in that priority;
/// Community when none match.
fn classify_subtype(text: &str) -> NarrativeSubtype {
    let lower = text.to_lowercase();
    let hit = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    if hit(NARRATIVE_AMENITY_KEYWORDS) {
        NarrativeSubtype::Amenities
    } else if hit(NARRATIVE_LOCATION_KEYWORDS) {
        NarrativeSubtype::Location
    } else if hit(NARRATIVE_LIFESTYLE_KEYWORDS) {
        NarrativeSubtype::Lifestyle
    } else {
        NarrativeSubtype::Community
    }
}
