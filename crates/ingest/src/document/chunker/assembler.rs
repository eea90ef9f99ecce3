//! Unified chunk assembly.
//!
//! Runs the atomic extractor and the narrative builder against the same raw
//! text and concatenates their outputs (atomic first, narrative second, in
//! construction order). This is the only place extraction failure is caught:
//! any error — or an empty dual result — falls back to the structural
//! strategy cascade, which emits plain chunks with no taxonomy.

use adcraft_core::{Chunk, ChunkMetadata};
use tracing::{debug, warn};

use super::atomic::{extract_atomic_chunks, resolve_community_name};
use super::helpers::normalize;
use super::narrative::build_narrative_chunks;
use super::strategies::segment_text;
use super::types::{ChunkError, ChunkerConfig};

/// Chunk one document. Never fails: extraction errors are recovered via the
/// structural fallback, and an unsplittable document yields whatever the
/// cascade could produce (possibly empty, which the caller reports).
pub fn chunk_document(
    raw_text: &str,
    community_name: Option<&str>,
    config: &ChunkerConfig,
) -> Vec<Chunk> {
    let text = normalize(raw_text);
    let resolved = resolve_community_name(&text, community_name);

    match dual_extract(&text, &resolved, config) {
        Ok(chunks) if !chunks.is_empty() => {
            debug!(
                total = chunks.len(),
                community = %resolved,
                "dual extraction complete"
            );
            chunks
        }
        Ok(_) => {
            warn!("dual extraction produced no chunks, using structural fallback");
            structural_fallback(&text, &resolved, config)
        }
        Err(e) => {
            warn!(error = %e, "extraction failed, using structural fallback");
            structural_fallback(&text, &resolved, config)
        }
    }
}

fn dual_extract(
    text: &str,
    community_name: &str,
    config: &ChunkerConfig,
) -> Result<Vec<Chunk>, ChunkError> {
    let mut chunks = extract_atomic_chunks(text, community_name, config)?;
    let atomic_count = chunks.len();
    chunks.extend(build_narrative_chunks(text, community_name, config)?);
    debug!(
        atomic = atomic_count,
        narrative = chunks.len() - atomic_count,
        "extractors finished"
    );
    Ok(chunks)
}

/// Plain structural chunking — the recovery path shared by every failure
/// mode of the dual extraction.
pub(crate) fn structural_fallback(
    text: &str,
    community_name: &str,
    config: &ChunkerConfig,
) -> Vec<Chunk> {
    let (pieces, strategy) = segment_text(text, config);
    debug!(strategy = %strategy, count = pieces.len(), "structural fallback");
    pieces
        .into_iter()
        .map(|p| Chunk::new(p, ChunkMetadata::Plain, community_name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use adcraft_core::ChunkKind;

    #[test]
    fn atomic_chunks_precede_narrative_chunks() {
        let text = "\
Come home to Maple Grove Apartments, where a resort-style pool and a fully equipped fitness center anchor your day. \
Residents gather in the clubhouse for coffee before heading to the sparkling pool deck outside. \
Every home features stainless-steel appliances and walk-in closets for comfortable living. \
The whole community sits just minutes from downtown with easy access to the metro station. \
Evenings here mean relaxing on your private balcony while neighbors enjoy the outdoor grilling stations. \
Rents starting at $1,350/month make this an easy choice for comfortable living near everything.";
        let chunks = chunk_document(text, Some("Maple Grove"), &ChunkerConfig::default());
        assert!(!chunks.is_empty());

        let first_narrative = chunks
            .iter()
            .position(|c| c.kind() == ChunkKind::Narrative);
        let last_atomic = chunks
            .iter()
            .rposition(|c| c.kind() == ChunkKind::Atomic);
        if let (Some(first_n), Some(last_a)) = (first_narrative, last_atomic) {
            assert!(last_a < first_n, "atomic chunks must come first");
        }
        assert!(chunks.iter().all(|c| c.community_name == "Maple Grove"));
    }

    #[test]
    fn fallback_emits_plain_chunks() {
        let text = "word ".repeat(500); // 2500 chars, no structure at all
        let config = ChunkerConfig::default();
        let chunks = structural_fallback(&text, "", &config);
        assert!(chunks.len() >= 2);
        assert!(chunks.iter().all(|c| c.kind() == ChunkKind::Plain));
        assert!(chunks.iter().all(|c| c.char_count <= config.max_chunk_chars));
    }

    #[test]
    fn weird_input_still_yields_chunks() {
        // No sentences, no keywords, nothing extractable — the assembler
        // must still hand back something non-empty for a sizable document.
        let text = "lorem ipsum dolor sit amet consetetur sadipscing elitr sed diam nonumy ".repeat(30);
        let chunks = chunk_document(&text, None, &ChunkerConfig::default());
        assert!(!chunks.is_empty());
    }

    #[test]
    fn unmatchable_short_text_falls_back_to_plain() {
        // Nothing for the extractors: no category phrases, and too short for
        // a narrative chunk to clear the floor. The assembler must recover
        // with plain structural chunks instead of returning nothing.
        let text = "Quarterly figures improved across both regions. \
                    Totals were recalculated twice and the variance stayed small. \
                    Further review happens next quarter as planned.";
        let chunks = chunk_document(text, None, &ChunkerConfig::default());
        assert!(!chunks.is_empty());
        assert!(chunks.iter().all(|c| c.kind() == ChunkKind::Plain));
    }

    #[test]
    fn chunking_is_idempotent() {
        let text = "\
AMENITIES\n\nResort-style saltwater pool, outdoor grilling stations, and a fully equipped fitness center. \
Our residents enjoy covered parking and package lockers all year round.\n\n\
LOCATION\n\nJust minutes from downtown, with easy access to the metro station and major employers nearby.";
        let config = ChunkerConfig::default();
        let a = chunk_document(text, Some("The Arbors"), &config);
        let b = chunk_document(text, Some("The Arbors"), &config);
        assert_eq!(a, b);
    }
}
