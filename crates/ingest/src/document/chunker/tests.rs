//! Tests for the structural analyzer and the segmentation cascade.

use super::helpers::{char_len, normalize, pack_greedy, postprocess, slice_fixed_width, split_sentences};
use super::strategies::segment_text;
use super::structure::analyze_structure;
use super::types::{ChunkerConfig, SegmentationStrategy};

fn config() -> ChunkerConfig {
    ChunkerConfig::default()
}

/// A sentence-shaped filler paragraph of roughly `n` characters.
fn filler(n: usize) -> String {
    let sentence = "Daily life in the community follows a familiar and welcome rhythm. ";
    let mut s = String::new();
    while s.chars().count() < n {
        s.push_str(sentence);
    }
    let cut: String = s.chars().take(n).collect();
    cut.trim_end().to_string()
}

// ── Structure analyzer ──────────────────────────────────────────────

#[test]
fn markdown_headings_carry_depth() {
    let text = "# Top\nbody\n## Second\nbody\n### Third\nbody\n#### Deep\nbody";
    let index = analyze_structure(text);
    let levels: Vec<u8> = index.headings.iter().map(|h| h.level).collect();
    assert_eq!(levels, vec![1, 2, 3, 3]); // depth caps at 3
}

#[test]
fn all_caps_line_is_a_heading() {
    let index = analyze_structure("COMMUNITY AMENITIES\nA pool and more.");
    assert_eq!(index.headings.len(), 1);
    assert_eq!(index.headings[0].line, 0);
    assert_eq!(index.headings[0].level, 1);
}

#[test]
fn title_case_line_is_a_heading() {
    let index = analyze_structure("Life at the Arbors\nlowercase body text follows here.");
    assert_eq!(index.headings.len(), 1);
    assert_eq!(index.headings[0].level, 2);
}

#[test]
fn numbered_and_roman_headers() {
    let text = "1. Overview\nbody\n2.1. Details\nbody\nIV. Appendix\nbody";
    let index = analyze_structure(text);
    assert_eq!(index.headings.len(), 3);
    assert_eq!(index.headings[0].level, 1);
    assert_eq!(index.headings[1].level, 2);
    assert_eq!(index.headings[2].level, 1);
}

#[test]
fn list_items_are_tagged() {
    let text = "- saltwater pool\n- fitness center\n* dog park\n1) covered parking";
    let index = analyze_structure(text);
    assert_eq!(index.list_items, vec![0, 1, 2, 3]);
}

#[test]
fn table_rows_need_two_delimiters() {
    let text = "plan | sqft | rent\nA1 | 750 | 1200\njust one, comma here maybe";
    let index = analyze_structure(text);
    assert!(index.table_rows.contains(&0));
    assert!(index.table_rows.contains(&1));
    assert!(!index.table_rows.contains(&2));
}

#[test]
fn tags_are_not_mutually_exclusive() {
    // Numbered, comma-heavy line: heading and table row at once.
    let text = "1. Rents, fees, deposits\nbody text";
    let index = analyze_structure(text);
    assert!(index.headings.iter().any(|h| h.line == 0));
    assert!(index.table_rows.contains(&0));
}

#[test]
fn separators_and_blank_runs() {
    let text = "top\n\n\n---\nbottom";
    let index = analyze_structure(text);
    // One entry for the blank run, one for the rule line.
    assert_eq!(index.separators.len(), 2);
}

// ── Strategy selection ──────────────────────────────────────────────

#[test]
fn headings_select_section_strategy() {
    let text = format!(
        "INTRODUCTION\n{}\n\nAMENITIES\n{}",
        filler(300),
        filler(300)
    );
    let (chunks, strategy) = segment_text(&text, &config());
    assert_eq!(strategy, SegmentationStrategy::Section);
    assert_eq!(chunks.len(), 2);
    assert!(chunks[0].starts_with("INTRODUCTION"));
    assert!(chunks[1].starts_with("AMENITIES"));
}

#[test]
fn leading_content_before_first_heading_is_kept() {
    let text = format!("{}\n\nDETAILS\n{}", filler(200), filler(200));
    let (chunks, strategy) = segment_text(&text, &config());
    assert_eq!(strategy, SegmentationStrategy::Section);
    assert_eq!(chunks.len(), 2);
    assert!(!chunks[0].starts_with("DETAILS"));
}

#[test]
fn oversized_section_is_resplit() {
    let text = format!(
        "OVERVIEW\n{}\n\n{}\n\n{}",
        filler(700),
        filler(700),
        filler(700)
    );
    let (chunks, strategy) = segment_text(&text, &config());
    assert_eq!(strategy, SegmentationStrategy::Section);
    assert!(chunks.len() >= 2);
    for c in &chunks {
        assert!(char_len(c) <= config().max_chunk_chars);
    }
}

#[test]
fn lists_select_list_strategy() {
    let intro = filler(120);
    let text = format!(
        "{intro}\n- resort-style saltwater pool with cabanas\n- twenty-four hour fitness center access\n- off-leash dog park and washing station\n{intro}"
    );
    let (chunks, strategy) = segment_text(&text, &config());
    assert_eq!(strategy, SegmentationStrategy::List);
    // intro run, list run, outro run
    assert_eq!(chunks.len(), 3);
    assert!(chunks[1].lines().all(|l| l.trim_start().starts_with('-')));
}

#[test]
fn tables_select_table_strategy() {
    let intro = filler(80);
    let text = format!(
        "{intro}\nA1 | 1 bed | 750 sqft | $1,200\nB2 | 2 bed | 1,050 sqft | $1,600\nC3 | 3 bed | 1,400 sqft | $2,100\n{intro}"
    );
    let (chunks, strategy) = segment_text(&text, &config());
    assert_eq!(strategy, SegmentationStrategy::Table);
    assert_eq!(chunks.len(), 3);
    assert!(chunks[1].contains('|'));
}

#[test]
fn plain_paragraphs_select_paragraph_strategy() {
    let text = format!("{}\n\n{}\n\n{}", filler(600), filler(600), filler(600));
    let (chunks, strategy) = segment_text(&text, &config());
    assert_eq!(strategy, SegmentationStrategy::Paragraph);
    assert!(chunks.len() >= 2);
    for c in &chunks {
        assert!(char_len(c) <= config().max_chunk_chars);
    }
}

#[test]
fn small_paragraphs_pack_together() {
    let text = format!("{}\n\n{}\n\n{}", filler(200), filler(200), filler(200));
    let (chunks, strategy) = segment_text(&text, &config());
    assert_eq!(strategy, SegmentationStrategy::Paragraph);
    // 3 × ~200 chars packs under the 1500 cap.
    assert_eq!(chunks.len(), 1);
}

#[test]
fn ocr_flattened_text_escalates_to_sentences() {
    // 3000 chars, one line, sentence boundaries present.
    let text = filler(3000);
    let (chunks, strategy) = segment_text(&text, &config());
    assert_eq!(strategy, SegmentationStrategy::Sentence);
    assert!(chunks.len() >= 2);
    for c in &chunks {
        assert!(char_len(c) <= config().max_chunk_chars);
    }
}

#[test]
fn unbroken_text_falls_through_to_fixed_width() {
    // No blank lines, no sentence boundaries: the last rung must still split.
    let text = "lorem ipsum dolor sit amet consetetur sadipscing elitr ".repeat(50);
    let (chunks, strategy) = segment_text(&text, &config());
    assert_eq!(strategy, SegmentationStrategy::FixedWidth);
    assert!(chunks.len() >= 2);
    for c in &chunks {
        assert!(char_len(c) <= config().max_chunk_chars);
        assert!(!c.contains("  "), "slices must not cut mid-word: {c:?}");
    }
}

#[test]
fn small_document_stays_whole() {
    let text = filler(300);
    let (chunks, _) = segment_text(&text, &config());
    assert_eq!(chunks.len(), 1);
}

#[test]
fn empty_input_produces_no_chunks() {
    let (chunks, _) = segment_text("   \n\n\t\n  ", &config());
    assert!(chunks.is_empty());
}

#[test]
fn no_chunk_below_minimum_size() {
    let text = format!("HEADER\n{}\n\nTINY\nok", filler(400));
    let (chunks, _) = segment_text(&text, &config());
    for c in &chunks {
        assert!(char_len(c) >= config().min_chunk_chars);
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

#[test]
fn normalize_line_endings_and_tabs() {
    assert_eq!(normalize("a\r\nb\tc\r"), "a\nb  c");
    assert_eq!(normalize("  padded  "), "padded");
}

#[test]
fn sentence_splitting() {
    let text = "First sentence. Second sentence! Third one? Done.";
    let sents = split_sentences(text);
    assert_eq!(sents.len(), 4);
    assert!(sents[0].starts_with("First"));
    assert!(sents[2].starts_with("Third"));
}

#[test]
fn sentence_split_requires_capital_follow() {
    // Abbreviation-style periods followed by lowercase don't split.
    let text = "Approx. twelve units remain. Act fast.";
    let sents = split_sentences(text);
    assert_eq!(sents.len(), 2);
}

#[test]
fn pack_greedy_respects_cap() {
    let pieces: Vec<String> = (0..10).map(|_| "x".repeat(100)).collect();
    let packed = pack_greedy(pieces, 350, "\n\n");
    assert_eq!(packed.len(), 4); // 3+3+3+1 pieces per chunk
    for p in &packed {
        assert!(char_len(p) <= 350);
    }
}

#[test]
fn fixed_width_backs_off_to_spaces() {
    let text = "word ".repeat(400); // 2000 chars
    let slices = slice_fixed_width(&text, 800, 0.2);
    assert!(slices.len() >= 2);
    for s in &slices {
        assert!(!s.ends_with("wor"), "mid-word cut: {s:?}");
        assert!(char_len(s) <= 800);
    }
}

#[test]
fn postprocess_collapses_newlines_and_drops_short() {
    let chunks = vec![
        format!("{}\n\n\n\ntail", filler(80)),
        "tiny".to_string(),
    ];
    let out = postprocess(chunks, 60);
    assert_eq!(out.len(), 1);
    assert!(!out[0].contains("\n\n\n"));
}
