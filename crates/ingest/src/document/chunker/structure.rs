//! Line-level structural analysis.
//!
//! One pass over the normalized text classifies each line as heading,
//! list item, table row, or separator. Tags are independent — a line can
//! carry several at once — and are stored as parallel index lists.

use std::sync::LazyLock;

use regex::Regex;

/// A heading line with its derived level (1..=3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingLine {
    pub line: usize,
    pub level: u8,
}

/// Ordered line indices per structural tag, built once per document.
#[derive(Debug, Clone, Default)]
pub struct StructureIndex {
    pub headings: Vec<HeadingLine>,
    pub list_items: Vec<usize>,
    pub table_rows: Vec<usize>,
    pub separators: Vec<usize>,
}

impl StructureIndex {
    pub fn has_headings(&self) -> bool {
        !self.headings.is_empty()
    }

    pub fn has_list_items(&self) -> bool {
        !self.list_items.is_empty()
    }

    pub fn has_table_rows(&self) -> bool {
        !self.table_rows.is_empty()
    }
}

static MARKDOWN_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+\S").unwrap());
static NUMBERED_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)*)[.)]\s+\S").unwrap());
static ROMAN_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[IVXLCDM]{1,7}[.)]\s+\S").unwrap());
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*•▪]|\d{1,3}[.)]|[A-Za-z][.)])\s+\S").unwrap());
static RULE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-=_*~]{3,}\s*$").unwrap());

/// Scan normalized text once and build the structural index.
pub fn analyze_structure(text: &str) -> StructureIndex {
    let mut index = StructureIndex::default();
    let mut prev_blank = false;

    for (i, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            // Record one separator per blank run.
            if !prev_blank {
                index.separators.push(i);
            }
            prev_blank = true;
            continue;
        }
        prev_blank = false;

        if RULE_LINE.is_match(line) {
            index.separators.push(i);
            continue;
        }

        if let Some(level) = heading_level(trimmed) {
            index.headings.push(HeadingLine { line: i, level });
        }
        if LIST_ITEM.is_match(line) {
            index.list_items.push(i);
        }
        if is_table_row(line) {
            index.table_rows.push(i);
        }
    }
    index
}

/// Ordered heading tests — first match wins and fixes the level.
fn heading_level(line: &str) -> Option<u8> {
    if let Some(caps) = MARKDOWN_HEADING.captures(line) {
        return Some((caps[1].len() as u8).min(3));
    }
    if is_all_caps_heading(line) {
        return Some(1);
    }
    if is_title_case_heading(line) {
        return Some(2);
    }
    if let Some(caps) = NUMBERED_HEADING.captures(line) {
        let depth = 1 + caps[1].matches('.').count() as u8;
        return Some(depth.min(3));
    }
    if ROMAN_HEADING.is_match(line) {
        return Some(1);
    }
    None
}

/// Short line in ALL CAPS, e.g. `COMMUNITY AMENITIES`.
fn is_all_caps_heading(line: &str) -> bool {
    let len = line.chars().count();
    if !(3..=60).contains(&len) {
        return false;
    }
    let mut uppercase = 0;
    for c in line.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            uppercase += 1;
        }
    }
    uppercase >= 2
}

/// Short standalone line with every significant word capitalized and no
/// sentence-ending punctuation, e.g. `Life at the Arbors`.
fn is_title_case_heading(line: &str) -> bool {
    const CONNECTORS: &[&str] = &["a", "an", "and", "at", "by", "for", "in", "of", "on", "or", "the", "to", "with"];

    if line.chars().count() > 60 || line.ends_with(['.', '!', '?', ',', ';']) {
        return false;
    }
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() || words.len() > 8 {
        return false;
    }
    // A purely alphabetic first word keeps numbered/roman headers (`IV.`,
    // `2.1.`) out of this test — they carry their own level rules.
    if !words[0].chars().all(char::is_alphabetic) {
        return false;
    }
    // First word must be capitalized; the rest may be connectors.
    let mut capitalized = 0;
    for (i, word) in words.iter().enumerate() {
        let starts_upper = word.chars().next().is_some_and(|c| c.is_uppercase());
        if starts_upper {
            capitalized += 1;
            continue;
        }
        if i == 0 || !CONNECTORS.contains(&word.to_lowercase().as_str()) {
            return false;
        }
    }
    capitalized >= 1 && words.len() >= 2
}

/// At least two of `|`, `,`, tab on one line.
fn is_table_row(line: &str) -> bool {
    line.chars().filter(|c| matches!(c, '|' | ',' | '\t')).count() >= 2
}
