//! Atomic fact extraction.
//!
//! Scans the raw text with the category pattern library and emits short,
//! independently reusable snippets. Category-specific attributes (amenity
//! class, pet-relatedness, price type, location type, offer expiry) are
//! derived at construction time.

use std::collections::HashSet;

use adcraft_core::{
    AmenityCategory, AtomicAttribute, AtomicSubtype, Chunk, ChunkMetadata, LocationType,
    PriceType,
};
use regex::Regex;

use super::helpers::char_len;
use super::patterns::{
    CATEGORY_PATTERNS, COMMUNITY_SHAPES, CONVENIENCE_KEYWORDS, EXPIRY_CLAUSE, FITNESS_KEYWORDS,
    PET_KEYWORDS, PRICE_RANGE, PROXIMITY_KEYWORDS, SOCIAL_KEYWORDS, TRANSIT_KEYWORDS,
};
use super::types::{ChunkError, ChunkerConfig};

/// Extract atomic chunks from `text`. Matches outside the configured length
/// bounds are rejected; the final list is deduplicated case-insensitively.
/// Determinism within a category follows document order of the regex scan.
pub fn extract_atomic_chunks(
    text: &str,
    community_name: &str,
    config: &ChunkerConfig,
) -> Result<Vec<Chunk>, ChunkError> {
    let mut chunks = Vec::new();

    for category in CATEGORY_PATTERNS.iter() {
        for pattern in &category.patterns {
            for m in pattern.find_iter(text) {
                let snippet = m.as_str().trim();
                if !within_bounds(snippet, config) {
                    continue;
                }
                let metadata = ChunkMetadata::Atomic {
                    subtype: category.subtype,
                    attribute: derive_attribute(category.subtype, snippet),
                };
                chunks.push(Chunk::new(snippet, metadata, community_name));
            }
        }
    }

    chunks.extend(extract_community_chunks(text, community_name, config)?);
    Ok(dedupe_case_insensitive(chunks))
}

fn within_bounds(snippet: &str, config: &ChunkerConfig) -> bool {
    let len = char_len(snippet);
    len >= config.atomic_min_chars && len <= config.atomic_max_chars
}

/// Community-name chunks come from two sources: a pattern built from the
/// caller-supplied name (when present) and the generic shape patterns.
fn extract_community_chunks(
    text: &str,
    community_name: &str,
    config: &ChunkerConfig,
) -> Result<Vec<Chunk>, ChunkError> {
    let mut chunks = Vec::new();

    if !community_name.trim().is_empty() {
        let named = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(community_name.trim())))?;
        for m in named.find_iter(text) {
            let snippet = m.as_str().trim();
            if within_bounds(snippet, config) {
                chunks.push(Chunk::new(
                    snippet,
                    ChunkMetadata::Atomic {
                        subtype: AtomicSubtype::Community,
                        attribute: None,
                    },
                    community_name,
                ));
            }
        }
    }

    for shape in COMMUNITY_SHAPES.iter() {
        for m in shape.find_iter(text) {
            let snippet = m.as_str().trim();
            if within_bounds(snippet, config) {
                chunks.push(Chunk::new(
                    snippet,
                    ChunkMetadata::Atomic {
                        subtype: AtomicSubtype::Community,
                        attribute: None,
                    },
                    community_name,
                ));
            }
        }
    }
    Ok(chunks)
}

/// Resolve the owning community name once per document: the caller-supplied
/// name wins; otherwise the first generic shape match in the text; otherwise
/// empty.
pub fn resolve_community_name(text: &str, caller_supplied: Option<&str>) -> String {
    if let Some(name) = caller_supplied {
        let trimmed = name.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    for shape in COMMUNITY_SHAPES.iter() {
        if let Some(m) = shape.find(text) {
            return m.as_str().trim().to_string();
        }
    }
    String::new()
}

// ── Attribute derivation ────────────────────────────────────────────────────

fn derive_attribute(subtype: AtomicSubtype, snippet: &str) -> Option<AtomicAttribute> {
    match subtype {
        AtomicSubtype::Amenity => Some(AtomicAttribute::Amenity {
            category: classify_amenity(snippet),
            pet_related: contains_any(snippet, PET_KEYWORDS),
        }),
        AtomicSubtype::Location => Some(AtomicAttribute::Location {
            location_type: classify_location(snippet),
        }),
        AtomicSubtype::Price => Some(AtomicAttribute::Price {
            price_type: classify_price(snippet),
        }),
        AtomicSubtype::Special => Some(AtomicAttribute::Special {
            offer_expiry: extract_expiry(snippet),
        }),
        _ => None,
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

/// Outdoor is the default when no keyword cluster matches.
fn classify_amenity(snippet: &str) -> AmenityCategory {
    if contains_any(snippet, FITNESS_KEYWORDS) {
        AmenityCategory::Fitness
    } else if contains_any(snippet, SOCIAL_KEYWORDS) {
        AmenityCategory::Social
    } else if contains_any(snippet, CONVENIENCE_KEYWORDS) {
        AmenityCategory::Convenience
    } else {
        AmenityCategory::Outdoor
    }
}

fn classify_location(snippet: &str) -> LocationType {
    if contains_any(snippet, TRANSIT_KEYWORDS) {
        LocationType::Transit
    } else if contains_any(snippet, PROXIMITY_KEYWORDS) {
        LocationType::Proximity
    } else {
        LocationType::Neighborhood
    }
}

fn classify_price(snippet: &str) -> PriceType {
    let lower = snippet.to_lowercase();
    if PRICE_RANGE.is_match(snippet) {
        PriceType::Range
    } else if lower.contains("average") || lower.contains("avg") {
        PriceType::Average
    } else {
        PriceType::StartingAt
    }
}

/// Pull a trailing expiry date clause off a special-offer snippet. Only
/// clauses carrying an explicit year resolve to a date; the rest stay
/// absent rather than guessing a year.
fn extract_expiry(snippet: &str) -> Option<chrono::NaiveDate> {
    let clause = EXPIRY_CLAUSE.captures(snippet)?.get(1)?.as_str();
    parse_date_clause(clause)
}

fn parse_date_clause(clause: &str) -> Option<chrono::NaiveDate> {
    let lower = clause.to_lowercase();

    // Numeric form: M/D/YYYY or M/D/YY.
    if lower.contains('/') {
        let parts: Vec<&str> = lower.split('/').collect();
        if parts.len() == 3 {
            let month: u32 = parts[0].parse().ok()?;
            let day: u32 = parts[1].parse().ok()?;
            let mut year: i32 = parts[2].parse().ok()?;
            if year < 100 {
                year += 2000;
            }
            return chrono::NaiveDate::from_ymd_opt(year, month, day);
        }
        return None;
    }

    // Month-name form: `March 31, 2026` (ordinal suffixes tolerated).
    let cleaned = lower.replace(['.', ','], " ");
    let mut words = cleaned.split_whitespace();
    let month = month_number(words.next()?)?;
    let day_word = words.next()?;
    let day: u32 = day_word
        .trim_end_matches(|c: char| c.is_alphabetic())
        .parse()
        .ok()?;
    let year: i32 = words.next()?.parse().ok()?;
    chrono::NaiveDate::from_ymd_opt(year, month, day)
}

fn month_number(word: &str) -> Option<u32> {
    const MONTHS: &[&str] = &[
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    MONTHS
        .iter()
        .position(|m| word.starts_with(m))
        .map(|i| i as u32 + 1)
}

/// Case-insensitive dedup preserving first occurrence.
fn dedupe_case_insensitive(chunks: Vec<Chunk>) -> Vec<Chunk> {
    let mut seen = HashSet::new();
    chunks
        .into_iter()
        .filter(|c| seen.insert(c.content.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ChunkerConfig {
        ChunkerConfig::default()
    }

    #[test]
    fn extracts_amenity_with_outdoor_default() {
        let text = "Cool off in our resort-style saltwater pool after work.";
        let chunks = extract_atomic_chunks(text, "", &config()).unwrap();
        let amenity = chunks
            .iter()
            .find(|c| matches!(c.metadata, ChunkMetadata::Atomic { subtype: AtomicSubtype::Amenity, .. }))
            .expect("amenity chunk");
        assert_eq!(amenity.content, "resort-style saltwater pool");
        match &amenity.metadata {
            ChunkMetadata::Atomic { attribute: Some(AtomicAttribute::Amenity { category, pet_related }), .. } => {
                assert_eq!(*category, AmenityCategory::Outdoor);
                assert!(!pet_related);
            }
            other => panic!("unexpected metadata: {other:?}"),
        }
    }

    #[test]
    fn amenity_pet_relatedness() {
        let text = "Bring your pup to the off-leash dog park and pet spa.";
        let chunks = extract_atomic_chunks(text, "", &config()).unwrap();
        let dog_park = chunks
            .iter()
            .find(|c| c.content.to_lowercase().contains("dog park"))
            .expect("dog park chunk");
        match &dog_park.metadata {
            ChunkMetadata::Atomic { attribute: Some(AtomicAttribute::Amenity { pet_related, .. }), .. } => {
                assert!(pet_related);
            }
            other => panic!("unexpected metadata: {other:?}"),
        }
    }

    #[test]
    fn price_range_classification() {
        let text = "Rents run $1,200-$2,000/month depending on floor plan.";
        let chunks = extract_atomic_chunks(text, "", &config()).unwrap();
        let price = chunks
            .iter()
            .find(|c| matches!(c.metadata, ChunkMetadata::Atomic { subtype: AtomicSubtype::Price, .. }))
            .expect("price chunk");
        assert_eq!(price.content, "$1,200-$2,000/month");
        match &price.metadata {
            ChunkMetadata::Atomic { attribute: Some(AtomicAttribute::Price { price_type }), .. } => {
                assert_eq!(*price_type, PriceType::Range);
            }
            other => panic!("unexpected metadata: {other:?}"),
        }
    }

    #[test]
    fn price_starting_at_classification() {
        let text = "Spacious one-bedroom homes starting at $1,450/month.";
        let chunks = extract_atomic_chunks(text, "", &config()).unwrap();
        let price = chunks
            .iter()
            .find(|c| matches!(c.metadata, ChunkMetadata::Atomic { subtype: AtomicSubtype::Price, .. }))
            .expect("price chunk");
        match &price.metadata {
            ChunkMetadata::Atomic { attribute: Some(AtomicAttribute::Price { price_type }), .. } => {
                assert_eq!(*price_type, PriceType::StartingAt);
            }
            other => panic!("unexpected metadata: {other:?}"),
        }
    }

    #[test]
    fn location_type_classification() {
        let text = "Just minutes from downtown dining. Easy access to the Red Line metro station.";
        let chunks = extract_atomic_chunks(text, "", &config()).unwrap();
        let types: Vec<LocationType> = chunks
            .iter()
            .filter_map(|c| match &c.metadata {
                ChunkMetadata::Atomic { attribute: Some(AtomicAttribute::Location { location_type }), .. } => {
                    Some(*location_type)
                }
                _ => None,
            })
            .collect();
        assert!(types.contains(&LocationType::Proximity));
        assert!(types.contains(&LocationType::Transit));
    }

    #[test]
    fn special_offer_expiry_with_year() {
        let text = "Move-in special: one month free rent, expires March 31, 2026.";
        let chunks = extract_atomic_chunks(text, "", &config()).unwrap();
        let special = chunks
            .iter()
            .find_map(|c| match &c.metadata {
                ChunkMetadata::Atomic { attribute: Some(AtomicAttribute::Special { offer_expiry }), .. } => {
                    offer_expiry.as_ref()
                }
                _ => None,
            })
            .expect("special with expiry");
        assert_eq!(*special, chrono::NaiveDate::from_ymd_opt(2026, 3, 31).unwrap());
    }

    #[test]
    fn expiry_without_year_stays_absent() {
        assert_eq!(parse_date_clause("march 31"), None);
        assert_eq!(
            parse_date_clause("3/31/26"),
            chrono::NaiveDate::from_ymd_opt(2026, 3, 31)
        );
    }

    #[test]
    fn bounds_reject_short_and_long_matches() {
        // "near the" style fragments under 8 chars never survive.
        let chunks = extract_atomic_chunks("near us", "", &config()).unwrap();
        assert!(chunks.iter().all(|c| c.char_count >= 8 && c.char_count <= 90));
    }

    #[test]
    fn dedup_is_case_insensitive() {
        let text = "Walk-in closets. WALK-IN CLOSETS. Walk-In Closets.";
        let chunks = extract_atomic_chunks(text, "", &config()).unwrap();
        let closets: Vec<&Chunk> = chunks
            .iter()
            .filter(|c| c.content.to_lowercase().contains("walk-in"))
            .collect();
        assert_eq!(closets.len(), 1);
        assert_eq!(closets[0].content, "Walk-in closets");
    }

    #[test]
    fn caller_supplied_community_name_is_matched() {
        let text = "Welcome home to Willow Creek, where comfort meets convenience.";
        let chunks = extract_atomic_chunks(text, "Willow Creek", &config()).unwrap();
        let community = chunks
            .iter()
            .find(|c| matches!(c.metadata, ChunkMetadata::Atomic { subtype: AtomicSubtype::Community, .. }))
            .expect("community chunk");
        assert_eq!(community.content, "Willow Creek");
        assert_eq!(community.community_name, "Willow Creek");
    }

    #[test]
    fn generic_community_shapes_are_matched() {
        let text = "Tour The Arbors at Brookside and see our two-bedroom homes.";
        let chunks = extract_atomic_chunks(text, "", &config()).unwrap();
        assert!(chunks
            .iter()
            .any(|c| matches!(c.metadata, ChunkMetadata::Atomic { subtype: AtomicSubtype::Community, .. })
                && c.content.contains("Arbors")));
    }

    #[test]
    fn resolve_name_prefers_caller_value() {
        let text = "Welcome to Maple Grove Apartments today.";
        assert_eq!(resolve_community_name(text, Some("The Arbors")), "The Arbors");
        assert_eq!(resolve_community_name(text, Some("  ")), "Maple Grove Apartments");
        assert_eq!(resolve_community_name("plain text, nothing here", None), "");
    }

    #[test]
    fn extraction_is_deterministic() {
        let text = "Resort-style pool. Walk-in closets. Starting at $1,300/month. Schedule a tour today!";
        let a = extract_atomic_chunks(text, "", &config()).unwrap();
        let b = extract_atomic_chunks(text, "", &config()).unwrap();
        assert_eq!(a, b);
    }
}
