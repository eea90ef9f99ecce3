use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::document::{DocumentId, SourceId};

/// Which extraction path produced a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    /// Short reusable fact snippet (8–90 chars).
    Atomic,
    /// Topic-coherent prose passage (400–800 char target).
    Narrative,
    /// Structural-fallback chunk with no taxonomy attached.
    Plain,
}

/// Subtype taxonomy for atomic chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtomicSubtype {
    Amenity,
    Feature,
    FloorPlan,
    Lifestyle,
    Location,
    Special,
    Urgency,
    CallToAction,
    Price,
    Community,
}

/// Subtype taxonomy for narrative chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeSubtype {
    Amenities,
    Location,
    Lifestyle,
    Community,
}

/// Marketing angle a narrative chunk supports. Stored in a `BTreeSet` so the
/// serialized order is deterministic across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignFocus {
    Luxury,
    Location,
    Amenities,
    Value,
    Lifestyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmenityCategory {
    Fitness,
    Social,
    Convenience,
    Outdoor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Proximity,
    Neighborhood,
    Transit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceType {
    StartingAt,
    Range,
    Average,
}

/// Category-specific attribute derived at extraction time. At most one per
/// atomic chunk; the variant is fixed by the chunk's subtype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AtomicAttribute {
    Amenity {
        category: AmenityCategory,
        pet_related: bool,
    },
    Location {
        location_type: LocationType,
    },
    Price {
        price_type: PriceType,
    },
    Special {
        offer_expiry: Option<NaiveDate>,
    },
}

/// Metadata attached to a chunk — the shape follows the chunk kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChunkMetadata {
    Atomic {
        subtype: AtomicSubtype,
        #[serde(skip_serializing_if = "Option::is_none")]
        attribute: Option<AtomicAttribute>,
    },
    Narrative {
        subtype: NarrativeSubtype,
        campaign_focus: BTreeSet<CampaignFocus>,
    },
    /// Emitted only by the assembler's structural fallback.
    Plain,
}

impl ChunkMetadata {
    pub fn kind(&self) -> ChunkKind {
        match self {
            ChunkMetadata::Atomic { .. } => ChunkKind::Atomic,
            ChunkMetadata::Narrative { .. } => ChunkKind::Narrative,
            ChunkMetadata::Plain => ChunkKind::Plain,
        }
    }
}

/// The atomic unit of retrieval: a text span plus its taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    #[serde(flatten)]
    pub metadata: ChunkMetadata,
    /// Owning business/property name, identical across all chunks of one
    /// ingestion call. Empty when unresolved.
    pub community_name: String,
    /// Always recomputed from `content`, never trusted from callers.
    pub char_count: usize,
}

impl Chunk {
    pub fn new(content: impl Into<String>, metadata: ChunkMetadata, community_name: &str) -> Self {
        let content = content.into();
        let char_count = content.chars().count();
        Self {
            content,
            metadata,
            community_name: community_name.to_string(),
            char_count,
        }
    }

    pub fn kind(&self) -> ChunkKind {
        self.metadata.kind()
    }
}

/// A chunk paired with its embedding, ready for storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    #[serde(flatten)]
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
    pub document_id: DocumentId,
    pub source_id: SourceId,
}

/// Content-length summary over a chunk list, for observability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChunkStats {
    pub count: usize,
    pub min_chars: usize,
    pub max_chars: usize,
    pub avg_chars: usize,
}

impl ChunkStats {
    pub fn from_chunks(chunks: &[Chunk]) -> Self {
        if chunks.is_empty() {
            return Self {
                count: 0,
                min_chars: 0,
                max_chars: 0,
                avg_chars: 0,
            };
        }
        let lengths: Vec<usize> = chunks.iter().map(|c| c.char_count).collect();
        let total: usize = lengths.iter().sum();
        Self {
            count: chunks.len(),
            min_chars: *lengths.iter().min().unwrap_or(&0),
            max_chars: *lengths.iter().max().unwrap_or(&0),
            avg_chars: total / chunks.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_count_is_recomputed() {
        let c = Chunk::new("Résumé lounge", ChunkMetadata::Plain, "");
        assert_eq!(c.char_count, 13);
        assert_eq!(c.char_count, c.content.chars().count());
    }

    #[test]
    fn stats_over_empty_list_are_zero() {
        let stats = ChunkStats::from_chunks(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.avg_chars, 0);
    }

    #[test]
    fn stats_min_max_avg() {
        let chunks = vec![
            Chunk::new("aaaa", ChunkMetadata::Plain, ""),
            Chunk::new("aaaaaaaa", ChunkMetadata::Plain, ""),
        ];
        let stats = ChunkStats::from_chunks(&chunks);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.min_chars, 4);
        assert_eq!(stats.max_chars, 8);
        assert_eq!(stats.avg_chars, 6);
    }

    #[test]
    fn metadata_kind_accessor() {
        let m = ChunkMetadata::Narrative {
            subtype: NarrativeSubtype::Lifestyle,
            campaign_focus: BTreeSet::from([CampaignFocus::Lifestyle]),
        };
        assert_eq!(m.kind(), ChunkKind::Narrative);
        assert_eq!(ChunkMetadata::Plain.kind(), ChunkKind::Plain);
    }

    #[test]
    fn chunk_serializes_with_flattened_metadata() {
        let c = Chunk::new(
            "Resort-style saltwater pool",
            ChunkMetadata::Atomic {
                subtype: AtomicSubtype::Amenity,
                attribute: Some(AtomicAttribute::Amenity {
                    category: AmenityCategory::Outdoor,
                    pet_related: false,
                }),
            },
            "The Arbors",
        );
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["kind"], "atomic");
        assert_eq!(json["subtype"], "amenity");
        assert_eq!(json["community_name"], "The Arbors");
        assert_eq!(json["char_count"], 27);
    }
}
