use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of an ingested client document.
pub type DocumentId = Uuid;

/// Identifier of the client source the document came from (upload, intake
/// form, asset bundle).
pub type SourceId = Uuid;

/// Category assigned by the caller to an ingested document.
///
/// Unrecognized values are rejected at the request boundary before any
/// chunking work starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    AnalyticsReport,
    BrandAsset,
    PropertyProfile,
}

impl std::fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentCategory::AnalyticsReport => write!(f, "analytics-report"),
            DocumentCategory::BrandAsset => write!(f, "brand-asset"),
            DocumentCategory::PropertyProfile => write!(f, "property-profile"),
        }
    }
}

impl std::str::FromStr for DocumentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "analytics-report" | "analytics_report" => Ok(DocumentCategory::AnalyticsReport),
            "brand-asset" | "brand_asset" => Ok(DocumentCategory::BrandAsset),
            "property-profile" | "property_profile" => Ok(DocumentCategory::PropertyProfile),
            other => Err(format!("unknown document category: {other}")),
        }
    }
}
