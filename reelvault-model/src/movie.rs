use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a catalog entry came by (or failed to come by) its external metadata.
///
/// `None` and `Failed` both describe placeholder records; keeping them
/// distinct lets an operator tell a genuine no-match apart from a transient
/// provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentStatus {
    /// External metadata resolved and stored.
    Matched,
    /// The provider returned no result for the cleaned title.
    #[default]
    None,
    /// The provider errored; the entry degraded to a placeholder.
    Failed,
}

impl EnrichmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrichmentStatus::Matched => "matched",
            EnrichmentStatus::None => "none",
            EnrichmentStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for EnrichmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EnrichmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "matched" => Ok(EnrichmentStatus::Matched),
            "none" => Ok(EnrichmentStatus::None),
            "failed" => Ok(EnrichmentStatus::Failed),
            _ => Err(format!("Invalid enrichment status: {s}")),
        }
    }
}

/// External metadata resolved from TMDB.
///
/// The whole block is present or absent as a unit on a [`MovieRecord`];
/// individual fields inside a match may still be missing upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmdbMetadata {
    pub tmdb_id: i64,
    pub original_title: String,
    pub overview: Option<String>,
    pub release_date: Option<NaiveDate>,
    /// Runtime in minutes.
    pub runtime: Option<i32>,
    pub director: Option<String>,
    pub genres: Vec<String>,
    pub poster_path: Option<String>,
    pub original_language: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub trailer_url: Option<String>,
}

/// One catalog entry per physical media file.
///
/// `file_path` is the stable key matching disk state to catalog state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: Uuid,
    /// Absolute local path of the backing file. Unique across the catalog.
    pub file_path: String,
    /// Canonical title on a metadata match, cleaned filename otherwise.
    pub title: String,
    pub visible: bool,
    pub enrichment: EnrichmentStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metadata: Option<TmdbMetadata>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MovieRecord {
    /// Basename of the backing file, the identity used during reconciliation.
    pub fn file_name(&self) -> &str {
        std::path::Path::new(&self.file_path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.file_path)
    }
}

/// Projection served on the public listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: Uuid,
    pub tmdb_id: Option<i64>,
    pub title: String,
    pub original_title: Option<String>,
    pub poster_path: Option<String>,
}

impl From<&MovieRecord> for MovieSummary {
    fn from(record: &MovieRecord) -> Self {
        Self {
            id: record.id,
            tmdb_id: record.metadata.as_ref().map(|m| m.tmdb_id),
            title: record.title.clone(),
            original_title: record.metadata.as_ref().map(|m| m.original_title.clone()),
            poster_path: record
                .metadata
                .as_ref()
                .and_then(|m| m.poster_path.clone()),
        }
    }
}
