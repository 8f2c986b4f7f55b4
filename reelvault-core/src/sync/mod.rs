//! Catalog reconciliation.
//!
//! A sync run compares the media directory against the stored catalog,
//! enriches newly discovered files from the metadata provider, and hides
//! records whose backing file has disappeared. Runs are idempotent: when
//! nothing on disk changed, nothing is written.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use futures::{StreamExt, stream};
use reelvault_model::{EnrichmentStatus, MovieRecord, TmdbMetadata};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::ports::MovieRepository;
use crate::error::{CoreError, Result};
use crate::metadata::{clean_title, has_media_extension};
use crate::providers::{MetadataProvider, MovieDetails, ProviderError};

const DEFAULT_ENRICH_CONCURRENCY: usize = 4;

/// Outcome of a single sync run.
#[derive(Debug, Default, Serialize)]
pub struct SyncReport {
    /// Records created during this run.
    pub inserted: Vec<MovieRecord>,
    /// Records hidden because their file is gone.
    pub hidden: u64,
    /// Inserted records that matched a provider entry.
    pub matched: usize,
    /// Inserted placeholders for which the provider had no result.
    pub unmatched: usize,
    /// Inserted placeholders caused by provider failures.
    pub failed: usize,
}

/// Work derived from comparing the directory listing with the catalog snapshot.
#[derive(Debug, Default, PartialEq, Eq)]
struct ReconcilePlan {
    new_files: Vec<String>,
    missing: Vec<Uuid>,
}

impl ReconcilePlan {
    fn is_empty(&self) -> bool {
        self.new_files.is_empty() && self.missing.is_empty()
    }
}

fn plan(local_files: &BTreeSet<String>, snapshot: &[MovieRecord]) -> ReconcilePlan {
    let known: BTreeSet<&str> = snapshot.iter().map(MovieRecord::file_name).collect();

    let new_files = local_files
        .iter()
        .filter(|name| has_media_extension(name))
        .filter(|name| !known.contains(name.as_str()))
        .cloned()
        .collect();

    let missing = snapshot
        .iter()
        .filter(|record| record.visible && !local_files.contains(record.file_name()))
        .map(|record| record.id)
        .collect();

    ReconcilePlan { new_files, missing }
}

enum Enrichment {
    Matched { title: String, metadata: TmdbMetadata },
    NoMatch,
    Failed,
}

pub struct CatalogReconciler {
    movies: Arc<dyn MovieRepository>,
    provider: Arc<dyn MetadataProvider>,
    media_root: PathBuf,
    image_base_url: String,
    concurrency: usize,
}

impl std::fmt::Debug for CatalogReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogReconciler")
            .field("media_root", &self.media_root)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl CatalogReconciler {
    pub fn new(
        movies: Arc<dyn MovieRepository>,
        provider: Arc<dyn MetadataProvider>,
        media_root: impl Into<PathBuf>,
        image_base_url: impl Into<String>,
    ) -> Self {
        Self {
            movies,
            provider,
            media_root: media_root.into(),
            image_base_url: image_base_url.into(),
            concurrency: DEFAULT_ENRICH_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Run one full reconciliation pass.
    pub async fn run(&self) -> Result<SyncReport> {
        let (local_files, snapshot) =
            tokio::try_join!(self.list_media_files(), self.movies.list_all())?;

        let plan = plan(&local_files, &snapshot);
        if plan.is_empty() {
            info!("catalog already in sync, nothing to do");
            return Ok(SyncReport::default());
        }

        let mut report = SyncReport::default();

        if !plan.new_files.is_empty() {
            let records: Vec<MovieRecord> = stream::iter(plan.new_files)
                .map(|file_name| self.build_record(file_name))
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

            for record in &records {
                match record.enrichment {
                    EnrichmentStatus::Matched => report.matched += 1,
                    EnrichmentStatus::None => report.unmatched += 1,
                    EnrichmentStatus::Failed => report.failed += 1,
                }
            }

            self.movies.insert_batch(&records).await?;
            report.inserted = records;
        }

        if !plan.missing.is_empty() {
            report.hidden = self.movies.hide_batch(&plan.missing).await?;
        }

        info!(
            inserted = report.inserted.len(),
            hidden = report.hidden,
            matched = report.matched,
            unmatched = report.unmatched,
            failed = report.failed,
            "catalog sync finished"
        );

        Ok(report)
    }

    async fn list_media_files(&self) -> Result<BTreeSet<String>> {
        let mut entries = tokio::fs::read_dir(&self.media_root).await.map_err(|e| {
            CoreError::Internal(format!(
                "failed to read media directory {}: {e}",
                self.media_root.display()
            ))
        })?;

        let mut files = BTreeSet::new();
        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            if !file_type.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                files.insert(name.to_string());
            }
        }
        Ok(files)
    }

    async fn build_record(&self, file_name: String) -> MovieRecord {
        let cleaned = clean_title(&file_name);
        let file_path = self
            .media_root
            .join(&file_name)
            .to_string_lossy()
            .into_owned();

        let (title, enrichment, metadata) = match self.enrich(&cleaned).await {
            Enrichment::Matched { title, metadata } => {
                (title, EnrichmentStatus::Matched, Some(metadata))
            }
            Enrichment::NoMatch => (
                placeholder_title(&cleaned, &file_name),
                EnrichmentStatus::None,
                None,
            ),
            Enrichment::Failed => (
                placeholder_title(&cleaned, &file_name),
                EnrichmentStatus::Failed,
                None,
            ),
        };

        let now = Utc::now();
        MovieRecord {
            id: Uuid::new_v4(),
            file_path,
            title,
            visible: true,
            enrichment,
            metadata,
            created_at: now,
            updated_at: now,
        }
    }

    async fn enrich(&self, cleaned: &str) -> Enrichment {
        if cleaned.is_empty() {
            return Enrichment::NoMatch;
        }

        let lookup: std::result::Result<Option<MovieDetails>, ProviderError> = async {
            let hits = self.provider.search_movies(cleaned).await?;
            match hits.into_iter().next() {
                Some(first) => {
                    let details = self.provider.movie_details(first.id).await?;
                    Ok(Some(details))
                }
                None => Ok(None),
            }
        }
        .await;

        match lookup {
            Ok(Some(details)) => {
                let (title, metadata) = details.into_parts(&self.image_base_url);
                Enrichment::Matched { title, metadata }
            }
            Ok(None) => {
                info!(query = cleaned, "no provider match, storing placeholder");
                Enrichment::NoMatch
            }
            Err(err) => {
                warn!(query = cleaned, error = %err, "enrichment failed, storing placeholder");
                Enrichment::Failed
            }
        }
    }
}

/// Placeholder records keep the cleaned title, falling back to the raw file
/// stem when cleaning stripped everything away.
fn placeholder_title(cleaned: &str, file_name: &str) -> String {
    if !cleaned.is_empty() {
        return cleaned.to_string();
    }
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::ports::MockMovieRepository;
    use crate::providers::{MockMetadataProvider, MovieSearchHit};

    const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/original";

    fn stored(file_name: &str, visible: bool) -> MovieRecord {
        let now = Utc::now();
        MovieRecord {
            id: Uuid::new_v4(),
            file_path: format!("/media/{file_name}"),
            title: file_name.to_string(),
            visible,
            enrichment: EnrichmentStatus::None,
            metadata: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn to_set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn plan_is_empty_when_listing_matches_snapshot() {
        let snapshot = vec![stored("a.mkv", true), stored("b.mp4", true)];
        let result = plan(&to_set(&["a.mkv", "b.mp4"]), &snapshot);
        assert!(result.is_empty());
    }

    #[test]
    fn plan_ignores_non_media_files() {
        let result = plan(&to_set(&["notes.txt", "cover.jpg"]), &[]);
        assert!(result.new_files.is_empty());
    }

    #[test]
    fn plan_detects_new_and_missing() {
        let snapshot = vec![stored("gone.mkv", true), stored("kept.mkv", true)];
        let result = plan(&to_set(&["kept.mkv", "fresh.mp4"]), &snapshot);

        assert_eq!(result.new_files, vec!["fresh.mp4".to_string()]);
        assert_eq!(result.missing, vec![snapshot[0].id]);
    }

    #[test]
    fn plan_does_not_rehide_hidden_records() {
        let snapshot = vec![stored("gone.mkv", false)];
        let result = plan(&to_set(&[]), &snapshot);
        assert!(result.missing.is_empty());
    }

    fn reconciler(
        movies: MockMovieRepository,
        provider: MockMetadataProvider,
        media_root: &Path,
    ) -> CatalogReconciler {
        CatalogReconciler::new(Arc::new(movies), Arc::new(provider), media_root, IMAGE_BASE)
    }

    #[tokio::test]
    async fn reconcile_without_changes_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("kept.mkv"), b"x").unwrap();

        let mut movies = MockMovieRepository::new();
        let existing = stored("kept.mkv", true);
        movies
            .expect_list_all()
            .returning(move || Ok(vec![existing.clone()]));

        // Unexpected insert_batch or hide_batch calls would panic here.
        let provider = MockMetadataProvider::new();
        let report = reconciler(movies, provider, dir.path()).run().await.unwrap();

        assert!(report.inserted.is_empty());
        assert_eq!(report.hidden, 0);
    }

    #[tokio::test]
    async fn new_file_is_enriched_and_inserted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Inception.2010.1080p.BluRay.x264.mkv"), b"x").unwrap();

        let mut provider = MockMetadataProvider::new();
        provider
            .expect_search_movies()
            .withf(|query| query == "Inception")
            .returning(|_| {
                Ok(vec![MovieSearchHit {
                    id: 27205,
                    title: "Inception".to_string(),
                }])
            });
        provider.expect_movie_details().returning(|id| {
            Ok(MovieDetails {
                id,
                title: "Inception".to_string(),
                original_title: "Inception".to_string(),
                runtime: Some(148),
                ..Default::default()
            })
        });

        let mut movies = MockMovieRepository::new();
        movies.expect_list_all().returning(|| Ok(Vec::new()));
        movies
            .expect_insert_batch()
            .withf(|records| {
                records.len() == 1
                    && records[0].title == "Inception"
                    && records[0].enrichment == EnrichmentStatus::Matched
                    && records[0].metadata.as_ref().is_some_and(|m| m.tmdb_id == 27205)
            })
            .returning(|_| Ok(()));

        let report = reconciler(movies, provider, dir.path()).run().await.unwrap();

        assert_eq!(report.matched, 1);
        assert_eq!(report.unmatched, 0);
        assert_eq!(report.failed, 0);
        assert_eq!(report.inserted.len(), 1);
    }

    #[tokio::test]
    async fn no_match_stores_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Inception.2010.1080p.BluRay.x264.mkv"), b"x").unwrap();

        let mut provider = MockMetadataProvider::new();
        provider
            .expect_search_movies()
            .returning(|_| Ok(Vec::new()));

        let mut movies = MockMovieRepository::new();
        movies.expect_list_all().returning(|| Ok(Vec::new()));
        movies
            .expect_insert_batch()
            .withf(|records| {
                records.len() == 1
                    && records[0].title == "Inception"
                    && records[0].enrichment == EnrichmentStatus::None
                    && records[0].metadata.is_none()
                    && records[0].visible
            })
            .returning(|_| Ok(()));

        let report = reconciler(movies, provider, dir.path()).run().await.unwrap();

        assert_eq!(report.unmatched, 1);
        assert_eq!(report.matched, 0);
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Heat.1995.mkv"), b"x").unwrap();

        let mut provider = MockMetadataProvider::new();
        provider
            .expect_search_movies()
            .returning(|_| Err(ProviderError::RateLimited));

        let mut movies = MockMovieRepository::new();
        movies.expect_list_all().returning(|| Ok(Vec::new()));
        movies
            .expect_insert_batch()
            .withf(|records| {
                records.len() == 1
                    && records[0].title == "Heat"
                    && records[0].enrichment == EnrichmentStatus::Failed
                    && records[0].metadata.is_none()
            })
            .returning(|_| Ok(()));

        let report = reconciler(movies, provider, dir.path()).run().await.unwrap();

        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn failing_lookup_does_not_block_siblings() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Heat.1995.mkv"), b"x").unwrap();
        std::fs::write(dir.path().join("Inception.2010.1080p.BluRay.x264.mkv"), b"x").unwrap();

        let mut provider = MockMetadataProvider::new();
        provider.expect_search_movies().returning(|query| {
            if query == "Heat" {
                Err(ProviderError::RateLimited)
            } else {
                Ok(vec![MovieSearchHit {
                    id: 27205,
                    title: "Inception".to_string(),
                }])
            }
        });
        provider.expect_movie_details().returning(|id| {
            Ok(MovieDetails {
                id,
                title: "Inception".to_string(),
                original_title: "Inception".to_string(),
                ..Default::default()
            })
        });

        let mut movies = MockMovieRepository::new();
        movies.expect_list_all().returning(|| Ok(Vec::new()));
        movies
            .expect_insert_batch()
            .withf(|records| {
                let heat = records.iter().find(|r| r.title == "Heat");
                let inception = records.iter().find(|r| r.title == "Inception");
                records.len() == 2
                    && heat.is_some_and(|r| {
                        r.enrichment == EnrichmentStatus::Failed && r.metadata.is_none()
                    })
                    && inception.is_some_and(|r| {
                        r.enrichment == EnrichmentStatus::Matched
                            && r.metadata.as_ref().is_some_and(|m| m.tmdb_id == 27205)
                    })
            })
            .returning(|_| Ok(()));

        let report = reconciler(movies, provider, dir.path()).run().await.unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.matched, 1);
        assert_eq!(report.inserted.len(), 2);
    }

    #[tokio::test]
    async fn missing_file_hides_record() {
        let dir = tempfile::tempdir().unwrap();

        let gone = stored("gone.mkv", true);
        let gone_id = gone.id;

        let mut movies = MockMovieRepository::new();
        movies
            .expect_list_all()
            .returning(move || Ok(vec![gone.clone()]));
        movies
            .expect_hide_batch()
            .withf(move |ids| ids == [gone_id])
            .returning(|ids| Ok(ids.len() as u64));

        let provider = MockMetadataProvider::new();
        let report = reconciler(movies, provider, dir.path()).run().await.unwrap();

        assert_eq!(report.hidden, 1);
        assert!(report.inserted.is_empty());
    }

    #[tokio::test]
    async fn second_run_after_insert_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Solaris.mkv"), b"x").unwrap();

        let existing = stored("Solaris.mkv", true);
        let mut movies = MockMovieRepository::new();
        movies
            .expect_list_all()
            .returning(move || Ok(vec![existing.clone()]));

        let provider = MockMetadataProvider::new();
        let report = reconciler(movies, provider, dir.path()).run().await.unwrap();

        assert!(report.inserted.is_empty());
        assert_eq!(report.hidden, 0);
    }
}
