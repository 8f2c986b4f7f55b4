use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use reelvault_core::{CatalogReconciler, SyncReport};
use reelvault_model::{
    EnrichmentStatus, MovieRecord, MovieSummary, TmdbMetadata, User, UserRole,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::infra::{AppError, AppResult, AppState};

/// Catalog entry as served over the API.
///
/// `file_path` reveals server filesystem layout, so it is only present for
/// admin-or-better callers.
#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: Uuid,
    pub title: String,
    pub visible: bool,
    pub enrichment: EnrichmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TmdbMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MovieResponse {
    fn from_record(record: MovieRecord, include_path: bool) -> Self {
        Self {
            id: record.id,
            title: record.title,
            visible: record.visible,
            enrichment: record.enrichment,
            metadata: record.metadata,
            file_path: include_path.then_some(record.file_path),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

fn is_admin(user: Option<&User>) -> bool {
    user.is_some_and(|user| user.role.has_permission_level(UserRole::Admin))
}

pub async fn list_movies(
    State(state): State<AppState>,
    user: Option<Extension<User>>,
) -> AppResult<Json<Vec<MovieResponse>>> {
    let include_path = is_admin(user.as_deref());
    let movies = state
        .movies
        .list_all()
        .await?
        .into_iter()
        .map(|record| MovieResponse::from_record(record, include_path))
        .collect();
    Ok(Json(movies))
}

/// Anonymous browse endpoint: visible entries only, trimmed projection.
pub async fn list_public_movies(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<MovieSummary>>> {
    let movies = state
        .movies
        .list_visible()
        .await?
        .iter()
        .map(MovieSummary::from)
        .collect();
    Ok(Json(movies))
}

pub async fn get_movie(
    State(state): State<AppState>,
    user: Option<Extension<User>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MovieResponse>> {
    let record = state
        .movies
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("movie {id}")))?;

    Ok(Json(MovieResponse::from_record(
        record,
        is_admin(user.as_deref()),
    )))
}

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub title: String,
    pub file_path: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub visible: Option<bool>,
}

/// Manual catalog entry, stored as an unenriched placeholder. The next sync
/// run leaves it alone as long as the file stays on disk.
pub async fn create_movie(
    State(state): State<AppState>,
    Json(request): Json<CreateMovieRequest>,
) -> AppResult<(StatusCode, Json<MovieResponse>)> {
    if request.title.trim().is_empty() {
        return Err(AppError::bad_request("Title must not be empty"));
    }
    if request.file_path.trim().is_empty() {
        return Err(AppError::bad_request("File path must not be empty"));
    }

    let now = Utc::now();
    let record = MovieRecord {
        id: Uuid::new_v4(),
        file_path: request.file_path,
        title: request.title.trim().to_string(),
        visible: request.visible,
        enrichment: EnrichmentStatus::None,
        metadata: None,
        created_at: now,
        updated_at: now,
    };

    state.movies.create(&record).await?;
    info!(movie_id = %record.id, "created catalog entry");

    Ok((
        StatusCode::CREATED,
        Json(MovieResponse::from_record(record, true)),
    ))
}

pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMovieRequest>,
) -> AppResult<Json<MovieResponse>> {
    let mut record = state
        .movies
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("movie {id}")))?;

    if let Some(title) = request.title {
        if title.trim().is_empty() {
            return Err(AppError::bad_request("Title must not be empty"));
        }
        record.title = title.trim().to_string();
    }
    if let Some(visible) = request.visible {
        record.visible = visible;
    }
    record.updated_at = Utc::now();

    state.movies.update(&record).await?;
    Ok(Json(MovieResponse::from_record(record, true)))
}

pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.movies.delete(id).await? {
        return Err(AppError::not_found(format!("movie {id}")));
    }
    info!(movie_id = %id, "deleted catalog entry");
    Ok(StatusCode::NO_CONTENT)
}

/// Kick off a full reconciliation of the media directory.
pub async fn sync_catalog(State(state): State<AppState>) -> AppResult<Json<SyncReport>> {
    let reconciler = CatalogReconciler::new(
        state.movies.clone(),
        state.provider.clone(),
        state.config.media.root.clone(),
        state.config.tmdb.image_base_url.clone(),
    );

    let report = reconciler.run().await?;
    Ok(Json(report))
}
