use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reelvault_model::{EnrichmentStatus, MovieRecord, TmdbMetadata};
use sqlx::PgPool;
use uuid::Uuid;

use super::storage_error;
use crate::database::ports::MovieRepository;
use crate::error::{CoreError, Result};

#[derive(Debug, Clone)]
pub struct PostgresMovieRepository {
    pool: PgPool,
}

impl PostgresMovieRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, file_path, title, visible, enrichment,
           tmdb_id, original_title, overview, release_date, runtime,
           director, genres, poster_path, original_language,
           vote_average, vote_count, trailer_url, created_at, updated_at
    FROM movies
"#;

const INSERT_MOVIE: &str = r#"
    INSERT INTO movies (
        id, file_path, title, visible, enrichment,
        tmdb_id, original_title, overview, release_date, runtime,
        director, genres, poster_path, original_language,
        vote_average, vote_count, trailer_url, created_at, updated_at
    ) VALUES (
        $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
        $11, $12, $13, $14, $15, $16, $17, $18, $19
    )
"#;

#[derive(sqlx::FromRow)]
struct MovieRow {
    id: Uuid,
    file_path: String,
    title: String,
    visible: bool,
    enrichment: String,
    tmdb_id: Option<i64>,
    original_title: Option<String>,
    overview: Option<String>,
    release_date: Option<NaiveDate>,
    runtime: Option<i32>,
    director: Option<String>,
    genres: Vec<String>,
    poster_path: Option<String>,
    original_language: Option<String>,
    vote_average: Option<f64>,
    vote_count: Option<i64>,
    trailer_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MovieRow> for MovieRecord {
    type Error = CoreError;

    fn try_from(row: MovieRow) -> Result<Self> {
        let enrichment = row
            .enrichment
            .parse::<EnrichmentStatus>()
            .map_err(|e| CoreError::Internal(format!("invalid enrichment column: {e}")))?;

        // The TMDB column group is all-or-nothing, keyed on tmdb_id.
        let metadata = row.tmdb_id.map(|tmdb_id| TmdbMetadata {
            tmdb_id,
            original_title: row.original_title.unwrap_or_default(),
            overview: row.overview,
            release_date: row.release_date,
            runtime: row.runtime,
            director: row.director,
            genres: row.genres,
            poster_path: row.poster_path,
            original_language: row.original_language,
            vote_average: row.vote_average,
            vote_count: row.vote_count,
            trailer_url: row.trailer_url,
        });

        Ok(MovieRecord {
            id: row.id,
            file_path: row.file_path,
            title: row.title,
            visible: row.visible,
            enrichment,
            metadata,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn bind_insert<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    record: &'q MovieRecord,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    let metadata = record.metadata.as_ref();
    query
        .bind(record.id)
        .bind(&record.file_path)
        .bind(&record.title)
        .bind(record.visible)
        .bind(record.enrichment.as_str())
        .bind(metadata.map(|m| m.tmdb_id))
        .bind(metadata.map(|m| m.original_title.as_str()))
        .bind(metadata.and_then(|m| m.overview.as_deref()))
        .bind(metadata.and_then(|m| m.release_date))
        .bind(metadata.and_then(|m| m.runtime))
        .bind(metadata.and_then(|m| m.director.as_deref()))
        .bind(metadata.map(|m| m.genres.clone()).unwrap_or_default())
        .bind(metadata.and_then(|m| m.poster_path.as_deref()))
        .bind(metadata.and_then(|m| m.original_language.as_deref()))
        .bind(metadata.and_then(|m| m.vote_average))
        .bind(metadata.and_then(|m| m.vote_count))
        .bind(metadata.and_then(|m| m.trailer_url.as_deref()))
        .bind(record.created_at)
        .bind(record.updated_at)
}

#[async_trait]
impl MovieRepository for PostgresMovieRepository {
    async fn list_all(&self) -> Result<Vec<MovieRecord>> {
        let rows: Vec<MovieRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} ORDER BY title ASC"))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| storage_error("failed to list movies", e))?;

        rows.into_iter().map(MovieRecord::try_from).collect()
    }

    async fn list_visible(&self) -> Result<Vec<MovieRecord>> {
        let rows: Vec<MovieRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} WHERE visible = TRUE ORDER BY title ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("failed to list visible movies", e))?;

        rows.into_iter().map(MovieRecord::try_from).collect()
    }

    async fn get(&self, id: Uuid) -> Result<Option<MovieRecord>> {
        let row: Option<MovieRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("failed to fetch movie", e))?;

        row.map(MovieRecord::try_from).transpose()
    }

    async fn create(&self, record: &MovieRecord) -> Result<()> {
        bind_insert(sqlx::query(INSERT_MOVIE), record)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("failed to insert movie", e))?;
        Ok(())
    }

    async fn insert_batch(&self, records: &[MovieRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("failed to begin transaction", e))?;

        for record in records {
            bind_insert(sqlx::query(INSERT_MOVIE), record)
                .execute(&mut *tx)
                .await
                .map_err(|e| storage_error("failed to insert movie batch", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| storage_error("failed to commit movie batch", e))?;
        Ok(())
    }

    async fn update(&self, record: &MovieRecord) -> Result<()> {
        let metadata = record.metadata.as_ref();
        let result = sqlx::query(
            r#"
            UPDATE movies SET
                file_path = $2, title = $3, visible = $4, enrichment = $5,
                tmdb_id = $6, original_title = $7, overview = $8,
                release_date = $9, runtime = $10, director = $11, genres = $12,
                poster_path = $13, original_language = $14, vote_average = $15,
                vote_count = $16, trailer_url = $17, updated_at = $18
            WHERE id = $1
            "#,
        )
        .bind(record.id)
        .bind(&record.file_path)
        .bind(&record.title)
        .bind(record.visible)
        .bind(record.enrichment.as_str())
        .bind(metadata.map(|m| m.tmdb_id))
        .bind(metadata.map(|m| m.original_title.as_str()))
        .bind(metadata.and_then(|m| m.overview.as_deref()))
        .bind(metadata.and_then(|m| m.release_date))
        .bind(metadata.and_then(|m| m.runtime))
        .bind(metadata.and_then(|m| m.director.as_deref()))
        .bind(metadata.map(|m| m.genres.clone()).unwrap_or_default())
        .bind(metadata.and_then(|m| m.poster_path.as_deref()))
        .bind(metadata.and_then(|m| m.original_language.as_deref()))
        .bind(metadata.and_then(|m| m.vote_average))
        .bind(metadata.and_then(|m| m.vote_count))
        .bind(metadata.and_then(|m| m.trailer_url.as_deref()))
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("failed to update movie", e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!("movie {}", record.id)));
        }
        Ok(())
    }

    async fn hide_batch(&self, ids: &[Uuid]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            "UPDATE movies SET visible = FALSE, updated_at = now() \
             WHERE visible = TRUE AND id = ANY($1)",
        )
        .bind(ids)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("failed to hide movies", e))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("failed to delete movie", e))?;

        Ok(result.rows_affected() > 0)
    }
}
