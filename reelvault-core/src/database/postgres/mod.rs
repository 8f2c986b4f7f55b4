mod movies;
mod users;

pub use movies::PostgresMovieRepository;
pub use users::PostgresUserRepository;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::error::{CoreError, Result};

/// Connect to Postgres with a bounded pool.
pub async fn connect(database_url: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|e| CoreError::Internal(format!("failed to connect to database: {e}")))
}

/// Apply the embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| CoreError::Internal(format!("failed to run migrations: {e}")))
}

pub(crate) fn storage_error(context: &str, err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return CoreError::Conflict(format!("{context}: duplicate key"));
        }
    }
    CoreError::Internal(format!("{context}: {err}"))
}
