use async_trait::async_trait;
use reelvault_model::{MovieRecord, User};
use uuid::Uuid;

use crate::error::Result;

/// Persistence port for catalog entries.
///
/// `file_path` is the natural key of the catalog. Implementations must
/// surface duplicate-path writes as [`crate::CoreError::Conflict`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Every record, visible or not. This is the reconciler's snapshot.
    async fn list_all(&self) -> Result<Vec<MovieRecord>>;

    /// Records currently backed by a file on disk.
    async fn list_visible(&self) -> Result<Vec<MovieRecord>>;

    async fn get(&self, id: Uuid) -> Result<Option<MovieRecord>>;

    async fn create(&self, record: &MovieRecord) -> Result<()>;

    /// Insert many records atomically. All or none are persisted.
    async fn insert_batch(&self, records: &[MovieRecord]) -> Result<()>;

    async fn update(&self, record: &MovieRecord) -> Result<()>;

    /// Flip `visible` off for the given ids, returning how many rows changed.
    async fn hide_batch(&self, ids: &[Uuid]) -> Result<u64>;

    /// Returns false when no record with the id existed.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Persistence port for accounts. Email is unique.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<()>;

    async fn get(&self, id: Uuid) -> Result<Option<User>>;

    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn list(&self) -> Result<Vec<User>>;

    async fn update(&self, user: &User) -> Result<()>;

    async fn delete(&self, id: Uuid) -> Result<bool>;
}
