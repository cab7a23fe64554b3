use crate::models::{MemberId, VisitFilter, VisitRecord};
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("visit store is not ready")]
    Unavailable,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::Other(err.into())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Append-only log of member visits.
///
/// Reads against a store whose schema does not exist yet return empty results
/// instead of failing, so dashboards degrade to "no data".
#[async_trait]
pub trait VisitStore: Send + Sync {
    /// Initialize the storage (create the visit table and its indexes)
    async fn init(&self) -> Result<()>;

    /// Whether the visit table exists and can accept writes
    async fn is_ready(&self) -> bool;

    /// Append a visit. Fails with [`StorageError::Unavailable`] before `init`.
    async fn append(&self, member_id: MemberId, created_at: i64) -> StorageResult<VisitRecord>;

    /// All visits matching the filter, in insertion order
    async fn query(&self, filter: &VisitFilter) -> StorageResult<Vec<VisitRecord>>;

    /// Earliest visit timestamp for a member
    async fn first_visit(&self, member_id: MemberId) -> StorageResult<Option<i64>>;

    /// Latest visit timestamp for a member
    async fn last_visit(&self, member_id: MemberId) -> StorageResult<Option<i64>>;

    /// Number of visits logged for a member
    async fn count_for(&self, member_id: MemberId) -> StorageResult<i64>;
}
