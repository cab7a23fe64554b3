use crate::models::{MemberId, VisitFilter, VisitRecord};
use crate::storage::{StorageError, StorageResult, VisitStore};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct SqliteStorage {
    pool: Arc<SqlitePool>,
    ready: AtomicBool,
}

impl SqliteStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
            ready: AtomicBool::new(false),
        })
    }

    async fn table_exists(&self) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM sqlite_master
            WHERE type = 'table' AND name = 'member_visits'
            "#,
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count > 0)
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &VisitFilter) {
    builder.push(" WHERE 1 = 1");

    if let Some(start) = filter.start {
        builder.push(" AND created_at >= ").push_bind(start);
    }

    if let Some(end) = filter.end {
        builder.push(" AND created_at <= ").push_bind(end);
    }

    if let Some(member_ids) = filter.member_ids.as_ref() {
        // One JSON parameter regardless of how many members matched;
        // SQLite caps the number of bound variables per statement.
        let ids = serde_json::Value::from(member_ids.clone()).to_string();
        builder
            .push(" AND member_id IN (SELECT value FROM json_each(")
            .push_bind(ids)
            .push("))");
    }
}

#[async_trait]
impl VisitStore for SqliteStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS member_visits (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                member_id INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_member_visits_member ON member_visits(member_id, created_at)",
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_member_visits_created ON member_visits(created_at)",
        )
        .execute(self.pool.as_ref())
        .await?;

        self.ready.store(true, Ordering::Release);
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        if self.ready.load(Ordering::Acquire) {
            return true;
        }

        match self.table_exists().await {
            Ok(true) => {
                self.ready.store(true, Ordering::Release);
                true
            }
            Ok(false) => false,
            Err(e) => {
                tracing::warn!(error = %e, "failed to probe visit table");
                false
            }
        }
    }

    async fn append(&self, member_id: MemberId, created_at: i64) -> StorageResult<VisitRecord> {
        if !self.is_ready().await {
            return Err(StorageError::Unavailable);
        }

        let record = sqlx::query_as::<_, VisitRecord>(
            r#"
            INSERT INTO member_visits (member_id, created_at)
            VALUES (?, ?)
            RETURNING id, member_id, created_at
            "#,
        )
        .bind(member_id)
        .bind(created_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(record)
    }

    async fn query(&self, filter: &VisitFilter) -> StorageResult<Vec<VisitRecord>> {
        if !self.is_ready().await {
            return Ok(vec![]);
        }

        let mut builder =
            QueryBuilder::<Sqlite>::new("SELECT id, member_id, created_at FROM member_visits");
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY id ASC");

        let records = builder
            .build_query_as::<VisitRecord>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(records)
    }

    async fn first_visit(&self, member_id: MemberId) -> StorageResult<Option<i64>> {
        if !self.is_ready().await {
            return Ok(None);
        }

        let created_at = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT created_at FROM member_visits
            WHERE member_id = ?
            ORDER BY created_at ASC, id ASC
            LIMIT 1
            "#,
        )
        .bind(member_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(created_at)
    }

    async fn last_visit(&self, member_id: MemberId) -> StorageResult<Option<i64>> {
        if !self.is_ready().await {
            return Ok(None);
        }

        let created_at = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT created_at FROM member_visits
            WHERE member_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(member_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(created_at)
    }

    async fn count_for(&self, member_id: MemberId) -> StorageResult<i64> {
        if !self.is_ready().await {
            return Ok(0);
        }

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM member_visits WHERE member_id = ?",
        )
        .bind(member_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }
}
