// src/repositories/url_entry.rs - Data access
use async_trait::async_trait;
use log::debug;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use crate::db::Database;
use crate::errors::RepositoryError;
use crate::models::UrlEntry;

pub type RepoResult<T> = Result<T, RepositoryError>;

const ENTRY_COLUMNS: &str = "id, long_url, short_url, created_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlEntryRepositoryTrait: Send + Sync {
    /// Reserves the next identifier of the sequence
    ///
    /// Identifiers are strictly increasing and never handed out twice, even
    /// when the entry they were reserved for is never inserted.
    ///
    /// ### Errors
    /// * `RepositoryError::Database` - If a database error occurs
    async fn next_id(&self) -> RepoResult<i64>;

    /// Saves an entry whose id was reserved with `next_id`
    ///
    /// ### Returns
    /// * `Result<UrlEntry>` - The entry as stored
    ///
    /// ### Errors
    /// * `RepositoryError::Conflict` - If the id, token or long URL is already stored
    /// * `RepositoryError::Database` - If a database error occurs
    async fn insert(&self, entry: &UrlEntry) -> RepoResult<UrlEntry>;

    /// Finds an entry by the identifier its token decodes to
    ///
    /// ### Returns
    /// * `Result<Option<UrlEntry>>` - The entry if found, or `None`
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<UrlEntry>>;

    /// Finds the entry already stored for a long URL
    ///
    /// ### Returns
    /// * `Result<Option<UrlEntry>>` - The entry if found, or `None`
    async fn find_by_long_url(&self, long_url: &str) -> RepoResult<Option<UrlEntry>>;

    /// Lists entries, newest first
    ///
    /// ### Arguments
    /// * `limit` - The maximum number of records to return (optional)
    /// * `offset` - The number of records to skip (optional)
    async fn find_all(&self, limit: Option<i64>, offset: Option<i64>) -> RepoResult<Vec<UrlEntry>>;
}

// Implementation using actual database
pub struct PgUrlEntryRepository {
    pool: PgPool,
}

impl PgUrlEntryRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.get_pool().clone(),
        }
    }

    // Helper method for transactions
    async fn begin_transaction(&self) -> RepoResult<Transaction<'_, Postgres>> {
        self.pool.begin().await.map_err(|e| {
            log::error!("Failed to start database transaction: {}", e);
            RepositoryError::Database(e)
        })
    }
}

#[async_trait]
impl UrlEntryRepositoryTrait for PgUrlEntryRepository {
    async fn next_id(&self) -> RepoResult<i64> {
        let id = sqlx::query_scalar::<_, i64>("SELECT nextval('url_entries_id_seq')")
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::Database)?;

        debug!("Reserved identifier {}", id);
        Ok(id)
    }

    async fn insert(&self, entry: &UrlEntry) -> RepoResult<UrlEntry> {
        let mut tx = self.begin_transaction().await?;

        let query = format!(
            "INSERT INTO url_entries (id, long_url, short_url, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            ENTRY_COLUMNS
        );
        let record = sqlx::query_as::<_, UrlEntry>(&query)
            .bind(entry.id)
            .bind(&entry.long_url)
            .bind(&entry.short_url)
            .bind(entry.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                log::error!("Failed to insert URL entry: {}", e);
                RepositoryError::from(e)
            })?;

        tx.commit().await.map_err(|e| {
            log::error!("Failed to commit transaction: {}", e);
            RepositoryError::Database(e)
        })?;

        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<UrlEntry>> {
        let query = format!("SELECT {} FROM url_entries WHERE id = $1", ENTRY_COLUMNS);
        sqlx::query_as::<_, UrlEntry>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::Database)
    }

    async fn find_by_long_url(&self, long_url: &str) -> RepoResult<Option<UrlEntry>> {
        let query = format!(
            "SELECT {} FROM url_entries WHERE long_url = $1",
            ENTRY_COLUMNS
        );
        sqlx::query_as::<_, UrlEntry>(&query)
            .bind(long_url)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::Database)
    }

    async fn find_all(&self, limit: Option<i64>, offset: Option<i64>) -> RepoResult<Vec<UrlEntry>> {
        let mut query_builder = QueryBuilder::<Postgres>::new("SELECT ");
        query_builder.push(ENTRY_COLUMNS);
        query_builder.push(" FROM url_entries ORDER BY id DESC");

        if let Some(limit) = limit {
            query_builder.push(" LIMIT ");
            query_builder.push_bind(limit);
        }

        if let Some(offset) = offset {
            query_builder.push(" OFFSET ");
            query_builder.push_bind(offset);
        }

        let results = query_builder
            .build_query_as::<UrlEntry>()
            .fetch_all(&self.pool)
            .await?;

        Ok(results)
    }
}
