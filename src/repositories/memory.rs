// src/repositories/memory.rs - Process-local storage for tests and local runs
use std::{
    collections::{BTreeMap, HashMap},
    sync::atomic::{AtomicI64, Ordering},
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::url_entry::{RepoResult, UrlEntryRepositoryTrait};
use crate::errors::RepositoryError;
use crate::models::UrlEntry;

#[derive(Default)]
struct Entries {
    by_id: BTreeMap<i64, UrlEntry>,
    // long URL -> id
    by_long_url: HashMap<String, i64>,
}

/// Keeps entries in memory; everything is lost on restart.
pub struct InMemoryUrlEntryRepository {
    entries: RwLock<Entries>,
    sequence: AtomicI64,
}

impl InMemoryUrlEntryRepository {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Sequence starts at `first_id` instead of 1
    pub fn starting_at(first_id: i64) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            sequence: AtomicI64::new(first_id),
        }
    }
}

impl Default for InMemoryUrlEntryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlEntryRepositoryTrait for InMemoryUrlEntryRepository {
    async fn next_id(&self) -> RepoResult<i64> {
        Ok(self.sequence.fetch_add(1, Ordering::SeqCst))
    }

    async fn insert(&self, entry: &UrlEntry) -> RepoResult<UrlEntry> {
        let mut entries = self.entries.write().await;

        if entries.by_id.contains_key(&entry.id) {
            return Err(RepositoryError::Conflict(format!(
                "Identifier {} is already used",
                entry.id
            )));
        }
        if entries.by_long_url.contains_key(&entry.long_url) {
            return Err(RepositoryError::Conflict("URL entry already exists".to_string()));
        }

        entries.by_long_url.insert(entry.long_url.clone(), entry.id);
        entries.by_id.insert(entry.id, entry.clone());
        Ok(entry.clone())
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<UrlEntry>> {
        Ok(self.entries.read().await.by_id.get(&id).cloned())
    }

    async fn find_by_long_url(&self, long_url: &str) -> RepoResult<Option<UrlEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .by_long_url
            .get(long_url)
            .and_then(|id| entries.by_id.get(id))
            .cloned())
    }

    async fn find_all(&self, limit: Option<i64>, offset: Option<i64>) -> RepoResult<Vec<UrlEntry>> {
        let to_count = |value: Option<i64>, name: &str| -> RepoResult<Option<usize>> {
            value
                .map(|v| {
                    usize::try_from(v).map_err(|_| {
                        RepositoryError::InvalidData(format!("{} must not be negative", name))
                    })
                })
                .transpose()
        };
        let limit = to_count(limit, "limit")?.unwrap_or(usize::MAX);
        let offset = to_count(offset, "offset")?.unwrap_or(0);

        let entries = self.entries.read().await;
        Ok(entries
            .by_id
            .values()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}
