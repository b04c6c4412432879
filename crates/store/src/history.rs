//! Recent-search history repository (PRD-04).
//!
//! An append-only list of past searches, newest first, capped at
//! [`MAX_RECENT_SEARCHES`]. Each entry snapshots the results it returned
//! so the history screen can re-render them without re-running the search.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use flowmart_core::catalog::Template;
use flowmart_core::search::{clamp_recent_limit, SearchMode, MAX_RECENT_SEARCHES};
use flowmart_core::types::Timestamp;

use crate::error::StoreError;
use crate::kv::KvStore;

/// Store key for the recent-search list.
pub const RECENT_SEARCHES_KEY: &str = "recent_searches";

/// One persisted search: the query, how it was issued, when, and a
/// snapshot of the results it returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSearch {
    pub query: String,
    pub mode: SearchMode,
    pub searched_at: Timestamp,
    pub results: Vec<Template>,
}

/// Repository over the persisted recent-search list.
#[derive(Clone)]
pub struct HistoryRepo {
    store: Arc<dyn KvStore>,
}

impl HistoryRepo {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    async fn load(&self) -> Result<Vec<RecentSearch>, StoreError> {
        match self.store.get(RECENT_SEARCHES_KEY).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Vec::new()),
        }
    }

    /// Prepend one search; entries beyond the cap are evicted oldest-first.
    pub async fn record(&self, entry: RecentSearch) -> Result<(), StoreError> {
        let mut entries = self.load().await?;
        entries.insert(0, entry);
        entries.truncate(MAX_RECENT_SEARCHES);

        self.store
            .put(RECENT_SEARCHES_KEY, serde_json::to_value(&entries)?)
            .await
    }

    /// Most recent searches, newest first, clamped to the listing limit.
    pub async fn list(&self, limit: Option<usize>) -> Result<Vec<RecentSearch>, StoreError> {
        let mut entries = self.load().await?;
        entries.truncate(clamp_recent_limit(limit));
        Ok(entries)
    }

    /// Number of persisted entries.
    pub async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.load().await?.len())
    }

    /// Drop the whole history.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.delete(RECENT_SEARCHES_KEY).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
