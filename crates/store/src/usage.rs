//! Free-tier usage counters (PRD-09).
//!
//! Tracks how many search results a free viewer has consumed per mode so
//! the visibility partition can charge later searches against the
//! remaining budget.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use flowmart_core::search::SearchMode;

use crate::error::StoreError;
use crate::kv::KvStore;

/// Store key for the per-mode usage counters.
pub const SEARCH_USAGE_KEY: &str = "search_usage";

/// Results consumed so far, per search mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchUsage {
    pub simple: usize,
    pub assisted: usize,
}

impl SearchUsage {
    pub fn for_mode(&self, mode: SearchMode) -> usize {
        match mode {
            SearchMode::Simple => self.simple,
            SearchMode::Assisted => self.assisted,
        }
    }

    fn add(&mut self, mode: SearchMode, count: usize) {
        let slot = match mode {
            SearchMode::Simple => &mut self.simple,
            SearchMode::Assisted => &mut self.assisted,
        };
        *slot = slot.saturating_add(count);
    }
}

/// Repository over the persisted usage counters.
#[derive(Clone)]
pub struct UsageRepo {
    store: Arc<dyn KvStore>,
}

impl UsageRepo {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub async fn current(&self) -> Result<SearchUsage, StoreError> {
        match self.store.get(SEARCH_USAGE_KEY).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(SearchUsage::default()),
        }
    }

    /// Results already consumed in `mode`.
    pub async fn consumed(&self, mode: SearchMode) -> Result<usize, StoreError> {
        Ok(self.current().await?.for_mode(mode))
    }

    /// Charge `count` consumed results against `mode`; returns the
    /// updated counters.
    pub async fn add(&self, mode: SearchMode, count: usize) -> Result<SearchUsage, StoreError> {
        let mut usage = self.current().await?;
        usage.add(mode, count);
        self.store
            .put(SEARCH_USAGE_KEY, serde_json::to_value(usage)?)
            .await?;
        Ok(usage)
    }

    /// Reset both counters to zero.
    pub async fn reset(&self) -> Result<(), StoreError> {
        self.store.delete(SEARCH_USAGE_KEY).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
