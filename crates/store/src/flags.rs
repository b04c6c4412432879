//! Persisted boolean flags (PRD-11).

use std::sync::Arc;

use serde_json::Value;

use crate::error::StoreError;
use crate::kv::KvStore;

/// Store key for the tour-completion flag.
pub const TOUR_COMPLETED_KEY: &str = "tour_completed";

/// Repository over the flags the UI persists between sessions.
#[derive(Clone)]
pub struct FlagRepo {
    store: Arc<dyn KvStore>,
}

impl FlagRepo {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Whether the viewer has already completed (or skipped) the guided
    /// tour. Absent or non-boolean values read as `false`.
    pub async fn tour_completed(&self) -> Result<bool, StoreError> {
        Ok(self
            .store
            .get(TOUR_COMPLETED_KEY)
            .await?
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    /// Persist the tour-completion flag.
    pub async fn set_tour_completed(&self, completed: bool) -> Result<(), StoreError> {
        self.store
            .put(TOUR_COMPLETED_KEY, Value::Bool(completed))
            .await
    }
}
