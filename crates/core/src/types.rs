//! Shared type aliases used across the workspace.

use chrono::{DateTime, Utc};

/// Identifier for catalog entities (templates, categories by ordinal).
pub type TemplateId = i64;

/// UTC timestamp used on all domain records.
pub type Timestamp = DateTime<Utc>;
