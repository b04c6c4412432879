//! Catalog search, filtering, and ordering (PRD-07).
//!
//! [`apply`] is a pure function of its inputs, recomputed synchronously on
//! every keystroke or selection change. No caching, no side effects; an
//! empty result is a valid output (the service layer distinguishes it from
//! "not yet searched").

use serde::{Deserialize, Serialize};

use crate::catalog::{CATEGORY_ALL, Template};

// ---------------------------------------------------------------------------
// Ordering weights
// ---------------------------------------------------------------------------

/// Weight of downloads in the popularity score (`likes + w * downloads`).
pub const POPULARITY_DOWNLOAD_WEIGHT: f64 = 0.1;

// ---------------------------------------------------------------------------
// History limits
// ---------------------------------------------------------------------------

/// Maximum number of persisted recent searches.
pub const MAX_RECENT_SEARCHES: usize = 50;

/// Default number of recent searches returned to a listing surface.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Clamp a caller-provided recent-search listing limit to valid bounds.
pub fn clamp_recent_limit(limit: Option<usize>) -> usize {
    limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .clamp(1, MAX_RECENT_SEARCHES)
}

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Ordering applied to filtered results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Weighted popularity, descending (the default).
    #[default]
    Popular,
    /// Last-updated timestamp, descending.
    Recent,
    /// Rating, descending.
    Rating,
    /// Download count, descending.
    Downloads,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::Recent => "recent",
            Self::Rating => "rating",
            Self::Downloads => "downloads",
        }
    }
}

/// How the search was issued. Simple is the plain keyword box; assisted
/// runs the query through the analyzer first and is gated more tightly
/// for free viewers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    #[default]
    Simple,
    Assisted,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Assisted => "assisted",
        }
    }
}

/// One search as issued by the browsing screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text needle; empty matches everything.
    pub query: String,
    /// Category id, or [`CATEGORY_ALL`] to bypass the category filter.
    pub category: String,
    pub sort: SortKey,
    pub mode: SearchMode,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: CATEGORY_ALL.to_string(),
            sort: SortKey::default(),
            mode: SearchMode::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Case-insensitive substring match over name, description, author, and
/// any tag. An empty or whitespace-only query matches everything.
pub fn matches_query(template: &Template, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    template.name.to_lowercase().contains(&needle)
        || template.description.to_lowercase().contains(&needle)
        || template.author.to_lowercase().contains(&needle)
        || template
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&needle))
}

/// Exact category id match; the sentinel [`CATEGORY_ALL`] admits every record.
pub fn matches_category(template: &Template, category: &str) -> bool {
    category == CATEGORY_ALL || template.category == category
}

/// Weighted popularity used by the default ordering.
pub fn popularity_score(template: &Template) -> f64 {
    template.likes as f64 + POPULARITY_DOWNLOAD_WEIGHT * template.downloads as f64
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Filter and order catalog records for one search.
///
/// Category filter first (exact id, bypassed for `"all"`), then the text
/// filter, then a stable sort keyed by `query.sort` so ties keep their
/// original catalog order.
///
/// # Examples
///
/// ```
/// use flowmart_core::catalog::seed_templates;
/// use flowmart_core::search::{apply, SearchQuery};
///
/// let everything = apply(&seed_templates(), &SearchQuery::default());
/// assert_eq!(everything.len(), seed_templates().len());
///
/// let none = apply(
///     &seed_templates(),
///     &SearchQuery {
///         query: "no such template".to_string(),
///         ..SearchQuery::default()
///     },
/// );
/// assert!(none.is_empty());
/// ```
pub fn apply(records: &[Template], query: &SearchQuery) -> Vec<Template> {
    let mut results: Vec<Template> = records
        .iter()
        .filter(|t| matches_category(t, &query.category))
        .filter(|t| matches_query(t, &query.query))
        .cloned()
        .collect();

    // Vec::sort_by is stable, which the tie-break contract relies on.
    match query.sort {
        SortKey::Popular => results
            .sort_by(|a, b| popularity_score(b).total_cmp(&popularity_score(a))),
        SortKey::Recent => results.sort_by(|a, b| b.meta.updated_at.cmp(&a.meta.updated_at)),
        SortKey::Rating => results.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortKey::Downloads => results.sort_by(|a, b| b.downloads.cmp(&a.downloads)),
    }

    results
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
