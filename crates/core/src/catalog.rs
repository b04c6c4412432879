//! Template catalog records and seed data (PRD-02).
//!
//! The catalog is an immutable in-memory list of [`Template`] records.
//! Per-viewer derived state (bookmarks, local like deltas) lives in the
//! [`Engagement`] overlay so the records themselves are never mutated.

use std::collections::{HashMap, HashSet};

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{TemplateId, Timestamp};

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Sentinel category id that bypasses category filtering.
pub const CATEGORY_ALL: &str = "all";

/// Category ids a template may belong to.
pub const CATEGORY_IDS: &[&str] = &[
    "ai",
    "automation",
    "marketing",
    "sales",
    "productivity",
    "integration",
];

/// Check whether a category id is known (the sentinel counts).
pub fn is_valid_category(id: &str) -> bool {
    id == CATEGORY_ALL || CATEGORY_IDS.contains(&id)
}

// ---------------------------------------------------------------------------
// Template record
// ---------------------------------------------------------------------------

/// Authoring difficulty of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Human-readable label for badges.
    pub fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

/// Nested template metadata (difficulty and lifecycle timestamps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateMeta {
    pub difficulty: Difficulty,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A shareable workflow definition shown in library and search surfaces.
///
/// Records are immutable once created; tag order is preserved for display
/// while matching treats tags as a set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    pub author: String,
    /// One of [`CATEGORY_IDS`].
    pub category: String,
    pub tags: Vec<String>,
    pub rating: f64,
    pub downloads: i64,
    pub likes: i64,
    pub meta: TemplateMeta,
}

/// Look up a template by id.
pub fn template_by_id(records: &[Template], id: TemplateId) -> Result<&Template, CoreError> {
    records
        .iter()
        .find(|t| t.id == id)
        .ok_or(CoreError::NotFound {
            entity: "template",
            id,
        })
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

/// Midnight UTC for a calendar date. Seed dates are all valid, but the
/// constructor still degrades to the epoch rather than panicking.
fn ts(year: i32, month: u32, day: u32) -> Timestamp {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// The built-in catalog shown before any backend is wired up.
pub fn seed_templates() -> Vec<Template> {
    vec![
        Template {
            id: 1,
            name: "AI Email Responder".to_string(),
            description: "Automatically draft replies to incoming Gmail messages with an LLM \
                          and your tone presets."
                .to_string(),
            author: "Maya Chen".to_string(),
            category: "ai".to_string(),
            tags: ["email", "ai", "gmail"].map(String::from).to_vec(),
            rating: 4.8,
            downloads: 12_400,
            likes: 342,
            meta: TemplateMeta {
                difficulty: Difficulty::Intermediate,
                created_at: ts(2024, 11, 2),
                updated_at: ts(2025, 6, 18),
            },
        },
        Template {
            id: 2,
            name: "Invoice Data Extractor".to_string(),
            description: "Pull totals, dates, and line items out of PDF invoices into a \
                          structured sheet."
                .to_string(),
            author: "Tom Okafor".to_string(),
            category: "automation".to_string(),
            tags: ["pdf", "ocr", "finance"].map(String::from).to_vec(),
            rating: 4.6,
            downloads: 8_900,
            likes: 256,
            meta: TemplateMeta {
                difficulty: Difficulty::Advanced,
                created_at: ts(2024, 8, 15),
                updated_at: ts(2025, 3, 22),
            },
        },
        Template {
            id: 3,
            name: "Social Post Scheduler".to_string(),
            description: "Queue a week of posts across three networks from one content \
                          calendar."
                .to_string(),
            author: "Ana Petrova".to_string(),
            category: "marketing".to_string(),
            tags: ["social", "calendar", "buffer"].map(String::from).to_vec(),
            rating: 4.3,
            downloads: 15_200,
            likes: 118,
            meta: TemplateMeta {
                difficulty: Difficulty::Beginner,
                created_at: ts(2025, 1, 10),
                updated_at: ts(2025, 7, 30),
            },
        },
        Template {
            id: 4,
            name: "Lead Scoring Pipeline".to_string(),
            description: "Score inbound leads nightly from CRM activity and firmographic \
                          data."
                .to_string(),
            author: "Diego Ramos".to_string(),
            category: "sales".to_string(),
            tags: ["crm", "scoring", "hubspot"].map(String::from).to_vec(),
            rating: 4.9,
            downloads: 6_100,
            likes: 410,
            meta: TemplateMeta {
                difficulty: Difficulty::Advanced,
                created_at: ts(2024, 5, 27),
                updated_at: ts(2025, 5, 9),
            },
        },
        Template {
            id: 5,
            name: "Standup Digest Bot".to_string(),
            description: "Collect async standup notes and post a morning digest to the team \
                          channel."
                .to_string(),
            author: "Priya Nair".to_string(),
            category: "productivity".to_string(),
            tags: ["slack", "digest", "standup"].map(String::from).to_vec(),
            rating: 4.1,
            downloads: 4_300,
            likes: 97,
            meta: TemplateMeta {
                difficulty: Difficulty::Beginner,
                created_at: ts(2025, 2, 14),
                updated_at: ts(2025, 4, 2),
            },
        },
        Template {
            id: 6,
            name: "Webhook to Sheets Sync".to_string(),
            description: "Stream webhook events into an append-only spreadsheet with \
                          retry-safe dedup."
                .to_string(),
            author: "Leo Fischer".to_string(),
            category: "integration".to_string(),
            tags: ["webhook", "sheets", "sync"].map(String::from).to_vec(),
            rating: 4.7,
            downloads: 14_980,
            likes: 200,
            meta: TemplateMeta {
                difficulty: Difficulty::Intermediate,
                created_at: ts(2024, 9, 30),
                updated_at: ts(2025, 8, 11),
            },
        },
        Template {
            id: 7,
            name: "Churn Alert Radar".to_string(),
            description: "Watch product usage signals and alert success managers before \
                          accounts go quiet."
                .to_string(),
            author: "Sara Kim".to_string(),
            category: "sales".to_string(),
            tags: ["alerts", "analytics", "retention"]
                .map(String::from)
                .to_vec(),
            rating: 4.5,
            downloads: 5_200,
            likes: 233,
            meta: TemplateMeta {
                difficulty: Difficulty::Intermediate,
                created_at: ts(2024, 12, 5),
                updated_at: ts(2025, 1, 19),
            },
        },
        Template {
            id: 8,
            name: "Meeting Notes Summarizer".to_string(),
            description: "Turn call transcripts into action items and a two-paragraph \
                          summary."
                .to_string(),
            author: "Omar Haddad".to_string(),
            category: "ai".to_string(),
            tags: ["meetings", "summary", "transcripts"]
                .map(String::from)
                .to_vec(),
            rating: 4.4,
            downloads: 9_800,
            likes: 305,
            meta: TemplateMeta {
                difficulty: Difficulty::Beginner,
                created_at: ts(2025, 3, 8),
                updated_at: ts(2025, 8, 1),
            },
        },
    ]
}

// ---------------------------------------------------------------------------
// Engagement overlay
// ---------------------------------------------------------------------------

/// Per-viewer derived state kept alongside the immutable catalog:
/// bookmark flags and local like deltas. Neither feeds the sort order.
#[derive(Debug, Clone, Default)]
pub struct Engagement {
    bookmarked: HashSet<TemplateId>,
    like_deltas: HashMap<TemplateId, i64>,
}

impl Engagement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the bookmark for a template; returns the new state.
    pub fn toggle_bookmark(&mut self, id: TemplateId) -> bool {
        if self.bookmarked.remove(&id) {
            false
        } else {
            self.bookmarked.insert(id);
            true
        }
    }

    pub fn is_bookmarked(&self, id: TemplateId) -> bool {
        self.bookmarked.contains(&id)
    }

    /// Record one local like for a template.
    pub fn record_like(&mut self, id: TemplateId) {
        let delta = self.like_deltas.entry(id).or_insert(0);
        *delta = delta.saturating_add(1);
    }

    /// Stored likes plus any local delta.
    pub fn likes_for(&self, template: &Template) -> i64 {
        let delta = self.like_deltas.get(&template.id).copied().unwrap_or(0);
        template.likes.saturating_add(delta)
    }
}

// ---------------------------------------------------------------------------
// Catalog stats
// ---------------------------------------------------------------------------

/// Aggregate figures for the landing-page stats strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CatalogStats {
    pub template_count: usize,
    pub total_downloads: i64,
    pub average_rating: f64,
    pub category_count: usize,
}

/// Compute catalog aggregates. An empty catalog yields a zero rating.
pub fn stats(records: &[Template]) -> CatalogStats {
    let total_downloads = records.iter().map(|t| t.downloads).sum();
    let average_rating = if records.is_empty() {
        0.0
    } else {
        records.iter().map(|t| t.rating).sum::<f64>() / records.len() as f64
    };
    let categories: HashSet<&str> = records.iter().map(|t| t.category.as_str()).collect();

    CatalogStats {
        template_count: records.len(),
        total_downloads,
        average_rating,
        category_count: categories.len(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    // -- seed data -----------------------------------------------------------

    #[test]
    fn seed_has_eight_templates_with_unique_ids() {
        let seed = seed_templates();
        assert_eq!(seed.len(), 8);

        let ids: HashSet<TemplateId> = seed.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), seed.len());
    }

    #[test]
    fn seed_categories_are_valid() {
        for template in seed_templates() {
            assert!(
                is_valid_category(&template.category),
                "unknown category '{}' on template {}",
                template.category,
                template.id
            );
            assert_ne!(template.category, CATEGORY_ALL);
        }
    }

    #[test]
    fn seed_fields_are_populated() {
        for template in seed_templates() {
            assert!(!template.name.is_empty());
            assert!(!template.description.is_empty());
            assert!(!template.author.is_empty());
            assert!(!template.tags.is_empty());
            assert!(template.rating > 0.0 && template.rating <= 5.0);
            assert!(template.downloads > 0);
            assert!(template.likes > 0);
            assert!(template.meta.created_at <= template.meta.updated_at);
        }
    }

    // -- categories ----------------------------------------------------------

    #[test]
    fn sentinel_category_is_valid() {
        assert!(is_valid_category(CATEGORY_ALL));
    }

    #[test]
    fn unknown_category_is_invalid() {
        assert!(!is_valid_category("gardening"));
        assert!(!is_valid_category(""));
        assert!(!is_valid_category("AI"));
    }

    // -- template_by_id ------------------------------------------------------

    #[test]
    fn lookup_finds_existing_template() {
        let seed = seed_templates();
        let template = template_by_id(&seed, 3).unwrap();
        assert_eq!(template.name, "Social Post Scheduler");
    }

    #[test]
    fn lookup_missing_template_is_not_found() {
        let seed = seed_templates();
        let err = template_by_id(&seed, 999).unwrap_err();
        assert_matches!(
            err,
            CoreError::NotFound {
                entity: "template",
                id: 999
            }
        );
    }

    // -- Engagement ----------------------------------------------------------

    #[test]
    fn bookmark_toggles_on_and_off() {
        let mut engagement = Engagement::new();
        assert!(!engagement.is_bookmarked(1));

        assert!(engagement.toggle_bookmark(1));
        assert!(engagement.is_bookmarked(1));

        assert!(!engagement.toggle_bookmark(1));
        assert!(!engagement.is_bookmarked(1));
    }

    #[test]
    fn bookmarks_are_per_template() {
        let mut engagement = Engagement::new();
        engagement.toggle_bookmark(1);
        assert!(engagement.is_bookmarked(1));
        assert!(!engagement.is_bookmarked(2));
    }

    #[test]
    fn likes_overlay_adds_to_stored_count() {
        let seed = seed_templates();
        let template = template_by_id(&seed, 1).unwrap();
        let mut engagement = Engagement::new();

        assert_eq!(engagement.likes_for(template), template.likes);

        engagement.record_like(template.id);
        engagement.record_like(template.id);
        assert_eq!(engagement.likes_for(template), template.likes + 2);
    }

    #[test]
    fn likes_overlay_does_not_mutate_record() {
        let seed = seed_templates();
        let before = seed[0].likes;
        let mut engagement = Engagement::new();
        engagement.record_like(seed[0].id);
        assert_eq!(seed[0].likes, before);
    }

    // -- stats ---------------------------------------------------------------

    #[test]
    fn stats_aggregate_seed_catalog() {
        let seed = seed_templates();
        let stats = stats(&seed);

        assert_eq!(stats.template_count, 8);
        assert_eq!(stats.total_downloads, 76_880);
        assert_eq!(stats.category_count, 6);
        assert!((stats.average_rating - 4.5375).abs() < 1e-9);
    }

    #[test]
    fn stats_on_empty_catalog_are_zero() {
        let stats = stats(&[]);
        assert_eq!(stats.template_count, 0);
        assert_eq!(stats.total_downloads, 0);
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.category_count, 0);
    }
}
