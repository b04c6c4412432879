//! Search run service (PRD-07, PRD-09).
//!
//! One run is one submitted search: optional assisted analysis, engine
//! apply, visibility partition, usage accounting, history append. The
//! browsing screen keeps the returned [`RunRecord`]; "not yet searched"
//! is the absence of one, which keeps an empty result list distinct from
//! a screen that has never searched.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use flowmart_core::catalog::Template;
use flowmart_core::search::{self, SearchMode, SearchQuery};
use flowmart_core::viewer::Viewer;
use flowmart_core::visibility::{self, Visibility, VisibilityPolicy};
use flowmart_notify::{Notice, NoticeBus};
use flowmart_store::{HistoryRepo, RecentSearch, UsageRepo};

use crate::analyzer::{QueryAnalysis, QueryAnalyzer};
use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Run records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The search executed; results are ready to render.
    Ready {
        /// Present when the run went through assisted analysis.
        analysis: Option<QueryAnalysis>,
        results: Vec<Template>,
        visibility: Visibility,
    },
    /// Assisted analysis gave up; nothing was searched.
    Failed { message: String },
}

/// One submitted search and what became of it.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: Uuid,
    pub query: SearchQuery,
    pub started_at: DateTime<Utc>,
    pub outcome: RunOutcome,
}

impl RunRecord {
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, RunOutcome::Failed { .. })
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Owns one catalog snapshot and the repositories a search touches.
pub struct SearchService {
    catalog: Vec<Template>,
    analyzer: Arc<dyn QueryAnalyzer>,
    history: HistoryRepo,
    usage: UsageRepo,
    bus: Arc<NoticeBus>,
    policy: VisibilityPolicy,
}

impl SearchService {
    pub fn new(
        catalog: Vec<Template>,
        analyzer: Arc<dyn QueryAnalyzer>,
        history: HistoryRepo,
        usage: UsageRepo,
        bus: Arc<NoticeBus>,
    ) -> Self {
        Self {
            catalog,
            analyzer,
            history,
            usage,
            bus,
            policy: VisibilityPolicy::default(),
        }
    }

    /// Replace the default free-tier budgets.
    pub fn with_policy(mut self, policy: VisibilityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Execute one search for `viewer`.
    ///
    /// A failed assisted analysis is not an `Err`: it yields a
    /// [`RunOutcome::Failed`] record and a notice, and touches neither
    /// history nor usage.
    pub async fn run(&self, query: SearchQuery, viewer: Viewer) -> Result<RunRecord, PipelineError> {
        let id = Uuid::new_v4();
        let started_at = Utc::now();

        let analysis = match self.analyze_if_assisted(&query).await {
            Ok(analysis) => analysis,
            Err(message) => {
                tracing::warn!(query = %query.query, "Assisted analysis failed");
                self.bus.publish(
                    Notice::error("search.analysis_failed", message.clone())
                        .with_entity(query.query.clone()),
                );
                return Ok(RunRecord {
                    id,
                    query,
                    started_at,
                    outcome: RunOutcome::Failed { message },
                });
            }
        };

        // The engine searches the refined text; history keeps what the
        // viewer actually typed.
        let effective = match &analysis {
            Some(a) => SearchQuery {
                query: a.refined_query.clone(),
                ..query.clone()
            },
            None => query.clone(),
        };
        let results = search::apply(&self.catalog, &effective);

        let used = self.usage.consumed(query.mode).await?;
        let visibility = visibility::partition(results.len(), viewer, query.mode, used, &self.policy);

        if !viewer.plan.is_paid() {
            let shown = visibility.visible_in(results.len());
            if shown > 0 {
                self.usage.add(query.mode, shown).await?;
            }
        }

        self.history
            .record(RecentSearch {
                query: query.query.clone(),
                mode: query.mode,
                searched_at: started_at,
                results: results.clone(),
            })
            .await?;

        tracing::debug!(run_id = %id, results = results.len(), "Search run completed");
        Ok(RunRecord {
            id,
            query,
            started_at,
            outcome: RunOutcome::Ready {
                analysis,
                results,
                visibility,
            },
        })
    }

    async fn analyze_if_assisted(&self, query: &SearchQuery) -> Result<Option<QueryAnalysis>, String> {
        if query.mode != SearchMode::Assisted {
            return Ok(None);
        }
        match self.analyzer.analyze(&query.query).await {
            Ok(analysis) => Ok(Some(analysis)),
            Err(err) => Err(err.to_string()),
        }
    }
}
