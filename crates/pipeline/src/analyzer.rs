//! Assisted-search query analysis (PRD-07).
//!
//! Assisted mode runs the raw query through an analyzer before the
//! catalog search executes. The production implementation is a
//! deliberate simulation standing in for a remote model endpoint: a
//! configurable delay, a configurable failure rate, and a deterministic
//! refinement. Services depend on the [`QueryAnalyzer`] trait so tests
//! can script outcomes instead.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::sleeper::Sleeper;

/// Tags the refinement is allowed to suggest. Kept to tags that exist in
/// the catalog so suggestions always lead somewhere.
const KNOWN_TAGS: [&str; 10] = [
    "ai",
    "email",
    "slack",
    "crm",
    "webhook",
    "social",
    "pdf",
    "sheets",
    "finance",
    "analytics",
];

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AnalyzerError {
    /// The analysis backend gave up on the query.
    #[error("search analysis failed")]
    Failed,
}

/// What the analyzer made of a raw query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryAnalysis {
    /// Query text after refinement; this is what the engine searches.
    pub refined_query: String,
    /// Catalog tags the analyzer considers relevant, shown as chips.
    pub suggested_tags: Vec<String>,
}

#[async_trait]
pub trait QueryAnalyzer: Send + Sync {
    async fn analyze(&self, query: &str) -> Result<QueryAnalysis, AnalyzerError>;
}

// ---------------------------------------------------------------------------
// Simulated implementation
// ---------------------------------------------------------------------------

const DEFAULT_DELAY_MS: u64 = 800;
const DEFAULT_FAILURE_RATE: f64 = 0.1;

/// Tuning for the simulated analyzer.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Artificial latency before the outcome is decided.
    pub delay_ms: u64,
    /// Probability in `[0, 1]` that a given analysis fails.
    pub failure_rate: f64,
}

impl AnalyzerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable                         | Required | Default |
    /// |----------------------------------|----------|---------|
    /// | `FLOWMART_ANALYZER_DELAY_MS`     | no       | `800`   |
    /// | `FLOWMART_ANALYZER_FAILURE_RATE` | no       | `0.1`   |
    pub fn from_env() -> Self {
        let delay_ms = std::env::var("FLOWMART_ANALYZER_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_DELAY_MS);
        let failure_rate: f64 = std::env::var("FLOWMART_ANALYZER_FAILURE_RATE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_FAILURE_RATE);
        Self {
            delay_ms,
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            failure_rate: DEFAULT_FAILURE_RATE,
        }
    }
}

/// Delay-then-maybe-fail analyzer. With `failure_rate` 0 it is fully
/// deterministic.
pub struct SimulatedAnalyzer {
    config: AnalyzerConfig,
    sleeper: Arc<dyn Sleeper>,
}

impl SimulatedAnalyzer {
    pub fn new(config: AnalyzerConfig, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { config, sleeper }
    }
}

#[async_trait]
impl QueryAnalyzer for SimulatedAnalyzer {
    async fn analyze(&self, query: &str) -> Result<QueryAnalysis, AnalyzerError> {
        self.sleeper
            .sleep(Duration::from_millis(self.config.delay_ms))
            .await;
        if rand::rng().random::<f64>() < self.config.failure_rate {
            return Err(AnalyzerError::Failed);
        }
        Ok(refine(query))
    }
}

/// Collapse whitespace and pick out known catalog tags, matched on whole
/// words so `gmail` never suggests `ai`.
fn refine(query: &str) -> QueryAnalysis {
    let refined_query = query.split_whitespace().collect::<Vec<_>>().join(" ");
    let words: Vec<String> = refined_query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    let suggested_tags = KNOWN_TAGS
        .iter()
        .filter(|tag| words.iter().any(|w| w == *tag))
        .map(|tag| tag.to_string())
        .collect();
    QueryAnalysis {
        refined_query,
        suggested_tags,
    }
}

// ---------------------------------------------------------------------------
// Scripted implementation for tests
// ---------------------------------------------------------------------------

/// Analyzer that replays a fixed sequence of outcomes, then echoes the
/// query unchanged once the script runs out.
pub struct ScriptedAnalyzer {
    script: Mutex<VecDeque<Result<QueryAnalysis, AnalyzerError>>>,
}

impl ScriptedAnalyzer {
    pub fn new(outcomes: impl IntoIterator<Item = Result<QueryAnalysis, AnalyzerError>>) -> Self {
        Self {
            script: Mutex::new(outcomes.into_iter().collect()),
        }
    }

    /// Analyzer that always succeeds by echoing the query.
    pub fn always_ok() -> Self {
        Self::new([])
    }
}

#[async_trait]
impl QueryAnalyzer for ScriptedAnalyzer {
    async fn analyze(&self, query: &str) -> Result<QueryAnalysis, AnalyzerError> {
        let next = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        match next {
            Some(outcome) => outcome,
            None => Ok(QueryAnalysis {
                refined_query: query.to_string(),
                suggested_tags: Vec::new(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sleeper::NoopSleeper;

    fn analyzer(delay_ms: u64, failure_rate: f64) -> (SimulatedAnalyzer, Arc<NoopSleeper>) {
        let sleeper = Arc::new(NoopSleeper::new());
        let config = AnalyzerConfig {
            delay_ms,
            failure_rate,
        };
        (SimulatedAnalyzer::new(config, sleeper.clone()), sleeper)
    }

    // -- simulated outcomes --

    #[tokio::test]
    async fn zero_failure_rate_always_succeeds() {
        let (analyzer, _) = analyzer(0, 0.0);
        for _ in 0..20 {
            assert!(analyzer.analyze("email").await.is_ok());
        }
    }

    #[tokio::test]
    async fn full_failure_rate_always_fails() {
        let (analyzer, _) = analyzer(0, 1.0);
        for _ in 0..20 {
            assert_eq!(analyzer.analyze("email").await, Err(AnalyzerError::Failed));
        }
    }

    #[tokio::test]
    async fn the_configured_delay_is_requested() {
        let (analyzer, sleeper) = analyzer(25, 0.0);
        let _ = analyzer.analyze("email").await;
        assert_eq!(sleeper.requests(), vec![Duration::from_millis(25)]);
    }

    // -- refinement --

    #[tokio::test]
    async fn refinement_collapses_whitespace() {
        let (analyzer, _) = analyzer(0, 0.0);
        let analysis = analyzer.analyze("  ai   email ").await.unwrap();
        assert_eq!(analysis.refined_query, "ai email");
    }

    #[tokio::test]
    async fn tags_are_matched_on_whole_words() {
        let (analyzer, _) = analyzer(0, 0.0);
        let analysis = analyzer.analyze("Email digest for gmail").await.unwrap();
        assert_eq!(analysis.suggested_tags, vec!["email".to_string()]);
    }

    #[tokio::test]
    async fn an_unrelated_query_suggests_nothing() {
        let (analyzer, _) = analyzer(0, 0.0);
        let analysis = analyzer.analyze("quarterly report").await.unwrap();
        assert!(analysis.suggested_tags.is_empty());
    }

    // -- scripted double --

    #[tokio::test]
    async fn scripted_outcomes_replay_in_order() {
        let scripted = ScriptedAnalyzer::new([
            Err(AnalyzerError::Failed),
            Ok(QueryAnalysis {
                refined_query: "email".to_string(),
                suggested_tags: vec!["email".to_string()],
            }),
        ]);
        assert!(scripted.analyze("x").await.is_err());
        assert_eq!(scripted.analyze("x").await.unwrap().refined_query, "email");
        // Script exhausted, falls back to echoing.
        assert_eq!(scripted.analyze("y").await.unwrap().refined_query, "y");
    }

    // -- configuration --

    // Both env vars in one test; parallel test threads share the process
    // environment.
    #[test]
    fn from_env_reads_defaults_and_clamps() {
        std::env::remove_var("FLOWMART_ANALYZER_DELAY_MS");
        std::env::remove_var("FLOWMART_ANALYZER_FAILURE_RATE");
        let config = AnalyzerConfig::from_env();
        assert_eq!(config.delay_ms, 800);
        assert_eq!(config.failure_rate, 0.1);

        std::env::set_var("FLOWMART_ANALYZER_FAILURE_RATE", "7.5");
        assert_eq!(AnalyzerConfig::from_env().failure_rate, 1.0);
        std::env::remove_var("FLOWMART_ANALYZER_FAILURE_RATE");
    }
}
