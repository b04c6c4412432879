//! Async services for the workflow-template marketplace.
//!
//! Everything with a clock, a store handle, or a notice to publish lives
//! here: the search run service, the upload intake, and the tour session.
//! Pure decisions stay in `flowmart-core`; this crate wires them to the
//! repositories in `flowmart-store` and the notice bus in
//! `flowmart-notify`, with the timing and outcome sources
//! ([`sleeper::Sleeper`], [`analyzer::QueryAnalyzer`]) injected so tests
//! never wait on real timers or real randomness.

pub mod analyzer;
pub mod error;
pub mod intake;
pub mod run;
pub mod sleeper;
pub mod tour_session;

pub use error::PipelineError;
