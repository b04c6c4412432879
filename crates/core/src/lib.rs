//! Flowmart domain core.
//!
//! Pure logic for the workflow-template marketplace: the template catalog
//! and its seed data, the search/filter/sort engine, tiered result
//! visibility, the guided tour state machine, and upload validation.
//! This crate has no async runtime and no storage dependency; higher
//! layers inject those (see `flowmart-store` and `flowmart-pipeline`).

pub mod catalog;
pub mod error;
pub mod hashing;
pub mod search;
pub mod tour;
pub mod types;
pub mod upload;
pub mod viewer;
pub mod visibility;

pub use error::CoreError;
