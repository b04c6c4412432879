//! Flowmart persistence layer.
//!
//! Everything the marketplace persists goes through the [`KvStore`]
//! trait: a string-keyed, JSON-valued store with in-memory and
//! single-file implementations. Typed repositories sit on top:
//!
//! - [`HistoryRepo`]: the recent-search list (capped, newest first).
//! - [`FlagRepo`]: the tour-completion flag.
//! - [`UsageRepo`]: per-mode free-tier usage counters.

pub mod config;
pub mod error;
pub mod flags;
pub mod history;
pub mod kv;
pub mod usage;

pub use config::StoreConfig;
pub use error::StoreError;
pub use flags::FlagRepo;
pub use history::{HistoryRepo, RecentSearch};
pub use kv::{FileKvStore, KvStore, MemoryKvStore};
pub use usage::{SearchUsage, UsageRepo};
