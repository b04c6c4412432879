//! Transactional email (PRD-18): HTML documents and message assembly.

pub mod message;
pub mod templates;
