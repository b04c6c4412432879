//! Template upload validation (PRD-14).
//!
//! Pre-flight checks on a selected file (extension and size, both before
//! any content is read), the workflow JSON structural check, and the status
//! lifecycle shared with the intake pipeline. The only structural
//! requirement on uploaded content is a top-level `nodes` array.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::hashing::sha256_hex;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum accepted upload size in bytes (10 MiB).
pub const MAX_UPLOAD_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// The only accepted upload extension (matched case-insensitively).
pub const UPLOAD_EXTENSION: &str = "json";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a selected file was refused or failed validation.
///
/// The display strings are shown verbatim as per-file status messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    /// Extension is not `.json`.
    #[error("unsupported type")]
    UnsupportedType,

    /// File is larger than [`MAX_UPLOAD_SIZE_BYTES`].
    #[error("too large")]
    TooLarge,

    /// Content is not well-formed JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// JSON parsed but is not an object with a `nodes` array.
    #[error("invalid workflow format")]
    InvalidFormat,
}

// ---------------------------------------------------------------------------
// Pre-flight validation
// ---------------------------------------------------------------------------

/// Validate a selected file by name and declared size, before reading it.
pub fn validate_upload(file_name: &str, size_bytes: u64) -> Result<(), UploadError> {
    let extension_ok = Path::new(file_name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case(UPLOAD_EXTENSION))
        .unwrap_or(false);
    if !extension_ok {
        return Err(UploadError::UnsupportedType);
    }

    if size_bytes > MAX_UPLOAD_SIZE_BYTES {
        return Err(UploadError::TooLarge);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Content inspection
// ---------------------------------------------------------------------------

/// What a successfully validated upload contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSummary {
    /// The parsed workflow document.
    pub workflow: serde_json::Value,
    /// Number of entries in the `nodes` array.
    pub node_count: usize,
    /// Description derived from embedded metadata.
    pub description: String,
    /// SHA-256 hex digest of the raw content, for duplicate detection.
    pub content_hash: String,
}

/// Parse and structurally check uploaded workflow content.
pub fn inspect_workflow(content: &[u8]) -> Result<WorkflowSummary, UploadError> {
    let workflow: serde_json::Value =
        serde_json::from_slice(content).map_err(|e| UploadError::InvalidJson(e.to_string()))?;

    let node_count = workflow
        .get("nodes")
        .and_then(|v| v.as_array())
        .ok_or(UploadError::InvalidFormat)?
        .len();

    let description = derive_description(&workflow, node_count);
    let content_hash = sha256_hex(content);

    Ok(WorkflowSummary {
        workflow,
        node_count,
        description,
        content_hash,
    })
}

/// Derive a display description from embedded workflow metadata: a
/// top-level `description` string, else `name`, else a node-count line.
fn derive_description(workflow: &serde_json::Value, node_count: usize) -> String {
    for key in ["description", "name"] {
        if let Some(text) = workflow.get(key).and_then(|v| v.as_str()) {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }
    format!("Imported workflow with {node_count} nodes")
}

// ---------------------------------------------------------------------------
// Status lifecycle
// ---------------------------------------------------------------------------

/// Lifecycle of an uploaded-template record. Status is monotonic:
/// `uploading` moves to exactly one of `success` or `error` and never
/// reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Uploading,
    Success,
    Error,
}

impl UploadStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uploading => "uploading",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Validate a status transition for an upload record.
pub fn validate_status_transition(from: UploadStatus, to: UploadStatus) -> Result<(), CoreError> {
    match (from, to) {
        (UploadStatus::Uploading, UploadStatus::Success)
        | (UploadStatus::Uploading, UploadStatus::Error) => Ok(()),
        _ => Err(CoreError::Validation(format!(
            "Cannot transition upload status from '{}' to '{}'",
            from.as_str(),
            to.as_str()
        ))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
