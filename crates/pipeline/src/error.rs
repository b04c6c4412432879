//! Pipeline error type.

use flowmart_core::upload::UploadError;
use flowmart_core::CoreError;
use flowmart_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A repository read or write failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A file was rejected before its content was read.
    #[error("Upload rejected: {0}")]
    Upload(#[from] UploadError),

    /// A domain rule was violated.
    #[error("Domain error: {0}")]
    Core(#[from] CoreError),
}
