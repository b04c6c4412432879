//! Upload intake pipeline (PRD-14).
//!
//! Drives a selected file to a terminal status. Pre-flight validation
//! (extension, declared size) runs before any content is read; rejected
//! files leave no record behind. Accepted files get a record that is
//! marked `uploading`, then parsed, shape-checked and flipped to
//! `success` or `error` exactly once. Batches are processed strictly one
//! file at a time and outcomes are independent; nothing is retried.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use flowmart_core::upload::{
    inspect_workflow, validate_status_transition, validate_upload, UploadStatus, WorkflowSummary,
};
use flowmart_core::CoreError;
use flowmart_notify::{Notice, NoticeBus};

use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// A file handed to the intake.
///
/// Name and size are available before [`read`](UploadSource::read) so the
/// pre-flight checks can reject a file without touching its content.
#[async_trait]
pub trait UploadSource: Send + Sync {
    /// File name as selected, including extension.
    fn file_name(&self) -> &str;

    /// Size in bytes as declared before reading.
    fn size_bytes(&self) -> u64;

    /// Read the full content.
    async fn read(&self) -> std::io::Result<Vec<u8>>;
}

/// Source over an in-memory buffer.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    content: Vec<u8>,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

#[async_trait]
impl UploadSource for MemoryFile {
    fn file_name(&self) -> &str {
        &self.name
    }

    fn size_bytes(&self) -> u64 {
        self.content.len() as u64
    }

    async fn read(&self) -> std::io::Result<Vec<u8>> {
        Ok(self.content.clone())
    }
}

/// Source backed by a file on disk, stat'ed once at open.
#[derive(Debug, Clone)]
pub struct DiskFile {
    path: PathBuf,
    name: String,
    size_bytes: u64,
}

impl DiskFile {
    pub async fn open(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let metadata = tokio::fs::metadata(&path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            path,
            name,
            size_bytes: metadata.len(),
        })
    }
}

#[async_trait]
impl UploadSource for DiskFile {
    fn file_name(&self) -> &str {
        &self.name
    }

    fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    async fn read(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One accepted file's journey through the intake.
#[derive(Debug, Clone)]
pub struct UploadRecord {
    pub id: Uuid,
    pub file_name: String,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
    pub status: UploadStatus,
    /// Parsed workflow, present once the status is `Success`.
    pub workflow: Option<WorkflowSummary>,
    /// Failure message, present once the status is `Error`.
    pub error: Option<String>,
}

impl UploadRecord {
    fn new(file_name: &str, size_bytes: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.to_string(),
            size_bytes,
            uploaded_at: Utc::now(),
            status: UploadStatus::Uploading,
            workflow: None,
            error: None,
        }
    }

    fn mark_success(&mut self, summary: WorkflowSummary) -> Result<(), CoreError> {
        validate_status_transition(self.status, UploadStatus::Success)?;
        self.status = UploadStatus::Success;
        self.workflow = Some(summary);
        Ok(())
    }

    fn mark_error(&mut self, message: String) -> Result<(), CoreError> {
        validate_status_transition(self.status, UploadStatus::Error)?;
        self.status = UploadStatus::Error;
        self.error = Some(message);
        Ok(())
    }

    /// Text for the card's subtitle: the derived description for
    /// successes, the failure message for errors.
    pub fn description(&self) -> Option<&str> {
        match self.status {
            UploadStatus::Success => self.workflow.as_ref().map(|w| w.description.as_str()),
            UploadStatus::Error => self.error.as_deref(),
            UploadStatus::Uploading => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Intake
// ---------------------------------------------------------------------------

/// Owns the upload records for the publish screen.
pub struct UploadIntake {
    records: Vec<UploadRecord>,
    bus: Arc<NoticeBus>,
}

impl UploadIntake {
    pub fn new(bus: Arc<NoticeBus>) -> Self {
        Self {
            records: Vec::new(),
            bus,
        }
    }

    /// Run one file through the pipeline.
    ///
    /// Pre-flight rejections return the error and create no record.
    /// Accepted files always leave a terminal record behind and return
    /// its id, whether validation succeeded or not.
    pub async fn ingest(&mut self, source: &dyn UploadSource) -> Result<Uuid, PipelineError> {
        let file_name = source.file_name();
        let size_bytes = source.size_bytes();

        if let Err(err) = validate_upload(file_name, size_bytes) {
            tracing::warn!(file = file_name, error = %err, "Upload rejected before read");
            self.bus
                .publish(Notice::error("upload.rejected", err.to_string()).with_entity(file_name));
            return Err(err.into());
        }

        let mut record = UploadRecord::new(file_name, size_bytes);
        let id = record.id;
        tracing::debug!(file = file_name, upload_id = %id, "Upload accepted, reading content");

        let outcome = match source.read().await {
            Ok(content) => inspect_workflow(&content).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match outcome {
            Ok(summary) => {
                record.mark_success(summary)?;
                tracing::info!(file = file_name, upload_id = %id, "Upload validated");
                self.bus.publish(
                    Notice::success("upload.succeeded", format!("{file_name} imported"))
                        .with_entity(id.to_string()),
                );
            }
            Err(message) => {
                record.mark_error(message.clone())?;
                tracing::warn!(file = file_name, upload_id = %id, error = %message, "Upload failed validation");
                self.bus
                    .publish(Notice::error("upload.failed", message).with_entity(id.to_string()));
            }
        }

        self.records.push(record);
        Ok(id)
    }

    /// Process a batch strictly in order. A rejected file does not stop
    /// the files after it; ids are returned for the accepted ones.
    pub async fn ingest_all<S: UploadSource>(
        &mut self,
        sources: &[S],
    ) -> Result<Vec<Uuid>, PipelineError> {
        let mut ids = Vec::with_capacity(sources.len());
        for source in sources {
            match self.ingest(source).await {
                Ok(id) => ids.push(id),
                Err(PipelineError::Upload(_)) => {}
                Err(other) => return Err(other),
            }
        }
        Ok(ids)
    }

    pub fn records(&self) -> &[UploadRecord] {
        &self.records
    }

    pub fn get(&self, id: Uuid) -> Option<&UploadRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Drop a record (the card's dismiss action). Returns whether the id
    /// was present.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
