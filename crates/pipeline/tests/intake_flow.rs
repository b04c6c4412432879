//! End-to-end upload intake flows.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;

use flowmart_core::upload::{UploadError, UploadStatus, MAX_UPLOAD_SIZE_BYTES};
use flowmart_notify::{NoticeBus, Severity};
use flowmart_pipeline::intake::{MemoryFile, UploadIntake};
use flowmart_pipeline::PipelineError;

use common::{init_tracing, BrokenFile, CountingFile};

const MINIMAL_WORKFLOW: &[u8] = br#"{"nodes":[{"id":1}]}"#;

fn intake() -> (UploadIntake, Arc<NoticeBus>) {
    init_tracing();
    let bus = Arc::new(NoticeBus::default());
    (UploadIntake::new(bus.clone()), bus)
}

// -- pre-flight rejections --

#[tokio::test]
async fn wrong_extension_is_rejected_without_a_read() {
    let (mut intake, _bus) = intake();
    let file = CountingFile::new("workflow.txt", MINIMAL_WORKFLOW);

    let result = intake.ingest(&file).await;

    assert_matches!(result, Err(PipelineError::Upload(UploadError::UnsupportedType)));
    assert_eq!(file.reads(), 0);
    assert!(intake.records().is_empty());
}

#[tokio::test]
async fn oversized_file_is_rejected_without_a_read() {
    let (mut intake, _bus) = intake();
    let file = CountingFile::new("big.json", MINIMAL_WORKFLOW)
        .with_reported_size(MAX_UPLOAD_SIZE_BYTES + 1);

    let result = intake.ingest(&file).await;

    assert_matches!(result, Err(PipelineError::Upload(UploadError::TooLarge)));
    assert_eq!(file.reads(), 0);
    assert!(intake.records().is_empty());
}

#[tokio::test]
async fn a_rejection_publishes_a_notice() {
    let (mut intake, bus) = intake();
    let mut rx = bus.subscribe();
    let file = CountingFile::new("workflow.txt", MINIMAL_WORKFLOW);

    let _ = intake.ingest(&file).await;

    let notice = rx.recv().await.unwrap();
    assert_eq!(notice.kind, "upload.rejected");
    assert_eq!(notice.severity, Severity::Error);
    assert_eq!(notice.message, "unsupported type");
    assert_eq!(notice.entity_id.as_deref(), Some("workflow.txt"));
}

// -- accepted files --

#[tokio::test]
async fn a_minimal_workflow_lands_as_success() {
    let (mut intake, bus) = intake();
    let mut rx = bus.subscribe();

    let id = intake
        .ingest(&MemoryFile::new("flow.json", MINIMAL_WORKFLOW))
        .await
        .unwrap();

    let record = intake.get(id).unwrap();
    assert_eq!(record.status, UploadStatus::Success);
    let workflow = record.workflow.as_ref().unwrap();
    assert_eq!(workflow.node_count, 1);
    assert_eq!(workflow.content_hash.len(), 64);

    let notice = rx.recv().await.unwrap();
    assert_eq!(notice.kind, "upload.succeeded");
    assert_eq!(notice.entity_id.as_deref(), Some(id.to_string().as_str()));
}

#[tokio::test]
async fn a_missing_nodes_array_is_a_structural_error() {
    let (mut intake, _bus) = intake();

    let id = intake
        .ingest(&MemoryFile::new("flow.json", br#"{"foo":1}"#.as_slice()))
        .await
        .unwrap();

    let record = intake.get(id).unwrap();
    assert_eq!(record.status, UploadStatus::Error);
    assert_eq!(record.error.as_deref(), Some("invalid workflow format"));
    assert_eq!(record.description(), Some("invalid workflow format"));
}

#[tokio::test]
async fn malformed_json_keeps_the_parser_message() {
    let (mut intake, bus) = intake();
    let mut rx = bus.subscribe();

    let id = intake
        .ingest(&MemoryFile::new("flow.json", b"{nope".as_slice()))
        .await
        .unwrap();

    let record = intake.get(id).unwrap();
    assert_eq!(record.status, UploadStatus::Error);
    assert!(record.error.as_deref().unwrap().starts_with("invalid JSON:"));

    let notice = rx.recv().await.unwrap();
    assert_eq!(notice.kind, "upload.failed");
    assert!(notice.message.starts_with("invalid JSON:"));
}

#[tokio::test]
async fn a_failing_read_marks_the_record() {
    let (mut intake, _bus) = intake();
    let file = BrokenFile::new("flow.json", 64);

    let id = intake.ingest(&file).await.unwrap();

    let record = intake.get(id).unwrap();
    assert_eq!(record.status, UploadStatus::Error);
    assert!(record.error.as_deref().unwrap().contains("device disconnected"));
}

// -- batches --

#[tokio::test]
async fn batch_outcomes_are_independent() {
    let (mut intake, _bus) = intake();
    let batch = vec![
        MemoryFile::new("good.json", MINIMAL_WORKFLOW),
        MemoryFile::new("notes.txt", MINIMAL_WORKFLOW),
        MemoryFile::new("bad.json", br#"{"foo":1}"#.as_slice()),
        MemoryFile::new("also-good.json", MINIMAL_WORKFLOW),
    ];

    let ids = intake.ingest_all(&batch).await.unwrap();

    // The .txt file was rejected pre-flight and left nothing behind.
    assert_eq!(ids.len(), 3);
    assert_eq!(intake.records().len(), 3);
    let statuses: Vec<UploadStatus> = intake.records().iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![UploadStatus::Success, UploadStatus::Error, UploadStatus::Success]
    );
}

#[tokio::test]
async fn remove_drops_the_card() {
    let (mut intake, _bus) = intake();
    let id = intake
        .ingest(&MemoryFile::new("flow.json", MINIMAL_WORKFLOW))
        .await
        .unwrap();

    assert!(intake.remove(id));
    assert!(intake.get(id).is_none());
    assert!(!intake.remove(id));
}
