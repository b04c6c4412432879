//! Shared fixtures for the pipeline integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use flowmart_pipeline::intake::UploadSource;

/// Install a test subscriber once per binary so failing tests show spans.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Upload source that counts reads and can misreport its size, so tests
/// can prove content is never touched after a pre-flight rejection.
pub struct CountingFile {
    name: String,
    reported_size: u64,
    content: Vec<u8>,
    reads: AtomicUsize,
}

impl CountingFile {
    pub fn new(name: &str, content: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            reported_size: content.len() as u64,
            content: content.to_vec(),
            reads: AtomicUsize::new(0),
        }
    }

    /// Pretend the file is `size` bytes without materializing them.
    pub fn with_reported_size(mut self, size: u64) -> Self {
        self.reported_size = size;
        self
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UploadSource for CountingFile {
    fn file_name(&self) -> &str {
        &self.name
    }

    fn size_bytes(&self) -> u64 {
        self.reported_size
    }

    async fn read(&self) -> std::io::Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.content.clone())
    }
}

/// Upload source whose read always fails.
pub struct BrokenFile {
    name: String,
    size: u64,
}

impl BrokenFile {
    pub fn new(name: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            size,
        }
    }
}

#[async_trait]
impl UploadSource for BrokenFile {
    fn file_name(&self) -> &str {
        &self.name
    }

    fn size_bytes(&self) -> u64 {
        self.size
    }

    async fn read(&self) -> std::io::Result<Vec<u8>> {
        Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "device disconnected",
        ))
    }
}
