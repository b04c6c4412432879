//! In-process notice bus (PRD-16).
//!
//! [`NoticeBus`] fans transient UI notices out to any number of
//! subscribers over a `tokio::sync::broadcast` channel. Publishers never
//! block and never fail: a notice published while nobody is listening is
//! simply dropped, and a slow subscriber that falls more than the buffer
//! capacity behind loses the oldest notices (`RecvError::Lagged`).
//!
//! The bus is cheap to share. Clone the `Arc<NoticeBus>` handle wherever
//! a component needs to publish.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Buffered notices per subscriber before the oldest are dropped.
const DEFAULT_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// Notice
// ---------------------------------------------------------------------------

/// How a notice should be presented to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// A transient notification destined for the viewer.
///
/// `kind` is a stable dot-separated identifier (`"upload.rejected"`,
/// `"tour.closed"`) that subscribers can filter on; `message` is the
/// human-readable text shown in the toast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub kind: String,
    pub severity: Severity,
    pub message: String,
    /// Identifier of the entity the notice is about (an upload id, a
    /// search query), when there is one.
    pub entity_id: Option<String>,
    /// When the notice was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl Notice {
    pub fn new(kind: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            severity,
            message: message.into(),
            entity_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn info(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Info, message)
    }

    pub fn success(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Success, message)
    }

    pub fn error(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Error, message)
    }

    /// Attach the id of the entity the notice is about.
    pub fn with_entity(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }
}

// ---------------------------------------------------------------------------
// NoticeBus
// ---------------------------------------------------------------------------

/// Broadcast hub for [`Notice`] values.
pub struct NoticeBus {
    sender: broadcast::Sender<Notice>,
}

impl NoticeBus {
    /// Create a bus whose subscribers each buffer up to `capacity`
    /// notices.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a notice to every current subscriber.
    ///
    /// Publishing with no subscribers is not an error; the notice is
    /// discarded.
    pub fn publish(&self, notice: Notice) {
        let _ = self.sender.send(notice);
    }

    /// Open a new subscription. Only notices published after this call
    /// are received.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for NoticeBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
