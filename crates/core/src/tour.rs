//! Guided tour state machine (PRD-11).
//!
//! A linear sequence of steps filtered once per viewer at start. `next`
//! and `previous` keep the index inside `0..eligible_len`; finishing the
//! last step and skipping are both terminal and persist the same
//! completion flag (handled by the session service).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::viewer::Viewer;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// Who a step is shown to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAudience {
    #[default]
    Everyone,
    Authenticated,
    Guest,
}

impl StepAudience {
    /// Whether a step with this audience is eligible for the viewer.
    pub fn admits(&self, viewer: Viewer) -> bool {
        match self {
            Self::Everyone => true,
            Self::Authenticated => viewer.authenticated,
            Self::Guest => !viewer.authenticated,
        }
    }
}

/// One page of the guided tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourStep {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Selector of the element the step points at, if any.
    pub target: Option<String>,
    pub audience: StepAudience,
    /// Opaque action id the embedding surface dispatches when the step is
    /// shown (e.g. opening a dialog).
    pub action: Option<String>,
}

impl TourStep {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            target: None,
            audience: StepAudience::Everyone,
            action: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn for_audience(mut self, audience: StepAudience) -> Self {
        self.audience = audience;
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

/// The built-in marketplace tour.
pub fn default_steps() -> Vec<TourStep> {
    vec![
        TourStep::new(
            "welcome",
            "Welcome to Flowmart",
            "Browse hundreds of ready-made workflow templates for your stack.",
        ),
        TourStep::new(
            "search",
            "Find a template",
            "Search by keyword or narrow the list down by category.",
        )
        .with_target("#search-bar"),
        TourStep::new(
            "preview",
            "Preview before you import",
            "Open any card to inspect the workflow, its author, and reviews.",
        )
        .with_target(".template-card"),
        TourStep::new(
            "bookmarks",
            "Save favorites",
            "Bookmark templates to find them again from your library.",
        )
        .with_target("#bookmark-button")
        .for_audience(StepAudience::Authenticated),
        TourStep::new(
            "upload",
            "Share your own",
            "Upload a workflow JSON file to publish your own template.",
        )
        .with_target("#upload-button")
        .for_audience(StepAudience::Authenticated)
        .with_action("open-upload-dialog"),
        TourStep::new(
            "signup",
            "Create an account",
            "Sign up to bookmark templates and publish your own workflows.",
        )
        .for_audience(StepAudience::Guest),
    ]
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Tour lifecycle. `Completed` and `Skipped` are both terminal; no
/// downstream behavior distinguishes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TourStatus {
    Active,
    Completed,
    Skipped,
}

impl TourStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Skipped)
    }
}

/// Linear tour over the viewer-eligible steps.
#[derive(Debug, Clone)]
pub struct TourState {
    steps: Vec<TourStep>,
    index: usize,
    status: TourStatus,
}

impl TourState {
    /// Start a tour for the viewer.
    ///
    /// Audience predicates are evaluated exactly once, here; the eligible
    /// sequence never changes afterwards. An empty eligible sequence
    /// completes immediately.
    pub fn start(steps: Vec<TourStep>, viewer: Viewer) -> Self {
        let eligible: Vec<TourStep> = steps
            .into_iter()
            .filter(|step| step.audience.admits(viewer))
            .collect();
        let status = if eligible.is_empty() {
            TourStatus::Completed
        } else {
            TourStatus::Active
        };

        Self {
            steps: eligible,
            index: 0,
            status,
        }
    }

    pub fn status(&self) -> TourStatus {
        self.status
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// The step currently shown, if the tour is active.
    pub fn current_step(&self) -> Option<&TourStep> {
        if self.status != TourStatus::Active {
            return None;
        }
        self.steps.get(self.index)
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        !self.steps.is_empty() && self.index == self.steps.len() - 1
    }

    /// Advance one step; on the last step the tour completes. Returns the
    /// resulting status. No-op once terminal.
    pub fn next(&mut self) -> TourStatus {
        if self.status != TourStatus::Active {
            return self.status;
        }
        if self.index + 1 < self.steps.len() {
            self.index += 1;
        } else {
            self.status = TourStatus::Completed;
        }
        self.status
    }

    /// Step back one; no-op on the first step or once terminal.
    pub fn previous(&mut self) {
        if self.status != TourStatus::Active {
            return;
        }
        if self.index > 0 {
            self.index -= 1;
        }
    }

    /// Jump directly to an eligible step index.
    pub fn jump_to(&mut self, index: usize) -> Result<(), CoreError> {
        if self.status != TourStatus::Active {
            return Err(CoreError::Validation(
                "Tour is no longer active".to_string(),
            ));
        }
        if index >= self.steps.len() {
            return Err(CoreError::Validation(format!(
                "Step index {index} is out of range (0..{})",
                self.steps.len()
            )));
        }
        self.index = index;
        Ok(())
    }

    /// Abandon the tour from any active state; terminal.
    pub fn skip(&mut self) {
        if self.status == TourStatus::Active {
            self.status = TourStatus::Skipped;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
