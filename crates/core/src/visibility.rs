//! Tiered search-result visibility (PRD-09).
//!
//! Free viewers get a per-mode budget of results; once it is spent, later
//! searches show nothing until the budget resets. The partition is purely
//! presentational policy over an already filtered and sorted list and
//! never alters the underlying results.

use serde::{Deserialize, Serialize};

use crate::search::SearchMode;
use crate::viewer::Viewer;

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Default free-tier result budget for simple searches.
pub const DEFAULT_SIMPLE_RESULT_BUDGET: usize = 5;

/// Default free-tier result budget for assisted searches.
pub const DEFAULT_ASSISTED_RESULT_BUDGET: usize = 3;

/// Free-tier result budgets per search mode.
///
/// The defaults preserve the marketplace launch policy; construct a custom
/// policy to change them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityPolicy {
    /// Results a free viewer may consume through simple searches.
    pub simple_budget: usize,
    /// Results a free viewer may consume through assisted searches.
    pub assisted_budget: usize,
}

impl Default for VisibilityPolicy {
    fn default() -> Self {
        Self {
            simple_budget: DEFAULT_SIMPLE_RESULT_BUDGET,
            assisted_budget: DEFAULT_ASSISTED_RESULT_BUDGET,
        }
    }
}

impl VisibilityPolicy {
    /// Budget for the given search mode.
    pub fn budget_for(&self, mode: SearchMode) -> usize {
        match mode {
            SearchMode::Simple => self.simple_budget,
            SearchMode::Assisted => self.assisted_budget,
        }
    }
}

// ---------------------------------------------------------------------------
// Partition
// ---------------------------------------------------------------------------

/// How much of a result list the viewer may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Visibility {
    /// Every result is shown.
    Full,
    /// The leading `visible` results are shown; `locked` sit behind the
    /// upgrade wall.
    Partial { visible: usize, locked: usize },
    /// The mode's budget is already spent; nothing is shown. Distinct from
    /// [`Visibility::Partial`] with a small `visible` count.
    Exhausted { locked: usize },
}

impl Visibility {
    /// Number of leading results actually shown out of `total`.
    pub fn visible_in(&self, total: usize) -> usize {
        match self {
            Self::Full => total,
            Self::Partial { visible, .. } => (*visible).min(total),
            Self::Exhausted { .. } => 0,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}

/// Partition a result list of `total` records for the viewer.
///
/// `used` is how many results the viewer has already consumed in this mode
/// (tracked by the usage repository). Paid plans are never partitioned.
pub fn partition(
    total: usize,
    viewer: Viewer,
    mode: SearchMode,
    used: usize,
    policy: &VisibilityPolicy,
) -> Visibility {
    if viewer.plan.is_paid() {
        return Visibility::Full;
    }

    let budget = policy.budget_for(mode);
    let remaining = budget.saturating_sub(used);
    if remaining == 0 {
        return Visibility::Exhausted { locked: total };
    }
    if total <= remaining {
        return Visibility::Full;
    }

    Visibility::Partial {
        visible: remaining,
        locked: total - remaining,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
