//! Viewer identity and plan tiers (PRD-09).

use serde::{Deserialize, Serialize};

/// Subscription tier of the person browsing the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    #[default]
    Free,
    Pro,
    Enterprise,
}

impl PlanTier {
    /// Paid tiers see every search result without gating.
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Pro | Self::Enterprise)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Enterprise => "enterprise",
        }
    }
}

/// The person browsing the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub authenticated: bool,
    pub plan: PlanTier,
}

impl Viewer {
    /// An unauthenticated visitor on the free tier.
    pub fn guest() -> Self {
        Self {
            authenticated: false,
            plan: PlanTier::Free,
        }
    }

    /// A signed-in member on the given plan.
    pub fn member(plan: PlanTier) -> Self {
        Self {
            authenticated: true,
            plan,
        }
    }
}
