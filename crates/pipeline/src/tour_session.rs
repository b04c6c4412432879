//! Tour session service (PRD-11).
//!
//! Wraps the core tour machine with what the overlay needs around it:
//! the completion flag in the store, the fixed close delay, and a closed
//! notice. Finishing and skipping persist the same flag, so a skipped
//! tour is never offered again either.

use std::sync::Arc;
use std::time::Duration;

use flowmart_core::tour::{TourState, TourStatus, TourStep};
use flowmart_core::viewer::Viewer;
use flowmart_notify::{Notice, NoticeBus};
use flowmart_store::FlagRepo;

use crate::error::PipelineError;
use crate::sleeper::Sleeper;

/// Delay between the tour reaching a terminal status and the overlay
/// closing.
pub const TOUR_CLOSE_DELAY_MS: u64 = 1_000;

pub struct TourSession {
    state: TourState,
    flags: FlagRepo,
    sleeper: Arc<dyn Sleeper>,
    bus: Arc<NoticeBus>,
}

impl TourSession {
    /// Start a session for `viewer`; ineligible steps are filtered out
    /// up front by the core machine.
    pub fn new(
        steps: Vec<TourStep>,
        viewer: Viewer,
        flags: FlagRepo,
        sleeper: Arc<dyn Sleeper>,
        bus: Arc<NoticeBus>,
    ) -> Self {
        Self {
            state: TourState::start(steps, viewer),
            flags,
            sleeper,
            bus,
        }
    }

    /// Whether the tour should open at all. False once any earlier
    /// session finished or was skipped.
    pub async fn should_offer(flags: &FlagRepo) -> Result<bool, PipelineError> {
        Ok(!flags.tour_completed().await?)
    }

    pub fn state(&self) -> &TourState {
        &self.state
    }

    /// Advance one step; finishing the last step closes the tour.
    pub async fn next(&mut self) -> Result<TourStatus, PipelineError> {
        let was_active = self.state.status() == TourStatus::Active;
        let status = self.state.next();
        if was_active && status == TourStatus::Completed {
            self.close("Tour completed").await?;
        }
        Ok(status)
    }

    pub fn previous(&mut self) {
        self.state.previous();
    }

    pub fn jump_to(&mut self, index: usize) -> Result<(), PipelineError> {
        Ok(self.state.jump_to(index)?)
    }

    /// Dismiss the tour early; persists the same flag as finishing.
    pub async fn skip(&mut self) -> Result<TourStatus, PipelineError> {
        let was_active = self.state.status() == TourStatus::Active;
        self.state.skip();
        let status = self.state.status();
        if was_active && status == TourStatus::Skipped {
            self.close("Tour skipped").await?;
        }
        Ok(status)
    }

    async fn close(&self, message: &str) -> Result<(), PipelineError> {
        self.flags.set_tour_completed(true).await?;
        self.sleeper
            .sleep(Duration::from_millis(TOUR_CLOSE_DELAY_MS))
            .await;
        self.bus.publish(Notice::info("tour.closed", message));
        tracing::debug!(status = ?self.state.status(), "Tour closed");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use flowmart_core::tour::default_steps;
    use flowmart_store::{KvStore, MemoryKvStore};
    use tokio::sync::broadcast::error::TryRecvError;

    use crate::sleeper::NoopSleeper;

    struct Harness {
        session: TourSession,
        flags: FlagRepo,
        sleeper: Arc<NoopSleeper>,
        bus: Arc<NoticeBus>,
    }

    fn harness(steps: Vec<TourStep>, viewer: Viewer) -> Harness {
        let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let flags = FlagRepo::new(store);
        let sleeper = Arc::new(NoopSleeper::new());
        let bus = Arc::new(NoticeBus::default());
        let session = TourSession::new(steps, viewer, flags.clone(), sleeper.clone(), bus.clone());
        Harness {
            session,
            flags,
            sleeper,
            bus,
        }
    }

    fn two_steps() -> Vec<TourStep> {
        vec![TourStep::new("a", "A", "first"), TourStep::new("b", "B", "second")]
    }

    // -- lifecycle --

    #[tokio::test]
    async fn finishing_the_last_step_persists_and_notifies() {
        let mut h = harness(two_steps(), Viewer::guest());
        let mut rx = h.bus.subscribe();

        assert_eq!(h.session.next().await.unwrap(), TourStatus::Active);
        assert_eq!(h.session.next().await.unwrap(), TourStatus::Completed);

        assert!(h.flags.tour_completed().await.unwrap());
        assert_eq!(h.sleeper.requests(), vec![Duration::from_millis(1_000)]);
        let notice = rx.recv().await.unwrap();
        assert_eq!(notice.kind, "tour.closed");
        assert_eq!(notice.message, "Tour completed");
    }

    #[tokio::test]
    async fn skipping_persists_the_same_flag() {
        let mut h = harness(two_steps(), Viewer::guest());
        let mut rx = h.bus.subscribe();

        assert_eq!(h.session.skip().await.unwrap(), TourStatus::Skipped);

        assert!(h.flags.tour_completed().await.unwrap());
        assert_eq!(h.sleeper.requests(), vec![Duration::from_millis(1_000)]);
        assert_eq!(rx.recv().await.unwrap().message, "Tour skipped");
    }

    #[tokio::test]
    async fn a_finished_session_closes_only_once() {
        let mut h = harness(two_steps(), Viewer::guest());
        let mut rx = h.bus.subscribe();

        h.session.next().await.unwrap();
        h.session.next().await.unwrap();
        // Further calls are no-ops on a terminal session.
        assert_eq!(h.session.next().await.unwrap(), TourStatus::Completed);
        assert_eq!(h.session.skip().await.unwrap(), TourStatus::Completed);

        assert_eq!(h.sleeper.requests().len(), 1);
        rx.recv().await.unwrap();
        assert_matches::assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn should_offer_flips_after_any_terminal() {
        let mut h = harness(two_steps(), Viewer::guest());
        assert!(TourSession::should_offer(&h.flags).await.unwrap());

        h.session.skip().await.unwrap();
        assert!(!TourSession::should_offer(&h.flags).await.unwrap());
    }

    // -- navigation passthrough --

    #[tokio::test]
    async fn navigation_respects_the_core_bounds() {
        let mut h = harness(default_steps(), Viewer::guest());
        let eligible = h.session.state().step_count();

        h.session.previous();
        assert_eq!(h.session.state().index(), 0);

        h.session.jump_to(eligible - 1).unwrap();
        assert_eq!(h.session.state().index(), eligible - 1);
        assert!(h.session.jump_to(eligible).is_err());
    }
}
