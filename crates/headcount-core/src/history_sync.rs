//! Activity log screen controller.
//!
//! [`HistorySyncController`] runs two independent feeds: the `counter`
//! record for live stats and the `activityLog` collection for the list.
//! The feeds never wait on each other and each push fully replaces what
//! it rendered before.
//!
//! Failure handling is deliberately lopsided. A broken stats feed is only
//! logged so the log stays usable; a broken log feed is shown to the user.

use std::sync::Arc;

use headcount_store::{DataStore, StoreEvent};
use headcount_types::{ACTIVITY_LOG_PATH, COUNTER_PATH};
use tracing::{debug, warn};

use crate::SyncState;
use crate::clock::{Clock, SystemClock};
use crate::feed::Feed;
use crate::reconcile;
use crate::reset::{self, ResetOutcome};
use crate::view::{HistoryView, ViewSlot};

/// Keeps a [`HistoryView`] in sync with the counter and activity log, and
/// runs the clear-history reset.
pub struct HistorySyncController<S: DataStore> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    view: ViewSlot<dyn HistoryView>,
    stats_feed: Option<Feed>,
    log_feed: Option<Feed>,
}

impl<S: DataStore> HistorySyncController<S> {
    /// Create a controller reading time from the system clock.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Create a controller with an explicit clock.
    pub fn with_clock(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            view: ViewSlot::default(),
            stats_feed: None,
            log_feed: None,
        }
    }

    /// Bind the display target without touching live feeds.
    pub fn attach(&mut self, view: Arc<dyn HistoryView>) {
        self.view.set(view);
    }

    /// Release both feeds and forget the view. Idempotent.
    pub fn detach(&mut self) {
        self.view.clear();
        self.release_feeds();
    }

    fn release_feeds(&mut self) {
        let store = self.store.as_ref();
        if let Some(feed) = self.stats_feed.take() {
            feed.release(store);
        }
        if let Some(feed) = self.log_feed.take() {
            feed.release(store);
        }
    }

    /// Show the loading state and open both feeds, replacing any previous
    /// pair.
    ///
    /// Does nothing while no view is attached. Must be called from within
    /// a Tokio runtime.
    pub fn load(&mut self) {
        if !self.view.is_attached() {
            warn!("history load requested with no view attached");
            return;
        }
        if self.stats_feed.is_some() || self.log_feed.is_some() {
            debug!("history reload, releasing previous subscriptions");
            self.release_feeds();
        }

        self.view.render(|view| view.show_loading());

        let slot = self.view.clone();
        self.stats_feed = Some(Feed::open(
            self.store.as_ref(),
            COUNTER_PATH,
            move |token, event| match event {
                StoreEvent::Snapshot(snapshot) => {
                    let stats = reconcile::occupancy_stats(&snapshot);
                    slot.render_live(token, |view| view.show_stats(stats));
                }
                StoreEvent::Failure(error) => {
                    warn!(path = COUNTER_PATH, error = %error, "stats subscription failed, continuing without live stats");
                }
            },
        ));

        let slot = self.view.clone();
        self.log_feed = Some(Feed::open(
            self.store.as_ref(),
            ACTIVITY_LOG_PATH,
            move |token, event| match event {
                StoreEvent::Snapshot(snapshot) => {
                    let entries = reconcile::history_entries(&snapshot);
                    debug!(entries = entries.len(), "activity log updated");
                    slot.render_live(token, |view| view.show_history_list(&entries));
                }
                StoreEvent::Failure(error) => {
                    warn!(path = ACTIVITY_LOG_PATH, error = %error, "activity log subscription failed");
                    slot.render_live(token, |view| {
                        view.show_error(&format!("Error: {}", error.detail()));
                    });
                }
            },
        ));
    }

    /// Delete the activity log, then zero the counter.
    ///
    /// Fire-and-forget: the outcome reaches the user as exactly one
    /// success or error message on whichever view is attached when it
    /// completes. Must be called from within a Tokio runtime.
    pub fn clear_history(&self) {
        let store = Arc::clone(&self.store);
        let clock = Arc::clone(&self.clock);
        let slot = self.view.clone();
        tokio::spawn(async move {
            let outcome = reset::clear_and_reset(store.as_ref(), clock.as_ref()).await;
            let message = outcome.message();
            slot.render(|view| match outcome {
                ResetOutcome::Success => view.show_success(&message),
                ResetOutcome::PartialFailure(_) | ResetOutcome::Failure(_) => {
                    view.show_error(&message);
                }
            });
        });
    }

    /// Where the controller is in its lifecycle.
    ///
    /// Only the log feed counts towards `SubscriptionFailed`; the stats
    /// feed fails silently.
    pub fn state(&self) -> SyncState {
        if !self.view.is_attached() {
            return SyncState::Unattached;
        }
        match &self.log_feed {
            None => SyncState::Attached,
            Some(feed) if feed.has_failed() => SyncState::SubscriptionFailed,
            Some(_) => SyncState::Subscribed,
        }
    }
}

impl<S: DataStore> Drop for HistorySyncController<S> {
    fn drop(&mut self) {
        self.detach();
    }
}
