//! Live counter screen controller.
//!
//! [`CounterSyncController`] subscribes to the `counter` record and turns
//! every push into three headline figures, the "people inside" figure,
//! and a status line. A missing record renders as zeros with
//! `No data yet`; a failed subscription renders a message and
//! `Connection error` and is not retried here.

use std::sync::Arc;

use headcount_store::{DataStore, Snapshot, StoreEvent};
use headcount_types::COUNTER_PATH;
use tracing::{debug, warn};

use crate::SyncState;
use crate::clock::{Clock, SystemClock};
use crate::feed::Feed;
use crate::reconcile;
use crate::relative_time::relative_time;
use crate::view::{CounterView, ViewSlot};

/// Placeholder shown in every figure while connecting.
pub const LOADING_MARKER: &str = "-";
/// Status line while connecting.
pub const CONNECTING_TEXT: &str = "Connecting...";
/// Status line when the counter record does not exist.
pub const NO_DATA_TEXT: &str = "No data yet";
/// Status line after a subscription failure.
pub const CONNECTION_ERROR_TEXT: &str = "Connection error";

/// Everything the counter screen shows, already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterDisplay {
    /// Currently inside.
    pub inside: String,
    /// Entered since the last reset.
    pub entered: String,
    /// Exited since the last reset.
    pub exited: String,
    /// Status line.
    pub status: String,
}

impl CounterDisplay {
    /// The placeholder shown before the first push.
    pub fn connecting() -> Self {
        Self {
            inside: LOADING_MARKER.to_owned(),
            entered: LOADING_MARKER.to_owned(),
            exited: LOADING_MARKER.to_owned(),
            status: CONNECTING_TEXT.to_owned(),
        }
    }

    /// Reconcile one snapshot of the counter record against `now_ms`.
    pub fn from_snapshot(snapshot: &Snapshot, now_ms: i64) -> Self {
        reconcile::counter_record(snapshot).map_or_else(
            || Self {
                inside: String::from("0"),
                entered: String::from("0"),
                exited: String::from("0"),
                status: NO_DATA_TEXT.to_owned(),
            },
            |record| Self {
                inside: record.current_in_room.to_string(),
                entered: record.entry_count.to_string(),
                exited: record.exit_count.to_string(),
                status: relative_time(record.last_updated, now_ms),
            },
        )
    }

    fn render(&self, view: &dyn CounterView) {
        view.show_stats(&self.inside, &self.entered, &self.exited);
        view.show_people_inside(&self.inside);
        view.show_last_updated(&self.status);
    }
}

/// Keeps a [`CounterView`] in sync with the shared counter record.
pub struct CounterSyncController<S: DataStore> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    view: ViewSlot<dyn CounterView>,
    feed: Option<Feed>,
}

impl<S: DataStore> CounterSyncController<S> {
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
            feed: None,
        }
    }

    /// Bind the display target. A live subscription keeps running and
    /// renders to the new view from its next push on.
    pub fn attach(&mut self, view: Arc<dyn CounterView>) {
        self.view.set(view);
    }

    /// Release the subscription and forget the view. Safe to call any
    /// number of times; never touches the view.
    pub fn detach(&mut self) {
        self.view.clear();
        if let Some(feed) = self.feed.take() {
            feed.release(self.store.as_ref());
        }
    }

    /// Render the connecting placeholder and open the live subscription,
    /// replacing any previous one.
    ///
    /// Does nothing while no view is attached. Must be called from within
    /// a Tokio runtime.
    pub fn load(&mut self) {
        if !self.view.is_attached() {
            warn!("counter load requested with no view attached");
            return;
        }
        if let Some(previous) = self.feed.take() {
            debug!("counter reload, releasing previous subscription");
            previous.release(self.store.as_ref());
        }

        self.view
            .render(|view| CounterDisplay::connecting().render(view));

        let slot = self.view.clone();
        let clock = Arc::clone(&self.clock);
        self.feed = Some(Feed::open(
            self.store.as_ref(),
            COUNTER_PATH,
            move |token, event| match event {
                StoreEvent::Snapshot(snapshot) => {
                    let display = CounterDisplay::from_snapshot(&snapshot, clock.now_millis());
                    slot.render_live(token, |view| display.render(view));
                }
                StoreEvent::Failure(error) => {
                    warn!(path = COUNTER_PATH, error = %error, "counter subscription failed");
                    slot.render_live(token, |view| {
                        view.show_message(&format!("Failed to load counter: {}", error.detail()));
                        view.show_last_updated(CONNECTION_ERROR_TEXT);
                    });
                }
            },
        ));
    }

    /// Forward an activity-log click straight to the view.
    pub fn on_view_activity_log_clicked(&self) {
        self.view.render(|view| view.open_activity_log());
    }

    /// Where the controller is in its lifecycle.
    pub fn state(&self) -> SyncState {
        if !self.view.is_attached() {
            return SyncState::Unattached;
        }
        match &self.feed {
            None => SyncState::Attached,
            Some(feed) if feed.has_failed() => SyncState::SubscriptionFailed,
            Some(_) => SyncState::Subscribed,
        }
    }
}

impl<S: DataStore> Drop for CounterSyncController<S> {
    fn drop(&mut self) {
        self.detach();
    }
}
