//! View implementation that renders into [`AppState`].
//!
//! Every call updates the stored panel and broadcasts the new panel to
//! `WebSocket` clients, so HTTP readers and live clients see the same
//! state.

use std::sync::Arc;

use headcount_core::view::{CounterView, HistoryView};
use headcount_types::{HistoryEntry, OccupancyStats};
use tracing::info;

use crate::state::AppState;

/// Renders both screens into the shared dashboard state.
#[derive(Debug, Clone)]
pub struct BroadcastView {
    state: Arc<AppState>,
}

impl BroadcastView {
    /// Wrap the shared state.
    pub const fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

impl CounterView for BroadcastView {
    fn show_stats(&self, inside: &str, entered: &str, exited: &str) {
        // Connecting and data renders both start here; failures never do.
        self.state.update_counter(|panel| {
            panel.message = None;
            inside.clone_into(&mut panel.inside);
            entered.clone_into(&mut panel.entered);
            exited.clone_into(&mut panel.exited);
        });
    }

    fn show_people_inside(&self, count: &str) {
        self.state
            .update_counter(|panel| count.clone_into(&mut panel.people_inside));
    }

    fn show_last_updated(&self, text: &str) {
        self.state
            .update_counter(|panel| text.clone_into(&mut panel.last_updated));
    }

    fn show_message(&self, message: &str) {
        self.state
            .update_counter(|panel| panel.message = Some(message.to_owned()));
    }

    fn open_activity_log(&self) {
        info!("activity log requested");
        self.state.update_counter(|panel| {
            panel.activity_log_requests = panel.activity_log_requests.saturating_add(1);
        });
    }
}

impl HistoryView for BroadcastView {
    fn show_loading(&self) {
        self.state.update_history(|panel| {
            panel.loading = true;
            panel.error = None;
            panel.success = None;
        });
    }

    fn show_stats(&self, stats: OccupancyStats) {
        self.state.update_history(|panel| panel.stats = stats);
    }

    fn show_history_list(&self, entries: &[HistoryEntry]) {
        self.state.update_history(|panel| {
            panel.loading = false;
            panel.entries = entries.to_vec();
        });
    }

    fn show_error(&self, message: &str) {
        self.state.update_history(|panel| {
            panel.loading = false;
            panel.success = None;
            panel.error = Some(message.to_owned());
        });
    }

    fn show_success(&self, message: &str) {
        self.state.update_history(|panel| {
            panel.error = None;
            panel.success = Some(message.to_owned());
        });
    }
}

#[cfg(test)]
mod tests {
    use headcount_types::EventKind;

    use super::*;

    fn view() -> (Arc<AppState>, BroadcastView) {
        let (state, _commands) = AppState::new();
        let state = Arc::new(state);
        (Arc::clone(&state), BroadcastView::new(state))
    }

    #[test]
    fn counter_calls_fill_the_counter_panel() {
        let (state, view) = view();
        CounterView::show_stats(&view, "3", "5", "2");
        view.show_people_inside("3");
        view.show_last_updated("Just now");
        view.open_activity_log();

        let counter = state.current().counter;
        assert_eq!(counter.inside, "3");
        assert_eq!(counter.entered, "5");
        assert_eq!(counter.exited, "2");
        assert_eq!(counter.people_inside, "3");
        assert_eq!(counter.last_updated, "Just now");
        assert_eq!(counter.activity_log_requests, 1);
    }

    #[test]
    fn loading_clears_previous_messages() {
        let (state, view) = view();
        view.show_error("Error: offline");
        view.show_loading();

        let history = state.current().history;
        assert!(history.loading);
        assert!(history.error.is_none());
    }

    #[test]
    fn reset_outcomes_replace_each_other() {
        let (state, view) = view();
        view.show_success("History cleared and counter reset to 0");
        view.show_error("Failed to clear history: denied");

        let history = state.current().history;
        assert!(history.success.is_none());
        assert_eq!(
            history.error.as_deref(),
            Some("Failed to clear history: denied")
        );

        view.show_success("History cleared and counter reset to 0");
        let history = state.current().history;
        assert!(history.error.is_none());
        assert!(history.success.is_some());
    }

    #[test]
    fn fresh_counter_render_drops_stale_failure() {
        let (state, view) = view();
        view.show_message("Failed to load counter: offline");
        view.show_last_updated("Connection error");
        assert!(state.current().counter.message.is_some());

        CounterView::show_stats(&view, "1", "1", "0");
        view.show_people_inside("1");
        view.show_last_updated("Updated just now");

        let counter = state.current().counter;
        assert!(counter.message.is_none());
        assert_eq!(counter.last_updated, "Updated just now");
    }

    #[test]
    fn list_ends_loading() {
        let (state, view) = view();
        view.show_loading();
        view.show_history_list(&[HistoryEntry::new(EventKind::Entry, 1, 1)]);

        let history = state.current().history;
        assert!(!history.loading);
        assert_eq!(history.entries.len(), 1);
    }
}
