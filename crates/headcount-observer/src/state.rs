//! Shared application state for the dashboard API server.
//!
//! [`AppState`] holds the last rendered state of both screens, the
//! broadcast channel that fans updates out to `WebSocket` clients, and the
//! command channel back to the controllers.

use headcount_types::{HistoryEntry, OccupancyStats};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, watch};

/// Capacity of the broadcast channel for panel updates.
///
/// A subscriber that falls further behind receives
/// [`broadcast::error::RecvError::Lagged`] and skips to the newest update.
const BROADCAST_CAPACITY: usize = 256;

/// The counter screen as last rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterPanel {
    /// Currently inside.
    pub inside: String,
    /// Entered since the last reset.
    pub entered: String,
    /// Exited since the last reset.
    pub exited: String,
    /// The large "people inside" figure.
    pub people_inside: String,
    /// Relative last-update text or status line.
    pub last_updated: String,
    /// Last transient message, if any.
    pub message: Option<String>,
    /// How many times navigation to the activity log was requested.
    pub activity_log_requests: u64,
}

impl Default for CounterPanel {
    fn default() -> Self {
        Self {
            inside: String::from("-"),
            entered: String::from("-"),
            exited: String::from("-"),
            people_inside: String::from("-"),
            last_updated: String::new(),
            message: None,
            activity_log_requests: 0,
        }
    }
}

/// The activity log screen as last rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoryPanel {
    /// Whether the list is still loading.
    pub loading: bool,
    /// Live occupancy stats.
    pub stats: OccupancyStats,
    /// Log entries, newest first.
    pub entries: Vec<HistoryEntry>,
    /// Last error message, cleared on the next load.
    pub error: Option<String>,
    /// Last success message, cleared on the next load.
    pub success: Option<String>,
}

/// Both screens together, served by the REST endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    /// Counter screen.
    pub counter: CounterPanel,
    /// Activity log screen.
    pub history: HistoryPanel,
}

/// One panel update pushed over the `WebSocket`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum DashboardUpdate {
    /// The counter panel changed.
    Counter(CounterPanel),
    /// The activity log panel changed.
    History(HistoryPanel),
}

/// User actions forwarded from HTTP clients to the controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardCommand {
    /// Run the clear-history reset.
    ClearHistory,
    /// The activity log button on the counter screen was clicked.
    OpenActivityLog,
}

/// Shared state for the Axum application.
///
/// The snapshot lives in a [`watch`] channel so the synchronous view
/// callbacks can update it without awaiting.
#[derive(Debug)]
pub struct AppState {
    /// Broadcast sender for panel updates.
    pub tx: broadcast::Sender<DashboardUpdate>,
    /// Latest rendered panels.
    pub snapshot: watch::Sender<DashboardSnapshot>,
    commands: mpsc::UnboundedSender<DashboardCommand>,
}

impl AppState {
    /// Create a new state with empty panels, returning the receiving end
    /// of the command channel for the controller loop.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DashboardCommand>) {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        let (snapshot, _) = watch::channel(DashboardSnapshot::default());
        let (commands, command_rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                snapshot,
                commands,
            },
            command_rx,
        )
    }

    /// Subscribe to panel updates.
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardUpdate> {
        self.tx.subscribe()
    }

    /// Publish an update to all connected clients.
    ///
    /// Returns the number of receivers reached; 0 with no clients is not
    /// an error.
    pub fn broadcast(&self, update: DashboardUpdate) -> usize {
        self.tx.send(update).unwrap_or(0)
    }

    /// Copy of both panels as last rendered.
    pub fn current(&self) -> DashboardSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Mutate the counter panel and broadcast the result.
    pub fn update_counter(&self, f: impl FnOnce(&mut CounterPanel)) {
        let mut updated = None;
        self.snapshot.send_modify(|snapshot| {
            f(&mut snapshot.counter);
            updated = Some(snapshot.counter.clone());
        });
        if let Some(panel) = updated {
            self.broadcast(DashboardUpdate::Counter(panel));
        }
    }

    /// Mutate the history panel and broadcast the result.
    pub fn update_history(&self, f: impl FnOnce(&mut HistoryPanel)) {
        let mut updated = None;
        self.snapshot.send_modify(|snapshot| {
            f(&mut snapshot.history);
            updated = Some(snapshot.history.clone());
        });
        if let Some(panel) = updated {
            self.broadcast(DashboardUpdate::History(panel));
        }
    }

    /// Queue a command for the controllers.
    ///
    /// Returns `false` once the controller loop has shut down.
    pub fn send_command(&self, command: DashboardCommand) -> bool {
        self.commands.send(command).is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn update_counter_mutates_snapshot_and_broadcasts() {
        let (state, _commands) = AppState::new();
        let mut rx = state.subscribe();

        state.update_counter(|panel| panel.inside = String::from("4"));

        assert_eq!(state.current().counter.inside, "4");
        assert!(matches!(
            rx.try_recv().unwrap(),
            DashboardUpdate::Counter(panel) if panel.inside == "4"
        ));
    }

    #[test]
    fn broadcast_without_clients_is_not_an_error() {
        let (state, _commands) = AppState::new();
        assert_eq!(
            state.broadcast(DashboardUpdate::History(HistoryPanel::default())),
            0
        );
    }

    #[test]
    fn commands_fail_after_receiver_dropped() {
        let (state, mut commands) = AppState::new();
        assert!(state.send_command(DashboardCommand::ClearHistory));
        assert_eq!(commands.try_recv().unwrap(), DashboardCommand::ClearHistory);
        drop(commands);
        assert!(!state.send_command(DashboardCommand::OpenActivityLog));
    }

    #[test]
    fn update_serializes_with_panel_tag() {
        let json = serde_json::to_value(DashboardUpdate::Counter(CounterPanel::default())).unwrap();
        assert_eq!(json["panel"], "counter");
        assert_eq!(json["people_inside"], "-");
    }
}
