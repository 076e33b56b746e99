//! Recording view double shared by the controller tests.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use headcount_types::{HistoryEntry, OccupancyStats};

use crate::view::{CounterView, HistoryView};

/// One view method invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Stats(String, String, String),
    PeopleInside(String),
    LastUpdated(String),
    Message(String),
    OpenActivityLog,
    Loading,
    HistoryStats(OccupancyStats),
    HistoryList(Vec<HistoryEntry>),
    Error(String),
    Success(String),
}

/// Records every call in order.
#[derive(Debug, Default)]
pub(crate) struct RecordingView {
    calls: Mutex<Vec<Call>>,
}

impl RecordingView {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, call: Call) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Poll until `predicate` holds, failing the test after two seconds.
    pub(crate) async fn wait_for(&self, predicate: impl Fn(&[Call]) -> bool) {
        let waited = tokio::time::timeout(Duration::from_secs(2), async {
            while !predicate(&self.calls()) {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await;
        assert!(waited.is_ok(), "timed out, calls so far: {:?}", self.calls());
    }
}

impl CounterView for RecordingView {
    fn show_stats(&self, inside: &str, entered: &str, exited: &str) {
        self.push(Call::Stats(
            inside.to_owned(),
            entered.to_owned(),
            exited.to_owned(),
        ));
    }

    fn show_people_inside(&self, count: &str) {
        self.push(Call::PeopleInside(count.to_owned()));
    }

    fn show_last_updated(&self, text: &str) {
        self.push(Call::LastUpdated(text.to_owned()));
    }

    fn show_message(&self, message: &str) {
        self.push(Call::Message(message.to_owned()));
    }

    fn open_activity_log(&self) {
        self.push(Call::OpenActivityLog);
    }
}

impl HistoryView for RecordingView {
    fn show_loading(&self) {
        self.push(Call::Loading);
    }

    fn show_stats(&self, stats: OccupancyStats) {
        self.push(Call::HistoryStats(stats));
    }

    fn show_history_list(&self, entries: &[HistoryEntry]) {
        self.push(Call::HistoryList(entries.to_vec()));
    }

    fn show_error(&self, message: &str) {
        self.push(Call::Error(message.to_owned()));
    }

    fn show_success(&self, message: &str) {
        self.push(Call::Success(message.to_owned()));
    }
}
