//! Records stored in the shared data tree and the aggregates derived from them.
//!
//! The remote layout is fixed:
//!
//! | Path | Shape |
//! |------|-------|
//! | `counter` | `{ entryCount, exitCount, currentInRoom, lastUpdated }` |
//! | `activityLog` | `{ <key>: { type, timestamp, count } }` |

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Path of the single shared counter record.
pub const COUNTER_PATH: &str = "counter";

/// Path of the append-only activity log collection.
pub const ACTIVITY_LOG_PATH: &str = "activityLog";

/// Field names used inside the `counter` record.
pub mod counter_fields {
    /// Cumulative entries observed.
    pub const ENTRY_COUNT: &str = "entryCount";
    /// Cumulative exits observed.
    pub const EXIT_COUNT: &str = "exitCount";
    /// Live occupancy.
    pub const CURRENT_IN_ROOM: &str = "currentInRoom";
    /// Unix millisecond timestamp of the last mutation.
    pub const LAST_UPDATED: &str = "lastUpdated";
}

/// Field names used inside each `activityLog` child.
pub mod log_fields {
    /// Event kind (`entry`, `exit`, or anything else).
    pub const TYPE: &str = "type";
    /// Unix millisecond timestamp of the event.
    pub const TIMESTAMP: &str = "timestamp";
    /// Occupancy recorded at the event.
    pub const COUNT: &str = "count";
}

/// The single shared counter document.
///
/// `current_in_room` is authoritative. It usually equals
/// `entry_count - exit_count` but nothing here derives it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CounterRecord {
    /// Cumulative entries observed.
    pub entry_count: i64,
    /// Cumulative exits observed.
    pub exit_count: i64,
    /// Live occupancy.
    pub current_in_room: i64,
    /// Unix millisecond timestamp of the last mutation (0 = never).
    pub last_updated: i64,
}

impl CounterRecord {
    /// Project the record onto the three headline aggregates.
    pub const fn stats(&self) -> OccupancyStats {
        OccupancyStats {
            inside: self.current_in_room,
            entered: self.entry_count,
            exited: self.exit_count,
        }
    }
}

/// One element of the activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HistoryEntry {
    /// Event kind. An empty string means the kind was not recorded.
    #[serde(rename = "type")]
    pub kind: String,
    /// Unix millisecond timestamp of the event.
    pub timestamp: i64,
    /// Occupancy recorded at the event.
    pub count: i64,
}

impl HistoryEntry {
    /// Build an entry from an [`EventKind`].
    pub fn new(kind: EventKind, timestamp: i64, count: i64) -> Self {
        Self {
            kind: kind.as_str().to_owned(),
            timestamp,
            count,
        }
    }

    /// Parse the stored kind string. Unknown strings map to `None`.
    pub fn event_kind(&self) -> Option<EventKind> {
        EventKind::parse(&self.kind)
    }
}

/// The two kinds of event the ingestion side records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum EventKind {
    /// Somebody came in.
    Entry,
    /// Somebody left.
    Exit,
}

impl EventKind {
    /// Wire representation stored in the `type` field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Exit => "exit",
        }
    }

    /// Parse a stored `type` field.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "entry" => Some(Self::Entry),
            "exit" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Headline aggregates shown on both screens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct OccupancyStats {
    /// Currently inside.
    pub inside: i64,
    /// Entered since the last reset.
    pub entered: i64,
    /// Exited since the last reset.
    pub exited: i64,
}
