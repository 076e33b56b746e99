//! Conversion of raw snapshots into display-ready aggregates.
//!
//! Every missing or malformed field falls back to its default (`0` or the
//! empty string). Nothing here fails: a half-written record still renders.

use headcount_store::Snapshot;
use headcount_types::{CounterRecord, HistoryEntry, OccupancyStats, counter_fields, log_fields};

/// Read the counter record field by field.
///
/// Returns `None` when the record does not exist at all.
pub fn counter_record(snapshot: &Snapshot) -> Option<CounterRecord> {
    if !snapshot.exists() {
        return None;
    }
    let field = |name: &str| snapshot.child(name).as_i64().unwrap_or(0);
    Some(CounterRecord {
        entry_count: field(counter_fields::ENTRY_COUNT),
        exit_count: field(counter_fields::EXIT_COUNT),
        current_in_room: field(counter_fields::CURRENT_IN_ROOM),
        last_updated: field(counter_fields::LAST_UPDATED),
    })
}

/// Headline stats from the counter record, all zero when it is absent.
pub fn occupancy_stats(snapshot: &Snapshot) -> OccupancyStats {
    counter_record(snapshot)
        .as_ref()
        .map_or_else(OccupancyStats::default, CounterRecord::stats)
}

/// Materialize every log child and sort most recent first.
///
/// An absent collection yields an empty list. Ties keep no particular
/// order.
pub fn history_entries(snapshot: &Snapshot) -> Vec<HistoryEntry> {
    let mut entries: Vec<HistoryEntry> = snapshot
        .children()
        .map(|child| HistoryEntry {
            kind: child
                .child(log_fields::TYPE)
                .as_str()
                .unwrap_or_default()
                .to_owned(),
            timestamp: child.child(log_fields::TIMESTAMP).as_i64().unwrap_or(0),
            count: child.child(log_fields::COUNT).as_i64().unwrap_or(0),
        })
        .collect();
    entries.sort_unstable_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn absent_counter_is_none_and_zero_stats() {
        let snap = Snapshot::absent("counter");
        assert_eq!(counter_record(&snap), None);
        assert_eq!(occupancy_stats(&snap), OccupancyStats::default());
    }

    #[test]
    fn missing_counter_fields_default_to_zero() {
        let snap = Snapshot::new("counter", Some(json!({"entryCount": 7})));
        let record = counter_record(&snap);
        assert_eq!(
            record,
            Some(CounterRecord {
                entry_count: 7,
                exit_count: 0,
                current_in_room: 0,
                last_updated: 0,
            })
        );
    }

    #[test]
    fn wrongly_typed_fields_default_to_zero() {
        let snap = Snapshot::new(
            "counter",
            Some(json!({"entryCount": "five", "exitCount": 2, "currentInRoom": null})),
        );
        let stats = occupancy_stats(&snap);
        assert_eq!(
            stats,
            OccupancyStats {
                inside: 0,
                entered: 0,
                exited: 2
            }
        );
    }

    #[test]
    fn history_sorted_descending_by_timestamp() {
        let snap = Snapshot::new(
            "activityLog",
            Some(json!({
                "k1": {"type": "entry", "timestamp": 5, "count": 1},
                "k2": {"type": "exit", "timestamp": 3, "count": 0},
                "k3": {"type": "entry", "timestamp": 9, "count": 2},
                "k4": {"type": "entry", "timestamp": 3, "count": 1}
            })),
        );
        let timestamps: Vec<i64> = history_entries(&snap).iter().map(|e| e.timestamp).collect();
        assert_eq!(timestamps, vec![9, 5, 3, 3]);
    }

    #[test]
    fn history_fields_default_when_missing() {
        let snap = Snapshot::new("activityLog", Some(json!({"k": {"count": 4}})));
        let entries = history_entries(&snap);
        assert_eq!(
            entries,
            vec![HistoryEntry {
                kind: String::new(),
                timestamp: 0,
                count: 4,
            }]
        );
    }

    #[test]
    fn absent_history_is_empty() {
        assert!(history_entries(&Snapshot::absent("activityLog")).is_empty());
    }
}
