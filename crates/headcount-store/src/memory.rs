//! In-process implementation of [`DataStore`].
//!
//! [`MemoryStore`] keeps the data tree in a mutex-guarded map and pushes
//! snapshots to subscribers synchronously inside each mutation. It also
//! plays the external ingestion process ([`MemoryStore::record`]) and
//! supports fault injection so callers can exercise every failure path
//! without a network.
//!
//! Cloning a `MemoryStore` yields another handle to the same tree.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use headcount_types::{
    ACTIVITY_LOG_PATH, COUNTER_PATH, CounterRecord, EventKind, HistoryEntry, LogEntryId,
    SubscriptionId,
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::StoreError;
use crate::snapshot::Snapshot;
use crate::store::{DataStore, FieldMap};
#[cfg(test)]
use crate::store::counter_reset_fields;
use crate::subscription::{EventSender, StoreEvent, Subscription};

/// Shared in-memory data tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    nodes: BTreeMap<String, Value>,
    subscribers: BTreeMap<String, Vec<Subscriber>>,
    faults: Faults,
    delete_calls: u64,
    update_calls: u64,
}

#[derive(Debug)]
struct Subscriber {
    id: SubscriptionId,
    tx: EventSender,
}

#[derive(Debug, Default)]
struct Faults {
    /// Paths whose reads currently fail.
    read: BTreeMap<String, StoreError>,
    next_delete: Option<StoreError>,
    next_update: Option<StoreError>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Direct writes
    // =========================================================================

    /// Replace the node at `path` and notify its subscribers.
    pub fn set(&self, path: &str, value: Value) {
        let mut inner = self.lock();
        inner.nodes.insert(path.to_owned(), value);
        inner.notify(path);
    }

    /// Replace the counter record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if the record cannot be encoded.
    pub fn set_counter(&self, record: &CounterRecord) -> Result<(), StoreError> {
        let value = serde_json::to_value(record)?;
        self.set(COUNTER_PATH, value);
        Ok(())
    }

    /// Append one child to the activity log under a fresh key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if the entry cannot be encoded.
    pub fn push_history(&self, entry: &HistoryEntry) -> Result<LogEntryId, StoreError> {
        let value = serde_json::to_value(entry)?;
        let key = LogEntryId::new();
        let mut inner = self.lock();
        inner.append_child(ACTIVITY_LOG_PATH, &key.to_string(), value);
        inner.notify(ACTIVITY_LOG_PATH);
        Ok(key)
    }

    /// Current value at `path`, if any.
    pub fn get(&self, path: &str) -> Option<Value> {
        self.lock().nodes.get(path).cloned()
    }

    // =========================================================================
    // Ingestion
    // =========================================================================

    /// Record one entry or exit at `now_ms`, the way the ingestion process
    /// does: bump the counter, then append a log child carrying the new
    /// occupancy.
    ///
    /// An exit while nobody is inside is ignored and returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if the stored counter has the
    /// wrong shape.
    pub fn record(&self, kind: EventKind, now_ms: i64) -> Result<Option<HistoryEntry>, StoreError> {
        let mut inner = self.lock();
        let current = Snapshot::new(COUNTER_PATH, inner.nodes.get(COUNTER_PATH).cloned());
        let mut record: CounterRecord = current.deserialize()?.unwrap_or_default();

        match kind {
            EventKind::Entry => {
                record.entry_count = record.entry_count.saturating_add(1);
                record.current_in_room = record.current_in_room.saturating_add(1);
            }
            EventKind::Exit => {
                if record.current_in_room <= 0 {
                    debug!("exit ignored, room already empty");
                    return Ok(None);
                }
                record.exit_count = record.exit_count.saturating_add(1);
                record.current_in_room = record.current_in_room.saturating_sub(1);
            }
        }
        record.last_updated = now_ms;

        let entry = HistoryEntry::new(kind, now_ms, record.current_in_room);
        inner
            .nodes
            .insert(COUNTER_PATH.to_owned(), serde_json::to_value(record)?);
        inner.notify(COUNTER_PATH);

        let key = LogEntryId::new().to_string();
        inner.append_child(ACTIVITY_LOG_PATH, &key, serde_json::to_value(&entry)?);
        inner.notify(ACTIVITY_LOG_PATH);

        Ok(Some(entry))
    }

    // =========================================================================
    // Fault injection
    // =========================================================================

    /// Make every read of `path` fail with `error`.
    ///
    /// Live subscribers receive the failure and their streams end; new
    /// subscriptions fail immediately until [`restore`](Self::restore).
    pub fn fail_reads(&self, path: &str, error: StoreError) {
        let mut inner = self.lock();
        if let Some(subscribers) = inner.subscribers.remove(path) {
            for subscriber in subscribers {
                let _ = subscriber.tx.send(StoreEvent::Failure(error.clone()));
            }
        }
        inner.faults.read.insert(path.to_owned(), error);
    }

    /// Let reads of `path` succeed again.
    pub fn restore(&self, path: &str) {
        self.lock().faults.read.remove(path);
    }

    /// Fail the next `delete_all` call with `error`.
    pub fn fail_next_delete(&self, error: StoreError) {
        self.lock().faults.next_delete = Some(error);
    }

    /// Fail the next `update_fields` call with `error`.
    pub fn fail_next_update(&self, error: StoreError) {
        self.lock().faults.next_update = Some(error);
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Number of `delete_all` calls received, including failed ones.
    pub fn delete_calls(&self) -> u64 {
        self.lock().delete_calls
    }

    /// Number of `update_fields` calls received, including failed ones.
    pub fn update_calls(&self) -> u64 {
        self.lock().update_calls
    }

    /// Number of live subscriptions on `path`.
    pub fn subscriber_count(&self, path: &str) -> usize {
        let mut inner = self.lock();
        inner.prune(path);
        inner.subscribers.get(path).map_or(0, Vec::len)
    }
}

impl Inner {
    fn snapshot(&self, path: &str) -> Snapshot {
        Snapshot::new(path, self.nodes.get(path).cloned())
    }

    /// Push the current snapshot of `path` to every live subscriber,
    /// dropping those whose receiving half is gone.
    fn notify(&mut self, path: &str) {
        let snapshot = self.snapshot(path);
        if let Some(subscribers) = self.subscribers.get_mut(path) {
            subscribers
                .retain(|s| s.tx.send(StoreEvent::Snapshot(snapshot.clone())).is_ok());
        }
    }

    fn prune(&mut self, path: &str) {
        if let Some(subscribers) = self.subscribers.get_mut(path) {
            subscribers.retain(|s| !s.tx.is_closed());
        }
    }

    fn append_child(&mut self, path: &str, key: &str, value: Value) {
        let node = self
            .nodes
            .entry(path.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        if let Value::Object(map) = node {
            map.insert(key.to_owned(), value);
        }
    }
}

impl DataStore for MemoryStore {
    fn subscribe(&self, path: &str) -> Subscription {
        let (tx, subscription) = Subscription::channel(path);
        let mut inner = self.lock();

        if let Some(error) = inner.faults.read.get(path) {
            debug!(path, error = %error, "subscription refused");
            let _ = tx.send(StoreEvent::Failure(error.clone()));
            return subscription;
        }

        let _ = tx.send(StoreEvent::Snapshot(inner.snapshot(path)));
        inner
            .subscribers
            .entry(path.to_owned())
            .or_default()
            .push(Subscriber {
                id: subscription.id(),
                tx,
            });
        debug!(path, subscription_id = %subscription.id(), "subscription opened");
        subscription
    }

    fn unsubscribe(&self, path: &str, id: SubscriptionId) {
        let mut inner = self.lock();
        if let Some(subscribers) = inner.subscribers.get_mut(path) {
            subscribers.retain(|s| s.id != id);
        }
    }

    async fn delete_all(&self, path: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.delete_calls = inner.delete_calls.saturating_add(1);
        if let Some(error) = inner.faults.next_delete.take() {
            return Err(error);
        }
        inner.nodes.remove(path);
        inner.notify(path);
        Ok(())
    }

    async fn update_fields(&self, path: &str, fields: FieldMap) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.update_calls = inner.update_calls.saturating_add(1);
        if let Some(error) = inner.faults.next_update.take() {
            return Err(error);
        }
        let node = inner
            .nodes
            .entry(path.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        if let Value::Object(map) = node {
            map.extend(fields);
        }
        inner.notify(path);
        Ok(())
    }
}
