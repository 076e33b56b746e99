//! The data store contract consumed by the sync controllers.
//!
//! The store is a networked, eventually-consistent key/value tree. The
//! controllers never talk to a concrete backend; they hold an injected
//! `Arc<S>` where `S: DataStore`, which keeps test doubles and the
//! in-memory store interchangeable with a remote one.

use std::future::Future;

use headcount_types::{SubscriptionId, counter_fields};
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::subscription::Subscription;

/// Field name to value map used for partial updates.
pub type FieldMap = Map<String, Value>;

/// Remote subscription and mutation API.
///
/// Delivery guarantees expected from implementations:
///
/// - every `subscribe` call receives a full snapshot immediately, then
///   another full snapshot on every change at the path;
/// - pushes for one subscription are delivered in order;
/// - a failed read is delivered as a single
///   [`StoreEvent::Failure`](crate::StoreEvent::Failure), after which the
///   stream ends. Retrying is the store's business, not the caller's.
pub trait DataStore: Send + Sync + 'static {
    /// Open a live subscription to `path`.
    fn subscribe(&self, path: &str) -> Subscription;

    /// Stop delivery for `id`. Unknown or already-removed ids are ignored.
    fn unsubscribe(&self, path: &str, id: SubscriptionId);

    /// Remove every entry under `path`.
    fn delete_all(&self, path: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Merge `fields` into the record at `path`, leaving other fields
    /// untouched. Creates the record if it does not exist.
    fn update_fields(
        &self,
        path: &str,
        fields: FieldMap,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// The four-field partial update written by a counter reset.
pub fn counter_reset_fields(now_ms: i64) -> FieldMap {
    let mut fields = Map::new();
    fields.insert(counter_fields::ENTRY_COUNT.to_owned(), Value::from(0));
    fields.insert(counter_fields::EXIT_COUNT.to_owned(), Value::from(0));
    fields.insert(counter_fields::CURRENT_IN_ROOM.to_owned(), Value::from(0));
    fields.insert(counter_fields::LAST_UPDATED.to_owned(), Value::from(now_ms));
    fields
}
