//! Shared type definitions for the Headcount occupancy dashboard.
//!
//! This crate is the single source of truth for the records kept in the
//! shared data tree and the aggregates shown to viewers. Types defined here
//! flow downstream to `TypeScript` via `ts-rs` for the dashboard frontend.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for log keys and subscriptions
//! - [`records`] -- Counter record, history entries, and derived stats

pub mod ids;
pub mod records;

// Re-export all public types at crate root for convenience.
pub use ids::{LogEntryId, SubscriptionId};
pub use records::{
    ACTIVITY_LOG_PATH, COUNTER_PATH, CounterRecord, EventKind, HistoryEntry, OccupancyStats,
    counter_fields, log_fields,
};
