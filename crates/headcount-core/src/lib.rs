//! Live sync controllers for the Headcount occupancy dashboard.
//!
//! Two screens are kept in step with the data store: the counter panel
//! (people inside, entries, exits, last update) and the activity log
//! (stats plus the event list, with a clear-history action). Each screen
//! has a controller that owns its subscriptions and renders through a
//! view trait, so any front end can plug in.
//!
//! # Lifecycle
//!
//! ```text
//! new -> attach(view) -> load() -> [store pushes render] -> detach()
//! ```
//!
//! After `detach` returns no further render reaches the old view.
//!
//! # Modules
//!
//! - [`clock`] -- Wall clock abstraction with a manual test clock.
//! - [`config`] -- Configuration loading from `headcount-config.yaml`.
//! - [`counter_sync`] -- [`CounterSyncController`] for the counter panel.
//! - [`history_sync`] -- [`HistorySyncController`] for the activity log.
//! - [`reconcile`] -- Snapshot to display-model conversion with defaults.
//! - [`relative_time`] -- "N minutes ago" style formatting.
//! - [`reset`] -- The two-phase clear-history mutation.
//! - [`view`] -- Display traits the controllers render through.
//!
//! [`CounterSyncController`]: counter_sync::CounterSyncController
//! [`HistorySyncController`]: history_sync::HistorySyncController

pub mod clock;
pub mod config;
pub mod counter_sync;
pub mod history_sync;
pub mod reconcile;
pub mod relative_time;
pub mod reset;
pub mod view;

mod feed;

#[cfg(test)]
mod testing;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, DashboardConfig};
pub use counter_sync::{CounterDisplay, CounterSyncController};
pub use history_sync::HistorySyncController;
pub use reset::{ResetOutcome, clear_and_reset};
pub use view::{CounterView, HistoryView};

/// Where a controller is in its attach/load/detach lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No view bound; renders are dropped.
    Unattached,
    /// View bound, no live subscription yet.
    Attached,
    /// Live subscription delivering updates.
    Subscribed,
    /// The store reported a failure; no more updates until the next load.
    SubscriptionFailed,
}
