//! Data store contract for the Headcount occupancy dashboard.
//!
//! The dashboard reads from a shared, eventually-consistent key/value tree
//! holding one counter record and one append-only activity log. This crate
//! defines how the sync controllers talk to that tree and ships an
//! in-process implementation.
//!
//! # Architecture
//!
//! ```text
//! Controller
//!     |
//!     +-- subscribe(path) -----> Subscription (stream of StoreEvent)
//!     |                              |-- Snapshot(..)  on every change
//!     |                              +-- Failure(..)   then end of stream
//!     |
//!     +-- delete_all(path) ----> Result<(), StoreError>
//!     +-- update_fields(path) -> Result<(), StoreError>
//! ```
//!
//! # Modules
//!
//! - [`store`] -- The [`DataStore`] trait and partial-update field maps
//! - [`snapshot`] -- Immutable point-in-time views with child lookup
//! - [`subscription`] -- Cancellable event streams
//! - [`memory`] -- In-memory store with ingestion and fault injection
//! - [`error`] -- Shared error types

pub mod error;
pub mod memory;
pub mod snapshot;
pub mod store;
pub mod subscription;

// Re-export primary types for convenience.
pub use error::StoreError;
pub use memory::MemoryStore;
pub use snapshot::Snapshot;
pub use store::{DataStore, FieldMap, counter_reset_fields};
pub use subscription::{EventSender, StoreEvent, Subscription};
