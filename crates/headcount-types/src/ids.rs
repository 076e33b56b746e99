//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Activity log children are keyed by UUID v7 so that storage keys sort
//! roughly by insertion time. The display order never relies on this;
//! views always receive entries sorted by their `timestamp` field.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Declares a UUID v7 key type.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(Uuid);

        impl $name {
            /// A fresh time-ordered key.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// The underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

define_id! {
    /// Storage key of a single child in the `activityLog` collection.
    LogEntryId
}

define_id! {
    /// Handle returned by a store subscription, used to unsubscribe.
    SubscriptionId
}
