//! The clear-history compound mutation.
//!
//! Phase 1 deletes the whole activity log. Phase 2 zeroes the counter with
//! a partial update and stamps `lastUpdated`. The store offers no atomicity
//! across the two paths, so a writer may slip in between the phases; that
//! race is accepted.

use headcount_store::{DataStore, StoreError, counter_reset_fields};
use headcount_types::{ACTIVITY_LOG_PATH, COUNTER_PATH};
use tracing::{info, warn};

use crate::clock::Clock;

/// Result of one clear-history run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetOutcome {
    /// Log deleted and counter zeroed.
    Success,
    /// Log deleted, but zeroing the counter failed.
    PartialFailure(StoreError),
    /// Deleting the log failed; the counter was not touched.
    Failure(StoreError),
}

impl ResetOutcome {
    /// Whether both phases succeeded.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// The message shown to the user.
    pub fn message(&self) -> String {
        match self {
            Self::Success => String::from("History cleared and counter reset to 0"),
            Self::PartialFailure(error) => format!(
                "History cleared but failed to reset counter: {}",
                error.detail()
            ),
            Self::Failure(error) => format!("Failed to clear history: {}", error.detail()),
        }
    }
}

/// Run both phases in order. Phase 2 only runs if phase 1 succeeded, and
/// reads the clock only then.
pub async fn clear_and_reset<S: DataStore>(store: &S, clock: &dyn Clock) -> ResetOutcome {
    if let Err(error) = store.delete_all(ACTIVITY_LOG_PATH).await {
        warn!(path = ACTIVITY_LOG_PATH, error = %error, "clearing activity log failed");
        return ResetOutcome::Failure(error);
    }

    let now_ms = clock.now_millis();
    match store
        .update_fields(COUNTER_PATH, counter_reset_fields(now_ms))
        .await
    {
        Ok(()) => {
            info!(reset_at = now_ms, "activity log cleared and counter reset");
            ResetOutcome::Success
        }
        Err(error) => {
            warn!(path = COUNTER_PATH, error = %error, "activity log cleared but counter reset failed");
            ResetOutcome::PartialFailure(error)
        }
    }
}
