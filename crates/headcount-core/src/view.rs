//! Display surfaces driven by the controllers.
//!
//! Views are write-only from the controllers' side: they receive formatted
//! strings and plain integers, never raw snapshots, and are never queried.
//! Methods take `&self` because renders arrive from subscription tasks;
//! implementations use interior mutability.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use headcount_types::{HistoryEntry, OccupancyStats};
use tokio_util::sync::CancellationToken;

/// The live counter screen.
pub trait CounterView: Send + Sync {
    /// Headline figures: currently inside, entered, exited.
    fn show_stats(&self, inside: &str, entered: &str, exited: &str);

    /// The large "people inside" figure.
    fn show_people_inside(&self, count: &str);

    /// Status line under the figures ("Updated 2m ago", "No data yet", ...).
    fn show_last_updated(&self, text: &str);

    /// A transient user-visible message.
    fn show_message(&self, message: &str);

    /// The user asked for the activity log. Navigation is the view's job.
    fn open_activity_log(&self);
}

/// The activity log screen.
pub trait HistoryView: Send + Sync {
    /// Data is on its way.
    fn show_loading(&self);

    /// Live headline figures.
    fn show_stats(&self, stats: OccupancyStats);

    /// The full log, most recent first. Replaces whatever was shown before.
    fn show_history_list(&self, entries: &[HistoryEntry]);

    /// A user-visible failure message.
    fn show_error(&self, message: &str);

    /// A user-visible confirmation.
    fn show_success(&self, message: &str);
}

/// Guarded reference to the attached view, shared with subscription tasks.
///
/// Renders run while holding the slot's lock, and `clear` takes the same
/// lock. Once `clear` returns, no render can reach the old view, even one
/// whose notification was already queued.
pub(crate) struct ViewSlot<V: ?Sized> {
    inner: Arc<Mutex<Option<Arc<V>>>>,
}

impl<V: ?Sized> Clone for ViewSlot<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: ?Sized> Default for ViewSlot<V> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
        }
    }
}

impl<V: ?Sized> ViewSlot<V> {
    fn lock(&self) -> MutexGuard<'_, Option<Arc<V>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn set(&self, view: Arc<V>) {
        *self.lock() = Some(view);
    }

    pub(crate) fn clear(&self) {
        *self.lock() = None;
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.lock().is_some()
    }

    /// Render on the attached view, if any.
    pub(crate) fn render(&self, f: impl FnOnce(&V)) -> bool {
        let guard = self.lock();
        guard.as_deref().is_some_and(|view| {
            f(view);
            true
        })
    }

    /// Render only while `token` is live. The check happens under the lock
    /// so a cancelled feed can never slip one last frame in.
    pub(crate) fn render_live(&self, token: &CancellationToken, f: impl FnOnce(&V)) -> bool {
        let guard = self.lock();
        if token.is_cancelled() {
            return false;
        }
        guard.as_deref().is_some_and(|view| {
            f(view);
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    trait Probe: Send + Sync {
        fn hit(&self);
    }

    #[derive(Default)]
    struct Counter(AtomicUsize);

    impl Probe for Counter {
        fn hit(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn cleared_slot_swallows_renders() {
        let probe = Arc::new(Counter::default());
        let slot: ViewSlot<dyn Probe> = ViewSlot::default();
        assert!(!slot.render(|p| p.hit()));

        slot.set(probe.clone());
        assert!(slot.is_attached());
        assert!(slot.render(|p| p.hit()));

        slot.clear();
        assert!(!slot.render(|p| p.hit()));
        assert_eq!(probe.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cancelled_token_blocks_live_renders() {
        let probe = Arc::new(Counter::default());
        let slot: ViewSlot<dyn Probe> = ViewSlot::default();
        slot.set(probe.clone());

        let token = CancellationToken::new();
        assert!(slot.render_live(&token, |p| p.hit()));
        token.cancel();
        assert!(!slot.render_live(&token, |p| p.hit()));
        assert_eq!(probe.0.load(Ordering::SeqCst), 1);
    }
}
