//! One live subscription consumed on its own task.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use headcount_store::{DataStore, StoreEvent};
use headcount_types::SubscriptionId;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A subscription plus the task draining it.
///
/// Events are handed to the handler strictly in delivery order. The feed
/// stops on cancellation, on a failure event, or when the store closes
/// the stream.
pub(crate) struct Feed {
    path: String,
    id: SubscriptionId,
    token: CancellationToken,
    failed: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl Feed {
    /// Subscribe to `path` and spawn the draining task.
    ///
    /// Must be called from within a Tokio runtime.
    pub(crate) fn open<S, H>(store: &S, path: &str, mut handler: H) -> Self
    where
        S: DataStore,
        H: FnMut(&CancellationToken, StoreEvent) + Send + 'static,
    {
        let mut subscription = store.subscribe(path);
        let id = subscription.id();
        let token = CancellationToken::new();
        let failed = Arc::new(AtomicBool::new(false));

        let handle = tokio::spawn({
            let token = token.clone();
            let failed = Arc::clone(&failed);
            let path = path.to_owned();
            async move {
                loop {
                    let event = tokio::select! {
                        biased;
                        () = token.cancelled() => break,
                        event = subscription.next_event() => event,
                    };
                    let Some(event) = event else {
                        debug!(path, subscription_id = %id, "subscription stream ended");
                        break;
                    };
                    let is_failure = matches!(event, StoreEvent::Failure(_));
                    if is_failure {
                        failed.store(true, Ordering::Release);
                    }
                    handler(&token, event);
                    if is_failure {
                        break;
                    }
                }
            }
        });

        debug!(path, subscription_id = %id, "feed opened");
        Self {
            path: path.to_owned(),
            id,
            token,
            failed,
            handle,
        }
    }

    /// Whether the store reported a failure on this feed.
    pub(crate) fn has_failed(&self) -> bool {
        self.failed.load(Ordering::Acquire)
    }

    /// Stop delivery and give the subscription back to the store.
    pub(crate) fn release<S: DataStore>(self, store: &S) {
        self.token.cancel();
        store.unsubscribe(&self.path, self.id);
        self.handle.abort();
        debug!(path = self.path, subscription_id = %self.id, "feed released");
    }
}
