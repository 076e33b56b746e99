//! Live subscriptions delivered as a cancellable stream of tagged events.
//!
//! A store hands out a [`Subscription`] per `subscribe` call. The store keeps
//! the sending half; the subscriber drains the receiving half with
//! [`Subscription::next_event`] or through the [`Stream`] impl. Dropping the
//! subscription or calling `unsubscribe` on the store ends delivery.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use headcount_types::SubscriptionId;
use tokio::sync::mpsc;

use crate::error::StoreError;
use crate::snapshot::Snapshot;

/// One notification pushed by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// The full current state of the subscribed path.
    Snapshot(Snapshot),
    /// Access to the path failed. No further events follow.
    Failure(StoreError),
}

/// Sending half kept by the store for each live subscriber.
pub type EventSender = mpsc::UnboundedSender<StoreEvent>;

/// A live subscription to one path.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    path: String,
    rx: mpsc::UnboundedReceiver<StoreEvent>,
}

impl Subscription {
    /// Create a subscription for `path` together with the sender the store
    /// uses to push events into it.
    pub fn channel(path: &str) -> (EventSender, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = Self {
            id: SubscriptionId::new(),
            path: path.to_owned(),
            rx,
        };
        (tx, subscription)
    }

    /// Identifier to pass back to `unsubscribe`.
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The subscribed path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Wait for the next event. Returns `None` once the store has stopped
    /// delivering to this subscription.
    pub async fn next_event(&mut self) -> Option<StoreEvent> {
        self.rx.recv().await
    }
}

impl Stream for Subscription {
    type Item = StoreEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt as _;

    use super::*;

    #[tokio::test]
    async fn events_arrive_in_order_then_end() {
        let (tx, mut sub) = Subscription::channel("counter");
        assert_eq!(sub.path(), "counter");

        let _ = tx.send(StoreEvent::Snapshot(Snapshot::absent("counter")));
        let _ = tx.send(StoreEvent::Failure(StoreError::Closed));
        drop(tx);

        assert!(matches!(sub.next_event().await, Some(StoreEvent::Snapshot(_))));
        assert_eq!(
            sub.next().await,
            Some(StoreEvent::Failure(StoreError::Closed))
        );
        assert_eq!(sub.next().await, None);
    }
}
