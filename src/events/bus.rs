//! # Event bus for broadcasting runtime events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from any thread, including threads that are
//! not part of a tokio runtime (sources and operators are synchronous).
//!
//! ## Architecture
//! ```text
//! Publishers (many):                        Subscriber (one):
//!   ProtocolGuard ──┐
//!   Operators     ──┼──► hook ──► Bus ───► Runtime listener ────► SubscriberSet
//!   SubscriberSet ──┘           (broadcast chan)
//! ```
//!
//! ## Rules
//! - `publish()` never waits; without receivers the event is simply dropped.
//! - One ring buffer of `capacity` events is shared by all receivers; a
//!   receiver that falls behind sees `Lagged(n)` and loses the `n` oldest.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for runtime events; clones publish into the same channel.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (clamped to at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that will observe subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Returns `true` if both values publish into the same channel.
    pub fn same_channel(&self, other: &Bus) -> bool {
        self.tx.same_channel(&other.tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn receivers_see_events_published_after_subscribe() {
        let bus = Bus::new(8);
        bus.publish(Event::new(EventKind::Undeliverable));

        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::DisposeFailed));

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::DisposeFailed);
    }

    #[test]
    fn clones_share_the_channel() {
        let bus = Bus::new(0);
        assert!(bus.same_channel(&bus.clone()));
        assert!(!bus.same_channel(&Bus::new(4)));
    }
}
