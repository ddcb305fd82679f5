//! # Per-subscriber lanes for runtime events.
//!
//! [`SubscriberSet`] owns one *lane* per subscriber: a bounded queue and the
//! tokio task draining it. The runtime listener pushes every bus event into
//! all lanes; no lane ever waits for another.
//!
//! ```text
//! emit(&event) ─► Arc<Event> ─┬─► lane "log"     [queue] ─► worker ─► on_event()
//!                             ├─► lane "metrics" [queue] ─► worker ─► on_event()
//!                             └─► lane "..."     [queue] ─► worker ─► on_event()
//!                                      │ full / closed
//!                                      └─► Bus ◄── SubscriberOverflow
//! ```
//!
//! ## Rules
//! - Order is kept per lane only.
//! - A full or closed lane drops the event for that subscriber and reports
//!   `SubscriberOverflow`, except for overflow events themselves.
//! - A panic inside `on_event` is reported as `SubscriberPanicked`; the lane keeps running.
//!
//! **Warning**: panics are caught through `AssertUnwindSafe`; a subscriber that
//! panics while holding one of its own locks leaves that lock poisoned.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::events::{Bus, Event};
use crate::failure;
use crate::subscribers::Subscribe;

struct Lane {
    name: &'static str,
    tx: mpsc::Sender<Arc<Event>>,
    worker: JoinHandle<()>,
}

impl Lane {
    /// Opens the queue for `sub` and spawns its worker on the current runtime.
    fn open(sub: Arc<dyn Subscribe>, bus: Bus) -> Self {
        let name = sub.name();
        let (tx, rx) = mpsc::channel(sub.queue_capacity().max(1));
        let worker = tokio::spawn(drain(sub, rx, bus));
        Self { name, tx, worker }
    }
}

async fn drain(sub: Arc<dyn Subscribe>, mut rx: mpsc::Receiver<Arc<Event>>, bus: Bus) {
    while let Some(ev) = rx.recv().await {
        let handled = AssertUnwindSafe(sub.on_event(&ev)).catch_unwind().await;
        if let Err(payload) = handled {
            bus.publish(Event::subscriber_panicked(sub.name(), failure::panic_message(&*payload)));
        }
    }
}

/// Fan-out of runtime events to every registered [`Subscribe`] implementation.
pub struct SubscriberSet {
    lanes: Vec<Lane>,
    bus: Bus,
}

impl SubscriberSet {
    /// Opens one lane per subscriber.
    ///
    /// Must be called inside a tokio runtime; workers start immediately.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let lanes = subs.into_iter().map(|sub| Lane::open(sub, bus.clone())).collect();
        Self { lanes, bus }
    }

    /// Queues `event` on every lane without waiting.
    pub fn emit(&self, event: &Event) {
        let shared = Arc::new(event.clone());
        let report = !shared.is_subscriber_overflow();

        for lane in &self.lanes {
            let reason = match lane.tx.try_send(Arc::clone(&shared)) {
                Ok(()) => continue,
                Err(TrySendError::Full(_)) => "full",
                Err(TrySendError::Closed(_)) => "closed",
            };
            if report {
                self.bus.publish(Event::subscriber_overflow(lane.name, reason));
            }
        }
    }

    /// Number of lanes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    /// True if no subscriber was registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Closes every queue and waits until each worker handled what was queued.
    pub async fn shutdown(self) {
        let workers: Vec<JoinHandle<()>> = self
            .lanes
            .into_iter()
            .map(|lane| {
                drop(lane.tx);
                lane.worker
            })
            .collect();
        for worker in workers {
            let _ = worker.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recorder {
        seen: Arc<Mutex<Vec<EventKind>>>,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, ev: &Event) {
            self.seen.lock().unwrap().push(ev.kind);
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    struct Exploding;

    #[async_trait]
    impl Subscribe for Exploding {
        async fn on_event(&self, _ev: &Event) {
            panic!("subscriber blew up");
        }

        fn name(&self) -> &'static str {
            "exploding"
        }
    }

    struct Stuck;

    #[async_trait]
    impl Subscribe for Stuck {
        async fn on_event(&self, _ev: &Event) {
            std::future::pending::<()>().await;
        }

        fn name(&self) -> &'static str {
            "stuck"
        }

        fn queue_capacity(&self) -> usize {
            1
        }
    }

    #[tokio::test]
    async fn delivers_in_order_and_drains_on_shutdown() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let set = SubscriberSet::new(
            vec![Arc::new(Recorder { seen: Arc::clone(&seen) }) as Arc<dyn Subscribe>],
            Bus::new(16),
        );
        assert_eq!(set.len(), 1);

        set.emit(&Event::new(EventKind::ProtocolViolation));
        set.emit(&Event::new(EventKind::Undeliverable));
        set.shutdown().await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec![EventKind::ProtocolViolation, EventKind::Undeliverable]
        );
    }

    #[tokio::test]
    async fn panics_become_events() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let set = SubscriberSet::new(vec![Arc::new(Exploding) as Arc<dyn Subscribe>], bus.clone());

        set.emit(&Event::new(EventKind::DisposeFailed));
        set.shutdown().await;

        let ev = rx.recv().await.unwrap();
        assert!(ev.is_subscriber_panic());
        assert_eq!(ev.operator.as_deref(), Some("exploding"));
        assert_eq!(ev.reason.as_deref(), Some("subscriber blew up"));
    }

    #[tokio::test]
    async fn full_lane_reports_overflow() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let set = SubscriberSet::new(vec![Arc::new(Stuck) as Arc<dyn Subscribe>], bus.clone());

        // The worker may or may not have taken the first event yet; two more
        // always exceed a queue of one.
        for _ in 0..3 {
            set.emit(&Event::new(EventKind::Undeliverable));
        }

        let ev = rx.recv().await.unwrap();
        assert!(ev.is_subscriber_overflow());
        assert_eq!(ev.operator.as_deref(), Some("stuck"));
        assert_eq!(ev.reason.as_deref(), Some("full"));
    }
}
