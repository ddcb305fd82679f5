//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for reacting to what the synchronous
//! core recovered from: protocol violations, undeliverable failures and
//! release failures. Each subscriber is driven by a dedicated worker loop fed
//! by a bounded queue owned by the [`SubscriberSet`](crate::subscribers::SubscriberSet).
//!
//! ## Contract
//! - `on_event` may await I/O; the stream that raised the event has already
//!   moved on and other subscribers keep receiving.
//! - [`Subscribe::queue_capacity`] bounds how far a subscriber may fall
//!   behind; past that its events are dropped and `SubscriberOverflow` is published.
//!
//! ## Example
//! ```rust
//! use pushflow::{Event, EventKind, Subscribe};
//!
//! struct Violations;
//!
//! #[async_trait::async_trait]
//! impl Subscribe for Violations {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::ProtocolViolation {
//!             // page someone...
//!         }
//!     }
//!     fn name(&self) -> &'static str { "violations" }
//!     fn queue_capacity(&self) -> usize { 64 }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Receiver of runtime events, driven by its own worker task.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event.
    async fn on_event(&self, event: &Event);

    /// Name used in overflow and panic events about this subscriber.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Capacity of this subscriber's queue (at least 1).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
