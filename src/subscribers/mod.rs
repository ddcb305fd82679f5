//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and, behind the `logging` feature, a built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   guards / operators ── hook ──► Bus ──► Runtime listener ──► SubscriberSet
//!                                                                   │
//!                                        ┌──────────────┬───────────┼──────────┐
//!                                        ▼              ▼           ▼          ▼
//!                                    LogWriter       Metrics     Custom       ...
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use pushflow::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct Undeliverables;
//!
//! #[async_trait]
//! impl Subscribe for Undeliverables {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::Undeliverable {
//!             // increment a counter
//!         }
//!     }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
