//! # pushflow
//!
//! **Pushflow** is a push-based reactive-stream core for Rust.
//!
//! Producers (sources) emit values to consumers (observers) under a
//! disposal/cancellation protocol. Operators compose producers while keeping
//! two guarantees: every resource is released exactly once, and every consumer
//! sees at most one terminal signal.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌──────────────┐        ┌──────────────┐
//!   │ main source  │        │ other source │      Observable / Single
//!   │ (Observable) │        │   (Single)   │
//!   └──────┬───────┘        └──────┬───────┘
//!          │ on_subscribe(d1)      │ on_subscribe(d2)        (after main completes)
//!          ▼                       ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  concat operator                                                  │
//! │  - ProtocolGuard per side (first handle wins, extras disposed)    │
//! │  - DisposableSlot: d1, then d2 (disposed on arrival if cancelled) │
//! │  - phase: SUBSCRIBING_MAIN → ... → TERMINATED | CANCELLED         │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                │ on_subscribe(link) first, then values
//!                                ▼
//!                      ┌────────────────────┐
//!                      │ downstream observer│ ── link.dispose() cancels the active side
//!                      └────────────────────┘
//!
//! Recovered conditions (protocol violations, undeliverable failures, failed releases):
//!   guards / operators ── events hook ──► Bus ──► Runtime listener ──► SubscriberSet
//! ```
//!
//! ### Disposal
//! ```text
//! dispose() ──► compare-exchange ACTIVE → RELEASING
//!                 ├─ won  ──► run action ──► DISPOSED (also on Err / panic)
//!                 │             ├─ Ok             ─► Ok(())
//!                 │             ├─ Err(DisposeError) ─► returned as is
//!                 │             ├─ Err(other)     ─► DisposeError::Action { source }
//!                 │             └─ panic          ─► unwinds unchanged
//!                 └─ lost ──► wait until DISPOSED ─► Ok(())
//! ```
//!
//! ## Features
//! | Area              | Description                                                    | Key types / traits                          |
//! |-------------------|----------------------------------------------------------------|---------------------------------------------|
//! | **Disposables**   | Exactly-once, race-safe release handles and their factories.   | [`Disposable`], [`disposables`]             |
//! | **Protocol**      | One lifecycle handle per consumer, extras disposed.            | [`ProtocolGuard`]                           |
//! | **Streams**       | Multi-value and single-value sources.                          | [`Observable`], [`Single`]                  |
//! | **Operators**     | Sequential composition, `take`, `subscribe_on`.                | [`operators`]                               |
//! | **Schedulers**    | Where subscriptions run.                                       | [`Scheduler`], [`TokioScheduler`]           |
//! | **Errors**        | Typed release, stream, schedule and runtime errors.            | [`DisposeError`], [`StreamError`], [`ScheduleError`], [`RuntimeError`] |
//! | **Events**        | Recovered conditions reported to subscribers.                  | [`Event`], [`Subscribe`], [`Runtime`]       |
//! | **Configuration** | Centralize runtime settings.                                   | [`Config`]                                  |
//! | **Testing**       | Recording observer and race harness.                           | [`testing`]                                 |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use pushflow::{Config, Disposable, Observable, Runtime, Subscribe, observable, single};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Build subscribers (optional)
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(pushflow::LogWriter::default())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn Subscribe>> = Vec::new();
//!
//!     let runtime = Runtime::new(Config::default(), subs)?;
//!     runtime.install();
//!
//!     let handle = observable::range(1, 5)
//!         .concat_with_single(single::just(100))
//!         .subscribe_with(|v| println!("next {v}"), |e| eprintln!("error {e}"), || println!("done"));
//!     handle.dispose()?;
//!
//!     runtime.shutdown().await?;
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;

pub mod disposables;
pub mod events;
pub mod failure;
pub mod observable;
pub mod operators;
pub mod protocol;
pub mod scheduler;
pub mod single;
pub mod subscribers;
pub mod testing;

// ---- Public re-exports ----

pub use config::Config;
pub use core::Runtime;
pub use disposables::{Disposable, DisposableRef};
pub use error::{BoxError, DisposeError, RuntimeError, ScheduleError, StreamError};
pub use events::{Bus, Event, EventKind};
pub use observable::{Observable, Observer};
pub use protocol::{Handshake, ProtocolGuard};
pub use scheduler::{Scheduler, TokioScheduler};
pub use single::{Single, SingleObserver, SingleSubject};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
