//! Runtime events: types, broadcast bus and the process-wide hook.
//!
//! This module groups the event **data model**, the **bus** used to
//! publish/subscribe to events, and the **hook** through which the
//! synchronous core reports what it recovered from.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//! - [`install`], [`uninstall`], [`uninstall_if`], [`is_current`], [`emit`] the hook
//!
//! ## Quick reference
//! - **Publishers**: `ProtocolGuard`, operators, sources and schedulers (via the hook),
//!   `SubscriberSet` workers (overflow/panic, directly on the bus).
//! - **Consumers**: the [`Runtime`](crate::Runtime) listener, which fans out to
//!   the `SubscriberSet`; or any `Bus::subscribe()` receiver.

mod bus;
mod event;
mod hook;

pub use bus::Bus;
pub use event::{Event, EventKind};
pub use hook::{emit, install, is_current, is_installed, uninstall, uninstall_if};

pub(crate) use hook::{dispose_failed, protocol_violation, schedule_rejected, undeliverable};
