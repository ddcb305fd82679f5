//! Runtime core: event wiring and lifecycle.
//!
//! The only public API from this module is [`Runtime`], which owns the event
//! bus and subscriber fan-out and installs itself as the core's event hook.
//!
//! Internal modules:
//! - [`runtime`]: bus + listener + subscriber set, install/shutdown.

mod runtime;

pub use runtime::Runtime;
