//! Consumer-side protocol enforcement.
//!
//! ## Contents
//! - [`ProtocolGuard`] first-writer-wins holder of a subscription's handle
//! - [`Handshake`] outcome of offering a handle to the guard

mod guard;

pub use guard::{Handshake, ProtocolGuard};
