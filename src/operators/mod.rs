//! Operators: sources built on top of other sources.
//!
//! Each operator is a plain struct returned by a provided method of
//! [`Observable`](crate::Observable); subscribing to it subscribes upstream
//! with an internal observer that enforces the handshake through a
//! [`ProtocolGuard`](crate::protocol::ProtocolGuard).
//!
//! ## Contents
//! - [`ConcatWithSingle`], [`ConcatWith`] sequential composition
//! - [`Take`] first `n` values
//! - [`SubscribeOn`] subscription on a [`Scheduler`](crate::scheduler::Scheduler)

mod concat;
mod subscribe_on;
mod take;

pub use concat::{ConcatWith, ConcatWithSingle};
pub use subscribe_on::SubscribeOn;
pub use take::Take;
