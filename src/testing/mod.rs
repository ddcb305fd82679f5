//! Test tooling shipped with the crate.
//!
//! Used by the crate's own unit and integration tests, and available to
//! downstream crates that build sources or operators on top of this one.
//!
//! ## Contents
//! - [`TestObserver`] recording observer with assertions
//! - [`ObservableTestExt`], [`SingleTestExt`] `.test()` shorthands
//! - [`race`], [`race_all`] barrier-synchronized concurrent invocation

mod observer;
mod race;

pub use observer::{ObservableTestExt, SingleTestExt, TestObserver};
pub use race::{race, race_all};
