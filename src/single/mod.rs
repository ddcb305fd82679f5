//! # Single-value sources (`Single`) and their consumers (`SingleObserver`).
//!
//! ```text
//! on_subscribe(handle) ──► on_success(v) | on_error(e)
//! ```
//!
//! ## Rules
//! - `on_subscribe` first, exactly once.
//! - Exactly one terminal signal, unless the subscription was cancelled first.
//!
//! ## Contents
//! - [`SingleObserver`], [`Single`] the contract
//! - [`just`], [`error`], [`never`], [`create`] sources
//! - [`SingleSubject`] hot single fed by the caller

mod sources;
mod subject;

pub use sources::{Create, Failing, Just, Never, create, error, just, never};
pub use subject::SingleSubject;

use crate::disposables::DisposableRef;
use crate::error::StreamError;

/// Consumer of a single-value source.
pub trait SingleObserver<T>: Send {
    /// Receives the lifecycle handle of the subscription.
    fn on_subscribe(&mut self, handle: DisposableRef);

    /// Receives the value.
    fn on_success(&mut self, value: T);

    /// Receives the failure.
    fn on_error(&mut self, error: StreamError);
}

impl<T, O> SingleObserver<T> for Box<O>
where
    O: SingleObserver<T> + ?Sized,
{
    fn on_subscribe(&mut self, handle: DisposableRef) {
        (**self).on_subscribe(handle)
    }

    fn on_success(&mut self, value: T) {
        (**self).on_success(value)
    }

    fn on_error(&mut self, error: StreamError) {
        (**self).on_error(error)
    }
}

/// Push-based source of exactly one value or one failure.
pub trait Single: Send + Sized + 'static {
    /// Type of the value.
    type Item: Send + 'static;

    /// Starts producing into `observer`.
    fn subscribe<O>(self, observer: O)
    where
        O: SingleObserver<Self::Item> + 'static;
}
