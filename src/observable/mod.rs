//! # Multi-value sources (`Observable`) and their consumers (`Observer`).
//!
//! A subscription is a sequence of calls on the observer:
//!
//! ```text
//! on_subscribe(handle) ──► on_next(v)* ──► on_complete() | on_error(e)
//!        │
//!        └── the consumer keeps `handle` and disposes it to cancel
//! ```
//!
//! ## Rules
//! - A source calls `on_subscribe` first, exactly once, before any other signal.
//! - Signals from one source are serialized: never two calls at the same time.
//! - At most one terminal signal; nothing after it.
//! - After the consumer disposes its handle, a well-behaved source stops emitting.
//!
//! Operators are provided methods on [`Observable`]; see [`operators`](crate::operators).

mod callback;
mod create;
mod sources;

pub use callback::CallbackObserver;
pub use create::{Create, create};
pub use sources::{Empty, Failing, FromIter, Never, Range, empty, error, from_iter, just, never, range};

use std::sync::Arc;

use crate::disposables::DisposableRef;
use crate::error::StreamError;
use crate::operators::{ConcatWith, ConcatWithSingle, SubscribeOn, Take};
use crate::scheduler::Scheduler;
use crate::single::Single;

/// Consumer of a multi-value source.
pub trait Observer<T>: Send {
    /// Receives the lifecycle handle of the subscription.
    fn on_subscribe(&mut self, handle: DisposableRef);

    /// Receives the next value.
    fn on_next(&mut self, value: T);

    /// Receives the terminal failure.
    fn on_error(&mut self, error: StreamError);

    /// Receives normal completion.
    fn on_complete(&mut self);
}

impl<T, O> Observer<T> for Box<O>
where
    O: Observer<T> + ?Sized,
{
    fn on_subscribe(&mut self, handle: DisposableRef) {
        (**self).on_subscribe(handle)
    }

    fn on_next(&mut self, value: T) {
        (**self).on_next(value)
    }

    fn on_error(&mut self, error: StreamError) {
        (**self).on_error(error)
    }

    fn on_complete(&mut self) {
        (**self).on_complete()
    }
}

/// # Push-based source of zero or more values.
///
/// # Example
/// ```
/// use pushflow::{Observable, observable, single};
/// use pushflow::testing::ObservableTestExt;
///
/// observable::range(1, 5)
///     .concat_with_single(single::just(100))
///     .test()
///     .assert_result(&[1, 2, 3, 4, 5, 100]);
/// ```
pub trait Observable: Send + Sized + 'static {
    /// Type of the emitted values.
    type Item: Send + 'static;

    /// Starts producing into `observer`.
    fn subscribe<O>(self, observer: O)
    where
        O: Observer<Self::Item> + 'static;

    /// Subscribes with callbacks and returns the subscription handle.
    fn subscribe_with<N, E, C>(self, on_next: N, on_error: E, on_complete: C) -> DisposableRef
    where
        N: FnMut(Self::Item) + Send + 'static,
        E: FnOnce(StreamError) + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        let observer = CallbackObserver::new(on_next, on_error, on_complete);
        let handle = observer.handle();
        self.subscribe(observer);
        handle
    }

    /// Emits at most `count` values, then completes and disposes upstream.
    fn take(self, count: usize) -> Take<Self> {
        Take::new(self, count)
    }

    /// Emits every value of `self`, then the value of `other`.
    fn concat_with_single<S>(self, other: S) -> ConcatWithSingle<Self, S>
    where
        S: Single<Item = Self::Item>,
    {
        ConcatWithSingle::new(self, other)
    }

    /// Emits every value of `self`, then every value of `other`.
    fn concat_with<S>(self, other: S) -> ConcatWith<Self, S>
    where
        S: Observable<Item = Self::Item>,
    {
        ConcatWith::new(self, other)
    }

    /// Subscribes to `self` on `scheduler` instead of the calling thread.
    fn subscribe_on(self, scheduler: Arc<dyn Scheduler>) -> SubscribeOn<Self> {
        SubscribeOn::new(self, scheduler)
    }
}
