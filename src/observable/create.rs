//! # Raw source from a closure.
//!
//! [`create`] hands the subscriber straight to the closure with no protocol
//! enforcement in between. It exists so tests and adapters can build sources
//! that misbehave on purpose (two handshakes, signals after cancellation,
//! errors after completion) and exercise the consumer-side guards.

use std::fmt;
use std::marker::PhantomData;

use super::{Observable, Observer};

/// Source driven by a user closure.
pub struct Create<T, F> {
    producer: F,
    _item: PhantomData<fn() -> T>,
}

/// Creates a source that calls `producer` with each subscriber.
///
/// The closure is responsible for calling `on_subscribe` first.
pub fn create<T, F>(producer: F) -> Create<T, F>
where
    T: Send + 'static,
    F: FnOnce(&mut dyn Observer<T>) + Send + 'static,
{
    Create {
        producer,
        _item: PhantomData,
    }
}

impl<T, F> Observable for Create<T, F>
where
    T: Send + 'static,
    F: FnOnce(&mut dyn Observer<T>) + Send + 'static,
{
    type Item = T;

    fn subscribe<O>(self, mut observer: O)
    where
        O: Observer<T> + 'static,
    {
        (self.producer)(&mut observer);
    }
}

impl<T, F> fmt::Debug for Create<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Create").finish_non_exhaustive()
    }
}
