//! Built-in single sources.

use std::fmt;
use std::marker::PhantomData;

use super::{Single, SingleObserver};
use crate::disposables;
use crate::error::StreamError;

/// Succeeds with a fixed value.
#[derive(Debug, Clone)]
pub struct Just<T> {
    value: T,
}

/// Creates a single that succeeds with `value` right after the handshake.
pub fn just<T>(value: T) -> Just<T>
where
    T: Send + 'static,
{
    Just { value }
}

impl<T> Single for Just<T>
where
    T: Send + 'static,
{
    type Item = T;

    fn subscribe<O>(self, mut observer: O)
    where
        O: SingleObserver<T> + 'static,
    {
        observer.on_subscribe(disposables::disposed());
        observer.on_success(self.value);
    }
}

/// Fails with a fixed error.
pub struct Failing<T> {
    error: StreamError,
    _item: PhantomData<fn() -> T>,
}

/// Creates a single that fails with `error` right after the handshake.
pub fn error<T>(error: StreamError) -> Failing<T>
where
    T: Send + 'static,
{
    Failing {
        error,
        _item: PhantomData,
    }
}

impl<T> Single for Failing<T>
where
    T: Send + 'static,
{
    type Item = T;

    fn subscribe<O>(self, mut observer: O)
    where
        O: SingleObserver<T> + 'static,
    {
        observer.on_subscribe(disposables::disposed());
        observer.on_error(self.error);
    }
}

impl<T> fmt::Debug for Failing<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failing").field("error", &self.error).finish()
    }
}

/// Never terminates.
pub struct Never<T> {
    _item: PhantomData<fn() -> T>,
}

/// Creates a single that hands out a handle and then stays silent.
pub fn never<T>() -> Never<T>
where
    T: Send + 'static,
{
    Never { _item: PhantomData }
}

impl<T> Single for Never<T>
where
    T: Send + 'static,
{
    type Item = T;

    fn subscribe<O>(self, mut observer: O)
    where
        O: SingleObserver<T> + 'static,
    {
        observer.on_subscribe(disposables::empty());
    }
}

impl<T> fmt::Debug for Never<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Never")
    }
}

/// Single driven by a user closure, with no protocol enforcement.
pub struct Create<T, F> {
    producer: F,
    _item: PhantomData<fn() -> T>,
}

/// Creates a single that calls `producer` with each subscriber.
///
/// The closure is responsible for calling `on_subscribe` first.
pub fn create<T, F>(producer: F) -> Create<T, F>
where
    T: Send + 'static,
    F: FnOnce(&mut dyn SingleObserver<T>) + Send + 'static,
{
    Create {
        producer,
        _item: PhantomData,
    }
}

impl<T, F> Single for Create<T, F>
where
    T: Send + 'static,
    F: FnOnce(&mut dyn SingleObserver<T>) + Send + 'static,
{
    type Item = T;

    fn subscribe<O>(self, mut observer: O)
    where
        O: SingleObserver<T> + 'static,
    {
        (self.producer)(&mut observer);
    }
}

impl<T, F> fmt::Debug for Create<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Create").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SingleTestExt;

    #[test]
    fn just_succeeds() {
        just("x").test().assert_result(&["x"]);
    }

    #[test]
    fn error_fails() {
        let to = error::<u8>(StreamError::msg("nope")).test();
        to.assert_no_values();
        assert_eq!(to.errors()[0].to_string(), "nope");
    }

    #[test]
    fn never_stays_silent() {
        never::<u8>().test().assert_empty();
    }

    #[test]
    fn create_hands_observer_to_closure() {
        create(|o: &mut dyn SingleObserver<i32>| {
            o.on_subscribe(disposables::empty());
            o.on_success(3);
        })
        .test()
        .assert_result(&[3]);
    }
}
