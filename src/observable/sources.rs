//! # Built-in synchronous sources.
//!
//! Every source here emits on the subscribing thread and honors cancellation:
//! it checks its handle before each value and before the terminal signal.
//!
//! | source        | handshake handle | signals                    |
//! |---------------|------------------|----------------------------|
//! | [`range`]     | `empty()`        | `n` values, complete       |
//! | [`from_iter`] | `empty()`        | every item, complete       |
//! | [`just`]      | `empty()`        | one value, complete        |
//! | [`empty`]     | `disposed()`     | complete                   |
//! | [`error`]     | `disposed()`     | error                      |
//! | [`never`]     | `empty()`        | nothing                    |

use std::fmt;
use std::iter::Once;
use std::marker::PhantomData;
use std::sync::Arc;

use super::{Observable, Observer};
use crate::disposables::{self, Disposable};
use crate::error::StreamError;

/// Emits `count` consecutive integers starting at `start`.
#[derive(Debug, Clone, Copy)]
pub struct Range {
    start: i32,
    count: u32,
}

/// Creates a source of `start, start + 1, ..., start + count - 1`.
///
/// # Panics
/// Panics if the last value would not fit in an `i32`.
pub fn range(start: i32, count: u32) -> Range {
    let last = i64::from(start) + i64::from(count) - 1;
    assert!(
        count == 0 || last <= i64::from(i32::MAX),
        "range({start}, {count}) overflows i32"
    );
    Range { start, count }
}

impl Observable for Range {
    type Item = i32;

    fn subscribe<O>(self, mut observer: O)
    where
        O: Observer<i32> + 'static,
    {
        let handle = disposables::empty();
        observer.on_subscribe(Arc::clone(&handle));

        let start = i64::from(self.start);
        for value in start..start + i64::from(self.count) {
            if handle.is_disposed() {
                return;
            }
            // Bounds checked in `range`.
            observer.on_next(value as i32);
        }
        if !handle.is_disposed() {
            observer.on_complete();
        }
    }
}

/// Emits every item of an iterator.
pub struct FromIter<I> {
    iter: I,
}

/// Creates a source over `items`.
pub fn from_iter<I>(items: I) -> FromIter<I::IntoIter>
where
    I: IntoIterator,
    I::IntoIter: Send + 'static,
    I::Item: Send + 'static,
{
    FromIter {
        iter: items.into_iter(),
    }
}

/// Creates a source of exactly one value.
pub fn just<T>(value: T) -> FromIter<Once<T>>
where
    T: Send + 'static,
{
    from_iter(std::iter::once(value))
}

impl<I> Observable for FromIter<I>
where
    I: Iterator + Send + 'static,
    I::Item: Send + 'static,
{
    type Item = I::Item;

    fn subscribe<O>(self, mut observer: O)
    where
        O: Observer<I::Item> + 'static,
    {
        let handle = disposables::empty();
        observer.on_subscribe(Arc::clone(&handle));

        for item in self.iter {
            if handle.is_disposed() {
                return;
            }
            observer.on_next(item);
        }
        if !handle.is_disposed() {
            observer.on_complete();
        }
    }
}

impl<I> fmt::Debug for FromIter<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromIter").finish_non_exhaustive()
    }
}

/// Completes immediately.
pub struct Empty<T> {
    _item: PhantomData<fn() -> T>,
}

/// Creates a source that completes without values.
pub fn empty<T>() -> Empty<T>
where
    T: Send + 'static,
{
    Empty { _item: PhantomData }
}

impl<T> Observable for Empty<T>
where
    T: Send + 'static,
{
    type Item = T;

    fn subscribe<O>(self, mut observer: O)
    where
        O: Observer<T> + 'static,
    {
        observer.on_subscribe(disposables::disposed());
        observer.on_complete();
    }
}

impl<T> fmt::Debug for Empty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Empty")
    }
}

/// Fails immediately.
pub struct Failing<T> {
    error: StreamError,
    _item: PhantomData<fn() -> T>,
}

/// Creates a source that signals `error` without values.
pub fn error<T>(error: StreamError) -> Failing<T>
where
    T: Send + 'static,
{
    Failing {
        error,
        _item: PhantomData,
    }
}

impl<T> Observable for Failing<T>
where
    T: Send + 'static,
{
    type Item = T;

    fn subscribe<O>(self, mut observer: O)
    where
        O: Observer<T> + 'static,
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

/// Never signals after the handshake.
pub struct Never<T> {
    _item: PhantomData<fn() -> T>,
}

/// Creates a source that hands out a handle and then stays silent.
pub fn never<T>() -> Never<T>
where
    T: Send + 'static,
{
    Never { _item: PhantomData }
}

impl<T> Observable for Never<T>
where
    T: Send + 'static,
{
    type Item = T;

    fn subscribe<O>(self, mut observer: O)
    where
        O: Observer<T> + 'static,
    {
        observer.on_subscribe(disposables::empty());
    }
}

impl<T> fmt::Debug for Never<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Never")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ObservableTestExt;

    #[test]
    fn range_emits_consecutive_values() {
        range(5, 3).test().assert_result(&[5, 6, 7]);
        range(0, 0).test().assert_result(&[]);
    }

    #[test]
    fn range_reaches_i32_max() {
        range(i32::MAX - 1, 2).test().assert_result(&[i32::MAX - 1, i32::MAX]);
    }

    #[test]
    #[should_panic(expected = "overflows i32")]
    fn range_rejects_overflow() {
        let _ = range(i32::MAX, 2);
    }

    #[test]
    fn from_iter_and_just() {
        from_iter(vec!["a", "b"]).test().assert_result(&["a", "b"]);
        just(7u8).test().assert_result(&[7]);
    }

    #[test]
    fn empty_error_never() {
        empty::<i32>().test().assert_result(&[]);

        let to = error::<i32>(StreamError::msg("boom")).test();
        to.assert_no_values();
        assert_eq!(to.errors().len(), 1);
        assert_eq!(to.errors()[0].to_string(), "boom");

        never::<i32>().test().assert_empty();
    }

    struct CancelAfter {
        limit: usize,
        seen: Vec<i32>,
        handle: Option<crate::disposables::DisposableRef>,
    }

    impl Observer<i32> for CancelAfter {
        fn on_subscribe(&mut self, handle: crate::disposables::DisposableRef) {
            self.handle = Some(handle);
        }

        fn on_next(&mut self, value: i32) {
            self.seen.push(value);
            if self.seen.len() == self.limit {
                self.handle.as_ref().unwrap().dispose().unwrap();
            }
            assert!(self.seen.len() <= self.limit, "value after cancellation");
        }

        fn on_error(&mut self, _: StreamError) {}

        fn on_complete(&mut self) {
            panic!("completed after cancellation");
        }
    }

    #[test]
    fn cancellation_stops_range() {
        range(1, 10).subscribe(CancelAfter {
            limit: 2,
            seen: Vec::new(),
            handle: None,
        });
    }
}
