//! # Limit a source to its first `n` values.
//!
//! After the `n`-th value `take` disposes its upstream, then completes
//! downstream. The downstream handle is the upstream handle itself, so
//! cancelling through `take` reaches the source directly.

use std::fmt;

use crate::disposables::{self, Disposable, DisposableRef};
use crate::error::StreamError;
use crate::events;
use crate::observable::{Observable, Observer};
use crate::protocol::ProtocolGuard;

const OPERATOR: &str = "take";

/// Emits at most `count` values of `source`.
///
/// Built by [`Observable::take`].
pub struct Take<S> {
    source: S,
    count: usize,
}

impl<S> Take<S> {
    pub(crate) fn new(source: S, count: usize) -> Self {
        Self { source, count }
    }
}

impl<S> Observable for Take<S>
where
    S: Observable,
{
    type Item = S::Item;

    fn subscribe<O>(self, observer: O)
    where
        O: Observer<S::Item> + 'static,
    {
        self.source.subscribe(TakeObserver {
            downstream: observer,
            guard: ProtocolGuard::new(OPERATOR),
            remaining: self.count,
            done: false,
        });
    }
}

impl<S: fmt::Debug> fmt::Debug for Take<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Take")
            .field("source", &self.source)
            .field("count", &self.count)
            .finish()
    }
}

struct TakeObserver<O> {
    downstream: O,
    guard: ProtocolGuard,
    remaining: usize,
    done: bool,
}

impl<O> TakeObserver<O> {
    fn release_upstream(&self) {
        if let Err(err) = self.guard.dispose() {
            events::dispose_failed(OPERATOR, &err);
        }
    }
}

impl<T, O> Observer<T> for TakeObserver<O>
where
    O: Observer<T>,
{
    fn on_subscribe(&mut self, handle: DisposableRef) {
        if !self.guard.handshake(handle.clone()).is_accepted() {
            return;
        }
        if self.remaining == 0 {
            self.done = true;
            self.release_upstream();
            self.downstream.on_subscribe(disposables::disposed());
            self.downstream.on_complete();
            return;
        }
        self.downstream.on_subscribe(handle);
    }

    fn on_next(&mut self, value: T) {
        if self.done || self.remaining == 0 || self.guard.is_disposed() {
            return;
        }
        self.remaining -= 1;
        let last = self.remaining == 0;
        if last {
            self.done = true;
        }
        self.downstream.on_next(value);
        if last {
            self.release_upstream();
            self.downstream.on_complete();
        }
    }

    fn on_error(&mut self, error: StreamError) {
        if self.done {
            events::undeliverable(OPERATOR, &error);
            return;
        }
        self.done = true;
        self.downstream.on_error(error);
    }

    fn on_complete(&mut self) {
        if self.done {
            return;
        }
        self.done = true;
        self.downstream.on_complete();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observable;
    use crate::testing::{ObservableTestExt, TestObserver};
    use std::sync::Arc;
    use std::sync::Mutex;

    fn capturing_range(handle: Arc<Mutex<Option<DisposableRef>>>) -> impl Observable<Item = i32> {
        observable::create(move |o: &mut dyn Observer<i32>| {
            let d = disposables::empty();
            *handle.lock().unwrap() = Some(d.clone());
            o.on_subscribe(d.clone());
            for v in 1..=10 {
                if d.is_disposed() {
                    return;
                }
                o.on_next(v);
            }
            o.on_complete();
        })
    }

    #[test]
    fn stops_after_count_and_disposes_upstream() {
        let upstream = Arc::new(Mutex::new(None));
        capturing_range(Arc::clone(&upstream))
            .take(3)
            .test()
            .assert_result(&[1, 2, 3]);

        let upstream = upstream.lock().unwrap().clone().unwrap();
        assert!(upstream.is_disposed());
    }

    #[test]
    fn zero_completes_immediately() {
        let upstream = Arc::new(Mutex::new(None));
        capturing_range(Arc::clone(&upstream))
            .take(0)
            .test()
            .assert_result(&[]);

        assert!(upstream.lock().unwrap().as_ref().unwrap().is_disposed());
    }

    #[test]
    fn shorter_source_completes_normally() {
        observable::range(1, 2).take(5).test().assert_result(&[1, 2]);
    }

    #[test]
    fn error_after_completion_is_not_delivered() {
        let to = TestObserver::new();
        observable::create(|o: &mut dyn Observer<i32>| {
            o.on_subscribe(disposables::empty());
            o.on_next(1);
            o.on_error(StreamError::msg("late"));
        })
        .take(1)
        .subscribe(to.clone());

        to.assert_result(&[1]);
    }
}
