//! # Closure-backed terminal observer.
//!
//! [`CallbackObserver`] is what [`Observable::subscribe_with`](super::Observable::subscribe_with)
//! builds. Its [`handle`](CallbackObserver::handle) is a stable slot that exists
//! before the source delivers its own handle, so the caller can cancel at any
//! point, including before the handshake.

use std::fmt;
use std::sync::Arc;

use super::Observer;
use crate::disposables::{Disposable, DisposableRef, DisposableSlot};
use crate::error::StreamError;
use crate::events;
use crate::protocol::ProtocolGuard;

const OPERATOR: &str = "subscribe_with";

/// Observer that forwards signals to closures.
pub struct CallbackObserver<N, E, C> {
    guard: ProtocolGuard,
    slot: Arc<DisposableSlot>,
    on_next: N,
    on_error: Option<E>,
    on_complete: Option<C>,
}

impl<N, E, C> CallbackObserver<N, E, C> {
    /// Wraps the three callbacks.
    pub fn new(on_next: N, on_error: E, on_complete: C) -> Self {
        Self {
            guard: ProtocolGuard::new(OPERATOR),
            slot: Arc::new(DisposableSlot::new()),
            on_next,
            on_error: Some(on_error),
            on_complete: Some(on_complete),
        }
    }

    /// Returns the handle that cancels this subscription.
    pub fn handle(&self) -> DisposableRef {
        self.slot.clone()
    }

    fn is_done(&self) -> bool {
        self.on_complete.is_none() || self.slot.is_disposed()
    }

    fn finish(&mut self) {
        self.on_error = None;
        self.on_complete = None;
        self.slot.clear();
    }
}

impl<T, N, E, C> Observer<T> for CallbackObserver<N, E, C>
where
    N: FnMut(T) + Send,
    E: FnOnce(StreamError) + Send,
    C: FnOnce() + Send,
{
    fn on_subscribe(&mut self, handle: DisposableRef) {
        if !self.guard.handshake(Arc::clone(&handle)).is_accepted() {
            return;
        }
        if let Err(err) = self.slot.replace(handle) {
            events::dispose_failed(OPERATOR, &err);
        }
    }

    fn on_next(&mut self, value: T) {
        if !self.is_done() {
            (self.on_next)(value);
        }
    }

    fn on_error(&mut self, error: StreamError) {
        if self.is_done() {
            events::undeliverable(OPERATOR, &error);
            return;
        }
        let callback = self.on_error.take();
        self.finish();
        if let Some(callback) = callback {
            callback(error);
        }
    }

    fn on_complete(&mut self) {
        if self.is_done() {
            return;
        }
        let callback = self.on_complete.take();
        self.finish();
        if let Some(callback) = callback {
            callback();
        }
    }
}

impl<N, E, C> fmt::Debug for CallbackObserver<N, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackObserver")
            .field("slot", &self.slot)
            .field("done", &self.on_complete.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observable::{self, Observable};
    use std::sync::Mutex;

    #[test]
    fn forwards_values_and_completion() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let done = Arc::new(Mutex::new(false));

        let (s, d) = (Arc::clone(&seen), Arc::clone(&done));
        let handle = observable::range(1, 3).subscribe_with(
            move |v| s.lock().unwrap().push(v),
            |_| panic!("unexpected error"),
            move || *d.lock().unwrap() = true,
        );

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
        assert!(*done.lock().unwrap());
        assert!(!handle.is_disposed());
    }

    #[test]
    fn cancelled_before_values_sees_nothing() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);

        let observer = CallbackObserver::new(move |v: i32| s.lock().unwrap().push(v), |_: StreamError| {}, || {});
        observer.handle().dispose().unwrap();
        observable::range(1, 3).subscribe(observer);

        assert!(seen.lock().unwrap().is_empty());
    }
}
