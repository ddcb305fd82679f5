//! # Recording observer with assertions.
//!
//! [`TestObserver`] is cheap to clone; every clone shares one record, so a
//! test can hand one clone to a source and keep another to inspect and cancel.
//! It implements both [`Observer`] and [`SingleObserver`]; a single's success
//! is recorded as one value followed by completion.

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::disposables::{Disposable, DisposableRef};
use crate::error::{DisposeError, StreamError};
use crate::events;
use crate::observable::{Observable, Observer};
use crate::single::{Single, SingleObserver};

const OPERATOR: &str = "test_observer";

struct Record<T> {
    handle: Option<DisposableRef>,
    handshakes: usize,
    values: Vec<T>,
    errors: Vec<StreamError>,
    completions: usize,
    cancel_requested: bool,
}

struct Shared<T> {
    record: Mutex<Record<T>>,
    terminal: Condvar,
}

/// Observer that records every signal it receives.
pub struct TestObserver<T> {
    shared: Arc<Shared<T>>,
}

impl<T> TestObserver<T> {
    /// Creates an observer that accepts everything.
    pub fn new() -> Self {
        Self::with_cancel(false)
    }

    /// Creates an observer that disposes its handle as soon as it receives it.
    pub fn cancelled() -> Self {
        Self::with_cancel(true)
    }

    fn with_cancel(cancel_requested: bool) -> Self {
        Self {
            shared: Arc::new(Shared {
                record: Mutex::new(Record {
                    handle: None,
                    handshakes: 0,
                    values: Vec::new(),
                    errors: Vec::new(),
                    completions: 0,
                    cancel_requested,
                }),
                terminal: Condvar::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Record<T>> {
        self.shared.record.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn terminated(record: &Record<T>) -> bool {
        record.completions > 0 || !record.errors.is_empty()
    }

    /// Disposes the received handle, or the next one to arrive.
    pub fn cancel(&self) -> Result<(), DisposeError> {
        let handle = {
            let mut record = self.lock();
            record.cancel_requested = true;
            record.handle.clone()
        };
        match handle {
            Some(handle) => handle.dispose(),
            None => Ok(()),
        }
    }

    /// Returns `true` if [`cancel`](Self::cancel) was requested or the handle is disposed.
    pub fn is_cancelled(&self) -> bool {
        let record = self.lock();
        record.cancel_requested || record.handle.as_ref().is_some_and(|h| h.is_disposed())
    }

    /// Returns the first handle received, if any.
    pub fn handle(&self) -> Option<DisposableRef> {
        self.lock().handle.clone()
    }

    /// Number of `on_subscribe` calls seen.
    pub fn handshakes(&self) -> usize {
        self.lock().handshakes
    }

    /// Received failures, in order.
    pub fn errors(&self) -> Vec<StreamError> {
        self.lock().errors.clone()
    }

    /// Number of completions seen.
    pub fn completions(&self) -> usize {
        self.lock().completions
    }

    /// Returns `true` once a terminal signal arrived.
    pub fn is_terminated(&self) -> bool {
        Self::terminated(&self.lock())
    }

    /// Blocks until a terminal signal arrives or `timeout` elapses.
    pub fn await_terminal(&self, timeout: Duration) -> bool {
        let record = self.lock();
        let (record, _) = self
            .shared
            .terminal
            .wait_timeout_while(record, timeout, |r| !Self::terminated(r))
            .unwrap_or_else(PoisonError::into_inner);
        Self::terminated(&record)
    }

    /// Asserts a subscription with no values and no terminal signal.
    #[track_caller]
    pub fn assert_empty(&self) {
        let record = self.lock();
        assert!(record.handshakes > 0, "no handshake received");
        assert_eq!(record.values.len(), 0, "unexpected values");
        assert!(record.errors.is_empty(), "unexpected errors: {:?}", record.errors);
        assert_eq!(record.completions, 0, "unexpected completion");
    }

    /// Asserts that no value was received.
    #[track_caller]
    pub fn assert_no_values(&self) {
        assert_eq!(self.lock().values.len(), 0, "unexpected values");
    }

    /// Asserts exactly one handshake.
    #[track_caller]
    pub fn assert_subscribed_once(&self) {
        assert_eq!(self.lock().handshakes, 1, "expected exactly one handshake");
    }
}

impl<T> TestObserver<T>
where
    T: Clone,
{
    /// Received values, in order.
    pub fn values(&self) -> Vec<T> {
        self.lock().values.clone()
    }
}

impl<T> TestObserver<T>
where
    T: PartialEq + fmt::Debug,
{
    /// Asserts `expected` values, one completion and no failure.
    #[track_caller]
    pub fn assert_result(&self, expected: &[T]) {
        let record = self.lock();
        assert_eq!(record.values.as_slice(), expected, "values differ");
        assert!(record.errors.is_empty(), "unexpected errors: {:?}", record.errors);
        assert_eq!(record.completions, 1, "expected exactly one completion");
    }

    /// Asserts `expected` values followed by one failure of type `E` and no completion.
    #[track_caller]
    pub fn assert_failure<E>(&self, expected: &[T])
    where
        E: std::error::Error + 'static,
    {
        let record = self.lock();
        assert_eq!(record.values.as_slice(), expected, "values differ");
        assert_eq!(record.errors.len(), 1, "expected exactly one error: {:?}", record.errors);
        assert!(
            record.errors[0].is::<E>(),
            "unexpected error type: {:?}",
            record.errors[0]
        );
        assert_eq!(record.completions, 0, "unexpected completion");
    }
}

impl<T> TestObserver<T> {
    fn subscribed(&mut self, handle: DisposableRef) {
        let cancel = {
            let mut record = self.lock();
            record.handshakes += 1;
            if record.handle.is_none() {
                record.handle = Some(Arc::clone(&handle));
            }
            record.cancel_requested
        };
        if !cancel {
            return;
        }
        if let Err(err) = handle.dispose() {
            events::dispose_failed(OPERATOR, &err);
        }
    }

    fn push(&mut self, value: T) {
        self.lock().values.push(value);
    }

    fn fail(&mut self, error: StreamError) {
        self.lock().errors.push(error);
        self.shared.terminal.notify_all();
    }

    fn complete(&mut self) {
        self.lock().completions += 1;
        self.shared.terminal.notify_all();
    }
}

impl<T> Default for TestObserver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TestObserver<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for TestObserver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.lock();
        f.debug_struct("TestObserver")
            .field("handshakes", &record.handshakes)
            .field("values", &record.values.len())
            .field("errors", &record.errors)
            .field("completions", &record.completions)
            .finish()
    }
}

impl<T> Observer<T> for TestObserver<T>
where
    T: Send,
{
    fn on_subscribe(&mut self, handle: DisposableRef) {
        self.subscribed(handle);
    }

    fn on_next(&mut self, value: T) {
        self.push(value);
    }

    fn on_error(&mut self, error: StreamError) {
        self.fail(error);
    }

    fn on_complete(&mut self) {
        self.complete();
    }
}

impl<T> SingleObserver<T> for TestObserver<T>
where
    T: Send,
{
    fn on_subscribe(&mut self, handle: DisposableRef) {
        self.subscribed(handle);
    }

    fn on_success(&mut self, value: T) {
        self.push(value);
        self.complete();
    }

    fn on_error(&mut self, error: StreamError) {
        self.fail(error);
    }
}

/// Subscribes a fresh [`TestObserver`] to an [`Observable`].
pub trait ObservableTestExt: Observable {
    /// Subscribes and returns the recording observer.
    fn test(self) -> TestObserver<Self::Item> {
        let observer = TestObserver::new();
        self.subscribe(observer.clone());
        observer
    }
}

impl<S: Observable> ObservableTestExt for S {}

/// Subscribes a fresh [`TestObserver`] to a [`Single`].
pub trait SingleTestExt: Single {
    /// Subscribes and returns the recording observer.
    fn test(self) -> TestObserver<Self::Item> {
        let observer = TestObserver::new();
        self.subscribe(observer.clone());
        observer
    }
}

impl<S: Single> SingleTestExt for S {}
