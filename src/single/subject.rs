//! # Hot single fed by the caller.
//!
//! [`SingleSubject`] is both a [`Single`] (anyone can subscribe) and the
//! producer side (the owner calls [`on_success`](SingleSubject::on_success) or
//! [`on_error`](SingleSubject::on_error)).
//!
//! ## Rules
//! - Each subscriber gets its own handle; disposing it unregisters that subscriber only.
//! - The first terminal signal wins and is replayed to late subscribers.
//! - A second `on_error` has nowhere to go and is reported as
//!   [`EventKind::Undeliverable`](crate::EventKind::Undeliverable).
//! - Observer callbacks run outside the internal lock.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{Single, SingleObserver};
use crate::disposables::{self, Disposable};
use crate::error::StreamError;
use crate::events;

const OPERATOR: &str = "single_subject";

#[derive(Clone)]
enum Outcome<T> {
    Success(T),
    Failure(StreamError),
}

type Subscriber<T> = (u64, Box<dyn SingleObserver<T>>);

struct State<T> {
    subscribers: Vec<Subscriber<T>>,
    outcome: Option<Outcome<T>>,
}

struct Inner<T> {
    state: Mutex<State<T>>,
    next_id: AtomicU64,
}

impl<T> Inner<T> {
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, id: u64) {
        let removed = {
            let mut state = self.lock();
            state
                .subscribers
                .iter()
                .position(|(sid, _)| *sid == id)
                .map(|pos| state.subscribers.swap_remove(pos))
        };
        // Dropped outside the lock: the observer may own other subjects.
        drop(removed);
    }
}

/// Single whose outcome is pushed by its owner.
pub struct SingleSubject<T> {
    inner: Arc<Inner<T>>,
}

impl<T> SingleSubject<T>
where
    T: Clone + Send + 'static,
{
    /// Creates a subject with no subscribers and no outcome.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    subscribers: Vec::new(),
                    outcome: None,
                }),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Returns `true` if at least one subscriber is registered.
    pub fn has_observers(&self) -> bool {
        !self.inner.lock().subscribers.is_empty()
    }

    /// Returns the number of registered subscribers.
    pub fn observer_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    /// Returns the value, if the subject succeeded.
    pub fn value(&self) -> Option<T> {
        match &self.inner.lock().outcome {
            Some(Outcome::Success(value)) => Some(value.clone()),
            _ => None,
        }
    }

    /// Returns `true` if the subject failed.
    pub fn has_error(&self) -> bool {
        matches!(self.inner.lock().outcome, Some(Outcome::Failure(_)))
    }

    /// Succeeds every current and future subscriber with `value`.
    ///
    /// Ignored if the subject already terminated.
    pub fn on_success(&self, value: T) {
        let Some(subscribers) = self.terminate(Outcome::Success(value.clone())) else {
            return;
        };
        for (_, mut observer) in subscribers {
            observer.on_success(value.clone());
        }
    }

    /// Fails every current and future subscriber with `error`.
    ///
    /// Reported as undeliverable if the subject already terminated.
    pub fn on_error(&self, error: StreamError) {
        let Some(subscribers) = self.terminate(Outcome::Failure(error.clone())) else {
            events::undeliverable(OPERATOR, &error);
            return;
        };
        for (_, mut observer) in subscribers {
            observer.on_error(error.clone());
        }
    }

    fn terminate(&self, outcome: Outcome<T>) -> Option<Vec<Subscriber<T>>> {
        let mut state = self.inner.lock();
        if state.outcome.is_some() {
            return None;
        }
        state.outcome = Some(outcome);
        Some(std::mem::take(&mut state.subscribers))
    }
}

impl<T> Default for SingleSubject<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SingleSubject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Single for SingleSubject<T>
where
    T: Clone + Send + 'static,
{
    type Item = T;

    fn subscribe<O>(self, mut observer: O)
    where
        O: SingleObserver<T> + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let weak = Arc::downgrade(&self.inner);
        let handle = disposables::from_fn(move || {
            if let Some(inner) = weak.upgrade() {
                inner.remove(id);
            }
        });
        observer.on_subscribe(Arc::clone(&handle));

        let mut state = self.inner.lock();
        let outcome = state.outcome.clone();
        match outcome {
            Some(outcome) => {
                drop(state);
                if handle.is_disposed() {
                    return;
                }
                match outcome {
                    Outcome::Success(value) => observer.on_success(value),
                    Outcome::Failure(error) => observer.on_error(error),
                }
            }
            None => {
                if !handle.is_disposed() {
                    state.subscribers.push((id, Box::new(observer)));
                }
            }
        }
    }
}

impl<T> fmt::Debug for SingleSubject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("SingleSubject")
            .field("subscribers", &state.subscribers.len())
            .field("terminated", &state.outcome.is_some())
            .finish()
    }
}
