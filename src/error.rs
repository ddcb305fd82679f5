//! Error types used by the pushflow runtime, disposables and streams.
//!
//! This module defines four error types:
//!
//! - [`DisposeError`]: failures raised while releasing a [`Disposable`](crate::Disposable).
//! - [`StreamError`]: the payload of a stream's terminal failure signal.
//! - [`ScheduleError`]: a [`Scheduler`](crate::Scheduler) could not accept work.
//! - [`RuntimeError`]: errors raised by the event runtime wiring itself.
//!
//! The enums provide helper methods (`as_label`, `as_message`) for logging/metrics.
//! How a release action's failure becomes a [`DisposeError`] is described in
//! [`failure`](crate::failure).

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Boxed error returned by fallible release actions.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// # Errors produced while disposing a resource.
///
/// Returned from [`Disposable::dispose`](crate::Disposable::dispose). The
/// disposable is considered DISPOSED even when this error is returned.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DisposeError {
    /// The release action failed with a recoverable error; the original is the source.
    #[error("release action failed: {source}")]
    Action {
        /// The error raised by the release action.
        source: BoxError,
    },

    /// Several releases performed by one dispose call failed.
    #[error("{} release actions failed", .errors.len())]
    Composite {
        /// Individual failures, in release order.
        errors: Vec<DisposeError>,
    },
}

impl DisposeError {
    /// Wraps an arbitrary error as a failed release action.
    pub fn action(err: impl Into<BoxError>) -> Self {
        DisposeError::Action { source: err.into() }
    }

    /// Merges the outcomes of several releases into one result.
    ///
    /// Returns `Ok(())` when every release succeeded, the single failure when
    /// exactly one failed, and [`DisposeError::Composite`] otherwise.
    ///
    /// # Example
    /// ```
    /// use pushflow::DisposeError;
    ///
    /// let merged = DisposeError::merge([Ok(()), Err(DisposeError::action("boom"))]);
    /// assert!(matches!(merged, Err(DisposeError::Action { .. })));
    /// ```
    pub fn merge(results: impl IntoIterator<Item = Result<(), DisposeError>>) -> Result<(), Self> {
        let mut errors: Vec<DisposeError> = results.into_iter().filter_map(Result::err).collect();
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(DisposeError::Composite { errors }),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use pushflow::DisposeError;
    ///
    /// let err = DisposeError::action(std::io::Error::other("disk gone"));
    /// assert_eq!(err.as_label(), "dispose_action_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DisposeError::Action { .. } => "dispose_action_failed",
            DisposeError::Composite { .. } => "dispose_composite_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DisposeError::Action { source } => format!("release failed: {source}"),
            DisposeError::Composite { errors } => {
                let parts: Vec<String> = errors.iter().map(|e| e.as_message()).collect();
                format!("release failed {} times: [{}]", errors.len(), parts.join("; "))
            }
        }
    }
}

/// # Terminal failure carried by a stream.
///
/// A cheaply cloneable handle to the error a source reported through
/// `on_error`. Operators forward it verbatim; consumers inspect the original
/// through [`StreamError::is`] and [`StreamError::downcast_ref`].
#[derive(Clone)]
pub struct StreamError {
    inner: Arc<dyn StdError + Send + Sync + 'static>,
}

impl StreamError {
    /// Wraps a concrete error.
    pub fn new<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self { inner: Arc::new(err) }
    }

    /// Creates an error carrying only a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(Message(message.into()))
    }

    /// Returns `true` if the original error is of type `E`.
    pub fn is<E>(&self) -> bool
    where
        E: StdError + 'static,
    {
        self.inner.is::<E>()
    }

    /// Returns the original error as `E`, if it is one.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        self.inner.downcast_ref::<E>()
    }

    /// Returns `true` if both handles point at the same original error.
    pub fn same_as(&self, other: &StreamError) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }
}

impl From<BoxError> for StreamError {
    fn from(err: BoxError) -> Self {
        Self { inner: Arc::from(err) }
    }
}

impl fmt::Debug for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner, f)
    }
}

impl StdError for StreamError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source()
    }
}

/// Plain-message error used by [`StreamError::msg`].
#[derive(Debug, Error)]
#[error("{0}")]
struct Message(String);

/// # Errors produced when a scheduler cannot accept work.
///
/// The rejected work never runs. [`subscribe_on`](crate::Observable::subscribe_on)
/// delivers this error to its downstream as the stream's failure.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// The OS refused to start a worker thread.
    #[error("scheduler `{scheduler}` could not start a thread: {source}")]
    Spawn {
        /// Name of the rejecting scheduler.
        scheduler: String,
        /// The spawn failure.
        source: io::Error,
    },
}

impl ScheduleError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ScheduleError::Spawn { .. } => "schedule_spawn_failed",
        }
    }
}

/// # Errors produced by the event runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The runtime was built outside of a tokio runtime context.
    #[error("no tokio reactor running; build the runtime from within a tokio context")]
    NoReactor,

    /// Subscriber workers did not drain within the configured timeout.
    #[error("subscriber drain exceeded {timeout:?}")]
    DrainTimeout {
        /// Configured drain timeout.
        timeout: Duration,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use pushflow::RuntimeError;
    ///
    /// assert_eq!(RuntimeError::NoReactor.as_label(), "runtime_no_reactor");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::NoReactor => "runtime_no_reactor",
            RuntimeError::DrainTimeout { .. } => "runtime_drain_timeout",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::NoReactor => "runtime requires a tokio context".to_string(),
            RuntimeError::DrainTimeout { timeout } => {
                format!("subscribers still busy after {timeout:?}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn stream_error_keeps_original_type() {
        let err = StreamError::new(Boom);
        assert!(err.is::<Boom>());
        assert!(err.downcast_ref::<std::io::Error>().is_none());
        assert_eq!(err.to_string(), "boom");

        let copy = err.clone();
        assert!(copy.same_as(&err));
        assert!(!StreamError::new(Boom).same_as(&err));
    }

    #[test]
    fn merge_collapses_outcomes() {
        assert!(DisposeError::merge([Ok(()), Ok(())]).is_ok());

        let two = DisposeError::merge([
            Err(DisposeError::action("a")),
            Ok(()),
            Err(DisposeError::action("b")),
        ]);
        match two {
            Err(DisposeError::Composite { errors }) => assert_eq!(errors.len(), 2),
            other => panic!("expected composite, got {other:?}"),
        }
    }

    #[test]
    fn action_error_exposes_source() {
        let err = DisposeError::action(std::io::Error::other("disk gone"));
        let source = err.source().expect("action error has a source");
        assert!(source.is::<std::io::Error>());
        assert_eq!(err.as_message(), "release failed: disk gone");
    }
}
