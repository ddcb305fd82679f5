//! # Failure translation policy for release actions.
//!
//! A release action passed to [`from_action`](crate::disposables::from_action)
//! may fail in two different ways, and `dispose()` treats them differently:
//!
//! | Raised by the action                     | Class                         | Seen by the `dispose()` caller          |
//! |------------------------------------------|-------------------------------|-----------------------------------------|
//! | a panic (any payload)                    | [`FailureClass::Unrecoverable`] | the same unwind, payload untouched      |
//! | `Err(e)` where `e` is a [`DisposeError`] | [`FailureClass::Unchecked`]     | `Err(e)`, not wrapped a second time     |
//! | `Err(e)` for any other error             | [`FailureClass::Recoverable`]   | `Err(DisposeError::Action { source: e })` |
//!
//! Panics are never caught by the core: they represent programming errors and
//! fatal conditions and keep their identity while unwinding. The disposable
//! still ends up DISPOSED and the action still ran exactly once.
//!
//! `dispose()` only ever returns [`DisposeError`]. An application's own error
//! type never comes out of it as is: it is always wrapped in
//! [`DisposeError::Action`] and can be recovered from `source` by downcasting.
//! The only error that passes through unwrapped is a `DisposeError` itself.

use std::any::Any;
use std::error::Error as StdError;

use crate::error::{BoxError, DisposeError};

/// Classification of a failure raised by a release action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// A panic; propagates verbatim and is never wrapped.
    Unrecoverable,
    /// Already a [`DisposeError`]; propagates unwrapped.
    Unchecked,
    /// Any other error; wrapped into [`DisposeError::Action`].
    Recoverable,
}

impl FailureClass {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            FailureClass::Unrecoverable => "unrecoverable",
            FailureClass::Unchecked => "unchecked",
            FailureClass::Recoverable => "recoverable",
        }
    }
}

/// Classifies an error returned by a release action.
///
/// Errors are never [`FailureClass::Unrecoverable`]; that class is reserved
/// for panics, which do not pass through this function.
pub fn classify(err: &(dyn StdError + 'static)) -> FailureClass {
    if err.is::<DisposeError>() {
        FailureClass::Unchecked
    } else {
        FailureClass::Recoverable
    }
}

/// Translates an action failure into the error returned from `dispose()`.
///
/// # Example
/// ```
/// use pushflow::DisposeError;
/// use pushflow::failure::translate;
///
/// let wrapped = translate(Box::new(std::io::Error::other("closed")));
/// assert!(matches!(wrapped, DisposeError::Action { .. }));
///
/// let verbatim = translate(Box::new(DisposeError::Composite { errors: vec![] }));
/// assert!(matches!(verbatim, DisposeError::Composite { .. }));
/// ```
pub fn translate(err: BoxError) -> DisposeError {
    match err.downcast::<DisposeError>() {
        Ok(unchecked) => *unchecked,
        Err(source) => DisposeError::Action { source },
    }
}

/// Extracts a readable message from a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_recoverable() {
        let io = std::io::Error::other("closed");
        assert_eq!(classify(&io), FailureClass::Recoverable);

        match translate(Box::new(io)) {
            DisposeError::Action { source } => assert!(source.is::<std::io::Error>()),
            other => panic!("expected wrapped action error, got {other:?}"),
        }
    }

    #[test]
    fn dispose_errors_pass_through() {
        let inner = DisposeError::action("inner");
        assert_eq!(classify(&inner), FailureClass::Unchecked);

        match translate(Box::new(inner)) {
            DisposeError::Action { source } => assert_eq!(source.to_string(), "inner"),
            other => panic!("expected the original error back, got {other:?}"),
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("ledger locked")]
    struct LedgerLocked;

    #[test]
    fn domain_errors_are_always_wrapped() {
        use crate::disposables::{self, Disposable};

        let d = disposables::from_action(|| Err(LedgerLocked.into()));

        match d.dispose() {
            Err(DisposeError::Action { source }) => {
                assert!(source.downcast_ref::<LedgerLocked>().is_some());
            }
            other => panic!("expected a wrapped domain error, got {other:?}"),
        }
    }

    fn payload_of(f: impl FnOnce() + std::panic::UnwindSafe) -> Box<dyn Any + Send> {
        match std::panic::catch_unwind(f) {
            Err(payload) => payload,
            Ok(()) => panic!("closure was expected to panic"),
        }
    }

    #[test]
    fn panic_payloads_are_readable() {
        let payload = payload_of(|| panic!("kaput"));
        assert_eq!(panic_message(&*payload), "kaput");

        let owned = payload_of(|| panic!("code {}", 7));
        assert_eq!(panic_message(&*owned), "code 7");

        let opaque = payload_of(|| std::panic::panic_any(42u8));
        assert_eq!(panic_message(&*opaque), "unknown panic");
    }
}
