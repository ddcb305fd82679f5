//! # Disposables: exactly-once resource handles and their factories.
//!
//! Every subscription starts with a [`Disposable`] handshake; the consumer keeps
//! the handle and calls [`Disposable::dispose`] to cancel.
//!
//! ## Contents
//! - [`Disposable`], [`DisposableRef`] the capability and its shared handle type
//! - [`ActionDisposable`] atomic, race-safe release of an optional action
//! - [`DisposableSlot`] swappable container used by operators
//! - factories: [`from_action`], [`from_fn`], [`empty`], [`disposed`],
//!   [`from_cancellation_token`], [`from_join_handle`]
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use pushflow::{Disposable, disposables};
//!
//! let released = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&released);
//! let handle = disposables::from_fn(move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! handle.dispose().unwrap();
//! handle.dispose().unwrap();
//! assert_eq!(released.load(Ordering::SeqCst), 1);
//! ```

mod action;
mod disposable;
mod slot;

pub use action::{Action, ActionDisposable};
pub use disposable::{Disposable, DisposableRef, same_handle};
pub use slot::DisposableSlot;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::BoxError;

/// Creates a disposable that runs the fallible `action` once on dispose.
///
/// Failures follow the [`failure`](crate::failure) policy.
pub fn from_action<F>(action: F) -> DisposableRef
where
    F: Fn() -> Result<(), BoxError> + Send + Sync + 'static,
{
    Arc::new(ActionDisposable::new(Box::new(action)))
}

/// Creates a disposable that runs the infallible `f` once on dispose.
pub fn from_fn<F>(f: F) -> DisposableRef
where
    F: Fn() + Send + Sync + 'static,
{
    from_action(move || {
        f();
        Ok(())
    })
}

/// Creates an ACTIVE disposable with a no-op release.
pub fn empty() -> DisposableRef {
    Arc::new(ActionDisposable::empty())
}

/// Creates a disposable that is already DISPOSED.
pub fn disposed() -> DisposableRef {
    Arc::new(ActionDisposable::disposed())
}

/// Creates a disposable that cancels `token` on dispose.
pub fn from_cancellation_token(token: CancellationToken) -> DisposableRef {
    from_fn(move || token.cancel())
}

/// Creates a disposable that aborts the tokio task behind `handle` on dispose.
pub fn from_join_handle<T>(handle: JoinHandle<T>) -> DisposableRef
where
    T: Send + 'static,
{
    from_fn(move || handle.abort())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn empty_starts_active() {
        let d = empty();
        assert!(!d.is_disposed());
        d.dispose().unwrap();
        assert!(d.is_disposed());
        d.dispose().unwrap();
        assert!(d.is_disposed());
    }

    #[test]
    fn disposed_starts_disposed() {
        let d = disposed();
        assert!(d.is_disposed());
        d.dispose().unwrap();
        assert!(d.is_disposed());
    }

    #[test]
    fn from_action_runs_on_dispose() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let d = from_action(move || {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });

        assert!(!ran.load(Ordering::SeqCst));
        d.dispose().unwrap();
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn token_is_cancelled() {
        let token = CancellationToken::new();
        let d = from_cancellation_token(token.clone());
        assert!(!token.is_cancelled());
        d.dispose().unwrap();
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn join_handle_is_aborted() {
        let task = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        });
        let d = from_join_handle(task);
        d.dispose().unwrap();
        assert!(d.is_disposed());
    }
}
