//! # Disposable capability
//!
//! [`Disposable`] is the handle every subscription and scheduled unit of work
//! hands out. The common handle type is [`DisposableRef`], an
//! `Arc<dyn Disposable>` that can be shared between the consumer that may
//! cancel and the producer that checks for cancellation.

use std::sync::Arc;

use crate::error::DisposeError;

/// # Releasable unit of work.
///
/// A disposable moves from ACTIVE to DISPOSED exactly once and never back.
///
/// ## Contract
/// - [`dispose`](Disposable::dispose) is idempotent: only the first call releases anything.
/// - [`is_disposed`](Disposable::is_disposed) may be called concurrently with `dispose`
///   and never reports ACTIVE again after reporting DISPOSED.
/// - An `Err` from `dispose` does not undo the transition.
///
/// # Example
/// ```
/// use pushflow::{Disposable, disposables};
///
/// let handle = disposables::empty();
/// assert!(!handle.is_disposed());
/// handle.dispose().unwrap();
/// assert!(handle.is_disposed());
/// ```
pub trait Disposable: Send + Sync + 'static {
    /// Releases the underlying resource; no-op if already disposed.
    fn dispose(&self) -> Result<(), DisposeError>;

    /// Returns `true` once the handle has been disposed.
    fn is_disposed(&self) -> bool;
}

/// Shared handle to a disposable (`Arc<dyn Disposable>`).
pub type DisposableRef = Arc<dyn Disposable>;

impl<D: Disposable + ?Sized> Disposable for Arc<D> {
    fn dispose(&self) -> Result<(), DisposeError> {
        (**self).dispose()
    }

    fn is_disposed(&self) -> bool {
        (**self).is_disposed()
    }
}

/// Returns `true` if both handles refer to the same disposable.
pub fn same_handle(a: &DisposableRef, b: &DisposableRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
