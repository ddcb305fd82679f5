//! # Atomically swappable disposable container.
//!
//! [`DisposableSlot`] holds zero or one [`DisposableRef`]. Operators use it to
//! transfer ownership of the upstream handle as control moves from one source
//! to the next, while the downstream keeps a single stable handle: the slot.
//!
//! ## States
//! ```text
//!   Vacant ──replace/set──► Live(d) ──replace/set──► Live(d')
//!     │                        │
//!     └──────dispose()─────────┴──────► Disposed   (absorbing)
//! ```
//!
//! ## Rules
//! - Every transition is one atomic read-copy-update of the occupant pointer.
//! - Putting a handle into a disposed slot disposes that handle instead of storing it.
//! - [`replace`](DisposableSlot::replace) drops the previous occupant without disposing it;
//!   [`set`](DisposableSlot::set) disposes it.
//! - [`dispose`](DisposableSlot::dispose) disposes the current occupant exactly once.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::disposables::{Disposable, DisposableRef};
use crate::error::DisposeError;

enum Occupant {
    Vacant,
    Live(DisposableRef),
    Disposed,
}

/// Container holding at most one live disposable.
pub struct DisposableSlot {
    cell: ArcSwap<Occupant>,
}

impl DisposableSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self {
            cell: ArcSwap::from_pointee(Occupant::Vacant),
        }
    }

    /// Creates a slot already holding `handle`.
    pub fn with(handle: DisposableRef) -> Self {
        Self {
            cell: ArcSwap::from_pointee(Occupant::Live(handle)),
        }
    }

    /// Stores `next` without disposing the previous occupant.
    ///
    /// Returns `Ok(false)` if the slot was already disposed; `next` is then disposed.
    pub fn replace(&self, next: DisposableRef) -> Result<bool, DisposeError> {
        match self.swap_in(&next) {
            Some(_) => Ok(true),
            None => next.dispose().map(|()| false),
        }
    }

    /// Stores `next` and disposes the previous occupant.
    ///
    /// Returns `Ok(false)` if the slot was already disposed; `next` is then disposed.
    pub fn set(&self, next: DisposableRef) -> Result<bool, DisposeError> {
        match self.swap_in(&next) {
            Some(Some(previous)) => previous.dispose().map(|()| true),
            Some(None) => Ok(true),
            None => next.dispose().map(|()| false),
        }
    }

    /// Drops the occupant without disposing it; the slot becomes vacant.
    ///
    /// A disposed slot stays disposed.
    pub fn clear(&self) {
        self.cell.rcu(|cur| match **cur {
            Occupant::Live(_) => Arc::new(Occupant::Vacant),
            _ => Arc::clone(cur),
        });
    }

    /// Returns the current live occupant, if any.
    pub fn get(&self) -> Option<DisposableRef> {
        match &**self.cell.load() {
            Occupant::Live(handle) => Some(Arc::clone(handle)),
            _ => None,
        }
    }

    /// Installs `next` unless the slot is disposed.
    ///
    /// Returns `None` when disposed, otherwise `Some(previous occupant)`.
    fn swap_in(&self, next: &DisposableRef) -> Option<Option<DisposableRef>> {
        let prev = self.cell.rcu(|cur| match **cur {
            Occupant::Disposed => Arc::clone(cur),
            _ => Arc::new(Occupant::Live(Arc::clone(next))),
        });
        match &*prev {
            Occupant::Disposed => None,
            Occupant::Vacant => Some(None),
            Occupant::Live(previous) => Some(Some(Arc::clone(previous))),
        }
    }
}

impl Default for DisposableSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl Disposable for DisposableSlot {
    fn dispose(&self) -> Result<(), DisposeError> {
        let prev = self.cell.swap(Arc::new(Occupant::Disposed));
        match &*prev {
            Occupant::Live(handle) => handle.dispose(),
            _ => Ok(()),
        }
    }

    fn is_disposed(&self) -> bool {
        matches!(**self.cell.load(), Occupant::Disposed)
    }
}

impl fmt::Debug for DisposableSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match **self.cell.load() {
            Occupant::Vacant => "vacant",
            Occupant::Live(_) => "live",
            Occupant::Disposed => "disposed",
        };
        f.debug_struct("DisposableSlot").field("state", &state).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disposables;

    #[test]
    fn replace_keeps_previous_alive() {
        let slot = DisposableSlot::new();
        let first = disposables::empty();
        let second = disposables::empty();

        assert!(slot.replace(Arc::clone(&first)).unwrap());
        assert!(slot.replace(Arc::clone(&second)).unwrap());
        assert!(!first.is_disposed());
        assert!(disposables::same_handle(&slot.get().unwrap(), &second));
    }

    #[test]
    fn set_disposes_previous() {
        let slot = DisposableSlot::new();
        let first = disposables::empty();
        let second = disposables::empty();

        slot.set(Arc::clone(&first)).unwrap();
        slot.set(Arc::clone(&second)).unwrap();
        assert!(first.is_disposed());
        assert!(!second.is_disposed());
    }

    #[test]
    fn dispose_reaches_occupant_once() {
        let slot = DisposableSlot::new();
        let handle = disposables::empty();
        slot.replace(Arc::clone(&handle)).unwrap();

        slot.dispose().unwrap();
        slot.dispose().unwrap();
        assert!(slot.is_disposed());
        assert!(handle.is_disposed());
        assert!(slot.get().is_none());
    }

    #[test]
    fn late_handle_is_disposed_on_arrival() {
        let slot = DisposableSlot::new();
        slot.dispose().unwrap();

        let late = disposables::empty();
        assert!(!slot.replace(Arc::clone(&late)).unwrap());
        assert!(late.is_disposed());

        let later = disposables::empty();
        assert!(!slot.set(Arc::clone(&later)).unwrap());
        assert!(later.is_disposed());
    }

    #[test]
    fn clear_forgets_without_disposing() {
        let slot = DisposableSlot::new();
        let handle = disposables::empty();
        slot.replace(Arc::clone(&handle)).unwrap();

        slot.clear();
        slot.dispose().unwrap();
        assert!(!handle.is_disposed());
        assert!(slot.is_disposed());
    }

    #[test]
    fn concurrent_set_and_dispose_never_leaks() {
        for _ in 0..200 {
            let slot = Arc::new(DisposableSlot::new());
            let incoming = disposables::empty();

            crate::testing::race(
                {
                    let slot = Arc::clone(&slot);
                    let incoming = Arc::clone(&incoming);
                    move || {
                        let _ = slot.replace(incoming);
                    }
                },
                {
                    let slot = Arc::clone(&slot);
                    move || {
                        let _ = slot.dispose();
                    }
                },
            );

            assert!(slot.is_disposed());
            assert!(incoming.is_disposed(), "handle outlived a disposed slot");
        }
    }
}
