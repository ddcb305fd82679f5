//! # Handshake guard between a source and its consumer.
//!
//! A source must hand its consumer exactly one lifecycle handle. A misbehaving
//! source may hand out more; [`ProtocolGuard`] makes the consumer side see only
//! the first one.
//!
//! ## Rules
//! ```text
//!   Vacant ──handshake(d1)──► Installed(d1) ──handshake(d2)──► Installed(d1)   d2 disposed, violation reported
//!     │                            │
//!     └─────────dispose()──────────┴──────► Disposed ──handshake(d)──► Disposed   d disposed
//! ```
//! - First writer wins; the transition is one atomic read-copy-update.
//! - Presenting the installed handle again is ignored and disposes nothing.
//! - Violations are recovered locally and reported as
//!   [`EventKind::ProtocolViolation`](crate::EventKind::ProtocolViolation);
//!   they never reach the consumer as a stream error.
//! - Disposal failures of a rejected handle have no caller to return to and
//!   are reported as [`EventKind::DisposeFailed`](crate::EventKind::DisposeFailed).

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::disposables::{Disposable, DisposableRef, same_handle};
use crate::error::DisposeError;
use crate::events;

enum GuardState {
    Vacant,
    Installed(DisposableRef),
    Disposed,
}

/// Outcome of a handshake attempt.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handshake {
    /// First handle; the consumer should adopt it.
    Accepted,
    /// The already installed handle was presented again; nothing changed.
    Repeated,
    /// A second, different handle; it has been disposed.
    Rejected,
    /// The guard was disposed before the handshake; the handle has been disposed.
    Cancelled,
}

impl Handshake {
    /// Returns `true` only for [`Handshake::Accepted`].
    #[inline]
    pub fn is_accepted(self) -> bool {
        matches!(self, Handshake::Accepted)
    }
}

/// Single-assignment holder of the handle a consumer received.
pub struct ProtocolGuard {
    state: ArcSwap<GuardState>,
    operator: &'static str,
}

impl ProtocolGuard {
    /// Creates a vacant guard; `operator` names the consumer in reported events.
    pub fn new(operator: &'static str) -> Self {
        Self {
            state: ArcSwap::from_pointee(GuardState::Vacant),
            operator,
        }
    }

    /// Offers `handle` to the guard.
    pub fn handshake(&self, handle: DisposableRef) -> Handshake {
        let prev = self.state.rcu(|cur| match **cur {
            GuardState::Vacant => Arc::new(GuardState::Installed(Arc::clone(&handle))),
            _ => Arc::clone(cur),
        });

        match &*prev {
            GuardState::Vacant => Handshake::Accepted,
            GuardState::Installed(first) if same_handle(first, &handle) => Handshake::Repeated,
            GuardState::Installed(_) => {
                events::protocol_violation(self.operator);
                self.discard(&handle);
                Handshake::Rejected
            }
            GuardState::Disposed => {
                self.discard(&handle);
                Handshake::Cancelled
            }
        }
    }

    /// Returns the installed handle, if any.
    pub fn current(&self) -> Option<DisposableRef> {
        match &**self.state.load() {
            GuardState::Installed(handle) => Some(Arc::clone(handle)),
            _ => None,
        }
    }

    /// Returns `true` if the fronted handle is disposed or the guard itself was disposed.
    pub fn is_disposed(&self) -> bool {
        match &**self.state.load() {
            GuardState::Vacant => false,
            GuardState::Installed(handle) => handle.is_disposed(),
            GuardState::Disposed => true,
        }
    }

    /// Disposes the installed handle and rejects every later handshake.
    pub fn dispose(&self) -> Result<(), DisposeError> {
        let prev = self.state.swap(Arc::new(GuardState::Disposed));
        match &*prev {
            GuardState::Installed(handle) => handle.dispose(),
            _ => Ok(()),
        }
    }

    fn discard(&self, handle: &DisposableRef) {
        if let Err(err) = handle.dispose() {
            events::dispose_failed(self.operator, &err);
        }
    }
}

impl fmt::Debug for ProtocolGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match **self.state.load() {
            GuardState::Vacant => "vacant",
            GuardState::Installed(_) => "installed",
            GuardState::Disposed => "disposed",
        };
        f.debug_struct("ProtocolGuard")
            .field("operator", &self.operator)
            .field("state", &state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disposables;

    #[test]
    fn first_handle_wins() {
        let guard = ProtocolGuard::new("test");
        let first = disposables::empty();
        let second = disposables::empty();

        assert_eq!(guard.handshake(Arc::clone(&first)), Handshake::Accepted);
        assert_eq!(guard.handshake(Arc::clone(&second)), Handshake::Rejected);

        assert!(!first.is_disposed());
        assert!(second.is_disposed());
        assert!(same_handle(&guard.current().unwrap(), &first));
    }

    #[test]
    fn repeated_handle_is_left_alone() {
        let guard = ProtocolGuard::new("test");
        let handle = disposables::empty();

        assert!(guard.handshake(Arc::clone(&handle)).is_accepted());
        assert_eq!(guard.handshake(Arc::clone(&handle)), Handshake::Repeated);
        assert!(!handle.is_disposed());
    }

    #[test]
    fn disposed_guard_disposes_newcomers() {
        let guard = ProtocolGuard::new("test");
        guard.dispose().unwrap();
        assert!(guard.is_disposed());

        let late = disposables::empty();
        assert_eq!(guard.handshake(Arc::clone(&late)), Handshake::Cancelled);
        assert!(late.is_disposed());
    }

    #[test]
    fn reflects_fronted_handle() {
        let guard = ProtocolGuard::new("test");
        assert!(!guard.is_disposed());

        let handle = disposables::empty();
        let _ = guard.handshake(Arc::clone(&handle));
        assert!(!guard.is_disposed());

        handle.dispose().unwrap();
        assert!(guard.is_disposed());
    }

    #[test]
    fn concurrent_handshakes_pick_one_winner() {
        for _ in 0..200 {
            let guard = Arc::new(ProtocolGuard::new("test"));
            let a = disposables::empty();
            let b = disposables::empty();

            crate::testing::race(
                {
                    let (guard, a) = (Arc::clone(&guard), Arc::clone(&a));
                    move || {
                        let _ = guard.handshake(a);
                    }
                },
                {
                    let (guard, b) = (Arc::clone(&guard), Arc::clone(&b));
                    move || {
                        let _ = guard.handshake(b);
                    }
                },
            );

            let winner = guard.current().unwrap();
            let (kept, dropped) = if same_handle(&winner, &a) { (a, b) } else { (b, a) };
            assert!(!kept.is_disposed());
            assert!(dropped.is_disposed());
        }
    }
}
