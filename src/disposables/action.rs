//! # Action-backed disposable
//!
//! [`ActionDisposable`] runs a release action exactly once. Its state lives in
//! a single atomic cell:
//!
//! ```text
//!   ACTIVE ──(winning compare-exchange)──► RELEASING ──(action returns or unwinds)──► DISPOSED
//! ```
//!
//! ## Rules
//! - The caller that wins the exchange runs the action; everybody else is a loser.
//! - Losers on other threads wait until the winner leaves RELEASING, so every
//!   `dispose()` call returns after the single release has finished. They yield
//!   for a short while, then sleep with a doubling, capped interval.
//! - A loser on the winner's own thread (the action disposing itself) returns at once.
//! - `is_disposed()` reports `true` from the moment the exchange is won.
//! - A failing or panicking action still leaves the cell DISPOSED.

use std::fmt;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, Ordering};
use std::thread::{self, ThreadId};
use std::time::Duration;

use crate::disposables::Disposable;
use crate::error::{BoxError, DisposeError};
use crate::failure;

const ACTIVE: u8 = 0;
const RELEASING: u8 = 1;
const DISPOSED: u8 = 2;

/// Waiting rounds spent yielding before a loser starts sleeping.
const YIELD_ROUNDS: u32 = 64;
const MIN_PAUSE: Duration = Duration::from_micros(10);
const MAX_PAUSE: Duration = Duration::from_millis(1);

/// Fallible release action.
pub type Action = Box<dyn Fn() -> Result<(), BoxError> + Send + Sync + 'static>;

/// Disposable that runs an optional release action exactly once.
pub struct ActionDisposable {
    state: AtomicU8,
    releaser: OnceLock<ThreadId>,
    action: Option<Action>,
}

impl ActionDisposable {
    /// Creates an ACTIVE disposable with the given release action.
    pub fn new(action: Action) -> Self {
        Self::with_state(ACTIVE, Some(action))
    }

    /// Creates an ACTIVE disposable whose release does nothing.
    pub fn empty() -> Self {
        Self::with_state(ACTIVE, None)
    }

    /// Creates a disposable that is DISPOSED from the start.
    pub fn disposed() -> Self {
        Self::with_state(DISPOSED, None)
    }

    fn with_state(state: u8, action: Option<Action>) -> Self {
        Self {
            state: AtomicU8::new(state),
            releaser: OnceLock::new(),
            action,
        }
    }

    /// Blocks until the winning release has finished.
    fn await_release(&self) {
        let me = thread::current().id();
        let mut round = 0u32;
        while self.state.load(Ordering::Acquire) == RELEASING {
            if self.releaser.get() == Some(&me) {
                return;
            }
            match pause(round) {
                None => thread::yield_now(),
                Some(nap) => thread::sleep(nap),
            }
            round = round.saturating_add(1);
        }
    }
}

/// How long a loser sleeps in `round`; `None` means yield instead.
fn pause(round: u32) -> Option<Duration> {
    let slept = round.checked_sub(YIELD_ROUNDS)?;
    let nap = MIN_PAUSE.saturating_mul(1u32 << slept.min(16));
    Some(nap.min(MAX_PAUSE))
}

impl Disposable for ActionDisposable {
    fn dispose(&self) -> Result<(), DisposeError> {
        if self
            .state
            .compare_exchange(ACTIVE, RELEASING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.await_release();
            return Ok(());
        }

        let _ = self.releaser.set(thread::current().id());
        let _finish = Finish(&self.state);
        match &self.action {
            Some(action) => action().map_err(failure::translate),
            None => Ok(()),
        }
    }

    fn is_disposed(&self) -> bool {
        self.state.load(Ordering::Acquire) != ACTIVE
    }
}

impl fmt::Debug for ActionDisposable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDisposable")
            .field("disposed", &self.is_disposed())
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

/// Publishes DISPOSED when the release ends, including by unwinding.
struct Finish<'a>(&'a AtomicU8);

impl Drop for Finish<'_> {
    fn drop(&mut self) {
        self.0.store(DISPOSED, Ordering::Release);
    }
}
