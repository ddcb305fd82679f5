//! # Sequential composition: `main` then `other`.
//!
//! Downstream receives one stable handle, a [`Link`], before `main` is even
//! subscribed. The link owns a [`DisposableSlot`] holding the handle of
//! whichever upstream is currently active.
//!
//! ```text
//!                  ┌──────────── Link (handed downstream first) ───────────┐
//!                  │  phase: AtomicU8        slot: DisposableSlot          │
//!                  └───────▲──────────────────────▲────────────────────────┘
//!                          │ replace(main handle) │ replace(other handle)
//!   main ──signals──► MainObserver ──complete──► OtherObserver ◄──signals── other
//!                          │                          │
//!                          └──────► downstream ◄──────┘
//! ```
//!
//! ## Phases
//! ```text
//! SUBSCRIBING_MAIN ─► ACTIVE_MAIN ─► SUBSCRIBING_OTHER ─► ACTIVE_OTHER ─► TERMINATED
//!        │                 │                │                  │
//!        └─────────────────┴────────────────┴──────────────────┴──► CANCELLED   (absorbing)
//! ```
//!
//! ## Rules
//! - Every phase change is a compare-and-swap; a signal whose transition fails is dropped.
//! - Main failure goes downstream and `other` is never subscribed.
//! - Disposing the link disposes the slot: only the active upstream is reached.
//! - Main completing or either side terminating clears the slot; a spent upstream is never disposed.
//! - Each side has its own [`ProtocolGuard`]; a second handshake is disposed there.
//! - A handle arriving after cancellation is disposed by the slot instead of stored.
//! - A failure that cannot be delivered is reported as
//!   [`EventKind::Undeliverable`](crate::EventKind::Undeliverable).

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::disposables::{Disposable, DisposableRef, DisposableSlot};
use crate::error::{DisposeError, StreamError};
use crate::events;
use crate::observable::{Observable, Observer};
use crate::protocol::ProtocolGuard;
use crate::single::{Single, SingleObserver};

const OPERATOR: &str = "concat";

const SUBSCRIBING_MAIN: u8 = 0;
const ACTIVE_MAIN: u8 = 1;
const SUBSCRIBING_OTHER: u8 = 2;
const ACTIVE_OTHER: u8 = 3;
const TERMINATED: u8 = 4;
const CANCELLED: u8 = 5;

fn is_final(phase: u8) -> bool {
    phase == TERMINATED || phase == CANCELLED
}

fn is_main(phase: u8) -> bool {
    phase == SUBSCRIBING_MAIN || phase == ACTIVE_MAIN
}

fn is_other(phase: u8) -> bool {
    phase == SUBSCRIBING_OTHER || phase == ACTIVE_OTHER
}

/// Downstream handle of a concatenation.
struct Link {
    slot: DisposableSlot,
    phase: AtomicU8,
}

impl Link {
    fn new() -> Self {
        Self {
            slot: DisposableSlot::new(),
            phase: AtomicU8::new(SUBSCRIBING_MAIN),
        }
    }

    fn phase(&self) -> u8 {
        self.phase.load(Ordering::Acquire)
    }

    fn is_cancelled(&self) -> bool {
        self.phase() == CANCELLED
    }

    /// Moves `from → to`; `false` if the phase was not `from`.
    fn advance(&self, from: u8, to: u8) -> bool {
        self.phase
            .compare_exchange(from, to, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Moves to `to` from any phase accepted by `allowed`.
    fn leave(&self, allowed: fn(u8) -> bool, to: u8) -> bool {
        self.phase
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |p| allowed(p).then_some(to))
            .is_ok()
    }

    /// Installs an accepted upstream handle and advances `from → to`.
    fn adopt(&self, handle: DisposableRef, from: u8, to: u8) {
        match self.slot.replace(handle) {
            Ok(true) => {
                let _ = self.advance(from, to);
            }
            Ok(false) => {}
            Err(err) => events::dispose_failed(OPERATOR, &err),
        }
    }
}

impl Disposable for Link {
    fn dispose(&self) -> Result<(), DisposeError> {
        let _ = self.leave(|p| !is_final(p), CANCELLED);
        self.slot.dispose()
    }

    fn is_disposed(&self) -> bool {
        self.slot.is_disposed()
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self.phase() {
            SUBSCRIBING_MAIN => "subscribing_main",
            ACTIVE_MAIN => "active_main",
            SUBSCRIBING_OTHER => "subscribing_other",
            ACTIVE_OTHER => "active_other",
            TERMINATED => "terminated",
            _ => "cancelled",
        };
        f.debug_struct("Link")
            .field("phase", &phase)
            .field("slot", &self.slot)
            .finish()
    }
}

type Subscribe<O> = Box<dyn FnOnce(OtherObserver<O>) + Send>;

/// Hands `link` downstream, then subscribes `main` unless already cancelled.
fn start<M, O>(main: M, mut downstream: O, other: Subscribe<O>)
where
    M: Observable,
    O: Observer<M::Item> + 'static,
{
    let link = Arc::new(Link::new());
    downstream.on_subscribe(link.clone());
    if link.is_cancelled() {
        return;
    }
    main.subscribe(MainObserver {
        downstream: Some(downstream),
        link,
        guard: ProtocolGuard::new(OPERATOR),
        other: Some(other),
    });
}

struct MainObserver<O> {
    downstream: Option<O>,
    link: Arc<Link>,
    guard: ProtocolGuard,
    other: Option<Subscribe<O>>,
}

impl<T, O> Observer<T> for MainObserver<O>
where
    O: Observer<T> + 'static,
{
    fn on_subscribe(&mut self, handle: DisposableRef) {
        if self.guard.handshake(Arc::clone(&handle)).is_accepted() {
            self.link.adopt(handle, SUBSCRIBING_MAIN, ACTIVE_MAIN);
        }
    }

    fn on_next(&mut self, value: T) {
        if !is_main(self.link.phase()) {
            return;
        }
        if let Some(downstream) = self.downstream.as_mut() {
            downstream.on_next(value);
        }
    }

    fn on_error(&mut self, error: StreamError) {
        if !self.link.leave(is_main, TERMINATED) {
            events::undeliverable(OPERATOR, &error);
            return;
        }
        self.other = None;
        self.link.slot.clear();
        match self.downstream.take() {
            Some(mut downstream) => downstream.on_error(error),
            None => events::undeliverable(OPERATOR, &error),
        }
    }

    fn on_complete(&mut self) {
        if !self.link.leave(is_main, SUBSCRIBING_OTHER) {
            return;
        }
        // Main is spent; a cancel before other's handshake must not reach it.
        self.link.slot.clear();
        let (Some(downstream), Some(subscribe)) = (self.downstream.take(), self.other.take()) else {
            return;
        };
        if self.link.is_cancelled() {
            return;
        }
        subscribe(OtherObserver {
            downstream: Some(downstream),
            link: Arc::clone(&self.link),
            guard: ProtocolGuard::new(OPERATOR),
        });
    }
}

/// Consumer of the second source; works for both multi and single sources.
struct OtherObserver<O> {
    downstream: Option<O>,
    link: Arc<Link>,
    guard: ProtocolGuard,
}

impl<O> OtherObserver<O> {
    fn handshake(&mut self, handle: DisposableRef) {
        if self.guard.handshake(Arc::clone(&handle)).is_accepted() {
            self.link.adopt(handle, SUBSCRIBING_OTHER, ACTIVE_OTHER);
        }
    }

    /// Takes the downstream if this call is the one that terminates the link.
    fn terminate(&mut self) -> Option<O> {
        if !self.link.leave(is_other, TERMINATED) {
            return None;
        }
        self.link.slot.clear();
        self.downstream.take()
    }

    fn forward<T>(&mut self, value: T)
    where
        O: Observer<T>,
    {
        if !is_other(self.link.phase()) {
            return;
        }
        if let Some(downstream) = self.downstream.as_mut() {
            downstream.on_next(value);
        }
    }
}

impl<T, O> SingleObserver<T> for OtherObserver<O>
where
    O: Observer<T> + 'static,
{
    fn on_subscribe(&mut self, handle: DisposableRef) {
        self.handshake(handle);
    }

    fn on_success(&mut self, value: T) {
        if let Some(mut downstream) = self.terminate() {
            downstream.on_next(value);
            downstream.on_complete();
        }
    }

    fn on_error(&mut self, error: StreamError) {
        match self.terminate() {
            Some(mut downstream) => downstream.on_error(error),
            None => events::undeliverable(OPERATOR, &error),
        }
    }
}

impl<T, O> Observer<T> for OtherObserver<O>
where
    O: Observer<T> + 'static,
{
    fn on_subscribe(&mut self, handle: DisposableRef) {
        self.handshake(handle);
    }

    fn on_next(&mut self, value: T) {
        self.forward(value);
    }

    fn on_error(&mut self, error: StreamError) {
        match self.terminate() {
            Some(mut downstream) => downstream.on_error(error),
            None => events::undeliverable(OPERATOR, &error),
        }
    }

    fn on_complete(&mut self) {
        if let Some(mut downstream) = self.terminate() {
            downstream.on_complete();
        }
    }
}

/// Emits every value of `main`, then the value of a [`Single`].
///
/// Built by [`Observable::concat_with_single`].
pub struct ConcatWithSingle<M, S> {
    main: M,
    other: S,
}

impl<M, S> ConcatWithSingle<M, S> {
    pub(crate) fn new(main: M, other: S) -> Self {
        Self { main, other }
    }
}

impl<M, S> Observable for ConcatWithSingle<M, S>
where
    M: Observable,
    S: Single<Item = M::Item>,
{
    type Item = M::Item;

    fn subscribe<O>(self, observer: O)
    where
        O: Observer<M::Item> + 'static,
    {
        let other = self.other;
        start(self.main, observer, Box::new(move |o: OtherObserver<O>| other.subscribe(o)));
    }
}

impl<M: fmt::Debug, S: fmt::Debug> fmt::Debug for ConcatWithSingle<M, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcatWithSingle")
            .field("main", &self.main)
            .field("other", &self.other)
            .finish()
    }
}

/// Emits every value of `main`, then every value of another [`Observable`].
///
/// Built by [`Observable::concat_with`].
pub struct ConcatWith<M, S> {
    main: M,
    other: S,
}

impl<M, S> ConcatWith<M, S> {
    pub(crate) fn new(main: M, other: S) -> Self {
        Self { main, other }
    }
}

impl<M, S> Observable for ConcatWith<M, S>
where
    M: Observable,
    S: Observable<Item = M::Item>,
{
    type Item = M::Item;

    fn subscribe<O>(self, observer: O)
    where
        O: Observer<M::Item> + 'static,
    {
        let other = self.other;
        start(self.main, observer, Box::new(move |o: OtherObserver<O>| other.subscribe(o)));
    }
}

impl<M: fmt::Debug, S: fmt::Debug> fmt::Debug for ConcatWith<M, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcatWith")
            .field("main", &self.main)
            .field("other", &self.other)
            .finish()
    }
}
