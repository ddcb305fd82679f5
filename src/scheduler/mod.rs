//! # Where work runs.
//!
//! The core never spawns anything itself; the only scheduling primitive it
//! consumes is [`Scheduler::schedule`], which returns a [`DisposableRef`]
//! that cancels the work if it has not run yet, or a [`ScheduleError`] when
//! the work could not be accepted at all.
//!
//! ## Implementations
//! - [`TokioScheduler`] runs work on the tokio blocking pool of a runtime handle.
//! - [`ThreadScheduler`] runs each unit of work on a fresh OS thread.
//! - [`ImmediateScheduler`] runs work inline on the calling thread.
//!
//! ## Rules
//! - Disposing the returned handle before the work starts means the work never runs.
//! - Disposing it while the work runs does not interrupt the work; cancellation
//!   inside the work is cooperative (sources check their own handles).
//! - A rejected unit of work is dropped without running. The scheduler reports
//!   the rejection as [`EventKind::ScheduleRejected`](crate::EventKind::ScheduleRejected)
//!   and returns the error to the caller.

mod immediate;
mod pool;
mod thread;

pub use immediate::ImmediateScheduler;
pub use pool::TokioScheduler;
pub use thread::ThreadScheduler;

use crate::disposables::DisposableRef;
use crate::error::ScheduleError;

/// Unit of work handed to a scheduler.
pub type Work = Box<dyn FnOnce() + Send + 'static>;

/// Executes units of work and hands back a cancellation handle.
pub trait Scheduler: Send + Sync + 'static {
    /// Submits `work`; disposing the returned handle cancels it if not started.
    ///
    /// On `Err` the work has been dropped and will never run.
    fn schedule(&self, work: Work) -> Result<DisposableRef, ScheduleError>;
}
