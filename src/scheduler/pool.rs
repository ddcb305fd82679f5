//! Scheduler backed by a tokio runtime.

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use super::{Scheduler, Work};
use crate::disposables::{self, DisposableRef};
use crate::error::{RuntimeError, ScheduleError};

/// Runs work on the blocking pool of a tokio runtime.
///
/// Sources are synchronous and may emit for a long time, so work goes to
/// `spawn_blocking` rather than onto an async worker thread.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Creates a scheduler on the given runtime.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Creates a scheduler on the runtime the caller is running in.
    pub fn current() -> Result<Self, RuntimeError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| RuntimeError::NoReactor)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, work: Work) -> Result<DisposableRef, ScheduleError> {
        let token = CancellationToken::new();
        let gate = token.clone();
        let task = self.handle.spawn_blocking(move || {
            if !gate.is_cancelled() {
                work();
            }
        });
        Ok(disposables::from_fn(move || {
            token.cancel();
            task.abort();
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disposables::Disposable;
    use tokio::sync::oneshot;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn runs_scheduled_work() {
        let scheduler = TokioScheduler::current().unwrap();
        let (tx, rx) = oneshot::channel();
        let _handle = scheduler
            .schedule(Box::new(move || {
                let _ = tx.send(std::thread::current().id());
            }))
            .unwrap();

        let worker = rx.await.unwrap();
        assert_ne!(worker, std::thread::current().id());
    }

    #[tokio::test]
    async fn handle_reports_disposal() {
        let scheduler = TokioScheduler::current().unwrap();
        let handle = scheduler.schedule(Box::new(|| {})).unwrap();
        assert!(!handle.is_disposed());
        handle.dispose().unwrap();
        assert!(handle.is_disposed());
    }

    #[test]
    fn current_outside_runtime_fails() {
        assert!(matches!(TokioScheduler::current(), Err(RuntimeError::NoReactor)));
    }
}
