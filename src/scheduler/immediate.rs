//! Scheduler that runs work on the calling thread.

use super::{Scheduler, Work};
use crate::disposables::{self, DisposableRef};
use crate::error::ScheduleError;

/// Runs work inline; the returned handle is already disposed.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
    fn schedule(&self, work: Work) -> Result<DisposableRef, ScheduleError> {
        work();
        Ok(disposables::disposed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disposables::Disposable;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn runs_before_returning() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let handle = ImmediateScheduler
            .schedule(Box::new(move || flag.store(true, Ordering::SeqCst)))
            .unwrap();

        assert!(ran.load(Ordering::SeqCst));
        assert!(handle.is_disposed());
    }
}
