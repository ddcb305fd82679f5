//! Scheduler that starts one OS thread per unit of work.

use std::thread;

use tokio_util::sync::CancellationToken;

use super::{Scheduler, Work};
use crate::disposables::{self, DisposableRef};
use crate::error::ScheduleError;
use crate::events;

const SCHEDULER: &str = "thread_scheduler";

/// Runs each unit of work on a new named thread.
#[derive(Clone, Debug)]
pub struct ThreadScheduler {
    name: String,
    stack_size: Option<usize>,
}

impl ThreadScheduler {
    /// Creates a scheduler whose threads are named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stack_size: None,
        }
    }

    /// Sets the stack size, in bytes, of every thread this scheduler starts.
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    fn spawn(&self, work: Work, gate: CancellationToken) -> Result<(), ScheduleError> {
        let mut builder = thread::Builder::new().name(self.name.clone());
        if let Some(bytes) = self.stack_size {
            builder = builder.stack_size(bytes);
        }
        builder
            .spawn(move || {
                if !gate.is_cancelled() {
                    work();
                }
            })
            .map_err(|source| ScheduleError::Spawn {
                scheduler: self.name.clone(),
                source,
            })?;
        Ok(())
    }
}

impl Default for ThreadScheduler {
    fn default() -> Self {
        Self::new("pushflow-worker")
    }
}

impl Scheduler for ThreadScheduler {
    fn schedule(&self, work: Work) -> Result<DisposableRef, ScheduleError> {
        let token = CancellationToken::new();
        match self.spawn(work, token.clone()) {
            Ok(()) => Ok(disposables::from_cancellation_token(token)),
            Err(err) => {
                events::schedule_rejected(SCHEDULER, &err);
                Err(err)
            }
        }
    }
}
