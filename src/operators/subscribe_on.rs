//! # Subscribe upstream on a scheduler.
//!
//! ```text
//! caller thread:  downstream.on_subscribe(handle) ──► scheduler.schedule(work) ──► task slot
//! worker thread:  source.subscribe(..) ──► upstream slot ◄── source handle
//!
//! handle.dispose() = task.dispose() + upstream.dispose()
//! ```
//!
//! Downstream gets its handle synchronously, before anything is scheduled.
//! Disposing it cancels the scheduled work if it has not started and the
//! upstream subscription if it has. Failures from both releases are merged
//! into one [`DisposeError`].
//!
//! When the scheduler rejects the work, downstream receives the
//! [`ScheduleError`](crate::ScheduleError) through `on_error` unless it has
//! already cancelled.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::disposables::{self, Disposable, DisposableRef, DisposableSlot};
use crate::error::{DisposeError, StreamError};
use crate::events;
use crate::observable::{Observable, Observer};
use crate::protocol::ProtocolGuard;
use crate::scheduler::Scheduler;

const OPERATOR: &str = "subscribe_on";

/// Subscribes to `source` on a scheduler.
///
/// Built by [`Observable::subscribe_on`].
pub struct SubscribeOn<S> {
    source: S,
    scheduler: Arc<dyn Scheduler>,
}

impl<S> SubscribeOn<S> {
    pub(crate) fn new(source: S, scheduler: Arc<dyn Scheduler>) -> Self {
        Self { source, scheduler }
    }
}

impl<S> Observable for SubscribeOn<S>
where
    S: Observable,
{
    type Item = S::Item;

    fn subscribe<O>(self, mut observer: O)
    where
        O: Observer<S::Item> + 'static,
    {
        let upstream = Arc::new(DisposableSlot::new());
        let task = Arc::new(DisposableSlot::new());

        let handle = {
            let (upstream, task) = (Arc::clone(&upstream), Arc::clone(&task));
            disposables::from_action(move || {
                DisposeError::merge([task.dispose(), upstream.dispose()]).map_err(Into::into)
            })
        };
        observer.on_subscribe(Arc::clone(&handle));
        if handle.is_disposed() {
            return;
        }

        let source = self.source;
        let work_upstream = Arc::clone(&upstream);
        let parked = Arc::new(Mutex::new(Some(observer)));
        let claimed = Arc::clone(&parked);
        let scheduled = self.scheduler.schedule(Box::new(move || {
            let Some(downstream) = take(&claimed) else {
                return;
            };
            source.subscribe(SubscribeOnObserver {
                downstream,
                upstream: work_upstream,
                guard: ProtocolGuard::new(OPERATOR),
            });
        }));

        match scheduled {
            Ok(scheduled) => {
                if let Err(err) = task.replace(scheduled) {
                    events::dispose_failed(OPERATOR, &err);
                }
            }
            Err(err) => {
                // The rejected work was dropped unrun, so the observer is still parked.
                let Some(mut downstream) = take(&parked) else {
                    return;
                };
                let error = StreamError::new(err);
                if handle.is_disposed() {
                    events::undeliverable(OPERATOR, &error);
                } else {
                    downstream.on_error(error);
                }
            }
        }
    }
}

fn take<O>(parked: &Mutex<Option<O>>) -> Option<O> {
    parked.lock().unwrap_or_else(PoisonError::into_inner).take()
}

impl<S: fmt::Debug> fmt::Debug for SubscribeOn<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscribeOn")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

struct SubscribeOnObserver<O> {
    downstream: O,
    upstream: Arc<DisposableSlot>,
    guard: ProtocolGuard,
}

impl<T, O> Observer<T> for SubscribeOnObserver<O>
where
    O: Observer<T>,
{
    fn on_subscribe(&mut self, handle: DisposableRef) {
        if !self.guard.handshake(Arc::clone(&handle)).is_accepted() {
            return;
        }
        if let Err(err) = self.upstream.replace(handle) {
            events::dispose_failed(OPERATOR, &err);
        }
    }

    fn on_next(&mut self, value: T) {
        if !self.upstream.is_disposed() {
            self.downstream.on_next(value);
        }
    }

    fn on_error(&mut self, error: StreamError) {
        if self.upstream.is_disposed() {
            events::undeliverable(OPERATOR, &error);
            return;
        }
        self.downstream.on_error(error);
    }

    fn on_complete(&mut self) {
        if !self.upstream.is_disposed() {
            self.downstream.on_complete();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScheduleError;
    use crate::observable;
    use crate::scheduler::{ImmediateScheduler, ThreadScheduler, Work};
    use crate::testing::{ObservableTestExt, TestObserver};
    use std::io;
    use std::time::Duration;

    /// Refuses every unit of work.
    struct Rejecting;

    impl Scheduler for Rejecting {
        fn schedule(&self, _work: Work) -> Result<DisposableRef, ScheduleError> {
            Err(ScheduleError::Spawn {
                scheduler: "rejecting".into(),
                source: io::Error::new(io::ErrorKind::WouldBlock, "no threads left"),
            })
        }
    }

    #[test]
    fn immediate_behaves_like_direct_subscription() {
        observable::range(1, 3)
            .subscribe_on(Arc::new(ImmediateScheduler))
            .test()
            .assert_result(&[1, 2, 3]);
    }

    #[test]
    fn runs_on_scheduler_thread() {
        let to = observable::range(1, 3)
            .subscribe_on(Arc::new(ThreadScheduler::new("subscribe-on")))
            .test();

        assert!(to.await_terminal(Duration::from_secs(5)));
        to.assert_result(&[1, 2, 3]);
    }

    #[test]
    fn cancel_reaches_upstream() {
        let to = TestObserver::<i32>::new();
        observable::never::<i32>()
            .subscribe_on(Arc::new(ImmediateScheduler))
            .subscribe(to.clone());

        to.cancel().unwrap();
        assert!(to.is_cancelled());
        to.assert_empty();
    }

    #[test]
    fn rejected_work_fails_downstream() {
        let to = observable::range(1, 3).subscribe_on(Arc::new(Rejecting)).test();

        to.assert_failure::<ScheduleError>(&[]);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn failed_thread_spawn_fails_downstream() {
        let scheduler = ThreadScheduler::new("oversized").with_stack_size(1 << 60);
        let to = observable::range(1, 3).subscribe_on(Arc::new(scheduler)).test();

        to.assert_failure::<ScheduleError>(&[]);
    }

    #[test]
    fn rejection_after_cancel_is_not_delivered() {
        /// Cancels the subscriber while the work is being submitted, then refuses it.
        struct CancelThenReject(TestObserver<i32>);

        impl Scheduler for CancelThenReject {
            fn schedule(&self, work: Work) -> Result<DisposableRef, ScheduleError> {
                self.0.cancel().unwrap();
                Rejecting.schedule(work)
            }
        }

        let to = TestObserver::<i32>::new();
        observable::range(1, 3)
            .subscribe_on(Arc::new(CancelThenReject(to.clone())))
            .subscribe(to.clone());

        assert!(to.is_cancelled());
        to.assert_empty();
    }
}
