//! # Example: custom_subscriber
//!
//! Demonstrates how to build and attach a custom event subscriber.
//!
//! Shows how to:
//! - Implement the [`Subscribe`] trait.
//! - Inspect [`Event`] / [`EventKind`] for recovered conditions.
//! - Wire the subscriber into [`Runtime::new`] and install the event hook.
//!
//! ## Flow
//! ```text
//! misbehaving source ──► concat guard ──► events hook ──► Bus
//!                                                          └─► Runtime listener
//!                                                                └─► SubscriberSet ──► ConsoleSubscriber.on_event()
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example custom_subscriber
//! ```

use std::sync::Arc;

use pushflow::{
    Config, Disposable, Event, EventKind, Observable, Runtime, StreamError, Subscribe, disposables,
    observable, single,
};

/// A simple console subscriber that prints every recovered condition.
/// In real life, you could export metrics, ship logs, or trigger alerts.
struct ConsoleSubscriber;

#[async_trait::async_trait]
impl Subscribe for ConsoleSubscriber {
    async fn on_event(&self, ev: &Event) {
        let operator = ev.operator.as_deref().unwrap_or("<unknown>");
        let reason = ev.reason.as_deref().unwrap_or("<none>");
        match ev.kind {
            EventKind::ProtocolViolation => {
                println!("[sub] protocol violation: operator={operator} reason={reason}");
            }
            EventKind::Undeliverable => {
                println!("[sub] undeliverable:      operator={operator} error={reason}");
            }
            EventKind::DisposeFailed => {
                println!("[sub] dispose failed:     operator={operator} error={reason}");
            }
            EventKind::ScheduleRejected => {
                println!("[sub] schedule rejected:  scheduler={operator} error={reason}");
            }
            EventKind::SubscriberPanicked | EventKind::SubscriberOverflow => {}
        }
    }

    fn name(&self) -> &'static str {
        "console"
    }

    fn queue_capacity(&self) -> usize {
        1024
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(ConsoleSubscriber)];
    let runtime = Runtime::new(Config::default(), subs)?;
    runtime.install();

    // Hands out two lifecycle handles; the second one is disposed by the guard.
    let two_handles = observable::create::<i32, _>(|o| {
        o.on_subscribe(disposables::empty());
        o.on_subscribe(disposables::from_fn(|| println!("[src] extra handle disposed")));
        o.on_next(1);
        o.on_complete();
    });
    let _ = two_handles.concat_with_single(single::just(2)).subscribe_with(
        |v| println!("[obs] next {v}"),
        |e| eprintln!("[obs] error {e}"),
        || println!("[obs] complete"),
    );

    // Fails after completing; the failure has nowhere to go.
    let late_failure = observable::create::<i32, _>(|o| {
        o.on_subscribe(disposables::empty());
        o.on_complete();
        o.on_error(StreamError::msg("failure after completion"));
    });
    let _ = late_failure.concat_with_single(single::just(3)).subscribe_with(
        |v| println!("[obs] next {v}"),
        |e| eprintln!("[obs] error {e}"),
        || println!("[obs] complete"),
    );

    // Release action that fails while the composition is being cancelled.
    let failing_release = observable::create::<i32, _>(|o| {
        o.on_subscribe(disposables::from_action(|| Err("release refused".into())));
    });
    let handle = failing_release
        .concat_with_single(single::just(4))
        .subscribe_with(|_| {}, |_| {}, || {});
    if let Err(err) = handle.dispose() {
        println!("[obs] dispose returned: {err}");
    }

    runtime.shutdown().await?;
    Ok(())
}
