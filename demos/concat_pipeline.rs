//! # Example: concat_pipeline
//!
//! Sequential composition of a multi-value source and a single-value source.
//!
//! Shows how to:
//! - Chain [`Observable::concat_with_single`] and [`Observable::take`].
//! - Consume a stream with callbacks via [`Observable::subscribe_with`].
//! - Move the subscription onto the runtime's blocking pool with [`Observable::subscribe_on`].
//!
//! ## Flow
//! ```text
//! range(1, 5) ──► concat ──► downstream: 1 2 3 4 5
//!                   └─ main completes ──► just(100) ──► downstream: 100, complete
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example concat_pipeline
//! ```

use std::sync::Arc;

use pushflow::{Config, Observable, Runtime, Subscribe, observable, single};
use tokio::sync::oneshot;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subs: Vec<Arc<dyn Subscribe>> = Vec::new();
    let runtime = Runtime::new(Config::default(), subs)?;
    runtime.install();

    println!("== synchronous ==");
    let _ = observable::range(1, 5)
        .concat_with_single(single::just(100))
        .subscribe_with(
            |v| println!("[sync] next {v}"),
            |e| eprintln!("[sync] error {e}"),
            || println!("[sync] complete"),
        );

    println!("== truncated ==");
    let _ = observable::range(1, 5)
        .concat_with_single(single::just(100))
        .take(3)
        .subscribe_with(
            |v| println!("[take] next {v}"),
            |e| eprintln!("[take] error {e}"),
            || println!("[take] complete"),
        );

    println!("== on the blocking pool ==");
    let (done_tx, done_rx) = oneshot::channel();
    let _handle = observable::range(1, 3)
        .concat_with(observable::range(10, 2))
        .concat_with_single(single::just(100))
        .subscribe_on(runtime.scheduler())
        .subscribe_with(
            |v| println!("[pool] next {v} on {:?}", std::thread::current().name()),
            |e| eprintln!("[pool] error {e}"),
            move || {
                let _ = done_tx.send(());
            },
        );
    done_rx.await?;
    println!("[pool] complete");

    runtime.shutdown().await?;
    Ok(())
}
