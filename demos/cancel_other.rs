//! # Example: cancel_other
//!
//! Cancelling a concatenation while its second source is still pending.
//!
//! The main side is empty, so the composition subscribes to the
//! [`SingleSubject`] right away. Disposing the downstream handle before the
//! subject produces a value unregisters the composition from the subject;
//! the later value reaches nobody.
//!
//! ## Run
//! ```bash
//! cargo run --example cancel_other
//! ```

use pushflow::{Disposable, Observable, SingleSubject, observable};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subject = SingleSubject::<&'static str>::new();

    let handle = observable::empty()
        .concat_with_single(subject.clone())
        .subscribe_with(
            |v| println!("next {v}"),
            |e| eprintln!("error {e}"),
            || println!("complete"),
        );
    println!("subject observers after subscribe: {}", subject.observer_count());

    handle.dispose()?;
    println!("subject observers after dispose:   {}", subject.observer_count());
    println!("handle disposed: {}", handle.is_disposed());

    // Nobody is listening anymore.
    subject.on_success("late value");
    Ok(())
}
