//! # Two-thread race harness.
//!
//! [`race`] runs two closures on two threads released by one barrier, so both
//! hit the code under test as close to simultaneously as the OS allows.
//! Stress tests call it in a loop (100+ trials) and check invariants after
//! each round.
//!
//! ## Rules
//! - Both closures have finished when `race` returns.
//! - A panic in either closure is re-raised on the caller's thread, with its
//!   original payload.

use std::panic;
use std::sync::Barrier;
use std::thread;

/// Runs `a` and `b` concurrently and waits for both.
pub fn race<A, B>(a: A, b: B)
where
    A: FnOnce() + Send,
    B: FnOnce() + Send,
{
    let barrier = Barrier::new(2);
    thread::scope(|s| {
        let left = s.spawn(|| {
            barrier.wait();
            a();
        });
        let right = s.spawn(|| {
            barrier.wait();
            b();
        });
        let results = [left.join(), right.join()];
        for result in results {
            if let Err(payload) = result {
                panic::resume_unwind(payload);
            }
        }
    });
}

/// Runs `f(i)` for `i in 0..threads` concurrently and waits for all of them.
pub fn race_all<F>(threads: usize, f: F)
where
    F: Fn(usize) + Sync,
{
    let barrier = Barrier::new(threads);
    thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|i| {
                let (barrier, f) = (&barrier, &f);
                s.spawn(move || {
                    barrier.wait();
                    f(i);
                })
            })
            .collect();
        for handle in handles {
            if let Err(payload) = handle.join() {
                panic::resume_unwind(payload);
            }
        }
    });
}
