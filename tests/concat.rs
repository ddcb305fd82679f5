use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use pushflow::testing::{ObservableTestExt, TestObserver, race};
use pushflow::{
    Disposable, DisposableRef, Observable, SingleSubject, StreamError, disposables, observable, single,
};

#[derive(Debug, thiserror::Error)]
#[error("upstream failed")]
struct UpstreamFailed;

/// Single that records whether anybody subscribed to it.
fn watched_single(value: i32) -> (impl pushflow::Single<Item = i32>, Arc<AtomicBool>) {
    let subscribed = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&subscribed);
    let source = single::create::<i32, _>(move |o| {
        flag.store(true, Ordering::SeqCst);
        o.on_subscribe(disposables::empty());
        o.on_success(value);
    });
    (source, subscribed)
}

/// Emits `1..=5` ignoring cancellation, through a handle the test can inspect.
fn stubborn_range() -> (impl Observable<Item = i32>, DisposableRef) {
    let handle = disposables::empty();
    let given = Arc::clone(&handle);
    let source = observable::create::<i32, _>(move |o| {
        o.on_subscribe(given);
        for v in 1..=5 {
            o.on_next(v);
        }
        o.on_complete();
    });
    (source, handle)
}

#[test]
fn main_values_then_other_value() {
    observable::range(1, 5)
        .concat_with_single(single::just(100))
        .test()
        .assert_result(&[1, 2, 3, 4, 5, 100]);
}

#[test]
fn main_failure_skips_other() {
    let (other, subscribed) = watched_single(100);

    observable::error(StreamError::new(UpstreamFailed))
        .concat_with_single(other)
        .test()
        .assert_failure::<UpstreamFailed>(&[]);
    assert!(!subscribed.load(Ordering::SeqCst));
}

#[test]
fn main_failure_after_values_skips_other() {
    let (other, subscribed) = watched_single(100);

    observable::range(1, 2)
        .concat_with(observable::error(StreamError::new(UpstreamFailed)))
        .concat_with_single(other)
        .test()
        .assert_failure::<UpstreamFailed>(&[1, 2]);
    assert!(!subscribed.load(Ordering::SeqCst));
}

#[test]
fn other_failure_follows_main_values() {
    observable::range(1, 5)
        .concat_with_single(single::error(StreamError::new(UpstreamFailed)))
        .test()
        .assert_failure::<UpstreamFailed>(&[1, 2, 3, 4, 5]);
}

#[test]
fn truncation_disposes_main_and_never_subscribes_other() {
    let (main, main_handle) = stubborn_range();
    let (other, subscribed) = watched_single(100);

    main.concat_with_single(other).take(3).test().assert_result(&[1, 2, 3]);

    assert!(main_handle.is_disposed());
    assert!(!subscribed.load(Ordering::SeqCst));
}

#[test]
fn cancel_while_other_is_pending_drops_its_value() {
    let subject = SingleSubject::<i32>::new();
    let to = observable::empty::<i32>().concat_with_single(subject.clone()).test();
    assert!(subject.has_observers());

    to.cancel().unwrap();
    assert!(!subject.has_observers());

    subject.on_success(1);
    to.assert_empty();
}

#[test]
fn cancel_while_other_is_pending_disposes_its_handle() {
    let captured: Arc<Mutex<Option<DisposableRef>>> = Arc::new(Mutex::new(None));
    let store = Arc::clone(&captured);
    let other = single::create::<i32, _>(move |o| {
        let handle = disposables::empty();
        *store.lock().unwrap() = Some(Arc::clone(&handle));
        o.on_subscribe(handle);
    });

    let to = observable::empty::<i32>().concat_with_single(other).test();
    let handle = captured.lock().unwrap().clone().expect("other was subscribed");
    assert!(!handle.is_disposed());

    to.cancel().unwrap();
    assert!(handle.is_disposed());
    to.assert_empty();
}

#[test]
fn cancel_before_other_handshake_leaves_completed_main_alone() {
    let (main_handle, given) = {
        let h = disposables::empty();
        (Arc::clone(&h), h)
    };
    let main = observable::create::<i32, _>(move |o| {
        o.on_subscribe(given);
        o.on_next(1);
        o.on_complete();
    });

    let to = TestObserver::<i32>::new();
    let canceller = to.clone();
    let other_handle = disposables::empty();
    let handed = Arc::clone(&other_handle);
    let other = single::create::<i32, _>(move |o| {
        canceller.cancel().unwrap();
        o.on_subscribe(handed);
        o.on_success(2);
    });

    main.concat_with_single(other).subscribe(to.clone());

    assert_eq!(to.values(), vec![1]);
    assert_eq!(to.completions(), 0);
    assert!(!main_handle.is_disposed());
    assert!(other_handle.is_disposed());
}

#[test]
fn cancel_racing_subscription_never_leaks_the_other_side() {
    for _ in 0..200 {
        let subject = SingleSubject::<i32>::new();
        let source = observable::empty::<i32>().concat_with_single(subject.clone());
        let to = TestObserver::<i32>::new();
        let (subscriber, canceller) = (to.clone(), to.clone());

        race(
            move || source.subscribe(subscriber),
            move || canceller.cancel().unwrap(),
        );

        assert!(!subject.has_observers());
        subject.on_success(1);
        assert!(to.values().is_empty());
        assert_eq!(to.completions(), 0);
    }
}

#[test]
fn double_handshake_from_main_disposes_only_the_second() {
    let first = disposables::empty();
    let second = disposables::empty();
    let (a, b) = (Arc::clone(&first), Arc::clone(&second));
    let main = observable::create::<i32, _>(move |o| {
        o.on_subscribe(a);
        o.on_subscribe(b);
        o.on_next(1);
        o.on_complete();
    });

    main.concat_with_single(single::just(2)).test().assert_result(&[1, 2]);

    assert!(!first.is_disposed());
    assert!(second.is_disposed());
}

#[test]
fn double_handshake_from_other_disposes_only_the_second() {
    let first = disposables::empty();
    let second = disposables::empty();
    let (a, b) = (Arc::clone(&first), Arc::clone(&second));
    let other = single::create::<i32, _>(move |o| {
        o.on_subscribe(a);
        o.on_subscribe(b);
        o.on_success(2);
    });

    observable::just(1).concat_with_single(other).test().assert_result(&[1, 2]);

    assert!(!first.is_disposed());
    assert!(second.is_disposed());
}

#[test]
fn double_handshake_from_other_observable_disposes_only_the_second() {
    let first = disposables::empty();
    let second = disposables::empty();
    let (a, b) = (Arc::clone(&first), Arc::clone(&second));
    let other = observable::create::<i32, _>(move |o| {
        o.on_subscribe(a);
        o.on_subscribe(b);
        o.on_next(2);
        o.on_complete();
    });

    observable::just(1).concat_with(other).test().assert_result(&[1, 2]);

    assert!(!first.is_disposed());
    assert!(second.is_disposed());
}
