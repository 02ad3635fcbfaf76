//! End-to-end protocol scenarios across the workspace.
//!
//! Tests cover:
//! - Round trip: one integer value, nothing else
//! - Failure: a producer that fails internally sends exactly one error
//! - Nothing is delivered by `connect`, only after `start`
//! - A receiver destroying its operation from inside `set_value`
//! - 10,000 bind/start cycles with in-handler destruction

use baton::test_utils::{DropTally, DropToken, Recording, RecordingReceiver, recorder};
use baton::{Connect, Lifecycle, OperationState, Signal, SignalKind, connect_and_start};
use baton_senders::{DeferredOperation, compute, deferred, just, just_error, just_stopped};
use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Round trip and failure
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn integer_round_trip_delivers_one_value() {
    let (rx, rec) = recorder::<i64, Infallible>();
    let mut op = just(1234_i64).connect(rx).unwrap();
    op.start();

    assert_eq!(rec.kinds(), vec![SignalKind::Value]);
    assert_eq!(rec.take_single(), Signal::Value(1234));
}

#[derive(Debug, PartialEq)]
enum LookupError {
    Missing { key: String },
}

#[test]
fn internal_failure_delivers_one_error() {
    let (rx, rec) = recorder::<u32, LookupError>();
    let table: Vec<(&str, u32)> = vec![("a", 1)];
    let op = connect_and_start(
        compute(move || {
            table
                .iter()
                .find(|(k, _)| *k == "b")
                .map(|(_, v)| *v)
                .ok_or(LookupError::Missing { key: "b".into() })
        }),
        rx,
    )
    .unwrap();

    assert_eq!(op.lifecycle(), Lifecycle::Completed);
    assert_eq!(rec.kinds(), vec![SignalKind::Error]);
    assert_eq!(
        rec.take_single(),
        Signal::Error(LookupError::Missing { key: "b".into() })
    );
}

#[test]
fn connect_never_signals() {
    let (rx, rec) = recorder::<(), &str>();
    let op = just_error("e").connect(rx).unwrap();
    assert!(rec.is_empty());
    drop(op);
    assert!(rec.is_empty());
    assert!(rec.receiver_released());

    let (rx, rec) = recorder::<(), Infallible>();
    let _op = just_stopped().connect(rx).unwrap();
    assert!(rec.is_empty());

    let (sender, trigger) = deferred::<u8, ()>();
    trigger.set_value(1_u8);
    let (rx, rec) = recorder::<u8, ()>();
    let _op = sender.connect(rx).unwrap();
    assert!(rec.is_empty(), "an early trigger must still wait for start");
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Destruction from inside the handler
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

type Op = DeferredOperation<RecordingReceiver<DropToken, Infallible>, DropToken, Infallible>;
type OpSlot = Arc<Mutex<Option<Op>>>;

#[derive(Default)]
struct Observed {
    lifecycle_in_handler: Mutex<Option<Lifecycle>>,
    released_in_handler: AtomicBool,
}

/// A receiver that, inside `set_value`, takes its own operation out of
/// `slot` and drops it, noting what it saw.
fn self_destroying(
    slot: &OpSlot,
    observed: &Arc<Observed>,
) -> (
    RecordingReceiver<DropToken, Infallible>,
    Recording<DropToken, Infallible>,
) {
    let (rx, rec) = recorder::<DropToken, Infallible>();
    let slot = Arc::clone(slot);
    let observed = Arc::clone(observed);
    let rx = rx.with_hook(move |_| {
        let op = slot.lock().unwrap().take();
        if let Some(op) = op {
            let watch = op.watch();
            *observed.lifecycle_in_handler.lock().unwrap() = watch.lifecycle();
            drop(op);
            observed
                .released_in_handler
                .store(watch.is_released(), Ordering::SeqCst);
        }
    });
    (rx, rec)
}

#[test]
fn receiver_may_destroy_operation_inside_set_value() {
    let tally = DropTally::new();
    let slot: OpSlot = Arc::new(Mutex::new(None));
    let observed = Arc::new(Observed::default());

    let (sender, trigger) = deferred::<DropToken, Infallible>();
    let (rx, rec) = self_destroying(&slot, &observed);
    *slot.lock().unwrap() = Some(sender.connect(rx).unwrap());

    slot.lock().unwrap().as_mut().unwrap().start();
    assert!(rec.is_empty());

    trigger.set_value(tally.token(7));

    // The state was marked completed before the receiver ran, and every
    // reference into it was gone once the receiver dropped the operation:
    // nothing in the delivering frame can write to it afterwards.
    assert_eq!(
        *observed.lifecycle_in_handler.lock().unwrap(),
        Some(Lifecycle::Completed)
    );
    assert!(observed.released_in_handler.load(Ordering::SeqCst));
    assert!(slot.lock().unwrap().is_none());

    match rec.take_single() {
        Signal::Value(token) => assert_eq!(token.tag, 7),
        other => panic!("expected value, got {:?}", other.kind()),
    }
    assert_eq!(tally.live(), 0);
}

#[test]
fn stress_ten_thousand_self_destroying_cycles() {
    const CYCLES: u64 = 10_000;

    let tally = DropTally::new();
    let observed = Arc::new(Observed::default());

    for i in 0..CYCLES {
        let slot: OpSlot = Arc::new(Mutex::new(None));
        let (sender, trigger) = deferred::<DropToken, Infallible>();
        let (rx, rec) = self_destroying(&slot, &observed);
        *slot.lock().unwrap() = Some(sender.connect(rx).unwrap());

        slot.lock().unwrap().as_mut().unwrap().start();
        trigger.set_value(tally.token(i));

        assert!(slot.lock().unwrap().is_none(), "cycle {i}: op not destroyed");
        assert!(
            observed.released_in_handler.swap(false, Ordering::SeqCst),
            "cycle {i}: state outlived the handler"
        );
        assert!(rec.receiver_released(), "cycle {i}: receiver leaked");
        match rec.take_single() {
            Signal::Value(token) => assert_eq!(token.tag, i),
            other => panic!("cycle {i}: expected value, got {:?}", other.kind()),
        }
        assert_eq!(Arc::strong_count(&slot), 1, "cycle {i}: slot leaked");
    }

    assert_eq!(tally.issued(), CYCLES as usize);
    assert_eq!(tally.live(), 0, "payloads leaked");
}

#[test]
fn stress_inline_cycles_deliver_once_and_free_everything() {
    let tally = DropTally::new();

    for i in 0..10_000_u64 {
        let (rx, rec) = recorder::<DropToken, Infallible>();
        let op = connect_and_start(just(tally.token(i)), rx).unwrap();
        drop(op);
        assert!(rec.receiver_released());
        assert_eq!(rec.len(), 1);
        drop(rec);
    }

    assert_eq!(tally.live(), 0);
}
