//! Completion from other threads: triggers fired from tokio tasks.

use baton::test_utils::recorder;
use baton::{Connect, Lifecycle, OperationState, Signal};
use baton_senders::deferred;
use std::sync::{Arc, Barrier};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn trigger_fired_from_spawned_task() {
    let (sender, trigger) = deferred::<String, std::io::Error>();
    let (rx, rec) = recorder();
    let mut op = sender.connect(rx).unwrap();
    op.start();

    tokio::spawn(async move {
        trigger.set_value("from a worker");
    })
    .await
    .unwrap();

    assert_eq!(op.lifecycle(), Lifecycle::Completed);
    match rec.take_single() {
        Signal::Value(s) => assert_eq!(s, "from a worker"),
        other => panic!("expected value, got {:?}", other.kind()),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_operations_complete_once_each() {
    const OPS: usize = 256;

    let mut ops = Vec::with_capacity(OPS);
    let mut recordings = Vec::with_capacity(OPS);
    let mut tasks = Vec::with_capacity(OPS);

    for i in 0..OPS {
        let (sender, trigger) = deferred::<usize, String>();
        let (rx, rec) = recorder();
        let mut op = sender.connect(rx).unwrap();
        if i % 2 == 0 {
            op.start();
        }
        tasks.push(tokio::spawn(async move {
            if i % 3 == 0 {
                trigger.set_error(format!("op {i} failed"));
            } else {
                trigger.set_value(i);
            }
        }));
        ops.push(op);
        recordings.push(rec);
    }

    for task in tasks {
        task.await.unwrap();
    }
    for (i, op) in ops.iter_mut().enumerate() {
        if i % 2 == 1 {
            op.start();
        }
    }

    for (i, rec) in recordings.iter().enumerate() {
        let expected = if i % 3 == 0 {
            Signal::Error(format!("op {i} failed"))
        } else {
            Signal::Value(i)
        };
        assert_eq!(rec.take_single(), expected, "op {i}");
    }
    assert!(ops.iter().all(|op| op.lifecycle() == Lifecycle::Completed));
}

#[test]
fn racing_start_and_fire_deliver_once() {
    for round in 0..500_u32 {
        let (sender, trigger) = deferred::<u32, ()>();
        let (rx, rec) = recorder();
        let mut op = sender.connect(rx).unwrap();
        let barrier = Arc::new(Barrier::new(2));

        let firing = {
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                trigger.set_value(round);
            })
        };

        barrier.wait();
        op.start();
        firing.join().unwrap();

        assert_eq!(rec.take_single(), Signal::Value(round), "round {round}");
        assert_eq!(op.lifecycle(), Lifecycle::Completed);
    }
}
