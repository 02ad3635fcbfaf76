//! A panic inside `compute`'s closure aborts the process.
//!
//! The operation has already started when the closure runs, so unwinding
//! out of `start` would drop a handoff that still owes its receiver a
//! signal. The test re-runs this binary as a child and checks for SIGABRT.

use baton::test_utils::recorder;
use baton::{Connect, OperationState};
use baton_senders::compute;
use std::process::{Command, Output};

const CHILD_ENV: &str = "BATON_COMPUTE_CHILD";

fn run_child(name: &str) -> Output {
    let exe = std::env::current_exe().expect("test binary path");
    Command::new(exe)
        .args(["--exact", name, "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, name)
        .output()
        .expect("spawn child test process")
}

#[test]
fn panicking_closure_aborts_instead_of_unwinding() {
    const NAME: &str = "panicking_closure_aborts_instead_of_unwinding";

    if std::env::var(CHILD_ENV).as_deref() == Ok(NAME) {
        let _ = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .try_init();
        let (rx, _rec) = recorder::<u8, ()>();
        let mut op = compute(|| -> Result<u8, ()> { panic!("work fell over") })
            .connect(rx)
            .unwrap();
        op.start();
        return;
    }

    let out = run_child(NAME);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(!out.status.success(), "child exited cleanly; stderr:\n{stderr}");
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(out.status.signal(), Some(6), "stderr:\n{stderr}");
    }
    assert!(stderr.contains("work fell over"), "{stderr}");
    assert!(stderr.contains("handoff dropped without delivering"), "{stderr}");
}
