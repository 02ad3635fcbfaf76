//! The containment boundary between producer and receiver.
//!
//! Every receiver call made by a producer runs inside [`insulate`]. A panic
//! raised by receiver code, including the drop of a transferred payload, is
//! caught there and never unwinds into the producer's frame. By the time it
//! would arrive the operation state may already be gone, so there is nothing
//! on the producer side that could act on it.

use crate::error::{ConfigError, ContractViolation};
use crate::id::OperationId;
use crate::signal::SignalKind;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;

/// What to do with a panic that escapes a receiver method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Log the panic and abort the process.
    #[default]
    Abort,
    /// Log the panic and return to the producer as if the receiver had
    /// returned normally.
    Contain,
}

impl FromStr for BoundaryPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(BoundaryPolicy::Abort),
            "contain" => Ok(BoundaryPolicy::Contain),
            other => Err(ConfigError::InvalidBoundary(other.to_string())),
        }
    }
}

impl fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryPolicy::Abort => f.write_str("abort"),
            BoundaryPolicy::Contain => f.write_str("contain"),
        }
    }
}

/// Run `deliver` so that no panic can leave it.
///
/// On a clean return this is a plain call. On a panic the payload is logged
/// and then either discarded ([`BoundaryPolicy::Contain`]) or the process
/// aborts ([`BoundaryPolicy::Abort`]). A payload whose own destructor panics
/// aborts under both policies.
pub fn insulate<F: FnOnce()>(policy: BoundaryPolicy, op: OperationId, signal: SignalKind, deliver: F) {
    let payload = match panic::catch_unwind(AssertUnwindSafe(deliver)) {
        Ok(()) => return,
        Err(payload) => payload,
    };

    let message = panic_message(payload.as_ref());
    match policy {
        BoundaryPolicy::Abort => {
            tracing::error!(
                op = %op,
                signal = %signal,
                panic = %message,
                "baton.boundary.abort"
            );
            std::process::abort();
        }
        BoundaryPolicy::Contain => {
            tracing::warn!(
                op = %op,
                signal = %signal,
                panic = %message,
                "baton.boundary.contained"
            );
            if panic::catch_unwind(AssertUnwindSafe(move || drop(payload))).is_err() {
                tracing::error!(op = %op, "baton.boundary.payload_drop_panicked");
                std::process::abort();
            }
        }
    }
}

/// Report a broken protocol invariant and abort.
///
/// By the time one of these is observable, single ownership or single
/// delivery has already been broken and no local state can be trusted to
/// recover from it.
#[cold]
pub fn violation(op: OperationId, kind: ContractViolation) -> ! {
    tracing::error!(op = %op, violation = %kind, "baton.contract.violation");
    eprintln!("baton: contract violation on {op}: {kind}");
    std::process::abort();
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}
