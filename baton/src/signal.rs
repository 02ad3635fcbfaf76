//! Completion signals — the one message an operation sends its receiver.

use crate::receiver::Receiver;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A completion signal carrying its payload.
///
/// Exactly one of these reaches a receiver per operation. Ownership of the
/// payload moves to the receiver at delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal<V, E> {
    /// The producer finished with a value.
    Value(V),
    /// The producer failed with an error of its own declared shape.
    Error(E),
    /// The producer finished without a value or an error.
    Stopped,
}

/// The tag of a [`Signal`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// `set_value`
    Value,
    /// `set_error`
    Error,
    /// `set_stopped`
    Stopped,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalKind::Value => "value",
            SignalKind::Error => "error",
            SignalKind::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

impl<V, E> Signal<V, E> {
    /// The tag of this signal.
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::Value(_) => SignalKind::Value,
            Signal::Error(_) => SignalKind::Error,
            Signal::Stopped => SignalKind::Stopped,
        }
    }

    /// Transform the error payload. Value and stopped pass through.
    ///
    /// This is the explicit step an adapter uses to merge error shapes from
    /// several producers into one.
    pub fn map_error<F>(self, f: impl FnOnce(E) -> F) -> Signal<V, F> {
        match self {
            Signal::Value(v) => Signal::Value(v),
            Signal::Error(e) => Signal::Error(f(e)),
            Signal::Stopped => Signal::Stopped,
        }
    }

    /// Call the receiver method matching this signal.
    ///
    /// No containment happens here. Producers deliver through
    /// [`crate::Handoff`], which calls this inside the boundary.
    pub fn send_to<R: Receiver<V, E>>(self, receiver: R) {
        match self {
            Signal::Value(v) => receiver.set_value(v),
            Signal::Error(e) => receiver.set_error(e),
            Signal::Stopped => receiver.set_stopped(),
        }
    }

    /// Convert a value/error signal into a `Result`. Stopped becomes `None`.
    pub fn into_result(self) -> Option<Result<V, E>> {
        match self {
            Signal::Value(v) => Some(Ok(v)),
            Signal::Error(e) => Some(Err(e)),
            Signal::Stopped => None,
        }
    }
}

impl<V, E> From<Result<V, E>> for Signal<V, E> {
    fn from(result: Result<V, E>) -> Self {
        match result {
            Ok(v) => Signal::Value(v),
            Err(e) => Signal::Error(e),
        }
    }
}
