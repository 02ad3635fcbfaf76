//! Operation lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an operation state is in its single pass through the protocol.
///
/// Transitions only move forward: `Created → Started → Completed`. There is
/// no way back, and no way to reuse an operation. A fresh bind is the only
/// route to running the same sender again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// Bound, not yet started. Dropping here is allowed.
    Created,
    /// `start` has been called; exactly one signal is owed.
    Started,
    /// A completion signal has begun delivery. The receiver owns what
    /// happens next.
    Completed,
}

impl Lifecycle {
    /// Whether `next` is the single legal successor of `self`.
    pub fn can_advance_to(self, next: Lifecycle) -> bool {
        matches!(
            (self, next),
            (Lifecycle::Created, Lifecycle::Started) | (Lifecycle::Started, Lifecycle::Completed)
        )
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lifecycle::Created => "created",
            Lifecycle::Started => "started",
            Lifecycle::Completed => "completed",
        };
        f.write_str(name)
    }
}
