//! Channel descriptors — what a sender may emit, known before it runs.
//!
//! The authoritative description is static: a sender's associated types
//! [`Sender::Value`] and [`Sender::Error`] plus its associated constants.
//! The compiler checks receiver compatibility against those at `connect`.
//! [`Signature`] is a runtime snapshot of the same facts, for logging,
//! diagnostics and tests.

use crate::sender::Sender;
use serde::Serialize;
use std::any::type_name;
use std::fmt;

/// How a sender's completion relates to the `start` call.
///
/// Adapters use this to skip scheduling work that is not needed, e.g. a
/// sender that always completes inline can be run without a trampoline.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockingKind {
    /// No promise either way.
    #[default]
    Maybe,
    /// Completion never happens before `start` returns.
    Never,
    /// Completion always happens before `start` returns, possibly on another
    /// thread.
    Always,
    /// Completion always happens before `start` returns, on the thread that
    /// called `start`.
    AlwaysInline,
}

/// Runtime snapshot of a sender's channel descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Signature {
    /// Type name of the value payload.
    pub value: &'static str,
    /// Type name of the error payload.
    pub error: &'static str,
    /// Whether the sender may complete with an error.
    pub sends_error: bool,
    /// Whether the sender may complete with stopped.
    pub sends_stopped: bool,
    /// The sender's blocking behaviour.
    pub blocking: BlockingKind,
}

impl Signature {
    /// Describe `sender`.
    pub fn of<S: Sender>(sender: &S) -> Self {
        Self {
            value: type_name::<S::Value>(),
            error: type_name::<S::Error>(),
            sends_error: S::SENDS_ERROR,
            sends_stopped: S::SENDS_STOPPED,
            blocking: sender.blocking(),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "value({})", self.value)?;
        if self.sends_error {
            write!(f, " | error({})", self.error)?;
        }
        if self.sends_stopped {
            f.write_str(" | stopped")?;
        }
        Ok(())
    }
}
