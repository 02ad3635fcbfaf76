//! Error types for binding, configuration and contract enforcement.

use thiserror::Error;

/// Binding failed before an operation state could be produced.
///
/// A failed bind never signals the receiver. The receiver is dropped
/// unsignalled and the caller learns about the failure here instead.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The external completion source went away before binding.
    #[error("completion source detached: {0}")]
    Detached(String),

    /// Staging the producer's owned resources failed.
    #[error("staging failed: {0}")]
    Staging(String),

    /// Catch-all. Include context.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Configuration errors.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The boundary policy string was not recognised.
    #[error("invalid boundary policy: {0:?} (expected \"abort\" or \"contain\")")]
    InvalidBoundary(String),

    /// A process-wide configuration was already installed or read.
    #[error("configuration already installed")]
    AlreadyInstalled,
}

/// A broken protocol invariant.
///
/// These are never returned to callers. They name the reason the process is
/// about to abort, see [`crate::boundary::violation`].
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContractViolation {
    /// `start` was called on an operation that had already been started.
    #[error("operation started more than once")]
    DoubleStart,

    /// A started operation released its receiver without delivering a signal.
    #[error("handoff dropped without delivering a completion signal")]
    AbandonedHandoff,
}
