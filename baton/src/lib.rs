//! # baton — exactly-once completion protocol for sender/receiver pipelines
//!
//! This crate defines the contract that connects an asynchronous producer
//! (a *sender*) to a consumer (a *receiver*) without committing to any error
//! representation, executor, or failure-propagation mechanism.
//!
//! ## The Pieces
//!
//! | Piece | Types | What it does |
//! |-------|-------|-------------|
//! | ① Descriptor | [`Sender`], [`Signature`], [`BlockingKind`] | Declares value, error and stopped channels |
//! | ② Binding | [`Connect`], [`OperationState`] | Pairs one sender with one receiver, then starts it |
//! | ③ Completion | [`Completion`], [`Handoff`], [`Signal`] | Delivers exactly one signal across the boundary |
//!
//! ## Lifecycle
//!
//! ```text
//! connect(sender, receiver) ──► Created ──start()──► Started ──handoff──► Completed
//! ```
//!
//! Binding never delivers a signal. Starting happens exactly once. The
//! receiver sees exactly one of `set_value`, `set_error` or `set_stopped`,
//! and the producer never touches operation state after that call begins.
//!
//! ## Faults at the boundary
//!
//! A panic inside a receiver method never unwinds into producer code. Every
//! delivery goes through [`Handoff`], which wraps the receiver call in a
//! containment boundary governed by [`BoundaryPolicy`]: either the panic is
//! logged and swallowed, or the process aborts. Contract violations (a second
//! `start`, a handoff dropped without delivering) always abort.
//!
//! ## Transfer by move
//!
//! Payloads move into the receiver. Conversions at the boundary go through
//! [`Into`] only, so there is no fallible conversion path, and every drop of
//! a transferred value happens in the receiver's frame, inside the boundary.

#![deny(missing_docs)]

pub mod boundary;
pub mod completion;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod id;
pub mod lifecycle;
pub mod receiver;
pub mod sender;
pub mod signal;

#[cfg(feature = "test-utils")]
pub mod test_utils;

// Re-exports for convenience
pub use boundary::BoundaryPolicy;
pub use completion::{Completion, Handoff};
pub use config::Config;
pub use descriptor::{BlockingKind, Signature};
pub use error::{ConfigError, ConnectError, ContractViolation};
pub use id::OperationId;
pub use lifecycle::Lifecycle;
pub use receiver::{MapError, Receiver};
pub use sender::{Connect, OperationState, Sender, connect_and_start};
pub use signal::{Signal, SignalKind};
