#![deny(missing_docs)]
//! Leaf senders implementing the baton completion protocol.
//!
//! None of these has an upstream sender or schedules anything. They either
//! complete inline inside `start` ([`just`], [`just_error`],
//! [`just_stopped`], [`just_void_or_stopped`], [`compute`]) or complete when
//! an external [`Trigger`] fires ([`deferred`]).
//!
//! Every operation state here keeps its receiver in a
//! [`baton::Completion`] and delivers through the [`baton::Handoff`] it
//! yields, so double starts abort and receiver panics stay behind the
//! boundary.

mod compute;
mod deferred;
mod just;

pub use compute::{Compute, ComputeOperation, compute};
pub use deferred::{Deferred, DeferredOperation, Trigger, Watch, deferred};
pub use just::{
    Just, JustError, JustOperation, JustStopped, JustVoidOrStopped, just, just_error,
    just_stopped, just_void_or_stopped,
};
