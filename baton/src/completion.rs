//! Exactly-once delivery: the receiver slot and the handoff it yields.
//!
//! An operation state keeps its receiver in a [`Completion`]. Starting the
//! completion moves the receiver out into a [`Handoff`], which is the only
//! thing that can signal it, and it can do so once because every delivery
//! method consumes it.
//!
//! ```text
//! Completion::with_policy(receiver)   Created  (receiver inside)
//!        │ start()
//!        ▼
//! Handoff  ───────────────►  Started  (completion is now a tombstone)
//!        │ set_value / set_error / set_stopped / deliver
//!        ▼
//! receiver method, inside the boundary      Completed
//! ```
//!
//! A handoff holds no reference into operation state. Once it has been
//! taken, the operation can be dropped by anyone, including the receiver
//! while it is handling the signal, and the delivering frame will not
//! notice.

use crate::boundary::{self, BoundaryPolicy};
use crate::config;
use crate::error::ContractViolation;
use crate::id::OperationId;
use crate::lifecycle::Lifecycle;
use crate::receiver::Receiver;
use crate::signal::{Signal, SignalKind};
use std::fmt;
use std::marker::PhantomData;

/// The receiver slot of an operation state.
///
/// `V` and `E` are the value and error channels the owning sender declared.
pub struct Completion<R, V, E> {
    id: OperationId,
    policy: BoundaryPolicy,
    receiver: Option<R>,
    _channels: PhantomData<fn(V, E)>,
}

impl<R, V, E> Completion<R, V, E> {
    /// Take ownership of `receiver` using the process-wide boundary policy.
    pub fn new(receiver: R) -> Self {
        Self::with_policy(receiver, config::current().boundary)
    }

    /// Take ownership of `receiver` with an explicit boundary policy.
    pub fn with_policy(receiver: R, policy: BoundaryPolicy) -> Self {
        let id = OperationId::next();
        tracing::trace!(op = %id, policy = %policy, "baton.operation.connect");
        Self {
            id,
            policy,
            receiver: Some(receiver),
            _channels: PhantomData,
        }
    }

    /// The operation id assigned at binding.
    pub fn id(&self) -> OperationId {
        self.id
    }

    /// The boundary policy deliveries from this completion use.
    pub fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    /// `Created` until [`start`](Self::start), `Started` after.
    ///
    /// Completion itself is observed by the handoff, not here.
    pub fn lifecycle(&self) -> Lifecycle {
        if self.receiver.is_some() {
            Lifecycle::Created
        } else {
            Lifecycle::Started
        }
    }

    /// Move to `Started` and release the receiver as a [`Handoff`].
    ///
    /// A second call is a contract violation and aborts the process.
    pub fn start(&mut self) -> Handoff<R, V, E> {
        let Some(receiver) = self.receiver.take() else {
            boundary::violation(self.id, ContractViolation::DoubleStart);
        };
        tracing::trace!(op = %self.id, "baton.operation.start");
        Handoff {
            id: self.id,
            policy: self.policy,
            receiver: Some(receiver),
            _channels: PhantomData,
        }
    }
}

impl<R, V, E> fmt::Debug for Completion<R, V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("id", &self.id)
            .field("policy", &self.policy)
            .field("lifecycle", &self.lifecycle())
            .finish()
    }
}

/// The right to signal a started operation's receiver, exactly once.
///
/// Dropping a handoff without delivering is a contract violation: the
/// receiver was promised a signal. It aborts the process, including when the
/// drop happens because the producer is unwinding from a panic.
#[must_use = "a started operation owes its receiver exactly one signal"]
pub struct Handoff<R, V, E> {
    id: OperationId,
    policy: BoundaryPolicy,
    receiver: Option<R>,
    _channels: PhantomData<fn(V, E)>,
}

impl<R, V, E> Handoff<R, V, E> {
    /// The id of the operation this handoff belongs to.
    pub fn id(&self) -> OperationId {
        self.id
    }

    fn hand_over(mut self, kind: SignalKind, call: impl FnOnce(R)) {
        let (id, policy) = (self.id, self.policy);
        let Some(receiver) = self.receiver.take() else {
            boundary::violation(id, ContractViolation::AbandonedHandoff);
        };
        drop(self);

        tracing::trace!(op = %id, signal = %kind, "baton.signal.deliver");
        boundary::insulate(policy, id, kind, move || call(receiver));
    }
}

impl<R, V, E> Handoff<R, V, E>
where
    R: Receiver<V, E>,
{
    /// Deliver `signal`.
    pub fn deliver(self, signal: Signal<V, E>) {
        let kind = signal.kind();
        self.hand_over(kind, move |r| signal.send_to(r));
    }

    /// Deliver a value, converting it with [`Into`] inside the boundary.
    pub fn set_value(self, value: impl Into<V>) {
        self.hand_over(SignalKind::Value, move |r| {
            Receiver::<V, E>::set_value(r, value.into())
        });
    }

    /// Deliver an error, converting it with [`Into`] inside the boundary.
    pub fn set_error(self, error: impl Into<E>) {
        self.hand_over(SignalKind::Error, move |r| {
            Receiver::<V, E>::set_error(r, error.into())
        });
    }

    /// Deliver stopped.
    pub fn set_stopped(self) {
        self.hand_over(SignalKind::Stopped, Receiver::<V, E>::set_stopped);
    }
}

impl<R, V, E> Drop for Handoff<R, V, E> {
    fn drop(&mut self) {
        if self.receiver.is_some() {
            boundary::violation(self.id, ContractViolation::AbandonedHandoff);
        }
    }
}

impl<R, V, E> fmt::Debug for Handoff<R, V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handoff")
            .field("id", &self.id)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
