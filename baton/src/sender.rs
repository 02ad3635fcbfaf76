//! The Sender protocol — describing, binding and starting work.

use crate::descriptor::{BlockingKind, Signature};
use crate::error::ConnectError;
use crate::id::OperationId;
use crate::lifecycle::Lifecycle;

/// A description of asynchronous work that completes with one signal.
///
/// A sender is inert. Nothing runs until it has been bound to a receiver
/// with [`Connect::connect`] and the resulting operation has been started.
/// Senders are plain values and may be moved freely before binding.
///
/// The associated items are the sender's channel descriptor:
///
/// - [`Value`](Sender::Value): payload of `set_value`. Several value shapes
///   are expressed as an enum.
/// - [`Error`](Sender::Error): payload of `set_error`, chosen by the
///   producer. Use [`std::convert::Infallible`] and set
///   [`SENDS_ERROR`](Sender::SENDS_ERROR) to `false` for "never fails".
/// - [`SENDS_STOPPED`](Sender::SENDS_STOPPED): whether `set_stopped` may be
///   called.
pub trait Sender {
    /// Value payload.
    type Value;

    /// Error payload.
    type Error;

    /// Whether the error channel is used at all.
    const SENDS_ERROR: bool = true;

    /// Whether the stopped channel is used at all.
    const SENDS_STOPPED: bool;

    /// When completion happens relative to `start`.
    fn blocking(&self) -> BlockingKind {
        BlockingKind::Maybe
    }

    /// Runtime snapshot of this sender's descriptor.
    fn signature(&self) -> Signature
    where
        Self: Sized,
    {
        Signature::of(self)
    }
}

/// Binding a sender to a receiver of type `R`.
///
/// Implementations bound `R: Receiver<Self::Value, Self::Error>`, so pairing
/// a sender with a receiver that cannot accept its channels is a compile
/// error, not a runtime failure.
///
/// `connect` consumes both sides and returns an operation in
/// [`Lifecycle::Created`]. It must not do observable work and must not
/// signal the receiver. If staging the producer's resources fails it returns
/// [`ConnectError`] rather than a half-built operation.
pub trait Connect<R>: Sender + Sized {
    /// The operation state produced by binding.
    type Operation: OperationState;

    /// Bind this sender to `receiver`.
    fn connect(self, receiver: R) -> Result<Self::Operation, ConnectError>;
}

/// The runtime object for one logical asynchronous call.
///
/// Operation states are move-only and single-shot: they are not `Clone`,
/// `start` may be called once, and there is no reset. `start` takes
/// `&mut self`, so two concurrent starts of the same operation do not
/// type-check.
///
/// A receiver may destroy the operation state while handling its signal.
/// Implementations therefore never touch their own fields after handing
/// the signal to the receiver; delivering through [`crate::Handoff`] makes
/// this structural.
pub trait OperationState {
    /// Begin the work. Calling this twice aborts the process.
    ///
    /// The signal may be delivered before this returns or later, from
    /// whatever completes the work.
    fn start(&mut self);

    /// Identifier assigned at binding, for log correlation.
    fn id(&self) -> OperationId;

    /// Where this operation is in its lifecycle, as far as the operation
    /// itself can tell.
    fn lifecycle(&self) -> Lifecycle;
}

impl<O: OperationState + ?Sized> OperationState for Box<O> {
    fn start(&mut self) {
        (**self).start();
    }

    fn id(&self) -> OperationId {
        (**self).id()
    }

    fn lifecycle(&self) -> Lifecycle {
        (**self).lifecycle()
    }
}

/// Bind `sender` to `receiver` and start the resulting operation.
///
/// The operation is returned so the caller decides when it is dropped. For
/// senders that complete inline the receiver has already been signalled by
/// the time this returns.
pub fn connect_and_start<S, R>(sender: S, receiver: R) -> Result<S::Operation, ConnectError>
where
    S: Connect<R>,
{
    let mut op = sender.connect(receiver)?;
    op.start();
    Ok(op)
}
