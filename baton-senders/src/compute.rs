//! A sender that runs a fallible closure when started.

use baton::{
    BlockingKind, Completion, Connect, ConnectError, Lifecycle, OperationId, OperationState,
    Receiver, Sender,
};
use std::fmt;
use std::marker::PhantomData;

/// Runs `work` inside `start` and sends its `Ok` as a value or its `Err`
/// as an error.
///
/// The closure runs after the operation has started and before the receiver
/// is called. How it fails internally is its own business; only the
/// returned `Result` crosses the boundary. A panic in the closure aborts,
/// because a started operation that unwinds would leave its receiver
/// unsignalled.
pub struct Compute<F, V, E> {
    work: F,
    _channels: PhantomData<fn() -> (V, E)>,
}

/// Create a [`Compute`] sender.
pub fn compute<F, V, E>(work: F) -> Compute<F, V, E>
where
    F: FnOnce() -> Result<V, E>,
{
    Compute {
        work,
        _channels: PhantomData,
    }
}

impl<F, V, E> Sender for Compute<F, V, E>
where
    F: FnOnce() -> Result<V, E>,
{
    type Value = V;
    type Error = E;
    const SENDS_STOPPED: bool = false;

    fn blocking(&self) -> BlockingKind {
        BlockingKind::AlwaysInline
    }
}

impl<F, V, E, R> Connect<R> for Compute<F, V, E>
where
    F: FnOnce() -> Result<V, E>,
    R: Receiver<V, E>,
{
    type Operation = ComputeOperation<R, F, V, E>;

    fn connect(self, receiver: R) -> Result<Self::Operation, ConnectError> {
        Ok(ComputeOperation {
            completion: Completion::new(receiver),
            work: Some(self.work),
        })
    }
}

/// Operation state for [`Compute`].
pub struct ComputeOperation<R, F, V, E> {
    completion: Completion<R, V, E>,
    work: Option<F>,
}

impl<R, F, V, E> OperationState for ComputeOperation<R, F, V, E>
where
    F: FnOnce() -> Result<V, E>,
    R: Receiver<V, E>,
{
    fn start(&mut self) {
        let handoff = self.completion.start();
        // Completion::start aborts on reuse, so the work is still here.
        let Some(work) = self.work.take() else {
            return;
        };
        let outcome = work();
        tracing::trace!(op = %handoff.id(), ok = outcome.is_ok(), "baton.compute.finished");
        handoff.deliver(outcome.into());
    }

    fn id(&self) -> OperationId {
        self.completion.id()
    }

    fn lifecycle(&self) -> Lifecycle {
        match self.completion.lifecycle() {
            Lifecycle::Started => Lifecycle::Completed,
            other => other,
        }
    }
}

impl<R, F, V, E> fmt::Debug for ComputeOperation<R, F, V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputeOperation")
            .field("completion", &self.completion)
            .finish_non_exhaustive()
    }
}
