//! Senders that complete inline with a signal fixed at construction.

use baton::{
    BlockingKind, Completion, Connect, ConnectError, Lifecycle, OperationId, OperationState,
    Receiver, Sender, Signal,
};
use std::convert::Infallible;
use std::fmt;
use std::marker::PhantomData;

/// Sends `value`. Never fails, never stops.
pub struct Just<V, E = Infallible> {
    value: V,
    _error: PhantomData<fn() -> E>,
}

/// Sends `error`. The value channel exists only to fit the receiver.
pub struct JustError<E, V = ()> {
    error: E,
    _value: PhantomData<fn() -> V>,
}

/// Sends stopped.
pub struct JustStopped<V = (), E = Infallible> {
    _channels: PhantomData<fn() -> (V, E)>,
}

/// Sends an empty value or stopped, chosen at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JustVoidOrStopped {
    is_void: bool,
}

/// Create a [`Just`].
pub fn just<V>(value: V) -> Just<V> {
    Just::new(value)
}

/// Create a [`JustError`].
pub fn just_error<E>(error: E) -> JustError<E> {
    JustError::new(error)
}

/// Create a [`JustStopped`].
pub fn just_stopped() -> JustStopped {
    JustStopped::new()
}

/// Create a [`JustVoidOrStopped`]: `true` sends `()`, `false` sends stopped.
pub fn just_void_or_stopped(is_void: bool) -> JustVoidOrStopped {
    JustVoidOrStopped { is_void }
}

impl<V, E> Just<V, E> {
    /// Send `value`, declaring error channel `E` for receiver compatibility.
    pub fn new(value: V) -> Self {
        Self {
            value,
            _error: PhantomData,
        }
    }
}

impl<E, V> JustError<E, V> {
    /// Send `error`, declaring value channel `V` for receiver compatibility.
    pub fn new(error: E) -> Self {
        Self {
            error,
            _value: PhantomData,
        }
    }
}

impl<V, E> JustStopped<V, E> {
    /// Send stopped, declaring channels `V` and `E`.
    pub fn new() -> Self {
        Self {
            _channels: PhantomData,
        }
    }
}

impl<V, E> Default for JustStopped<V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E> Sender for Just<V, E> {
    type Value = V;
    type Error = E;
    const SENDS_ERROR: bool = false;
    const SENDS_STOPPED: bool = false;

    fn blocking(&self) -> BlockingKind {
        BlockingKind::AlwaysInline
    }
}

impl<E, V> Sender for JustError<E, V> {
    type Value = V;
    type Error = E;
    const SENDS_STOPPED: bool = false;

    fn blocking(&self) -> BlockingKind {
        BlockingKind::AlwaysInline
    }
}

impl<V, E> Sender for JustStopped<V, E> {
    type Value = V;
    type Error = E;
    const SENDS_ERROR: bool = false;
    const SENDS_STOPPED: bool = true;

    fn blocking(&self) -> BlockingKind {
        BlockingKind::AlwaysInline
    }
}

impl Sender for JustVoidOrStopped {
    type Value = ();
    type Error = Infallible;
    const SENDS_ERROR: bool = false;
    const SENDS_STOPPED: bool = true;

    fn blocking(&self) -> BlockingKind {
        BlockingKind::AlwaysInline
    }
}

impl<V, E, R: Receiver<V, E>> Connect<R> for Just<V, E> {
    type Operation = JustOperation<R, V, E>;

    fn connect(self, receiver: R) -> Result<Self::Operation, ConnectError> {
        Ok(JustOperation::new(receiver, Signal::Value(self.value)))
    }
}

impl<E, V, R: Receiver<V, E>> Connect<R> for JustError<E, V> {
    type Operation = JustOperation<R, V, E>;

    fn connect(self, receiver: R) -> Result<Self::Operation, ConnectError> {
        Ok(JustOperation::new(receiver, Signal::Error(self.error)))
    }
}

impl<V, E, R: Receiver<V, E>> Connect<R> for JustStopped<V, E> {
    type Operation = JustOperation<R, V, E>;

    fn connect(self, receiver: R) -> Result<Self::Operation, ConnectError> {
        Ok(JustOperation::new(receiver, Signal::Stopped))
    }
}

impl<R: Receiver<(), Infallible>> Connect<R> for JustVoidOrStopped {
    type Operation = JustOperation<R, (), Infallible>;

    fn connect(self, receiver: R) -> Result<Self::Operation, ConnectError> {
        let signal = if self.is_void {
            Signal::Value(())
        } else {
            Signal::Stopped
        };
        Ok(JustOperation::new(receiver, signal))
    }
}

/// Operation state shared by the `just*` senders: a receiver and the one
/// signal staged for it.
pub struct JustOperation<R, V, E> {
    completion: Completion<R, V, E>,
    staged: Option<Signal<V, E>>,
}

impl<R, V, E> JustOperation<R, V, E> {
    fn new(receiver: R, signal: Signal<V, E>) -> Self {
        Self {
            completion: Completion::new(receiver),
            staged: Some(signal),
        }
    }
}

impl<R: Receiver<V, E>, V, E> OperationState for JustOperation<R, V, E> {
    fn start(&mut self) {
        let handoff = self.completion.start();
        // Completion::start aborts on reuse, so the signal is still staged.
        if let Some(signal) = self.staged.take() {
            handoff.deliver(signal);
        }
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

impl<R, V, E> fmt::Debug for JustOperation<R, V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JustOperation")
            .field("completion", &self.completion)
            .field("staged", &self.staged.as_ref().map(Signal::kind))
            .finish()
    }
}
