//! A sender completed later by an external one-shot trigger.
//!
//! [`deferred`] returns a sender and a [`Trigger`]. The trigger may fire
//! before or after the operation starts, from any thread. Either way the
//! receiver is signalled exactly once and never before `start`.
//!
//! Ordering guarantees:
//!
//! - The shared slot's lock is released before the receiver is called.
//! - The trigger drops its reference to the slot before the receiver is
//!   called, so a receiver that drops the operation releases the slot
//!   while it is still running.
//! - A trigger dropped without firing completes the operation with stopped.
//!   Dropped before binding, it makes binding fail instead.

use baton::{
    Completion, Connect, ConnectError, Handoff, Lifecycle, OperationId, OperationState, Receiver,
    Sender, Signal,
};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError, Weak};

type Waiter<V, E> = Box<dyn FnOnce(Signal<V, E>) + Send>;

struct Slot<V, E> {
    lifecycle: Lifecycle,
    /// Fired (or abandoned) before start.
    early: Option<Signal<V, E>>,
    /// Started, waiting for the trigger.
    waiter: Option<Waiter<V, E>>,
    abandoned: bool,
}

type Shared<V, E> = Arc<Mutex<Slot<V, E>>>;

fn lock<V, E>(shared: &Mutex<Slot<V, E>>) -> MutexGuard<'_, Slot<V, E>> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<V, E> Slot<V, E> {
    fn advance(&mut self, next: Lifecycle) {
        debug_assert!(
            self.lifecycle.can_advance_to(next),
            "illegal transition {} -> {next}",
            self.lifecycle
        );
        self.lifecycle = next;
    }
}

/// Sender half of [`deferred`].
pub struct Deferred<V, E> {
    shared: Shared<V, E>,
}

/// One-shot completion source for a [`Deferred`] operation.
pub struct Trigger<V, E> {
    shared: Option<Shared<V, E>>,
}

/// Create a connected sender/trigger pair.
pub fn deferred<V, E>() -> (Deferred<V, E>, Trigger<V, E>) {
    let shared = Arc::new(Mutex::new(Slot {
        lifecycle: Lifecycle::Created,
        early: None,
        waiter: None,
        abandoned: false,
    }));
    (
        Deferred {
            shared: Arc::clone(&shared),
        },
        Trigger {
            shared: Some(shared),
        },
    )
}

impl<V, E> Sender for Deferred<V, E> {
    type Value = V;
    type Error = E;
    const SENDS_STOPPED: bool = true;
}

impl<V, E, R> Connect<R> for Deferred<V, E>
where
    R: Receiver<V, E> + Send + 'static,
    V: Send + 'static,
    E: Send + 'static,
{
    type Operation = DeferredOperation<R, V, E>;

    fn connect(self, receiver: R) -> Result<Self::Operation, ConnectError> {
        if lock(&self.shared).abandoned {
            return Err(ConnectError::Detached(
                "trigger dropped before binding".to_string(),
            ));
        }
        Ok(DeferredOperation {
            shared: self.shared,
            completion: Completion::new(receiver),
        })
    }
}

/// Operation state for [`Deferred`].
pub struct DeferredOperation<R, V, E> {
    shared: Shared<V, E>,
    completion: Completion<R, V, E>,
}

impl<R, V, E> DeferredOperation<R, V, E> {
    /// A weak observer of this operation's shared slot.
    pub fn watch(&self) -> Watch<V, E> {
        Watch {
            slot: Arc::downgrade(&self.shared),
        }
    }
}

impl<R, V, E> OperationState for DeferredOperation<R, V, E>
where
    R: Receiver<V, E> + Send + 'static,
    V: Send + 'static,
    E: Send + 'static,
{
    fn start(&mut self) {
        let handoff = self.completion.start();
        let mut slot = lock(&self.shared);
        match slot.early.take() {
            Some(signal) => {
                slot.advance(Lifecycle::Started);
                slot.advance(Lifecycle::Completed);
                drop(slot);
                tracing::debug!(op = %handoff.id(), "baton.deferred.early_signal");
                handoff.deliver(signal);
            }
            None => {
                slot.advance(Lifecycle::Started);
                slot.waiter = Some(park(handoff));
            }
        }
    }

    fn id(&self) -> OperationId {
        self.completion.id()
    }

    fn lifecycle(&self) -> Lifecycle {
        lock(&self.shared).lifecycle
    }
}

impl<R, V, E> Drop for DeferredOperation<R, V, E> {
    fn drop(&mut self) {
        // The parked handoff stays in the slot and the trigger still
        // delivers to the receiver, but whoever owned this operation has
        // stopped waiting for it.
        if lock(&self.shared).waiter.is_some() {
            tracing::warn!(op = %self.completion.id(), "baton.deferred.dropped_while_started");
        }
    }
}

fn park<R, V, E>(handoff: Handoff<R, V, E>) -> Waiter<V, E>
where
    R: Receiver<V, E> + Send + 'static,
    V: Send + 'static,
    E: Send + 'static,
{
    Box::new(move |signal| handoff.deliver(signal))
}

impl<V, E> Trigger<V, E> {
    /// Complete the operation with `signal`.
    pub fn fire(mut self, signal: Signal<V, E>) {
        if let Some(shared) = self.shared.take() {
            release(shared, signal, false);
        }
    }

    /// Complete the operation with a value.
    pub fn set_value(self, value: impl Into<V>) {
        self.fire(Signal::Value(value.into()));
    }

    /// Complete the operation with an error.
    pub fn set_error(self, error: impl Into<E>) {
        self.fire(Signal::Error(error.into()));
    }

    /// Complete the operation with stopped.
    pub fn set_stopped(self) {
        self.fire(Signal::Stopped);
    }
}

impl<V, E> Drop for Trigger<V, E> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.take() {
            release(shared, Signal::Stopped, true);
        }
    }
}

/// Hand `signal` to a parked waiter, or stash it for `start`.
///
/// Consumes the trigger's reference so nothing in this frame still points at
/// the slot when the receiver runs.
fn release<V, E>(shared: Shared<V, E>, signal: Signal<V, E>, abandoned: bool) {
    let mut slot = lock(&shared);
    let Some(waiter) = slot.waiter.take() else {
        slot.early = Some(signal);
        slot.abandoned = abandoned;
        return;
    };
    slot.advance(Lifecycle::Completed);
    drop(slot);
    drop(shared);

    if abandoned {
        tracing::debug!("baton.deferred.trigger_dropped");
    }
    waiter(signal);
}

/// Weak observer of a [`DeferredOperation`]'s shared slot.
///
/// Holding a watch keeps nothing alive.
pub struct Watch<V, E> {
    slot: Weak<Mutex<Slot<V, E>>>,
}

impl<V, E> Watch<V, E> {
    /// Whether every owner of the slot (operation and trigger) is gone.
    pub fn is_released(&self) -> bool {
        self.slot.strong_count() == 0
    }

    /// The operation's lifecycle, if the slot is alive and not locked by
    /// someone else right now.
    pub fn lifecycle(&self) -> Option<Lifecycle> {
        let slot = self.slot.upgrade()?;
        let lifecycle = match slot.try_lock() {
            Ok(guard) => Some(guard.lifecycle),
            Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner().lifecycle),
            Err(TryLockError::WouldBlock) => None,
        };
        lifecycle
    }
}

impl<V, E> fmt::Debug for Deferred<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred").finish_non_exhaustive()
    }
}

impl<V, E> fmt::Debug for Trigger<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("fired", &self.shared.is_none())
            .finish()
    }
}

impl<R, V, E> fmt::Debug for DeferredOperation<R, V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredOperation")
            .field("completion", &self.completion)
            .finish_non_exhaustive()
    }
}

impl<V, E> fmt::Debug for Watch<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watch")
            .field("released", &self.is_released())
            .finish()
    }
}
