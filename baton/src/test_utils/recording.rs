//! RecordingReceiver — remembers every signal it is handed.

use crate::receiver::Receiver;
use crate::signal::{Signal, SignalKind};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

type Hook = Box<dyn FnOnce(SignalKind) + Send>;

/// A receiver that records the signal it receives into a shared
/// [`Recording`].
///
/// An optional hook runs inside the handler after the signal is recorded,
/// which lets a test act from within delivery, e.g. drop the operation
/// state that is delivering.
pub struct RecordingReceiver<V, E> {
    log: Arc<Mutex<Vec<Signal<V, E>>>>,
    hook: Option<Hook>,
}

/// Read side of a [`RecordingReceiver`].
pub struct Recording<V, E> {
    log: Arc<Mutex<Vec<Signal<V, E>>>>,
}

/// Create a connected receiver/recording pair.
pub fn recorder<V, E>() -> (RecordingReceiver<V, E>, Recording<V, E>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    (
        RecordingReceiver {
            log: Arc::clone(&log),
            hook: None,
        },
        Recording { log },
    )
}

impl<V, E> RecordingReceiver<V, E> {
    /// Run `hook` inside the handler, after the signal has been recorded.
    pub fn with_hook(mut self, hook: impl FnOnce(SignalKind) + Send + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    fn record(self, signal: Signal<V, E>) {
        let kind = signal.kind();
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(signal);
        if let Some(hook) = self.hook {
            hook(kind);
        }
    }
}

impl<V, E> Receiver<V, E> for RecordingReceiver<V, E> {
    fn set_value(self, value: V) {
        self.record(Signal::Value(value));
    }

    fn set_error(self, error: E) {
        self.record(Signal::Error(error));
    }

    fn set_stopped(self) {
        self.record(Signal::Stopped);
    }
}

impl<V, E> fmt::Debug for RecordingReceiver<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingReceiver")
            .field("hooked", &self.hook.is_some())
            .finish()
    }
}

impl<V, E> Recording<V, E> {
    /// Kinds of every signal received, in order.
    pub fn kinds(&self) -> Vec<SignalKind> {
        self.lock().iter().map(Signal::kind).collect()
    }

    /// Number of signals received.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been received.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove and return the only signal received.
    ///
    /// # Panics
    ///
    /// Panics unless exactly one signal was received.
    pub fn take_single(&self) -> Signal<V, E> {
        let mut log = self.lock();
        assert_eq!(
            log.len(),
            1,
            "expected exactly one signal, got {:?}",
            log.iter().map(Signal::kind).collect::<Vec<_>>()
        );
        log.remove(0)
    }

    /// Whether the receiver end has been dropped, i.e. it was either
    /// signalled or discarded.
    pub fn receiver_released(&self) -> bool {
        Arc::strong_count(&self.log) == 1
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Signal<V, E>>> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V, E> fmt::Debug for Recording<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recording")
            .field("kinds", &self.kinds())
            .finish()
    }
}
