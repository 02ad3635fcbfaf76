//! PanickingReceiver — panics on whatever it is handed.

use crate::receiver::Receiver;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A receiver whose every method panics after noting it was called.
///
/// Used to check that a producer's boundary keeps the panic out of the
/// producer's frame.
#[derive(Debug, Clone, Default)]
pub struct PanickingReceiver {
    invoked: Arc<AtomicBool>,
}

impl PanickingReceiver {
    /// Create a new panicking receiver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any method was invoked on this receiver or a clone of it.
    pub fn was_invoked(&self) -> bool {
        self.invoked.load(Ordering::SeqCst)
    }

    fn explode(&self, what: &str) -> ! {
        self.invoked.store(true, Ordering::SeqCst);
        panic!("PanickingReceiver: {what}");
    }
}

impl<V, E> Receiver<V, E> for PanickingReceiver {
    fn set_value(self, _value: V) {
        self.explode("set_value");
    }

    fn set_error(self, _error: E) {
        self.explode("set_error");
    }

    fn set_stopped(self) {
        self.explode("set_stopped");
    }
}
