//! The Receiver protocol — the consumer side of a completion.

use std::fmt;
use std::marker::PhantomData;

/// A consumer of exactly one completion signal.
///
/// Every method takes `self` by value. Once a receiver has been handed a
/// signal it no longer exists, so it cannot be handed a second one.
///
/// The producer picks `V` and `E`. There is no universal error type: a
/// producer that cannot fail declares `E = std::convert::Infallible`, and a
/// receiver for it writes `fn set_error(self, e: Infallible) { match e {} }`.
///
/// Receiver methods run inside the producer's containment boundary. A panic
/// here never reaches the producer; see [`crate::BoundaryPolicy`] for what
/// happens instead. A receiver may destroy the operation state it came from
/// while handling the signal.
pub trait Receiver<V, E> {
    /// The producer finished with a value.
    fn set_value(self, value: V);

    /// The producer failed.
    fn set_error(self, error: E);

    /// The producer finished with neither a value nor an error.
    fn set_stopped(self);
}

/// Receiver adapter that converts the error payload before forwarding.
///
/// Normalizing errors across producers is an explicit step at the edge of
/// the consumer, never an implicit common base type. Values and stopped
/// pass straight through.
///
/// ```
/// use baton::{MapError, Receiver};
///
/// #[derive(Debug, PartialEq)]
/// enum AppError { Io(String) }
///
/// struct Sink(Option<Result<u32, AppError>>);
/// impl Receiver<u32, AppError> for &mut Sink {
///     fn set_value(self, v: u32) { self.0 = Some(Ok(v)); }
///     fn set_error(self, e: AppError) { self.0 = Some(Err(e)); }
///     fn set_stopped(self) { self.0 = None; }
/// }
///
/// let mut sink = Sink(None);
/// let adapted = MapError::new(&mut sink, |e: std::io::Error| AppError::Io(e.to_string()));
/// Receiver::<u32, std::io::Error>::set_error(adapted, std::io::Error::other("disk"));
/// assert_eq!(sink.0, Some(Err(AppError::Io("disk".into()))));
/// ```
pub struct MapError<R, F, E2> {
    inner: R,
    map: F,
    _target: PhantomData<fn() -> E2>,
}

impl<R, F, E2> MapError<R, F, E2> {
    /// Wrap `inner`, converting errors with `map` on the way through.
    pub fn new(inner: R, map: F) -> Self {
        Self {
            inner,
            map,
            _target: PhantomData,
        }
    }

    /// Unwrap the inner receiver.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<V, E, E2, R, F> Receiver<V, E> for MapError<R, F, E2>
where
    R: Receiver<V, E2>,
    F: FnOnce(E) -> E2,
{
    fn set_value(self, value: V) {
        self.inner.set_value(value);
    }

    fn set_error(self, error: E) {
        self.inner.set_error((self.map)(error));
    }

    fn set_stopped(self) {
        self.inner.set_stopped();
    }
}

impl<R: fmt::Debug, F, E2> fmt::Debug for MapError<R, F, E2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapError")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Signal;
    use std::cell::RefCell;

    #[derive(Debug, PartialEq)]
    enum Unified {
        Parse(String),
        Timeout,
    }

    struct Capture<'a>(&'a RefCell<Vec<Signal<u16, Unified>>>);

    impl Receiver<u16, Unified> for Capture<'_> {
        fn set_value(self, value: u16) {
            self.0.borrow_mut().push(Signal::Value(value));
        }
        fn set_error(self, error: Unified) {
            self.0.borrow_mut().push(Signal::Error(error));
        }
        fn set_stopped(self) {
            self.0.borrow_mut().push(Signal::Stopped);
        }
    }

    #[test]
    fn merges_two_error_shapes_explicitly() {
        let seen = RefCell::new(Vec::new());

        let from_parse = MapError::new(Capture(&seen), |e: std::num::ParseIntError| {
            Unified::Parse(e.to_string())
        });
        let parse_err = "x".parse::<u16>().unwrap_err();
        Receiver::<u16, _>::set_error(from_parse, parse_err);

        let from_timer = MapError::new(Capture(&seen), |_: ()| Unified::Timeout);
        Receiver::<u16, ()>::set_error(from_timer, ());

        let seen = seen.into_inner();
        assert_eq!(seen.len(), 2);
        assert!(matches!(&seen[0], Signal::Error(Unified::Parse(_))));
        assert_eq!(seen[1], Signal::Error(Unified::Timeout));
    }

    #[test]
    fn value_and_stopped_pass_through() {
        let seen = RefCell::new(Vec::new());

        let r = MapError::new(Capture(&seen), |_: ()| Unified::Timeout);
        Receiver::<u16, ()>::set_value(r, 9);
        let r = MapError::new(Capture(&seen), |_: ()| Unified::Timeout);
        Receiver::<u16, ()>::set_stopped(r);

        assert_eq!(seen.into_inner(), vec![Signal::Value(9), Signal::Stopped]);
    }
}
