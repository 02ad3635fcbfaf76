//! Operation identifiers for log correlation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier assigned to an operation at binding time.
///
/// Carries no protocol meaning. It exists so `connect`, `start` and the
/// eventual delivery of one operation can be tied together in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(u64);

impl OperationId {
    /// Allocate the next id.
    pub fn next() -> Self {
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let a = OperationId::next();
        let b = OperationId::next();
        assert!(b > a);
        assert_ne!(a, b);
    }

    #[test]
    fn display_prefixes_op() {
        let id = OperationId::next();
        assert_eq!(id.to_string(), format!("op#{}", id.get()));
    }
}
