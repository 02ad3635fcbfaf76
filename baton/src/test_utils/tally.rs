//! DropTally — counts payload drops to catch leaks and double drops.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
struct Counts {
    issued: AtomicUsize,
    dropped: AtomicUsize,
}

/// Issues [`DropToken`]s and counts how many have been dropped.
#[derive(Debug, Clone, Default)]
pub struct DropTally {
    counts: Arc<Counts>,
}

/// A payload that reports its own drop to the [`DropTally`] it came from.
#[derive(Debug)]
pub struct DropToken {
    counts: Arc<Counts>,
    /// Caller-chosen tag, handy for asserting which token arrived.
    pub tag: u64,
}

impl DropTally {
    /// Create an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a token carrying `tag`.
    pub fn token(&self, tag: u64) -> DropToken {
        self.counts.issued.fetch_add(1, Ordering::SeqCst);
        DropToken {
            counts: Arc::clone(&self.counts),
            tag,
        }
    }

    /// Tokens issued so far.
    pub fn issued(&self) -> usize {
        self.counts.issued.load(Ordering::SeqCst)
    }

    /// Tokens dropped so far.
    pub fn dropped(&self) -> usize {
        self.counts.dropped.load(Ordering::SeqCst)
    }

    /// Tokens issued but not yet dropped.
    pub fn live(&self) -> usize {
        self.issued() - self.dropped()
    }
}

impl Drop for DropToken {
    fn drop(&mut self) {
        self.counts.dropped.fetch_add(1, Ordering::SeqCst);
    }
}
