//! Receivers and probes for testing protocol implementations.
//!
//! Available behind the `test-utils` feature flag. These are minimal
//! test doubles for asserting what a sender delivered, and when.

mod panicking;
mod recording;
mod tally;

pub use panicking::PanickingReceiver;
pub use recording::{Recording, RecordingReceiver, recorder};
pub use tally::{DropTally, DropToken};
