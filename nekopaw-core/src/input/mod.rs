//! Input polling
//!
//! Turns adapter polls into a bounded FIFO of stamped events.

pub mod poller;

pub use poller::{EventSink, InputPoller, DEFAULT_EVENT_QUEUE_LEN};
