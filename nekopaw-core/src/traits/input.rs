//! Input adapter trait

use nekopaw_protocol::EventKind;

use super::AdapterError;

/// Input metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputInfo {
    pub id: &'static str,
    /// Input kind, e.g. `"button"`
    pub kind: &'static str,
}

/// An input event stamped by the poller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputEvent {
    pub source_id: &'static str,
    pub kind: EventKind,
    pub timestamp_ms: u32,
}

/// Trait for inputs (buttons, switches, encoders)
pub trait InputAdapter {
    fn info(&self) -> InputInfo;

    /// Sample hardware and advance debounce/gesture timers
    fn tick(&mut self, now_ms: u32) -> Result<(), AdapterError>;

    /// Take the next detected event, if any
    fn poll(&mut self) -> Option<EventKind>;
}
