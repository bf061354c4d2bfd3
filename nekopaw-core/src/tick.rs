//! Tick bookkeeping
//!
//! One [`TickReport`] is produced per controller tick. Adapter failures are
//! collected here instead of aborting the tick.

use heapless::Vec;

use crate::display::DisplayExpiry;
use crate::registry::CapabilityDescriptor;
use crate::traits::AdapterError;

/// Faults kept per report; further faults are only counted
pub const MAX_TICK_FAULTS: usize = 32;

/// Longest span `deadline_reached` can look ahead
///
/// Deadlines further out than this would wrap into the past.
pub const MAX_SPAN_MS: u32 = i32::MAX as u32;

/// Milliseconds from `since` to `now`, wrap-safe
///
/// Returns 0 if `since` lies in the future.
pub fn elapsed_ms(now_ms: u32, since_ms: u32) -> u32 {
    let delta = now_ms.wrapping_sub(since_ms);
    if (delta as i32) < 0 {
        0
    } else {
        delta
    }
}

/// Returns true once `now` has reached `deadline`, wrap-safe
pub fn deadline_reached(now_ms: u32, deadline_ms: u32) -> bool {
    (now_ms.wrapping_sub(deadline_ms) as i32) >= 0
}

/// An adapter failure isolated during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickFault {
    pub source: CapabilityDescriptor,
    pub error: AdapterError,
}

/// Outcome of one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub now_ms: u32,
    /// Events polled from inputs this tick
    pub events_queued: u16,
    /// Events handed to the event sink this tick
    pub events_delivered: u16,
    /// Unread events dropped on queue overflow this tick
    pub events_dropped: u16,
    /// Isolated adapter failures in tick order
    pub faults: Vec<TickFault, MAX_TICK_FAULTS>,
    /// Faults beyond [`MAX_TICK_FAULTS`]
    pub faults_dropped: u16,
    /// Display content or confirmation that expired this tick
    pub display_expired: Option<DisplayExpiry>,
}

impl TickReport {
    pub fn new(now_ms: u32) -> Self {
        Self {
            now_ms,
            events_queued: 0,
            events_delivered: 0,
            events_dropped: 0,
            faults: Vec::new(),
            faults_dropped: 0,
            display_expired: None,
        }
    }

    /// Record an adapter failure
    pub fn record_fault(&mut self, source: CapabilityDescriptor, error: AdapterError) {
        if self.faults.push(TickFault { source, error }).is_err() {
            self.faults_dropped = self.faults_dropped.saturating_add(1);
        }
    }

    /// Total faults, including those not kept
    pub fn fault_count(&self) -> usize {
        self.faults.len() + usize::from(self.faults_dropped)
    }

    /// Returns true if no adapter failed
    pub fn is_clean(&self) -> bool {
        self.fault_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nekopaw_protocol::Category;

    #[test]
    fn test_elapsed_wraps() {
        assert_eq!(elapsed_ms(1500, 1000), 500);
        assert_eq!(elapsed_ms(10, u32::MAX - 9), 20);
        // Sample stamped after `now`
        assert_eq!(elapsed_ms(1000, 1500), 0);
    }

    #[test]
    fn test_deadline_wraps() {
        assert!(deadline_reached(1000, 1000));
        assert!(!deadline_reached(999, 1000));
        assert!(deadline_reached(5, u32::MAX - 5));
        assert!(!deadline_reached(u32::MAX - 5, 5));
    }

    #[test]
    fn test_fault_overflow_counted() {
        let source = CapabilityDescriptor::new("led", Category::Output, "led");
        let mut report = TickReport::new(0);
        for _ in 0..MAX_TICK_FAULTS + 3 {
            report.record_fault(source, AdapterError::Hardware);
        }
        assert_eq!(report.faults.len(), MAX_TICK_FAULTS);
        assert_eq!(report.fault_count(), MAX_TICK_FAULTS + 3);
        assert!(!report.is_clean());
    }
}
