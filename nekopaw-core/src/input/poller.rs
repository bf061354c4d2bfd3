//! Input poller
//!
//! Each tick, every input is ticked and then polled exactly once, in
//! registration order. Events are kept in a bounded queue; when it is full
//! the oldest unread event is dropped.

use heapless::Deque;

use crate::registry::CapabilityRegistry;
use crate::tick::TickReport;
use crate::traits::InputEvent;

/// Queue length used by [`BridgeController::new`](crate::BridgeController::new)
pub const DEFAULT_EVENT_QUEUE_LEN: usize = 16;

/// Receiver for events drained by the controller after each tick
pub trait EventSink {
    fn on_event(&mut self, event: &InputEvent);
}

/// Bounded input event queue with overflow accounting
#[derive(Debug)]
pub struct InputPoller<const N: usize> {
    queue: Deque<InputEvent, N>,
    /// Events dropped since startup
    overflow_count: u32,
}

impl<const N: usize> Default for InputPoller<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> InputPoller<N> {
    pub const fn new() -> Self {
        Self {
            queue: Deque::new(),
            overflow_count: 0,
        }
    }

    /// Tick and poll every registered input
    ///
    /// A failing `tick` is recorded in `report` and the input is still
    /// polled.
    pub fn tick(&mut self, registry: &mut CapabilityRegistry<'_>, now_ms: u32, report: &mut TickReport) {
        for slot in registry.inputs_mut() {
            if let Err(error) = slot.adapter.tick(now_ms) {
                report.record_fault(slot.descriptor, error);
            }

            if let Some(kind) = slot.adapter.poll() {
                let event = InputEvent {
                    source_id: slot.descriptor.id,
                    kind,
                    timestamp_ms: now_ms,
                };
                debug!("input {}: {}", event.source_id, event.kind.as_str());
                report.events_queued = report.events_queued.saturating_add(1);
                if self.enqueue(event) {
                    report.events_dropped = report.events_dropped.saturating_add(1);
                }
            }
        }
    }

    /// Append an event, dropping the oldest one if the queue is full
    ///
    /// Returns true if an event was dropped.
    pub fn enqueue(&mut self, event: InputEvent) -> bool {
        match self.queue.push_back(event) {
            Ok(()) => false,
            Err(event) => {
                self.queue.pop_front();
                self.overflow_count = self.overflow_count.wrapping_add(1);
                warn!("event queue full, dropped oldest (total {})", self.overflow_count);
                let _ = self.queue.push_back(event);
                true
            }
        }
    }

    /// Take the oldest unread event
    pub fn next_event(&mut self) -> Option<InputEvent> {
        self.queue.pop_front()
    }

    /// Unread events
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Events dropped on overflow since startup
    pub fn overflow_count(&self) -> u32 {
        self.overflow_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::mock::MockInput;
    use nekopaw_protocol::EventKind;

    fn event(source_id: &'static str, timestamp_ms: u32) -> InputEvent {
        InputEvent {
            source_id,
            kind: EventKind::Click,
            timestamp_ms,
        }
    }

    #[test]
    fn test_overflow_keeps_newest() {
        let mut poller: InputPoller<4> = InputPoller::new();
        for t in 0..6 {
            poller.enqueue(event("btn", t));
        }
        assert_eq!(poller.overflow_count(), 2);
        assert_eq!(poller.pending(), 4);

        let stamps: std::vec::Vec<u32> =
            core::iter::from_fn(|| poller.next_event()).map(|e| e.timestamp_ms).collect();
        assert_eq!(stamps, [2, 3, 4, 5]);
        assert!(poller.next_event().is_none());
    }

    #[test]
    fn test_tick_polls_in_registration_order() {
        let mut a = MockInput::new("a").script(&[Some(EventKind::Click)]);
        let mut b = MockInput::new("b").script(&[Some(EventKind::LongPress)]);
        let mut c = MockInput::new("c").script(&[None]);

        let mut registry = CapabilityRegistry::new();
        registry.register_input(&mut a).unwrap();
        registry.register_input(&mut b).unwrap();
        registry.register_input(&mut c).unwrap();

        let mut poller: InputPoller<8> = InputPoller::new();
        let mut report = TickReport::new(100);
        poller.tick(&mut registry, 100, &mut report);
        assert_eq!(report.events_queued, 2);

        let first = poller.next_event().unwrap();
        assert_eq!((first.source_id, first.kind), ("a", EventKind::Click));
        assert_eq!(first.timestamp_ms, 100);
        assert_eq!(poller.next_event().unwrap().source_id, "b");
        assert!(poller.next_event().is_none());
    }

    #[test]
    fn test_failed_tick_still_polled() {
        let mut a = MockInput::new("a").script(&[Some(EventKind::Release)]);
        a.fail_tick = true;
        let mut b = MockInput::new("b").script(&[Some(EventKind::Click)]);

        let mut poller: InputPoller<4> = InputPoller::new();
        let mut report = TickReport::new(0);
        {
            let mut registry = CapabilityRegistry::new();
            registry.register_input(&mut a).unwrap();
            registry.register_input(&mut b).unwrap();
            poller.tick(&mut registry, 0, &mut report);
        }

        assert_eq!(report.fault_count(), 1);
        assert_eq!(report.faults[0].source.id, "a");
        assert_eq!(poller.pending(), 2);
        assert_eq!(a.polls, 1);
        assert_eq!(b.ticks, 1);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn drains_in_source_order(ticks in 1usize..6, drains in proptest::collection::vec(0usize..4, 6)) {
                let clicks = [Some(EventKind::Click); 8];
                let mut a = MockInput::new("a").script(&clicks[..ticks]);
                let mut b = MockInput::new("b").script(&clicks[..ticks]);
                let mut c = MockInput::new("c").script(&clicks[..ticks]);
                let mut registry = CapabilityRegistry::new();
                registry.register_input(&mut a).unwrap();
                registry.register_input(&mut b).unwrap();
                registry.register_input(&mut c).unwrap();

                let mut poller: InputPoller<32> = InputPoller::new();
                let mut drained = std::vec::Vec::new();
                for t in 0..ticks {
                    let mut report = TickReport::new(t as u32);
                    poller.tick(&mut registry, t as u32, &mut report);
                    // Interleave a random number of reads with ticks
                    for _ in 0..drains[t] {
                        if let Some(e) = poller.next_event() {
                            drained.push(e.source_id);
                        }
                    }
                }
                while let Some(e) = poller.next_event() {
                    drained.push(e.source_id);
                }

                prop_assert_eq!(drained.len(), ticks * 3);
                for chunk in drained.chunks(3) {
                    prop_assert_eq!(chunk, &["a", "b", "c"][..]);
                }
            }

            #[test]
            fn overflow_accounting(capacity_fill in 0usize..20) {
                let mut poller: InputPoller<4> = InputPoller::new();
                for t in 0..capacity_fill {
                    poller.enqueue(event("x", t as u32));
                }
                let expected_dropped = capacity_fill.saturating_sub(4);
                prop_assert_eq!(poller.overflow_count() as usize, expected_dropped);
                prop_assert_eq!(poller.pending(), capacity_fill.min(4));
                if let Some(first) = poller.next_event() {
                    prop_assert_eq!(first.timestamp_ms as usize, expected_dropped);
                }
            }
        }
    }
}
