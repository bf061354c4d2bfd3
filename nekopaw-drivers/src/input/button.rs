//! Debounced push button
//!
//! Samples a GPIO on every tick and turns stable edges into gestures:
//!
//! - `Click`: short press, released, no second press within the
//!   double-click window
//! - `DoubleClick`: two short presses within the window
//! - `LongPress`: held for `long_press_ms`
//! - `Release`: released after a long press

use embedded_hal::digital::InputPin;
use heapless::Deque;
use nekopaw_core::protocol::EventKind;
use nekopaw_core::tick::elapsed_ms;
use nekopaw_core::traits::{AdapterError, InputAdapter, InputInfo};

/// Gestures buffered between polls
const EVENT_BUFFER: usize = 4;

/// Button timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonConfig {
    /// Level must be stable this long to count
    pub debounce_ms: u32,
    /// Hold time for a long press
    pub long_press_ms: u32,
    /// Window for the second click; 0 reports clicks on release
    pub double_click_ms: u32,
    /// Pressed pulls the pin low (pull-up wiring)
    pub active_low: bool,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 30,
            long_press_ms: 800,
            double_click_ms: 300,
            active_low: true,
        }
    }
}

/// Push button on a GPIO input
pub struct DebouncedButton<P> {
    id: &'static str,
    pin: P,
    config: ButtonConfig,
    /// Last sampled level (true = pressed)
    raw: bool,
    raw_since_ms: u32,
    /// Debounced level (true = pressed)
    pressed: bool,
    pressed_at_ms: u32,
    long_fired: bool,
    /// Release time of a click waiting for a possible second one
    click_pending_since: Option<u32>,
    events: Deque<EventKind, EVENT_BUFFER>,
}

impl<P: InputPin> DebouncedButton<P> {
    pub fn new(id: &'static str, pin: P, config: ButtonConfig) -> Self {
        Self {
            id,
            pin,
            config,
            raw: false,
            raw_since_ms: 0,
            pressed: false,
            pressed_at_ms: 0,
            long_fired: false,
            click_pending_since: None,
            events: Deque::new(),
        }
    }

    /// Button with default timing on a pull-up input
    pub fn with_defaults(id: &'static str, pin: P) -> Self {
        Self::new(id, pin, ButtonConfig::default())
    }

    /// Debounced pressed state
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    fn push(&mut self, kind: EventKind) {
        if self.events.is_full() {
            self.events.pop_front();
        }
        let _ = self.events.push_back(kind);
    }

    fn on_press(&mut self, now_ms: u32) {
        self.pressed_at_ms = now_ms;
        self.long_fired = false;
    }

    fn on_release(&mut self, now_ms: u32) {
        if self.long_fired {
            self.push(EventKind::Release);
            return;
        }

        if self.click_pending_since.take().is_some() {
            self.push(EventKind::DoubleClick);
        } else if self.config.double_click_ms == 0 {
            self.push(EventKind::Click);
        } else {
            self.click_pending_since = Some(now_ms);
        }
    }
}

impl<P: InputPin> InputAdapter for DebouncedButton<P> {
    fn info(&self) -> InputInfo {
        InputInfo {
            id: self.id,
            kind: "button",
        }
    }

    fn tick(&mut self, now_ms: u32) -> Result<(), AdapterError> {
        let level = self.pin.is_high().map_err(|_| AdapterError::Hardware)?;
        let raw = level != self.config.active_low;

        if raw != self.raw {
            self.raw = raw;
            self.raw_since_ms = now_ms;
        }

        if self.raw != self.pressed
            && elapsed_ms(now_ms, self.raw_since_ms) >= self.config.debounce_ms
        {
            self.pressed = self.raw;
            if self.pressed {
                self.on_press(now_ms);
            } else {
                self.on_release(now_ms);
            }
        }

        if self.pressed
            && !self.long_fired
            && elapsed_ms(now_ms, self.pressed_at_ms) >= self.config.long_press_ms
        {
            self.long_fired = true;
            // A hold cancels a pending first click
            self.click_pending_since = None;
            self.push(EventKind::LongPress);
        }

        if let Some(since) = self.click_pending_since {
            if !self.pressed && elapsed_ms(now_ms, since) >= self.config.double_click_ms {
                self.click_pending_since = None;
                self.push(EventKind::Click);
            }
        }

        Ok(())
    }

    fn poll(&mut self) -> Option<EventKind> {
        self.events.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Mock GPIO input; `low` means pressed with pull-up wiring
    struct MockPin {
        low: bool,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.low)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(self.low)
        }
    }

    fn button() -> DebouncedButton<MockPin> {
        DebouncedButton::with_defaults("btn1", MockPin { low: false })
    }

    /// Hold the pin at `pressed` from `from` to `to` in 10 ms steps
    fn run(b: &mut DebouncedButton<MockPin>, pressed: bool, from: u32, to: u32) {
        b.pin.low = pressed;
        let mut t = from;
        while t < to {
            b.tick(t).unwrap();
            t += 10;
        }
    }

    #[test]
    fn test_bounce_is_ignored() {
        let mut b = button();
        // 10 ms glitches never settle
        for t in 0..10u32 {
            b.pin.low = t % 2 == 0;
            b.tick(t * 10).unwrap();
        }
        assert!(!b.is_pressed());
        run(&mut b, false, 100, 1000);
        assert_eq!(b.poll(), None);
    }

    #[test]
    fn test_single_click() {
        let mut b = button();
        run(&mut b, true, 0, 100);
        assert!(b.is_pressed());
        run(&mut b, false, 100, 300);
        // Still inside the double-click window
        assert_eq!(b.poll(), None);
        run(&mut b, false, 300, 600);
        assert_eq!(b.poll(), Some(EventKind::Click));
        assert_eq!(b.poll(), None);
    }

    #[test]
    fn test_double_click() {
        let mut b = button();
        run(&mut b, true, 0, 100);
        run(&mut b, false, 100, 200);
        run(&mut b, true, 200, 300);
        run(&mut b, false, 300, 800);
        assert_eq!(b.poll(), Some(EventKind::DoubleClick));
        assert_eq!(b.poll(), None);
    }

    #[test]
    fn test_long_press_then_release() {
        let mut b = button();
        run(&mut b, true, 0, 1000);
        assert_eq!(b.poll(), Some(EventKind::LongPress));
        assert_eq!(b.poll(), None);
        run(&mut b, false, 1000, 1500);
        assert_eq!(b.poll(), Some(EventKind::Release));
        assert_eq!(b.poll(), None);
    }

    #[test]
    fn test_immediate_click_without_window() {
        let config = ButtonConfig {
            double_click_ms: 0,
            ..ButtonConfig::default()
        };
        let mut b = DebouncedButton::new("btn", MockPin { low: false }, config);
        run(&mut b, true, 0, 100);
        run(&mut b, false, 100, 150);
        assert_eq!(b.poll(), Some(EventKind::Click));
    }

    #[test]
    fn test_active_high_wiring() {
        let config = ButtonConfig {
            active_low: false,
            ..ButtonConfig::default()
        };
        // Idle level for active-high is low
        let mut b = DebouncedButton::new("btn", MockPin { low: true }, config);
        b.tick(0).unwrap();
        b.tick(50).unwrap();
        assert!(!b.is_pressed());
        b.pin.low = false;
        b.tick(60).unwrap();
        b.tick(100).unwrap();
        assert!(b.is_pressed());
    }
}
