//! GPIO output
//!
//! Drives an LED, buzzer or relay from a single pin, directly or via a
//! transistor. Supported actions:
//!
//! ```text
//! {"action":"on", "duration":3000}       on, optionally auto-off after ms
//! {"action":"off"}
//! {"action":"toggle"}
//! {"action":"blink", "interval":250, "count":3}
//! {"action":"beep", "duration":100, "count":2}
//! ```
//!
//! Timed effects are advanced by `tick`, so they keep running without new
//! commands.

use embedded_hal::digital::OutputPin;
use nekopaw_core::tick::{deadline_reached, MAX_SPAN_MS};
use nekopaw_core::traits::{AdapterError, OutputAdapter, OutputCommand, OutputInfo};

/// Upper bound on pulses per command
pub const MAX_PULSES: u64 = 1000;

const DEFAULT_BLINK_INTERVAL_MS: u64 = 250;
const DEFAULT_BLINK_COUNT: u64 = 3;
const DEFAULT_BEEP_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Steady,
    /// Turn off at the deadline
    Timed { off_at_ms: u32 },
    /// Toggle every `period_ms` until `edges_left` reaches zero
    Pulse {
        period_ms: u32,
        edges_left: u32,
        next_at_ms: u32,
    },
}

/// Output on a GPIO pin
pub struct GpioOutput<P> {
    id: &'static str,
    kind: &'static str,
    pin: P,
    /// If true, output ON = pin LOW
    inverted: bool,
    /// Current logical state (true = on)
    on: bool,
    mode: Mode,
}

impl<P: OutputPin> GpioOutput<P> {
    /// Create a new GPIO output, initially off
    ///
    /// - `kind`: reported type, e.g. `"led"`, `"buzzer"` or `"relay"`
    /// - `inverted`: output is ON when the pin is LOW
    pub fn new(
        id: &'static str,
        kind: &'static str,
        pin: P,
        inverted: bool,
    ) -> Result<Self, AdapterError> {
        let mut output = Self {
            id,
            kind,
            pin,
            inverted,
            on: false,
            mode: Mode::Steady,
        };
        output.set_on(false)?;
        Ok(output)
    }

    /// Active-high LED
    pub fn led(id: &'static str, pin: P) -> Result<Self, AdapterError> {
        Self::new(id, "led", pin, false)
    }

    /// Active-high buzzer
    pub fn buzzer(id: &'static str, pin: P) -> Result<Self, AdapterError> {
        Self::new(id, "buzzer", pin, false)
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Returns true while a timed or pulsed effect is running
    pub fn is_animating(&self) -> bool {
        self.mode != Mode::Steady
    }

    fn set_on(&mut self, on: bool) -> Result<(), AdapterError> {
        // Normal: on -> high. Inverted: on -> low
        let result = if on != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.map_err(|_| AdapterError::Hardware)?;
        self.on = on;
        Ok(())
    }

    fn start_pulses(&mut self, period: u64, count: u64, now_ms: u32) -> Result<(), AdapterError> {
        if period == 0 || period > u64::from(MAX_SPAN_MS) || count == 0 || count > MAX_PULSES {
            return Err(AdapterError::InvalidCommand);
        }
        let period_ms = period as u32;
        self.set_on(true)?;
        // On edge already done; each pulse needs an off edge, all but the last an on edge
        self.mode = Mode::Pulse {
            period_ms,
            edges_left: (count * 2 - 1) as u32,
            next_at_ms: now_ms.wrapping_add(period_ms),
        };
        Ok(())
    }
}

impl<P: OutputPin> OutputAdapter for GpioOutput<P> {
    fn info(&self) -> OutputInfo {
        OutputInfo {
            id: self.id,
            kind: self.kind,
        }
    }

    fn execute(&mut self, command: &OutputCommand) -> Result<(), AdapterError> {
        let now_ms = command.issued_at_ms();
        match command.action() {
            "on" => {
                self.set_on(true)?;
                self.mode = match command.get_u64("duration") {
                    Some(0) | None => Mode::Steady,
                    Some(ms) => Mode::Timed {
                        off_at_ms: now_ms.wrapping_add(ms.min(u64::from(MAX_SPAN_MS)) as u32),
                    },
                };
                Ok(())
            }
            "off" => {
                self.mode = Mode::Steady;
                self.set_on(false)
            }
            "toggle" => {
                self.mode = Mode::Steady;
                self.set_on(!self.on)
            }
            "blink" => {
                let interval = command
                    .get_u64("interval")
                    .unwrap_or(DEFAULT_BLINK_INTERVAL_MS);
                let count = command.get_u64("count").unwrap_or(DEFAULT_BLINK_COUNT);
                self.start_pulses(interval, count, now_ms)
            }
            "beep" => {
                let duration = command.get_u64("duration").unwrap_or(DEFAULT_BEEP_MS);
                let count = command.get_u64("count").unwrap_or(1);
                self.start_pulses(duration, count, now_ms)
            }
            _ => Err(AdapterError::InvalidCommand),
        }
    }

    fn tick(&mut self, now_ms: u32) -> Result<(), AdapterError> {
        match self.mode {
            Mode::Steady => Ok(()),
            Mode::Timed { off_at_ms } => {
                if deadline_reached(now_ms, off_at_ms) {
                    self.mode = Mode::Steady;
                    self.set_on(false)?;
                }
                Ok(())
            }
            Mode::Pulse {
                period_ms,
                edges_left,
                next_at_ms,
            } => {
                if !deadline_reached(now_ms, next_at_ms) {
                    return Ok(());
                }
                let edges_left = edges_left - 1;
                self.mode = if edges_left == 0 {
                    Mode::Steady
                } else {
                    Mode::Pulse {
                        period_ms,
                        edges_left,
                        next_at_ms: next_at_ms.wrapping_add(period_ms),
                    }
                };
                self.set_on(!self.on && edges_left > 0)
            }
        }
    }
}
