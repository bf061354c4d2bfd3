//! Output adapter trait

use alloc::string::{String, ToString};

use nekopaw_protocol::CommandParams;
use serde_json::Value;

use super::AdapterError;
use crate::error::BridgeError;

/// Output metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputInfo {
    pub id: &'static str,
    /// Output kind, e.g. `"led"` or `"buzzer"`
    pub kind: &'static str,
}

/// A command for an output
///
/// Always carries a non-empty string `action`; everything else is
/// adapter-specific.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputCommand {
    params: CommandParams,
    issued_at_ms: u32,
}

impl OutputCommand {
    /// Wrap agent-supplied parameters
    ///
    /// Returns `InvalidContent` if `action` is missing, empty or not a string.
    pub fn new(params: CommandParams, issued_at_ms: u32) -> Result<Self, BridgeError> {
        match params.get("action") {
            Some(Value::String(action)) if !action.is_empty() => Ok(Self {
                params,
                issued_at_ms,
            }),
            _ => Err(BridgeError::InvalidContent),
        }
    }

    /// Command with only an action
    pub fn action_only(action: &str, issued_at_ms: u32) -> Result<Self, BridgeError> {
        let mut params = CommandParams::new();
        params.insert(String::from("action"), Value::String(action.to_string()));
        Self::new(params, issued_at_ms)
    }

    /// Add a parameter
    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn action(&self) -> &str {
        self.params
            .get("action")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn params(&self) -> &CommandParams {
        &self.params
    }

    /// Integer parameter
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.params.get(key).and_then(Value::as_u64)
    }

    /// String parameter
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }

    /// Boolean parameter
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.params.get(key).and_then(Value::as_bool)
    }

    /// Time the command was accepted by the runtime
    pub fn issued_at_ms(&self) -> u32 {
        self.issued_at_ms
    }
}

/// Trait for outputs (LEDs, buzzers, relays)
pub trait OutputAdapter {
    fn info(&self) -> OutputInfo;

    /// Apply a command
    ///
    /// Unknown actions or bad parameters return `InvalidCommand`.
    fn execute(&mut self, command: &OutputCommand) -> Result<(), AdapterError>;

    /// Advance timed effects (blink, auto-off)
    fn tick(&mut self, _now_ms: u32) -> Result<(), AdapterError> {
        Ok(())
    }
}
