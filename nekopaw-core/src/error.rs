//! Runtime error values
//!
//! Every fallible operation returns one of these as an explicit value; the
//! API layer maps them onto [`ErrorKind`] without reinterpreting them.

use nekopaw_protocol::ErrorKind;

use crate::traits::AdapterError;

/// Invalid startup configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// HTTP port is 0
    InvalidPort,
    /// Device identifier is empty
    MissingDeviceId,
    /// A string field exceeds its fixed capacity
    FieldTooLong,
    /// Configuration document could not be parsed
    Parse,
}

/// Errors returned by registry, subsystem and controller operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeError {
    /// Unknown capability id (or nothing to resolve)
    NotFound,
    /// Id already registered in this category
    DuplicateId,
    /// Display operation with no display registered
    NoDisplay,
    /// Missing required field or empty buffer
    InvalidContent,
    /// A confirmation is pending on the display
    Busy,
    /// The adapter refused the request
    Rejected(AdapterError),
    /// Invalid startup configuration
    Config(ConfigError),
    /// No free registry slot in this category
    CapacityExceeded,
}

impl BridgeError {
    /// Wire-level kind reported to the agent
    pub fn kind(self) -> ErrorKind {
        match self {
            BridgeError::NotFound => ErrorKind::NotFound,
            BridgeError::DuplicateId => ErrorKind::DuplicateId,
            BridgeError::NoDisplay => ErrorKind::NoDisplay,
            BridgeError::InvalidContent => ErrorKind::InvalidContent,
            BridgeError::Busy => ErrorKind::Busy,
            BridgeError::Rejected(_) | BridgeError::CapacityExceeded => ErrorKind::Rejected,
            BridgeError::Config(_) => ErrorKind::ConfigError,
        }
    }

    /// Human-readable description for error payloads
    pub fn message(self) -> &'static str {
        match self {
            BridgeError::NotFound => "not found",
            BridgeError::DuplicateId => "id already registered",
            BridgeError::NoDisplay => "no display registered",
            BridgeError::InvalidContent => "missing or invalid content",
            BridgeError::Busy => "confirmation pending",
            BridgeError::Rejected(AdapterError::InvalidCommand) => "command rejected by adapter",
            BridgeError::Rejected(AdapterError::Unsupported) => "not supported by adapter",
            BridgeError::Rejected(AdapterError::Hardware) => "adapter hardware failure",
            BridgeError::Config(ConfigError::InvalidPort) => "invalid http port",
            BridgeError::Config(ConfigError::MissingDeviceId) => "device id is empty",
            BridgeError::Config(ConfigError::FieldTooLong) => "configuration field too long",
            BridgeError::Config(ConfigError::Parse) => "configuration parse error",
            BridgeError::CapacityExceeded => "registry full",
        }
    }
}

impl From<ConfigError> for BridgeError {
    fn from(err: ConfigError) -> Self {
        BridgeError::Config(err)
    }
}

impl From<AdapterError> for BridgeError {
    fn from(err: AdapterError) -> Self {
        BridgeError::Rejected(err)
    }
}

impl core::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}
