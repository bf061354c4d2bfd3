//! Configuration type definitions
//!
//! The bridge configuration is consumed once by
//! [`BridgeController::begin`](crate::bridge::BridgeController::begin).
//! Strings are fixed-capacity so the whole struct lives on the stack.

use heapless::String;

use crate::error::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum device id length
pub const MAX_DEVICE_ID_LEN: usize = 32;

/// Maximum description length
pub const MAX_DESCRIPTION_LEN: usize = 64;

/// Default HTTP port served by the transport
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// Default age after which a valid sample is reported stale
pub const DEFAULT_STALE_AFTER_MS: u32 = 10_000;

/// Bridge configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BridgeConfig {
    /// Port the transport listens on (reported, never bound here)
    pub http_port: u16,
    /// Identifier reported to the agent
    pub device_id: String<MAX_DEVICE_ID_LEN>,
    /// Free-form description
    pub description: String<MAX_DESCRIPTION_LEN>,
    /// Sensor staleness threshold
    pub stale_after_ms: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            device_id: String::new(),
            description: String::new(),
            stale_after_ms: DEFAULT_STALE_AFTER_MS,
        }
    }
}

impl BridgeConfig {
    /// Create a configuration with defaults for everything but the id
    pub fn new(device_id: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.device_id = copy_str(device_id)?;
        Ok(config)
    }

    /// Set the description
    pub fn with_description(mut self, description: &str) -> Result<Self, ConfigError> {
        self.description = copy_str(description)?;
        Ok(self)
    }

    /// Set the HTTP port
    pub fn with_port(mut self, http_port: u16) -> Self {
        self.http_port = http_port;
        self
    }

    /// Set the sensor staleness threshold
    pub fn with_stale_after(mut self, stale_after_ms: u32) -> Self {
        self.stale_after_ms = stale_after_ms;
        self
    }

    /// Check startup invariants
    ///
    /// The port must be in 1..=65535 and the device id non-empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http_port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.device_id.trim().is_empty() {
            return Err(ConfigError::MissingDeviceId);
        }
        Ok(())
    }

    /// Parse a TOML document
    ///
    /// ```toml
    /// device_id = "paw-desk"
    /// description = "Desk companion"
    /// http_port = 8080
    /// stale_after_ms = 5000
    /// ```
    ///
    /// Missing keys take their defaults. The result is validated.
    #[cfg(feature = "toml")]
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(input).map_err(|_| ConfigError::Parse)?;
        let config = Self {
            http_port: raw.http_port,
            device_id: copy_str(&raw.device_id)?,
            description: copy_str(&raw.description)?,
            stale_after_ms: raw.stale_after_ms,
        };
        config.validate()?;
        Ok(config)
    }
}

fn copy_str<const N: usize>(value: &str) -> Result<String<N>, ConfigError> {
    let mut out = String::new();
    out.push_str(value).map_err(|_| ConfigError::FieldTooLong)?;
    Ok(out)
}

/// Unbounded mirror of [`BridgeConfig`] so over-long strings are reported
/// as `FieldTooLong` instead of a parse error
#[cfg(feature = "toml")]
#[derive(Deserialize)]
#[serde(default)]
struct RawConfig {
    http_port: u16,
    device_id: alloc::string::String,
    description: alloc::string::String,
    stale_after_ms: u32,
}

#[cfg(feature = "toml")]
impl Default for RawConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            device_id: alloc::string::String::new(),
            description: alloc::string::String::new(),
            stale_after_ms: DEFAULT_STALE_AFTER_MS,
        }
    }
}
