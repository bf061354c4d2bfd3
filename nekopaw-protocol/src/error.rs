//! Error kinds carried by API error payloads

use serde::Serialize;

/// Error kind reported to the agent
///
/// The runtime maps its own error values onto these; the transport only
/// needs [`ErrorKind::http_status`] to pick a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Unknown capability id, route or confirmation ticket
    NotFound,
    /// Registration conflict
    DuplicateId,
    /// Display operation with no display registered
    NoDisplay,
    /// Missing required field, empty buffer or malformed body
    InvalidContent,
    /// Display blocked by a pending confirmation
    Busy,
    /// Adapter refused the command
    Rejected,
    /// Invalid startup configuration
    ConfigError,
}

impl ErrorKind {
    /// Name used in JSON payloads
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::DuplicateId => "duplicate_id",
            ErrorKind::NoDisplay => "no_display",
            ErrorKind::InvalidContent => "invalid_content",
            ErrorKind::Busy => "busy",
            ErrorKind::Rejected => "rejected",
            ErrorKind::ConfigError => "config_error",
        }
    }

    /// HTTP status code for this kind
    pub fn http_status(self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::DuplicateId | ErrorKind::Busy => 409,
            ErrorKind::InvalidContent => 400,
            ErrorKind::Rejected => 422,
            ErrorKind::NoDisplay => 503,
            ErrorKind::ConfigError => 500,
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
