//! Request bodies, shared enums and the response envelope
//!
//! Request bodies are parsed from JSON sent by the agent. Field names follow
//! the bridge CLI (`title`, `body`, `footer`, `style`, `refresh`, `ttl`).

use alloc::string::String;
use alloc::vec::Vec;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::route::{Method, Route};

/// Schema-less output command parameters
pub type CommandParams = serde_json::Map<String, serde_json::Value>;

/// Capability category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Display,
    Sensor,
    Input,
    Output,
}

impl Category {
    /// Name used in JSON payloads
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Display => "display",
            Category::Sensor => "sensor",
            Category::Input => "input",
            Category::Output => "output",
        }
    }
}

/// Requested or applied display refresh mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "lowercase")]
pub enum RefreshMode {
    /// Redraw the whole panel
    Full,
    /// Update only the changed region (e-ink fast refresh)
    #[default]
    Partial,
}

impl RefreshMode {
    /// Parse a query-string value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "full" => Some(RefreshMode::Full),
            "partial" => Some(RefreshMode::Partial),
            _ => None,
        }
    }

    /// Build from a full-refresh flag
    pub fn from_full(full_refresh: bool) -> Self {
        if full_refresh {
            RefreshMode::Full
        } else {
            RefreshMode::Partial
        }
    }

    /// Returns true for a full refresh
    pub fn is_full(self) -> bool {
        self == RefreshMode::Full
    }
}

/// Text presentation style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "lowercase")]
pub enum TextStyle {
    #[default]
    #[serde(rename = "default")]
    Normal,
    Alert,
    Success,
    Compact,
}

impl TextStyle {
    /// Name used in JSON payloads
    pub fn as_str(self) -> &'static str {
        match self {
            TextStyle::Normal => "default",
            TextStyle::Alert => "alert",
            TextStyle::Success => "success",
            TextStyle::Compact => "compact",
        }
    }
}

/// Display session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Nothing shown
    Idle,
    /// Text content shown
    ShowingText,
    /// Bitmap shown
    ShowingBitmap,
    /// Waiting for a human to confirm or cancel
    ConfirmPending,
}

/// Status of a confirmation ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum ConfirmStatus {
    /// Still waiting on the user
    Pending,
    /// User pressed confirm
    Accepted,
    /// User pressed cancel
    Declined,
    /// Display was cleared while the prompt was pending
    Dismissed,
    /// Prompt timed out
    Expired,
}

impl ConfirmStatus {
    /// Returns true once the prompt is no longer pending
    pub fn is_resolved(self) -> bool {
        self != ConfirmStatus::Pending
    }
}

/// Body of `POST /display/text`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub title: Option<String>,
    /// Required; absence is rejected by the runtime
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub footer: Option<String>,
    #[serde(default)]
    pub style: Option<TextStyle>,
    #[serde(default)]
    pub refresh: Option<RefreshMode>,
    /// Seconds until the content is cleared
    #[serde(default)]
    pub ttl: Option<u32>,
}

/// Body of `POST /display/confirm`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, alias = "confirmLabel")]
    pub confirm_label: Option<String>,
    #[serde(default, alias = "cancelLabel")]
    pub cancel_label: Option<String>,
    #[serde(default)]
    pub style: Option<TextStyle>,
    #[serde(default)]
    pub refresh: Option<RefreshMode>,
    /// Seconds until the prompt expires
    #[serde(default)]
    pub timeout: Option<u32>,
}

/// Body of `POST /display/confirm/resolve`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ResolveRequest {
    pub accepted: bool,
}

/// Query parameters of `POST /display/bitmap`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BitmapQuery {
    pub refresh: Option<RefreshMode>,
    pub ttl: Option<u32>,
}

impl BitmapQuery {
    /// Parse `refresh=full|partial&ttl=N`; unknown keys are ignored
    pub fn parse(query: &str) -> Result<Self, ErrorKind> {
        let mut parsed = BitmapQuery::default();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "refresh" => {
                    parsed.refresh =
                        Some(RefreshMode::parse(value).ok_or(ErrorKind::InvalidContent)?);
                }
                "ttl" => {
                    parsed.ttl = Some(value.parse().map_err(|_| ErrorKind::InvalidContent)?);
                }
                _ => {}
            }
        }
        Ok(parsed)
    }
}

/// Parse a JSON request body
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ErrorKind> {
    serde_json::from_slice(body).map_err(|_| ErrorKind::InvalidContent)
}

/// A request handed over by the transport
#[derive(Debug, Clone, Copy)]
pub struct ApiRequest<'r> {
    pub method: Method,
    /// Path without query string
    pub path: &'r str,
    /// Query string without the leading `?`
    pub query: &'r str,
    /// Raw request body
    pub body: &'r [u8],
}

impl<'r> ApiRequest<'r> {
    /// Build a request from a request-line target (`/path?query`)
    pub fn new(method: Method, target: &'r str, body: &'r [u8]) -> Self {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        Self {
            method,
            path,
            query,
            body,
        }
    }

    /// Resolve the route for this request
    pub fn route(&self) -> Option<Route<'r>> {
        Route::parse(self.method, self.path)
    }
}

/// Fallback body when a response cannot be encoded
const ENCODE_FAILURE: &[u8] =
    br#"{"ok":false,"error":"rejected","message":"response encoding failed"}"#;

#[derive(Serialize)]
struct Success<'a, T> {
    ok: bool,
    result: &'a T,
}

#[derive(Serialize)]
struct Failure<'a> {
    ok: bool,
    error: ErrorKind,
    message: &'a str,
}

/// A response for the transport to write back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// JSON body
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Successful response wrapping `result`
    pub fn ok<T: Serialize>(result: &T) -> Self {
        match serde_json::to_vec(&Success { ok: true, result }) {
            Ok(body) => Self { status: 200, body },
            Err(_) => Self {
                status: 500,
                body: ENCODE_FAILURE.to_vec(),
            },
        }
    }

    /// Error response for `kind`
    pub fn error(kind: ErrorKind, message: &str) -> Self {
        let body = serde_json::to_vec(&Failure {
            ok: false,
            error: kind,
            message,
        })
        .unwrap_or_else(|_| ENCODE_FAILURE.to_vec());
        Self {
            status: kind.http_status(),
            body,
        }
    }

    /// Returns true for a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Content type of every bridge response
    pub const fn content_type(&self) -> &'static str {
        "application/json"
    }
}
