//! Response payloads
//!
//! These borrow from the runtime's registry and are serialized straight into
//! the response body; none of them outlive a single request.

use alloc::vec::Vec;

use serde::Serialize;

use crate::events::EventKind;
use crate::messages::{Category, ConfirmStatus, RefreshMode, SessionState, TextStyle};

/// A registered capability
#[derive(Debug, Clone, Serialize)]
pub struct Descriptor<'a> {
    pub id: &'a str,
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: &'a str,
}

/// Display panel capabilities
#[derive(Debug, Clone, Serialize)]
pub struct DisplayInfo<'a> {
    pub width: u16,
    pub height: u16,
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub supports_partial: bool,
}

/// A registered sensor with its metadata
#[derive(Debug, Clone, Serialize)]
pub struct SensorDescriptor<'a> {
    pub id: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub unit: &'a str,
    pub description: &'a str,
}

/// Result of `GET /capabilities`
#[derive(Debug, Clone, Serialize)]
pub struct CapabilityList<'a> {
    pub display: Option<DisplayInfo<'a>>,
    pub sensors: Vec<SensorDescriptor<'a>>,
    pub inputs: Vec<Descriptor<'a>>,
    pub outputs: Vec<Descriptor<'a>>,
}

/// Result of `GET /device`
#[derive(Debug, Clone, Serialize)]
pub struct DeviceReport<'a> {
    pub device_id: &'a str,
    pub description: &'a str,
    pub http_port: u16,
    pub uptime_ms: u32,
    pub display: Option<DisplayInfo<'a>>,
    pub sensors: usize,
    pub inputs: usize,
    pub outputs: usize,
    pub events_dropped: u32,
    pub tick_faults: u32,
}

/// A sensor sample
///
/// `value` is omitted when the read failed.
#[derive(Debug, Clone, Serialize)]
pub struct ReadingReport<'a> {
    pub id: &'a str,
    pub unit: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f32>,
    pub valid: bool,
    pub timestamp_ms: u32,
    pub age_ms: u32,
    pub stale: bool,
}

/// Result of `GET /sensors`
#[derive(Debug, Clone, Serialize)]
pub struct SensorReport<'a> {
    pub sensors: Vec<ReadingReport<'a>>,
}

/// A queued input event
#[derive(Debug, Clone, Serialize)]
pub struct EventReport<'a> {
    pub source: &'a str,
    pub kind: EventKind,
    pub timestamp_ms: u32,
}

/// Result of `GET /events`
#[derive(Debug, Clone, Serialize)]
pub struct EventBatch<'a> {
    pub events: Vec<EventReport<'a>>,
    /// Events dropped on queue overflow since startup
    pub dropped: u32,
}

/// What the panel currently shows
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentReport<'a> {
    Text {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<&'a str>,
        body: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        footer: Option<&'a str>,
        style: TextStyle,
    },
    Bitmap {
        bytes: usize,
    },
    Confirm {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        body: Option<&'a str>,
        confirm_label: &'a str,
        cancel_label: &'a str,
        style: TextStyle,
    },
}

/// Result of `GET /display` and of the display commands
#[derive(Debug, Clone, Serialize)]
pub struct DisplayReport<'a> {
    pub state: SessionState,
    /// Refresh mode last applied
    pub refresh: Option<RefreshMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentReport<'a>>,
    /// Pending confirmation ticket
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_ms: Option<u32>,
}

/// Result of the confirmation routes
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmReport {
    pub ticket: u32,
    pub status: ConfirmStatus,
}

/// Result of `POST /outputs/{id}`
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteReport<'a> {
    pub id: &'a str,
    pub action: &'a str,
}
