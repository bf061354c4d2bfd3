//! Snapshot of what the panel shows

use alloc::string::{String, ToString};

use nekopaw_protocol::reports::ContentReport;
use nekopaw_protocol::TextStyle;

use crate::traits::{ConfirmContent, TextContent};

/// Owned copy of the last content drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    Text {
        title: Option<String>,
        body: String,
        footer: Option<String>,
        style: TextStyle,
    },
    Bitmap {
        len: usize,
    },
    Confirm {
        title: Option<String>,
        body: Option<String>,
        confirm_label: String,
        cancel_label: String,
        style: TextStyle,
    },
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(ToString::to_string)
}

impl Snapshot {
    pub fn text(content: &TextContent<'_>) -> Self {
        Snapshot::Text {
            title: owned(content.title),
            body: content.body.unwrap_or_default().to_string(),
            footer: owned(content.footer),
            style: content.style,
        }
    }

    pub fn bitmap(data: &[u8]) -> Self {
        Snapshot::Bitmap { len: data.len() }
    }

    pub fn confirm(content: &ConfirmContent<'_>) -> Self {
        Snapshot::Confirm {
            title: owned(content.title),
            body: owned(content.body),
            confirm_label: content.confirm_label.to_string(),
            cancel_label: content.cancel_label.to_string(),
            style: content.style,
        }
    }

    /// Wire form for the display report
    pub fn report(&self) -> ContentReport<'_> {
        match self {
            Snapshot::Text {
                title,
                body,
                footer,
                style,
            } => ContentReport::Text {
                title: title.as_deref(),
                body,
                footer: footer.as_deref(),
                style: *style,
            },
            Snapshot::Bitmap { len } => ContentReport::Bitmap { bytes: *len },
            Snapshot::Confirm {
                title,
                body,
                confirm_label,
                cancel_label,
                style,
            } => ContentReport::Confirm {
                title: title.as_deref(),
                body: body.as_deref(),
                confirm_label,
                cancel_label,
                style: *style,
            },
        }
    }
}
