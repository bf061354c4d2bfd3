//! Display adapter trait
//!
//! The adapter only draws. Session state, TTLs and confirmation bookkeeping
//! live in [`crate::display::DisplaySession`].

use nekopaw_protocol::TextStyle;

use super::AdapterError;

/// Static description of a display panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayCapabilities {
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
    /// Panel kind, e.g. `"epaper"` or `"oled"`
    pub kind: &'static str,
    /// Panel can do a partial (fast) refresh
    pub supports_partial: bool,
}

/// Text to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextContent<'c> {
    pub title: Option<&'c str>,
    pub body: Option<&'c str>,
    pub footer: Option<&'c str>,
    pub style: TextStyle,
}

impl<'c> TextContent<'c> {
    /// Body-only content with the default style
    pub fn body(body: &'c str) -> Self {
        Self {
            body: Some(body),
            ..Self::default()
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: &'c str) -> Self {
        self.title = Some(title);
        self
    }

    /// Set the footer
    pub fn with_footer(mut self, footer: &'c str) -> Self {
        self.footer = Some(footer);
        self
    }

    /// Set the style
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }
}

/// Label for the accept action when none is given
pub const DEFAULT_CONFIRM_LABEL: &str = "Confirm";

/// Label for the cancel action when none is given
pub const DEFAULT_CANCEL_LABEL: &str = "Cancel";

/// A confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmContent<'c> {
    pub title: Option<&'c str>,
    pub body: Option<&'c str>,
    pub confirm_label: &'c str,
    pub cancel_label: &'c str,
    pub style: TextStyle,
}

impl Default for ConfirmContent<'_> {
    fn default() -> Self {
        Self {
            title: None,
            body: None,
            confirm_label: DEFAULT_CONFIRM_LABEL,
            cancel_label: DEFAULT_CANCEL_LABEL,
            style: TextStyle::Normal,
        }
    }
}

impl<'c> ConfirmContent<'c> {
    /// Prompt with a title and the default labels
    pub fn titled(title: &'c str) -> Self {
        Self {
            title: Some(title),
            ..Self::default()
        }
    }

    /// Set the body text
    pub fn with_body(mut self, body: &'c str) -> Self {
        self.body = Some(body);
        self
    }

    /// Override both action labels
    pub fn with_labels(mut self, confirm: &'c str, cancel: &'c str) -> Self {
        self.confirm_label = confirm;
        self.cancel_label = cancel;
        self
    }
}

/// Trait for display panels
///
/// `full_refresh` is the refresh mode chosen by the session. Adapters that
/// cannot do partial refresh report `supports_partial: false` and always
/// receive `true`.
pub trait DisplayAdapter {
    /// Panel description
    fn capabilities(&self) -> DisplayCapabilities;

    /// Render text content
    fn show_text(&mut self, content: &TextContent<'_>, full_refresh: bool)
        -> Result<(), AdapterError>;

    /// Render a raw bitmap (panel-native format)
    fn show_bitmap(&mut self, data: &[u8], full_refresh: bool) -> Result<(), AdapterError>;

    /// Render a confirmation prompt
    fn show_confirm(
        &mut self,
        content: &ConfirmContent<'_>,
        full_refresh: bool,
    ) -> Result<(), AdapterError>;

    /// Blank the panel
    fn clear(&mut self);
}
