//! Text-mode display adapter
//!
//! Layout rules:
//!
//! ```text
//! +--------------------+
//! |Title               |  inverted for the alert style
//! |body text, word     |
//! |wrapped             |
//! |footer              |  last row
//! +--------------------+
//! ```
//!
//! A confirmation prompt replaces the footer with its labels, the confirm
//! label highlighted on the left and the cancel label on the right.
//! Bitmaps are not supported on a character grid.

use heapless::String;
use nekopaw_core::protocol::TextStyle;
use nekopaw_core::traits::{
    AdapterError, ConfirmContent, DisplayAdapter, DisplayCapabilities, TextContent,
};

use crate::backend::{DisplayError, TextBackend};
use crate::screen::{Screen, MAX_COLS};

/// Append up to `max` characters of `text`, stopping when `line` is full
fn push_chars<const N: usize>(line: &mut String<N>, text: &str, max: usize) {
    for c in text.chars().take(max) {
        if line.push(c).is_err() {
            break;
        }
    }
}

/// `DisplayAdapter` on top of a character-grid backend
pub struct TextDisplay<B> {
    backend: B,
    screen: Screen,
    /// Most recent backend failure
    last_error: Option<DisplayError>,
}

impl<B: TextBackend> TextDisplay<B> {
    pub fn new(backend: B) -> Self {
        let (cols, rows) = backend.dimensions();
        Self {
            screen: Screen::new(cols.into(), rows.into()),
            backend,
            last_error: None,
        }
    }

    /// Composed content of the last draw
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Most recent backend failure, including ones from `clear`
    pub fn last_error(&self) -> Option<DisplayError> {
        self.last_error
    }

    /// Give the backend back
    pub fn release(self) -> B {
        self.backend
    }

    /// Title row; returns the first free row
    fn layout_title(&mut self, title: Option<&str>, style: TextStyle) -> usize {
        match title {
            Some(title) => {
                self.screen.set_line(0, title);
                if style == TextStyle::Alert {
                    self.screen.highlight_row(0);
                }
                1
            }
            None => 0,
        }
    }

    /// Bottom row reserved for a footer, if the grid has room after `first`
    fn footer_row(&self, first: usize) -> Option<usize> {
        let rows = self.screen.rows();
        (rows > first + 1).then(|| rows - 1)
    }

    fn render(&mut self, full_refresh: bool) -> Result<(), AdapterError> {
        let result = if self.backend.is_ready() {
            // Panels without partial refresh always get a full one
            let full = full_refresh || !self.backend.supports_partial();
            self.screen.render(&mut self.backend, full)
        } else {
            Err(DisplayError::NotInitialized)
        };
        if let Err(err) = result {
            self.last_error = Some(err);
        }
        result.map_err(AdapterError::from)
    }
}

impl<B: TextBackend> DisplayAdapter for TextDisplay<B> {
    fn capabilities(&self) -> DisplayCapabilities {
        let (width, height) = self.backend.pixel_dimensions();
        DisplayCapabilities {
            width,
            height,
            kind: self.backend.kind(),
            supports_partial: self.backend.supports_partial(),
        }
    }

    fn show_text(
        &mut self,
        content: &TextContent<'_>,
        full_refresh: bool,
    ) -> Result<(), AdapterError> {
        self.screen.clear();
        let first = self.layout_title(content.title, content.style);

        let mut body_end = self.screen.rows();
        if let Some(footer) = content.footer {
            if let Some(row) = self.footer_row(first) {
                self.screen.set_line(row, footer);
                body_end = row;
            }
        }
        if let Some(body) = content.body {
            self.screen.wrap_text(first, body_end, body);
        }

        self.render(full_refresh)
    }

    fn show_bitmap(&mut self, _data: &[u8], _full_refresh: bool) -> Result<(), AdapterError> {
        Err(AdapterError::Unsupported)
    }

    fn show_confirm(
        &mut self,
        content: &ConfirmContent<'_>,
        full_refresh: bool,
    ) -> Result<(), AdapterError> {
        self.screen.clear();
        let cols = self.screen.cols();
        let first = self.layout_title(content.title, content.style);
        let labels_row = self.footer_row(first).unwrap_or(first);

        if let Some(body) = content.body {
            self.screen.wrap_text(first, labels_row, body);
        }

        // "Yes        No": confirm left, cancel right-aligned
        let confirm_len = content.confirm_label.chars().count().min(cols);
        let cancel_len = content.cancel_label.chars().count();
        let pad = cols.saturating_sub(confirm_len + cancel_len).max(1);
        let mut labels: String<{ MAX_COLS * 4 }> = String::new();
        push_chars(&mut labels, content.confirm_label, confirm_len);
        for _ in 0..pad {
            let _ = labels.push(' ');
        }
        push_chars(&mut labels, content.cancel_label, cols);
        self.screen.set_line(labels_row, &labels);
        self.screen.set_highlight(labels_row, 0, confirm_len as u8);

        self.render(full_refresh)
    }

    fn clear(&mut self) {
        self.screen.clear();
        // Clearing cannot fail from the session's point of view
        if self.render(true).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("display clear failed: {}", self.last_error);
        }
    }
}
