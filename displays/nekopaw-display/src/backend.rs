//! Display backend trait
//!
//! Defines the interface for character-grid panels.

use nekopaw_core::traits::AdapterError;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Invalid coordinates or dimensions
    InvalidCoordinates,
    /// Display not initialized
    NotInitialized,
}

impl From<DisplayError> for AdapterError {
    fn from(_: DisplayError) -> Self {
        AdapterError::Hardware
    }
}

/// Text-mode panel
///
/// Implementations handle the specifics of LCD, OLED or e-paper modules.
/// Drawing calls may be buffered until [`flush`](Self::flush).
pub trait TextBackend {
    /// Clear the entire display
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw text at the specified row and column
    ///
    /// - `row`: Row number (0-based)
    /// - `col`: Column number in characters (0-based)
    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError>;

    /// Invert a region on the specified row
    ///
    /// `end_col` is exclusive.
    fn invert_region(&mut self, row: u8, start_col: u8, end_col: u8) -> Result<(), DisplayError>;

    /// Push buffered content to the panel
    ///
    /// `full_refresh` is only ever false when [`supports_partial`](Self::supports_partial)
    /// returns true.
    fn flush(&mut self, full_refresh: bool) -> Result<(), DisplayError>;

    /// Returns (columns, rows) in character units
    fn dimensions(&self) -> (u8, u8);

    /// Returns (width, height) in pixels
    fn pixel_dimensions(&self) -> (u16, u16);

    /// Check if the display is ready
    fn is_ready(&self) -> bool;

    /// Panel kind reported to clients
    fn kind(&self) -> &'static str {
        "lcd"
    }

    fn supports_partial(&self) -> bool {
        false
    }
}
