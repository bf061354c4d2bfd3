//! Screen buffer
//!
//! Character buffer for text-mode displays. Content is composed here and
//! rendered to a [`TextBackend`] in one pass.

use heapless::String;

use crate::backend::{DisplayError, TextBackend};

/// Largest supported grid height
pub const MAX_ROWS: usize = 16;

/// Largest supported grid width
pub const MAX_COLS: usize = 32;

/// Bytes per line; leaves room for multi-byte characters
const LINE_BYTES: usize = MAX_COLS * 4;

type Line = String<LINE_BYTES>;

/// Byte offset of the `n`th character, or the string length
fn char_offset(text: &str, n: usize) -> usize {
    text.char_indices().nth(n).map_or(text.len(), |(i, _)| i)
}

/// Character buffer sized to a panel
#[derive(Clone)]
pub struct Screen {
    lines: [Line; MAX_ROWS],
    /// Inverted region per row (start_col, end_col)
    highlights: [Option<(u8, u8)>; MAX_ROWS],
    cols: usize,
    rows: usize,
    /// Whether the screen needs to be redrawn
    dirty: bool,
}

impl Screen {
    /// Create an empty screen, clamped to `MAX_COLS` x `MAX_ROWS`
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            lines: core::array::from_fn(|_| String::new()),
            highlights: [None; MAX_ROWS],
            cols: cols.min(MAX_COLS),
            rows: rows.min(MAX_ROWS),
            dirty: true,
        }
    }

    pub const fn rows(&self) -> usize {
        self.rows
    }

    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Clear the entire screen
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        self.highlights = [None; MAX_ROWS];
        self.dirty = true;
    }

    /// Set the content of a row, truncated to the width
    pub fn set_line(&mut self, row: usize, text: &str) {
        if row >= self.rows {
            return;
        }
        let line = &mut self.lines[row];
        line.clear();
        for c in text.chars().take(self.cols) {
            if line.push(c).is_err() {
                break;
            }
        }
        self.dirty = true;
    }

    /// Get the content of a row
    pub fn line(&self, row: usize) -> Option<&str> {
        if row < self.rows {
            Some(self.lines[row].as_str())
        } else {
            None
        }
    }

    /// Word-wrap `text` into rows `first_row..end_row`
    ///
    /// Newlines start a new row. Words wider than the screen are split.
    /// Text that does not fit is dropped. Returns the number of rows used.
    pub fn wrap_text(&mut self, first_row: usize, end_row: usize, text: &str) -> usize {
        let end_row = end_row.min(self.rows);
        if self.cols == 0 || first_row >= end_row {
            return 0;
        }

        let mut row = first_row;
        let mut line = Line::new();
        let mut len = 0;

        for paragraph in text.split('\n') {
            for word in paragraph.split_whitespace() {
                let mut word = word;
                while !word.is_empty() {
                    if row >= end_row {
                        return row - first_row;
                    }
                    let gap = usize::from(len > 0);
                    let width = word.chars().count();
                    if len + gap + width <= self.cols {
                        if gap == 1 {
                            let _ = line.push(' ');
                        }
                        let _ = line.push_str(word);
                        len += gap + width;
                        word = "";
                    } else if len > 0 {
                        self.set_line(row, &line);
                        row += 1;
                        line.clear();
                        len = 0;
                    } else {
                        let split = char_offset(word, self.cols);
                        self.set_line(row, &word[..split]);
                        row += 1;
                        word = &word[split..];
                    }
                }
            }

            if row >= end_row {
                break;
            }
            self.set_line(row, &line);
            row += 1;
            line.clear();
            len = 0;
        }

        row - first_row
    }

    /// Set highlight (invert) region for a row
    pub fn set_highlight(&mut self, row: usize, start_col: u8, end_col: u8) {
        if row < self.rows {
            self.highlights[row] = Some((start_col, end_col));
            self.dirty = true;
        }
    }

    /// Highlight an entire row
    pub fn highlight_row(&mut self, row: usize) {
        let cols = self.cols as u8;
        self.set_highlight(row, 0, cols);
    }

    /// Get highlight region for a row
    pub fn highlight(&self, row: usize) -> Option<(u8, u8)> {
        self.highlights.get(row).copied().flatten()
    }

    /// Check if screen needs redrawing
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Draw every row and flush
    ///
    /// The backend is cleared first so rows left empty do not keep stale
    /// characters.
    pub fn render<B: TextBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        full_refresh: bool,
    ) -> Result<(), DisplayError> {
        backend.clear()?;
        let rows = self.lines.iter().zip(&self.highlights).take(self.rows);
        for (row, (line, highlight)) in rows.enumerate() {
            if !line.is_empty() {
                backend.draw_text(row as u8, 0, line)?;
            }
            if let Some((start, end)) = *highlight {
                backend.invert_region(row as u8, start, end)?;
            }
        }
        backend.flush(full_refresh)?;
        self.dirty = false;
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for (i, line) in self.lines[..self.rows].iter().enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{}", line.as_str());
        }
        defmt::write!(f, "]");
    }
}
