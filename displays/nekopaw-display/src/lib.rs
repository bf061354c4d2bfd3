//! Character-cell display adapter for NekoPaw
//!
//! This crate provides:
//! - `TextBackend` trait for panels that draw text in a fixed grid (HD44780,
//!   SSD1306 with a font, small e-paper modules)
//! - `Screen`, a character buffer with word wrapping and row highlights
//! - `TextDisplay`, a `DisplayAdapter` that lays out text and confirmation
//!   prompts on any `TextBackend`
//!
//! # Architecture
//!
//! The bridge session decides *what* is shown and which refresh mode to use.
//! `TextDisplay` turns that into rows on a `Screen`, then renders the screen
//! through the backend in one pass. Backends only need to know how to place
//! a string at a cell and flush.

#![no_std]
#![deny(unsafe_code)]

pub mod backend;
pub mod screen;
pub mod text;

// Re-export key types
pub use backend::{DisplayError, TextBackend};
pub use screen::{Screen, MAX_COLS, MAX_ROWS};
pub use text::TextDisplay;
