//! Input adapters

pub mod button;

pub use button::{ButtonConfig, DebouncedButton};
