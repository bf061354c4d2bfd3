//! Configuration types
//!
//! Board-agnostic bridge configuration, optionally loaded from TOML.

pub mod types;

pub use types::*;
