//! Capability adapter traits
//!
//! These traits define the interface between the bridge runtime and
//! board-specific drivers. The runtime only ever talks to hardware through
//! them.

pub mod display;
pub mod input;
pub mod output;
pub mod sensor;

pub use display::{ConfirmContent, DisplayAdapter, DisplayCapabilities, TextContent};
pub use input::{InputAdapter, InputEvent, InputInfo};
pub use output::{OutputAdapter, OutputCommand, OutputInfo};
pub use sensor::{SensorAdapter, SensorInfo, SensorReading};

/// Errors reported by adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdapterError {
    /// Command or content not understood by this adapter
    InvalidCommand,
    /// Operation not supported by this hardware
    Unsupported,
    /// Bus or device failure
    Hardware,
}
