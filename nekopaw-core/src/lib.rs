//! Board-agnostic bridge runtime
//!
//! This crate contains all runtime logic that does not depend on specific
//! hardware:
//!
//! - Adapter traits (display, sensor, input, output)
//! - Capability registry
//! - Input poller, output dispatcher and sensor sampler
//! - Display session state machine
//! - Bridge controller and API request handler
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod bridge;
pub mod config;
pub mod display;
pub mod error;
pub mod input;
pub mod output;
pub mod registry;
pub mod sensor;
pub mod tick;
pub mod traits;

pub use bridge::BridgeController;
pub use config::BridgeConfig;
pub use display::{ConfirmOutcome, ConfirmTicket, DisplaySession};
pub use error::{BridgeError, ConfigError};
pub use input::{EventSink, InputPoller};
pub use output::OutputDispatcher;
pub use registry::{CapabilityDescriptor, CapabilityRegistry};
pub use sensor::{SampledReading, SensorSampler};
pub use tick::{TickFault, TickReport};
pub use nekopaw_protocol as protocol;
