//! Capability adapter implementations
//!
//! This crate provides concrete implementations of the adapter traits
//! defined in nekopaw-core on top of `embedded-hal` pins:
//!
//! - Inputs (debounced push button with click/double-click/long-press)
//! - Outputs (GPIO LED, buzzer or relay with timed and pulsed actions)
//! - Sensors (scaled ADC channel)

#![no_std]
#![deny(unsafe_code)]

pub mod input;
pub mod output;
pub mod sensor;
