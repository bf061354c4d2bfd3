//! Sensor adapters

pub mod analog;

pub use analog::{AdcReader, AnalogSensor};
