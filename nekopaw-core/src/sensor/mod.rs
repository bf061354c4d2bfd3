//! Sensor sampling

pub mod sampler;

pub use sampler::{SampledReading, SensorSampler};
