//! Sensor adapter trait

/// Sensor metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorInfo {
    pub id: &'static str,
    /// Sensor kind, e.g. `"temperature"`
    pub kind: &'static str,
    /// Unit of `value`, e.g. `"C"` or `"V"`
    pub unit: &'static str,
    pub description: &'static str,
}

/// A single sample
///
/// A failed read is reported with `valid: false` instead of an error so that
/// one broken sensor never hides the others.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorReading {
    pub value: f32,
    pub valid: bool,
    pub timestamp_ms: u32,
}

impl SensorReading {
    /// A valid sample
    pub fn new(value: f32, timestamp_ms: u32) -> Self {
        Self {
            value,
            valid: true,
            timestamp_ms,
        }
    }

    /// A failed read
    pub fn invalid(timestamp_ms: u32) -> Self {
        Self {
            value: 0.0,
            valid: false,
            timestamp_ms,
        }
    }
}

/// Trait for sensors
///
/// Takes `&mut self` because bus and ADC reads typically require mutable
/// access.
pub trait SensorAdapter {
    fn info(&self) -> SensorInfo;

    /// Take or return the latest sample
    fn read(&mut self, now_ms: u32) -> SensorReading;
}
