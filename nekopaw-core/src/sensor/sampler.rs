//! Sensor sampler
//!
//! Every call reads the adapter; nothing is cached. Callers that need
//! throttling rate-limit themselves.

use heapless::Vec;

use crate::error::BridgeError;
use crate::registry::{CapabilityDescriptor, CapabilityRegistry, MAX_SENSORS};
use crate::tick::elapsed_ms;
use crate::traits::{SensorAdapter, SensorReading};

/// A reading with its sensor and freshness
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SampledReading {
    pub descriptor: CapabilityDescriptor,
    pub unit: &'static str,
    pub reading: SensorReading,
    /// Time since the adapter took the sample
    pub age_ms: u32,
    /// Valid but older than the staleness threshold
    pub stale: bool,
}

impl SampledReading {
    /// The value, if the read succeeded
    pub fn value(&self) -> Option<f32> {
        self.reading.valid.then_some(self.reading.value)
    }
}

/// Synchronous sensor reader
#[derive(Debug, Clone)]
pub struct SensorSampler {
    stale_after_ms: u32,
    reads: u32,
    failed_reads: u32,
}

impl SensorSampler {
    pub const fn new(stale_after_ms: u32) -> Self {
        Self {
            stale_after_ms,
            reads: 0,
            failed_reads: 0,
        }
    }

    pub fn set_stale_after(&mut self, stale_after_ms: u32) {
        self.stale_after_ms = stale_after_ms;
    }

    /// Read one sensor
    pub fn read_one(
        &mut self,
        registry: &mut CapabilityRegistry<'_>,
        id: &str,
        now_ms: u32,
    ) -> Result<SampledReading, BridgeError> {
        let descriptor = registry.find(nekopaw_protocol::Category::Sensor, id)?;
        let adapter = registry.sensor_mut(id).ok_or(BridgeError::NotFound)?;
        Ok(self.sample(adapter, descriptor, now_ms))
    }

    /// Read every sensor in registration order
    pub fn read_all(
        &mut self,
        registry: &mut CapabilityRegistry<'_>,
        now_ms: u32,
    ) -> Vec<SampledReading, MAX_SENSORS> {
        let mut out = Vec::new();
        for slot in registry.sensors_mut() {
            let sample = self.sample(&mut *slot.adapter, slot.descriptor, now_ms);
            // Bounded by MAX_SENSORS like the registry
            let _ = out.push(sample);
        }
        out
    }

    fn sample(
        &mut self,
        adapter: &mut dyn SensorAdapter,
        descriptor: CapabilityDescriptor,
        now_ms: u32,
    ) -> SampledReading {
        let unit = adapter.info().unit;
        let reading = adapter.read(now_ms);
        self.reads = self.reads.wrapping_add(1);
        if !reading.valid {
            self.failed_reads = self.failed_reads.wrapping_add(1);
            debug!("sensor {} read failed", descriptor.id);
        }

        let age_ms = elapsed_ms(now_ms, reading.timestamp_ms);
        SampledReading {
            descriptor,
            unit,
            reading,
            age_ms,
            stale: reading.valid && age_ms > self.stale_after_ms,
        }
    }

    pub fn stale_after_ms(&self) -> u32 {
        self.stale_after_ms
    }

    /// Adapter reads since startup
    pub fn reads(&self) -> u32 {
        self.reads
    }

    /// Reads that returned an invalid sample
    pub fn failed_reads(&self) -> u32 {
        self.failed_reads
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::mock::MockSensor;

    #[test]
    fn test_read_one_is_fresh_each_call() {
        let mut temp = MockSensor::new("temp", 21.0);
        let mut sampler = SensorSampler::new(10_000);
        {
            let mut registry = CapabilityRegistry::new();
            registry.register_sensor(&mut temp).unwrap();

            let s = sampler.read_one(&mut registry, "temp", 100).unwrap();
            assert_eq!(s.value(), Some(21.0));
            assert_eq!(s.unit, "C");
            assert_eq!(s.age_ms, 0);
            sampler.read_one(&mut registry, "temp", 200).unwrap();

            assert_eq!(
                sampler.read_one(&mut registry, "humidity", 0),
                Err(BridgeError::NotFound)
            );
        }
        assert_eq!(temp.reads, 2);
        assert_eq!(sampler.reads(), 2);
    }

    #[test]
    fn test_invalid_reading_has_no_value() {
        let mut temp = MockSensor::new("temp", 99.0);
        temp.valid = false;
        temp.sampled_at = Some(0);

        let mut registry = CapabilityRegistry::new();
        registry.register_sensor(&mut temp).unwrap();
        let mut sampler = SensorSampler::new(1_000);

        let s = sampler.read_one(&mut registry, "temp", 50_000).unwrap();
        assert_eq!(s.value(), None);
        // Invalid samples are never reported stale
        assert!(!s.stale);
        assert_eq!(sampler.failed_reads(), 1);
    }

    #[test]
    fn test_staleness() {
        let mut cached = MockSensor::new("cached", 3.3);
        cached.sampled_at = Some(1_000);

        let mut registry = CapabilityRegistry::new();
        registry.register_sensor(&mut cached).unwrap();
        let mut sampler = SensorSampler::new(5_000);

        let s = sampler.read_one(&mut registry, "cached", 6_000).unwrap();
        assert_eq!(s.age_ms, 5_000);
        assert!(!s.stale);

        let s = sampler.read_one(&mut registry, "cached", 6_001).unwrap();
        assert!(s.stale);

        // Timestamp ahead of the clock
        let s = sampler.read_one(&mut registry, "cached", 500).unwrap();
        assert_eq!(s.age_ms, 0);
    }

    #[test]
    fn test_read_all_in_order() {
        let mut a = MockSensor::new("a", 1.0);
        let mut b = MockSensor::new("b", 2.0);
        let mut registry = CapabilityRegistry::new();
        registry.register_sensor(&mut b).unwrap();
        registry.register_sensor(&mut a).unwrap();

        let all = SensorSampler::new(10_000).read_all(&mut registry, 0);
        let ids: std::vec::Vec<&str> = all.iter().map(|s| s.descriptor.id).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(all[1].value(), Some(1.0));
    }
}
