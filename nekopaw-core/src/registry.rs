//! Capability registry
//!
//! Holds non-owning `&'a mut dyn` borrows of the application's adapters,
//! grouped by category. The application owns the adapters and registers
//! them once at setup; the borrow checker keeps the registry from outliving
//! them.

use heapless::Vec;
use nekopaw_protocol::Category;

use crate::error::BridgeError;
use crate::traits::{
    DisplayAdapter, DisplayCapabilities, InputAdapter, OutputAdapter, SensorAdapter, SensorInfo,
};

/// Maximum sensors per registry
pub const MAX_SENSORS: usize = 16;

/// Maximum inputs per registry
pub const MAX_INPUTS: usize = 16;

/// Maximum outputs per registry
pub const MAX_OUTPUTS: usize = 16;

/// Descriptor id of the display slot
pub const DISPLAY_ID: &str = "display";

/// A registered capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CapabilityDescriptor {
    /// Unique within the category
    pub id: &'static str,
    pub category: Category,
    /// Adapter kind, e.g. `"button"` or `"epaper"`
    pub kind: &'static str,
}

impl CapabilityDescriptor {
    pub const fn new(id: &'static str, category: Category, kind: &'static str) -> Self {
        Self { id, category, kind }
    }
}

pub(crate) struct Slot<'a, A: ?Sized> {
    pub(crate) descriptor: CapabilityDescriptor,
    pub(crate) adapter: &'a mut A,
}

/// Registry of capability adapters
///
/// Lookups are linear scans; slot counts are small and fixed.
pub struct CapabilityRegistry<'a> {
    display: Option<Slot<'a, dyn DisplayAdapter + 'a>>,
    sensors: Vec<Slot<'a, dyn SensorAdapter + 'a>, MAX_SENSORS>,
    inputs: Vec<Slot<'a, dyn InputAdapter + 'a>, MAX_INPUTS>,
    outputs: Vec<Slot<'a, dyn OutputAdapter + 'a>, MAX_OUTPUTS>,
}

impl Default for CapabilityRegistry<'_> {
    fn default() -> Self {
        Self::new()
    }
}

fn check_id<A: ?Sized>(slots: &[Slot<'_, A>], id: &str) -> Result<(), BridgeError> {
    if id.is_empty() {
        return Err(BridgeError::InvalidContent);
    }
    if slots.iter().any(|s| s.descriptor.id == id) {
        return Err(BridgeError::DuplicateId);
    }
    Ok(())
}

impl<'a> CapabilityRegistry<'a> {
    pub const fn new() -> Self {
        Self {
            display: None,
            sensors: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Register a sensor
    ///
    /// Fails with `DuplicateId` if a sensor with the same id exists and
    /// `CapacityExceeded` when all slots are taken.
    pub fn register_sensor(
        &mut self,
        adapter: &'a mut dyn SensorAdapter,
    ) -> Result<CapabilityDescriptor, BridgeError> {
        let info = adapter.info();
        check_id(&self.sensors, info.id)?;
        let descriptor = CapabilityDescriptor::new(info.id, Category::Sensor, info.kind);
        self.sensors
            .push(Slot {
                descriptor,
                adapter,
            })
            .map_err(|_| BridgeError::CapacityExceeded)?;
        Ok(descriptor)
    }

    /// Register an input
    pub fn register_input(
        &mut self,
        adapter: &'a mut dyn InputAdapter,
    ) -> Result<CapabilityDescriptor, BridgeError> {
        let info = adapter.info();
        check_id(&self.inputs, info.id)?;
        let descriptor = CapabilityDescriptor::new(info.id, Category::Input, info.kind);
        self.inputs
            .push(Slot {
                descriptor,
                adapter,
            })
            .map_err(|_| BridgeError::CapacityExceeded)?;
        Ok(descriptor)
    }

    /// Register an output
    pub fn register_output(
        &mut self,
        adapter: &'a mut dyn OutputAdapter,
    ) -> Result<CapabilityDescriptor, BridgeError> {
        let info = adapter.info();
        check_id(&self.outputs, info.id)?;
        let descriptor = CapabilityDescriptor::new(info.id, Category::Output, info.kind);
        self.outputs
            .push(Slot {
                descriptor,
                adapter,
            })
            .map_err(|_| BridgeError::CapacityExceeded)?;
        Ok(descriptor)
    }

    /// Install the display, replacing any previous one
    pub fn set_display(&mut self, adapter: &'a mut dyn DisplayAdapter) -> CapabilityDescriptor {
        let caps = adapter.capabilities();
        let descriptor = CapabilityDescriptor::new(DISPLAY_ID, Category::Display, caps.kind);
        self.display = Some(Slot {
            descriptor,
            adapter,
        });
        descriptor
    }

    /// Look up a descriptor
    pub fn find(&self, category: Category, id: &str) -> Result<CapabilityDescriptor, BridgeError> {
        let found = match category {
            Category::Display => self
                .display
                .as_ref()
                .map(|s| s.descriptor)
                .filter(|d| d.id == id),
            Category::Sensor => find_in(&self.sensors, id),
            Category::Input => find_in(&self.inputs, id),
            Category::Output => find_in(&self.outputs, id),
        };
        found.ok_or(BridgeError::NotFound)
    }

    /// Descriptors of a category in registration order
    pub fn list(&self, category: Category) -> Vec<CapabilityDescriptor, MAX_SENSORS> {
        // All categories share the same slot bound, so collection cannot fail
        match category {
            Category::Display => self.display.iter().map(|s| s.descriptor).collect(),
            Category::Sensor => self.sensors.iter().map(|s| s.descriptor).collect(),
            Category::Input => self.inputs.iter().map(|s| s.descriptor).collect(),
            Category::Output => self.outputs.iter().map(|s| s.descriptor).collect(),
        }
    }

    /// Number of registered capabilities in a category
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Display => usize::from(self.display.is_some()),
            Category::Sensor => self.sensors.len(),
            Category::Input => self.inputs.len(),
            Category::Output => self.outputs.len(),
        }
    }

    pub fn has_display(&self) -> bool {
        self.display.is_some()
    }

    /// The installed display adapter
    pub fn display_mut(&mut self) -> Option<&mut (dyn DisplayAdapter + 'a)> {
        self.display.as_mut().map(|s| &mut *s.adapter)
    }

    /// Capabilities of the installed display
    pub fn display_capabilities(&self) -> Option<DisplayCapabilities> {
        self.display.as_ref().map(|s| s.adapter.capabilities())
    }

    /// Metadata of every sensor in registration order
    pub fn sensor_infos(&self) -> Vec<SensorInfo, MAX_SENSORS> {
        self.sensors.iter().map(|s| s.adapter.info()).collect()
    }

    /// A registered sensor
    pub fn sensor_mut(&mut self, id: &str) -> Option<&mut (dyn SensorAdapter + 'a)> {
        self.sensors
            .iter_mut()
            .find(|s| s.descriptor.id == id)
            .map(|s| &mut *s.adapter)
    }

    /// A registered output
    pub fn output_mut(&mut self, id: &str) -> Option<&mut (dyn OutputAdapter + 'a)> {
        self.outputs
            .iter_mut()
            .find(|s| s.descriptor.id == id)
            .map(|s| &mut *s.adapter)
    }

    /// A registered input
    pub fn input_mut(&mut self, id: &str) -> Option<&mut (dyn InputAdapter + 'a)> {
        self.inputs
            .iter_mut()
            .find(|s| s.descriptor.id == id)
            .map(|s| &mut *s.adapter)
    }

    pub(crate) fn sensors_mut(&mut self) -> &mut [Slot<'a, dyn SensorAdapter + 'a>] {
        &mut self.sensors
    }

    pub(crate) fn inputs_mut(&mut self) -> &mut [Slot<'a, dyn InputAdapter + 'a>] {
        &mut self.inputs
    }

    pub(crate) fn outputs_mut(&mut self) -> &mut [Slot<'a, dyn OutputAdapter + 'a>] {
        &mut self.outputs
    }
}

fn find_in<A: ?Sized>(slots: &[Slot<'_, A>], id: &str) -> Option<CapabilityDescriptor> {
    slots
        .iter()
        .find(|s| s.descriptor.id == id)
        .map(|s| s.descriptor)
}


#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;

    #[test]
    fn test_register_and_find() {
        let mut temp = MockSensor::new("temp", 21.5);
        let mut btn = MockInput::new("btn1");
        let mut led = MockOutput::new("led");

        let mut registry = CapabilityRegistry::new();
        registry.register_sensor(&mut temp).unwrap();
        registry.register_input(&mut btn).unwrap();
        registry.register_output(&mut led).unwrap();

        let d = registry.find(Category::Sensor, "temp").unwrap();
        assert_eq!(d.kind, "temperature");
        assert_eq!(d.category, Category::Sensor);
        assert_eq!(
            registry.find(Category::Output, "temp"),
            Err(BridgeError::NotFound)
        );
        assert_eq!(registry.count(Category::Input), 1);
    }

    #[test]
    fn test_duplicate_id_per_category() {
        let mut a = MockSensor::new("x", 1.0);
        let mut b = MockSensor::new("x", 2.0);
        let mut out = MockOutput::new("x");

        let mut registry = CapabilityRegistry::new();
        registry.register_sensor(&mut a).unwrap();
        assert_eq!(
            registry.register_sensor(&mut b).unwrap_err(),
            BridgeError::DuplicateId
        );
        // Same id in another category is fine
        registry.register_output(&mut out).unwrap();
        assert_eq!(registry.count(Category::Sensor), 1);
    }

    #[test]
    fn test_empty_id_rejected() {
        let mut s = MockSensor::new("", 1.0);
        let mut registry = CapabilityRegistry::new();
        assert_eq!(
            registry.register_sensor(&mut s).unwrap_err(),
            BridgeError::InvalidContent
        );
    }

    #[test]
    fn test_capacity_exceeded() {
        const IDS: [&str; MAX_OUTPUTS + 1] = [
            "o0", "o1", "o2", "o3", "o4", "o5", "o6", "o7", "o8", "o9", "o10", "o11", "o12",
            "o13", "o14", "o15", "o16",
        ];
        let mut outputs: std::vec::Vec<MockOutput> =
            IDS.iter().map(|&id| MockOutput::new(id)).collect();
        let mut registry = CapabilityRegistry::new();
        let mut results = std::vec::Vec::new();
        for o in outputs.iter_mut() {
            results.push(registry.register_output(o));
        }
        assert!(results[..MAX_OUTPUTS].iter().all(|r| r.is_ok()));
        assert_eq!(results[MAX_OUTPUTS], Err(BridgeError::CapacityExceeded));
    }

    #[test]
    fn test_set_display_last_write_wins() {
        let mut first = MockDisplay::new(80, 128, false);
        let mut second = MockDisplay::new(296, 128, true);
        second.caps.kind = "oled";

        let mut registry = CapabilityRegistry::new();
        assert!(!registry.has_display());
        registry.set_display(&mut first);
        registry.set_display(&mut second);

        let d = registry.find(Category::Display, DISPLAY_ID).unwrap();
        assert_eq!(d.kind, "oled");
        assert_eq!(registry.count(Category::Display), 1);
        assert_eq!(registry.display_capabilities().unwrap().width, 296);
    }

    #[test]
    fn test_list_in_registration_order() {
        let mut a = MockInput::new("a");
        let mut b = MockInput::new("b");
        let mut c = MockInput::new("c");
        let mut registry = CapabilityRegistry::new();
        registry.register_input(&mut c).unwrap();
        registry.register_input(&mut a).unwrap();
        registry.register_input(&mut b).unwrap();

        let ids: std::vec::Vec<&str> = registry
            .list(Category::Input)
            .iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, ["c", "a", "b"]);
        assert!(registry.list(Category::Display).is_empty());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        const POOL: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

        proptest! {
            #[test]
            fn find_matches_first_registration(picks in proptest::collection::vec(0usize..6, 1..12)) {
                let mut sensors: std::vec::Vec<MockSensor> = picks
                    .iter()
                    .enumerate()
                    .map(|(n, &i)| MockSensor::new(POOL[i], n as f32))
                    .collect();

                let mut registry = CapabilityRegistry::new();
                let mut seen = std::collections::HashMap::new();
                for (n, s) in sensors.iter_mut().enumerate() {
                    let id = s.id;
                    let result = registry.register_sensor(s);
                    if seen.contains_key(id) {
                        prop_assert_eq!(result, Err(BridgeError::DuplicateId));
                    } else {
                        prop_assert!(result.is_ok());
                        seen.insert(id, n as f32);
                    }
                }

                prop_assert_eq!(registry.count(Category::Sensor), seen.len());
                for (id, value) in &seen {
                    prop_assert!(registry.find(Category::Sensor, id).is_ok());
                    let reading = registry.sensor_mut(id).unwrap().read(0);
                    prop_assert_eq!(reading.value, *value);
                }
            }
        }
    }
}
