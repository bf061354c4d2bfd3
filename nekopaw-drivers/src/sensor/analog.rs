//! Analog sensor
//!
//! Linear ADC channel: `value = raw * scale + offset`. Covers battery
//! dividers, light sensors and analog temperature parts such as the TMP36.

use nekopaw_core::traits::{SensorAdapter, SensorInfo, SensorReading};

/// ADC reading trait for platform abstraction
pub trait AdcReader {
    /// Read a raw ADC value
    #[allow(clippy::result_unit_err)]
    fn read(&mut self) -> Result<u16, ()>;
}

/// Linear analog sensor on an ADC channel
pub struct AnalogSensor<ADC> {
    info: SensorInfo,
    adc: ADC,
    scale: f32,
    offset: f32,
    /// Raw values at or beyond these rails are treated as open/short circuit
    rails: Option<(u16, u16)>,
}

impl<ADC: AdcReader> AnalogSensor<ADC> {
    /// Sensor reporting the raw ADC count
    pub fn new(info: SensorInfo, adc: ADC) -> Self {
        Self {
            info,
            adc,
            scale: 1.0,
            offset: 0.0,
            rails: None,
        }
    }

    /// Sensor reporting millivolts at the pin
    ///
    /// # Arguments
    /// - `vref_mv`: Reference voltage in millivolts (typically 3300)
    /// - `adc_max`: Full-scale count (4095 for 12-bit)
    pub fn millivolts(info: SensorInfo, adc: ADC, vref_mv: u16, adc_max: u16) -> Self {
        let scale = f32::from(vref_mv) / f32::from(adc_max.max(1));
        Self::new(info, adc).with_scale(scale, 0.0)
    }

    pub fn with_scale(mut self, scale: f32, offset: f32) -> Self {
        self.scale = scale;
        self.offset = offset;
        self
    }

    /// Reject raw values `<= low` or `>= high`
    ///
    /// Useful for divider circuits where a stuck rail means a disconnected
    /// or shorted sensor.
    pub fn with_rails(mut self, low: u16, high: u16) -> Self {
        self.rails = Some((low, high));
        self
    }

    /// Convert a raw ADC count, or `None` if it sits on a rail
    pub fn convert(&self, raw: u16) -> Option<f32> {
        if let Some((low, high)) = self.rails {
            if raw <= low || raw >= high {
                return None;
            }
        }
        Some(f32::from(raw) * self.scale + self.offset)
    }
}

impl<ADC: AdcReader> SensorAdapter for AnalogSensor<ADC> {
    fn info(&self) -> SensorInfo {
        self.info
    }

    fn read(&mut self, now_ms: u32) -> SensorReading {
        match self.adc.read().ok().and_then(|raw| self.convert(raw)) {
            Some(value) if value.is_finite() => SensorReading::new(value, now_ms),
            _ => SensorReading::invalid(now_ms),
        }
    }
}

#[cfg(test)]
pub struct DummyAdc(pub Option<u16>);

#[cfg(test)]
impl AdcReader for DummyAdc {
    fn read(&mut self) -> Result<u16, ()> {
        self.0.ok_or(())
    }
}
