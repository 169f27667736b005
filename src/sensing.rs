// Plantey — Sensor Suite
//
// Turns raw ADC counts and climate readings into an `EnvironmentSnapshot`.
// Soil and light are EMA-smoothed and mapped to percent through a two-point
// calibration; climate keeps the last good reading when a read fails.

use crate::config::*;
use crate::events::{CalibrationTarget, EnvironmentSnapshot};

/// Temperature (°C) and relative humidity (%) from the climate sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// Hardware behind the suite.
pub trait SensorBackend {
    fn read_soil_raw(&mut self) -> anyhow::Result<u16>;
    fn read_light_raw(&mut self) -> anyhow::Result<u16>;
    fn read_climate(&mut self) -> anyhow::Result<ClimateReading>;
}

/// Two-point calibration: `high` is the raw count meaning 0 %, `low` the
/// count meaning 100 % (both probes read lower when wetter / brighter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    pub low: u16,
    pub high: u16,
}

impl Calibration {
    fn from_pair(a: u16, b: u16) -> Option<Self> {
        (a != b).then(|| Self { low: a.min(b), high: a.max(b) })
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Ema {
    value: Option<f32>,
}

impl Ema {
    fn push(&mut self, sample: u16, alpha: f32) -> f32 {
        let next = match self.value {
            None => f32::from(sample),
            Some(prev) => (1.0 - alpha) * prev + alpha * f32::from(sample),
        };
        self.value = Some(next);
        next
    }
}

pub struct SensorSuite<B> {
    backend: B,
    soil: Calibration,
    light: Calibration,
    soil_filter: Ema,
    light_filter: Ema,
    last: EnvironmentSnapshot,
}

impl<B: SensorBackend> SensorSuite<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            soil: Calibration { low: SOIL_RAW_WET_DEFAULT, high: SOIL_RAW_DRY_DEFAULT },
            light: Calibration { low: LIGHT_RAW_BRIGHT_DEFAULT, high: LIGHT_RAW_DARK_DEFAULT },
            soil_filter: Ema::default(),
            light_filter: Ema::default(),
            last: EnvironmentSnapshot::default(),
        }
    }

    pub fn sample(&mut self) -> EnvironmentSnapshot {
        match self.backend.read_climate() {
            Ok(c) if !c.temperature_c.is_nan() && !c.humidity_pct.is_nan() => {
                self.last.temperature_c = c.temperature_c;
                self.last.humidity_pct = c.humidity_pct;
                self.last.climate_valid = true;
            }
            Ok(_) => log::debug!("Climate read returned NaN — keeping last reading"),
            Err(e) => log::warn!("Climate read failed: {}", e),
        }

        match self.backend.read_soil_raw() {
            Ok(raw) => {
                let filtered = self.soil_filter.push(raw, SOIL_ALPHA);
                self.last.soil_raw = raw;
                self.last.soil_moisture_pct = map_to_percent(filtered, self.soil);
                self.last.soil_valid = true;
            }
            Err(e) => {
                log::warn!("Soil ADC read failed: {}", e);
                self.last.soil_valid = false;
            }
        }

        match self.backend.read_light_raw() {
            Ok(raw) => {
                let filtered = self.light_filter.push(raw, LIGHT_ALPHA);
                self.last.light_raw = raw;
                self.last.light_pct = map_to_percent(filtered, self.light);
                self.last.light_valid = true;
            }
            Err(e) => {
                log::warn!("Light ADC read failed: {}", e);
                self.last.light_valid = false;
            }
        }

        self.last
    }

    pub fn last(&self) -> &EnvironmentSnapshot {
        &self.last
    }

    /// Equal counts are ignored and the previous calibration stays.
    pub fn set_soil_calibration(&mut self, dry: u16, wet: u16) {
        match Calibration::from_pair(dry, wet) {
            Some(cal) => {
                self.soil = cal;
                log::info!("Soil calibration: wet={} dry={}", cal.low, cal.high);
            }
            None => log::warn!("Soil calibration rejected (dry == wet == {})", dry),
        }
    }

    /// Equal counts are ignored and the previous calibration stays.
    pub fn set_light_calibration(&mut self, dark: u16, bright: u16) {
        match Calibration::from_pair(dark, bright) {
            Some(cal) => {
                self.light = cal;
                log::info!("Light calibration: bright={} dark={}", cal.low, cal.high);
            }
            None => log::warn!("Light calibration rejected (dark == bright == {})", dark),
        }
    }

    /// Use the latest raw reading as one end of a calibration.  Skipped
    /// when that dimension has no valid reading yet.
    pub fn capture_calibration(&mut self, target: CalibrationTarget) {
        let soil_raw = self.last.soil_raw;
        let light_raw = self.last.light_raw;
        let valid = match target {
            CalibrationTarget::SoilDry | CalibrationTarget::SoilWet => self.last.soil_valid,
            CalibrationTarget::LightDark | CalibrationTarget::LightBright => self.last.light_valid,
        };
        if !valid {
            log::warn!("Calibration capture {:?} skipped: no valid reading", target);
            return;
        }
        match target {
            CalibrationTarget::SoilDry     => self.set_soil_calibration(soil_raw, self.soil.low),
            CalibrationTarget::SoilWet     => self.set_soil_calibration(self.soil.high, soil_raw),
            CalibrationTarget::LightDark   => self.set_light_calibration(light_raw, self.light.low),
            CalibrationTarget::LightBright => self.set_light_calibration(self.light.high, light_raw),
        }
    }

    pub fn soil_calibration(&self) -> Calibration {
        self.soil
    }

    pub fn light_calibration(&self) -> Calibration {
        self.light
    }
}

/// Inverted linear map: `cal.high` → 0 %, `cal.low` → 100 %.
fn map_to_percent(raw: f32, cal: Calibration) -> f32 {
    if cal.high == cal.low {
        return f32::NAN;
    }
    let span = f32::from(cal.high) - f32::from(cal.low);
    let fraction = ((raw - f32::from(cal.low)) / span).clamp(0.0, 1.0);
    (1.0 - fraction) * 100.0
}
