// Plantey — System Events & Data Types

use crate::profile::CareProfile;

// ---------------------------------------------------------------------------
// Environment Snapshot (one sensing pass)
// ---------------------------------------------------------------------------

/// Immutable per-sample record of the plant's surroundings.
///
/// Invalid dimensions carry `NaN` plus a cleared validity flag; the raw ADC
/// counts are kept for the debug page and for calibration capture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentSnapshot {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub climate_valid: bool,

    pub soil_raw: u16,
    pub soil_moisture_pct: f32,
    pub soil_valid: bool,

    pub light_raw: u16,
    pub light_pct: f32,
    pub light_valid: bool,
}

impl Default for EnvironmentSnapshot {
    fn default() -> Self {
        Self {
            temperature_c: f32::NAN,
            humidity_pct: f32::NAN,
            climate_valid: false,
            soil_raw: 0,
            soil_moisture_pct: f32::NAN,
            soil_valid: false,
            light_raw: 0,
            light_pct: f32::NAN,
            light_valid: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Button Events
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    Left,
    Right,
    /// Both physical buttons held together, debounced as its own button.
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEventKind {
    Pressed,
    Released,
    Click,
    LongPress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub kind: ButtonEventKind,
    pub id: ButtonId,
}

impl ButtonEvent {
    pub const fn new(kind: ButtonEventKind, id: ButtonId) -> Self {
        Self { kind, id }
    }
}

// ---------------------------------------------------------------------------
// Calibration
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationTarget {
    SoilDry,
    SoilWet,
    LightDark,
    LightBright,
}

impl CalibrationTarget {
    /// Parse the names used by the remote control surface.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "soildry"     => Some(Self::SoilDry),
            "soilwet"     => Some(Self::SoilWet),
            "lightdark"   => Some(Self::LightDark),
            "lightbright" => Some(Self::LightBright),
            _             => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Commands — sent to the companion loop via channel
// ---------------------------------------------------------------------------
#[derive(Debug, Clone)]
pub enum Command {
    /// Play the demo chord (foreground sound).
    PlayDemo,
    /// Capture the current raw reading as a calibration bound.
    Calibrate(CalibrationTarget),
    /// Apply a decoded care profile to the mood thresholds.
    ApplyProfile(CareProfile),
    /// Drop the active profile and restore default thresholds.
    ResetProfile,
    /// Nudge display contrast.
    AdjustContrast(i8),
    /// Enable or disable the ambient melody.
    SetAmbient(bool),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calibration_names_are_case_insensitive() {
        assert_eq!(CalibrationTarget::from_name("soilDry"), Some(CalibrationTarget::SoilDry));
        assert_eq!(CalibrationTarget::from_name("LIGHTBRIGHT"), Some(CalibrationTarget::LightBright));
        assert_eq!(CalibrationTarget::from_name("pump"), None);
    }

    #[test]
    fn default_snapshot_is_fully_invalid() {
        let env = EnvironmentSnapshot::default();
        assert!(!env.climate_valid && !env.soil_valid && !env.light_valid);
        assert!(env.soil_moisture_pct.is_nan());
    }
}
