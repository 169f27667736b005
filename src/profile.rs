// Plantey — Care Profile
//
// Per-species thresholds.  Decoding and storage happen elsewhere; this is
// the in-memory record and how it reaches the mood engine.

use crate::mood::{MoodEngine, Thresholds};

#[derive(Debug, Clone, PartialEq)]
pub struct CareProfile {
    pub species: String,
    pub soil_dry_pct: f32,
    pub soil_soggy_pct: f32,
    pub light_low_pct: f32,
    pub light_high_pct: f32,
    pub comfort_temp_min_c: f32,
    pub comfort_temp_max_c: f32,
    pub humidity_min_pct: f32,
    pub humidity_max_pct: f32,
    pub watering_interval_hours: u16,
    pub valid: bool,
}

impl Default for CareProfile {
    fn default() -> Self {
        Self {
            species: String::new(),
            soil_dry_pct: 35.0,
            soil_soggy_pct: 85.0,
            light_low_pct: 25.0,
            light_high_pct: 90.0,
            comfort_temp_min_c: 18.0,
            comfort_temp_max_c: 28.0,
            humidity_min_pct: 35.0,
            humidity_max_pct: 70.0,
            watering_interval_hours: 72,
            valid: false,
        }
    }
}

impl CareProfile {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            soil_dry_pct: self.soil_dry_pct,
            soil_soggy_pct: self.soil_soggy_pct,
            light_low_pct: self.light_low_pct,
            light_high_pct: self.light_high_pct,
            comfort_temp_min_c: self.comfort_temp_min_c,
            comfort_temp_max_c: self.comfort_temp_max_c,
        }
    }

    /// Push the thresholds into the engine.  Profiles not marked valid are
    /// skipped.
    pub fn apply_to(&self, engine: &mut MoodEngine) -> bool {
        if !self.valid {
            log::warn!("Ignoring care profile '{}' — not valid", self.species);
            return false;
        }
        engine.set_soil_thresholds(self.soil_dry_pct, self.soil_soggy_pct);
        engine.set_light_thresholds(self.light_low_pct, self.light_high_pct);
        engine.set_temperature_comfort_range(self.comfort_temp_min_c, self.comfort_temp_max_c);
        log::info!(
            "Care profile '{}' applied (soil {:.0}-{:.0}%, light {:.0}-{:.0}%, {:.1}-{:.1}C)",
            self.species,
            self.soil_dry_pct,
            self.soil_soggy_pct,
            self.light_low_pct,
            self.light_high_pct,
            self.comfort_temp_min_c,
            self.comfort_temp_max_c
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_profile_leaves_engine_alone() {
        let mut engine = MoodEngine::default();
        let before = *engine.thresholds();
        let profile = CareProfile { soil_dry_pct: 5.0, ..CareProfile::default() };
        assert!(!profile.apply_to(&mut engine));
        assert_eq!(*engine.thresholds(), before);
    }

    #[test]
    fn valid_profile_overwrites_every_threshold() {
        let mut engine = MoodEngine::default();
        let profile = CareProfile {
            species: "Monstera".into(),
            soil_dry_pct: 20.0,
            soil_soggy_pct: 75.0,
            light_low_pct: 15.0,
            light_high_pct: 80.0,
            comfort_temp_min_c: 19.0,
            comfort_temp_max_c: 30.0,
            valid: true,
            ..CareProfile::default()
        };
        assert!(profile.apply_to(&mut engine));
        assert_eq!(*engine.thresholds(), profile.thresholds());
    }
}
