// Plantey — Mood Evaluation
//
// Maps an environment snapshot onto a mood, the face to draw for it, a care
// tip, and one-shot audio cues.  The decision order below is fixed: soil
// first, then temperature extremes, then light, then the sleepy/joyful
// fallbacks.

use crate::config::*;
use crate::events::EnvironmentSnapshot;

// ---------------------------------------------------------------------------
// Mood & Face
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoodKind {
    Joyful,
    /// Placeholder shown until the first evaluation.
    #[default]
    Content,
    Thirsty,
    Overwatered,
    Sleepy,
    SeekingLight,
    TooBright,
    TooHot,
    TooCold,
    Curious,
}

impl MoodKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Joyful       => "Joyful",
            Self::Content      => "Content",
            Self::Thirsty      => "Thirsty",
            Self::Overwatered  => "Soggy",
            Self::Sleepy       => "Sleepy",
            Self::SeekingLight => "Need light",
            Self::TooBright    => "Too bright",
            Self::TooHot       => "Too hot",
            Self::TooCold      => "Too cold",
            Self::Curious      => "Curious",
        }
    }
}

/// Knobs describing the rendered face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceExpression {
    pub gaze_x: i8,       // -6 .. +6 horizontal pupil offset
    pub gaze_y: i8,       // -4 .. +4 vertical pupil offset
    pub eye_openness: i8, // -4 .. +4 (negative = sleepy, positive = wide)
    pub eye_smile: i8,    // -4 .. +4 lid curvature
    pub mouth_curve: i8,  // -4 .. +4 (negative = frown)
    pub mouth_open: i8,   //  0 .. +4
    pub blush: bool,
    pub wink_left: bool,
    pub wink_right: bool,
    pub sparkle: bool,
    pub tear: bool,
    pub sweat: bool,
    pub heart: bool,
    /// Milliseconds since the last button gesture, saturating.
    pub interaction_pulse_ms: u16,
}

impl FaceExpression {
    /// A neutral face with every flag cleared.
    pub const NEUTRAL: Self = Self {
        gaze_x: 0,
        gaze_y: 0,
        eye_openness: 0,
        eye_smile: 0,
        mouth_curve: 0,
        mouth_open: 0,
        blush: false,
        wink_left: false,
        wink_right: false,
        sparkle: false,
        tear: false,
        sweat: false,
        heart: false,
        interaction_pulse_ms: u16::MAX,
    };

    pub fn pulse_visible(&self) -> bool {
        self.interaction_pulse_ms < INTERACTION_PULSE_VISIBLE_MS
    }
}

impl Default for FaceExpression {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoodResult {
    pub mood: MoodKind,
    pub face: FaceExpression,
    pub tip: &'static str,
    pub play_hydration_cue: bool,
    pub play_celebration_cue: bool,
}

impl Default for MoodResult {
    fn default() -> Self {
        Self {
            mood: MoodKind::Content,
            face: FaceExpression::NEUTRAL,
            tip: "",
            play_hydration_cue: false,
            play_celebration_cue: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-mood table
// ---------------------------------------------------------------------------

struct MoodStyle {
    face: FaceExpression,
    tip: &'static str,
}

const fn face(gaze_x: i8, gaze_y: i8, eye_openness: i8, eye_smile: i8, mouth_curve: i8, mouth_open: i8) -> FaceExpression {
    FaceExpression {
        gaze_x,
        gaze_y,
        eye_openness,
        eye_smile,
        mouth_curve,
        mouth_open,
        ..FaceExpression::NEUTRAL
    }
}

const JOYFUL: MoodStyle = MoodStyle {
    face: FaceExpression { blush: true, sparkle: true, ..face(0, 0, 2, 3, 3, 1) },
    tip: "Everything feels balanced!",
};
const THIRSTY: MoodStyle = MoodStyle {
    face: FaceExpression { tear: true, ..face(0, 1, -2, -1, -3, 0) },
    tip: "Please water the plant soon.",
};
const OVERWATERED: MoodStyle = MoodStyle {
    face: face(0, 2, -3, -2, -3, 1),
    tip: "Let the soil dry before watering.",
};
const SLEEPY: MoodStyle = MoodStyle {
    face: face(0, 2, -4, 1, -1, 0),
    tip: "Dim light -> nap time.",
};
const SEEKING_LIGHT: MoodStyle = MoodStyle {
    face: face(0, -2, 0, -1, -1, 0),
    tip: "Move me closer to the window.",
};
const TOO_BRIGHT: MoodStyle = MoodStyle {
    face: face(-2, 0, -1, -3, -2, 1),
    tip: "Shade me or rotate the pot.",
};
const TOO_HOT: MoodStyle = MoodStyle {
    face: FaceExpression { sweat: true, ..face(1, 0, -1, -2, -2, 2) },
    tip: "Hot! Improve airflow.",
};
const TOO_COLD: MoodStyle = MoodStyle {
    face: face(2, 0, 1, -1, -1, 0),
    tip: "Feeling chilly, move indoors.",
};
const CURIOUS: MoodStyle = MoodStyle {
    face: FaceExpression { wink_right: true, ..face(0, 0, 1, 1, 1, 1) },
    tip: "Sensors calibrating...",
};

fn style_for(mood: MoodKind) -> &'static MoodStyle {
    match mood {
        MoodKind::Joyful | MoodKind::Content => &JOYFUL,
        MoodKind::Thirsty      => &THIRSTY,
        MoodKind::Overwatered  => &OVERWATERED,
        MoodKind::Sleepy       => &SLEEPY,
        MoodKind::SeekingLight => &SEEKING_LIGHT,
        MoodKind::TooBright    => &TOO_BRIGHT,
        MoodKind::TooHot       => &TOO_HOT,
        MoodKind::TooCold      => &TOO_COLD,
        MoodKind::Curious      => &CURIOUS,
    }
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Decision thresholds.  Not validated: an inverted pair simply makes one
/// of its moods unreachable or permanent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub soil_dry_pct: f32,
    pub soil_soggy_pct: f32,
    pub light_low_pct: f32,
    pub light_high_pct: f32,
    pub comfort_temp_min_c: f32,
    pub comfort_temp_max_c: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            soil_dry_pct: SOIL_DRY_THRESHOLD_PCT,
            soil_soggy_pct: SOIL_SOGGY_THRESHOLD_PCT,
            light_low_pct: LIGHT_LOW_THRESHOLD_PCT,
            light_high_pct: LIGHT_HIGH_THRESHOLD_PCT,
            comfort_temp_min_c: COMFORT_TEMP_MIN_C,
            comfort_temp_max_c: COMFORT_TEMP_MAX_C,
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MoodEngine {
    thresholds: Thresholds,
    last_hydration_alert: bool,
    last_celebration: bool,
}

impl MoodEngine {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            last_hydration_alert: false,
            last_celebration: false,
        }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn set_soil_thresholds(&mut self, dry_pct: f32, soggy_pct: f32) {
        self.thresholds.soil_dry_pct = dry_pct;
        self.thresholds.soil_soggy_pct = soggy_pct;
    }

    pub fn set_light_thresholds(&mut self, low_pct: f32, high_pct: f32) {
        self.thresholds.light_low_pct = low_pct;
        self.thresholds.light_high_pct = high_pct;
    }

    pub fn set_temperature_comfort_range(&mut self, min_c: f32, max_c: f32) {
        self.thresholds.comfort_temp_min_c = min_c;
        self.thresholds.comfort_temp_max_c = max_c;
    }

    pub fn evaluate(&mut self, env: &EnvironmentSnapshot) -> MoodResult {
        let t = &self.thresholds;

        let soil = valid(env.soil_valid, env.soil_moisture_pct);
        let light = valid(env.light_valid, env.light_pct);
        let temp = valid(env.climate_valid, env.temperature_c);

        let is_dry = soil.is_some_and(|s| s <= t.soil_dry_pct);
        let is_soggy = soil.is_some_and(|s| s >= t.soil_soggy_pct);
        let too_hot = temp.is_some_and(|c| c >= t.comfort_temp_max_c + 2.0);
        let too_cold = temp.is_some_and(|c| c <= t.comfort_temp_min_c - 2.0);
        let needs_light = light.is_some_and(|l| l <= t.light_low_pct);
        let too_bright = light.is_some_and(|l| l >= t.light_high_pct);
        let sleepy = light.is_some_and(|l| l < t.light_low_pct + 8.0)
            && temp.map_or(true, |c| c < t.comfort_temp_min_c + 1.5);

        let celebratory = soil.is_some()
            && !is_dry
            && !is_soggy
            && light.is_some()
            && !needs_light
            && !too_bright
            && temp.is_some_and(|c| c > t.comfort_temp_min_c && c < t.comfort_temp_max_c);

        let mood = if is_dry {
            MoodKind::Thirsty
        } else if is_soggy {
            MoodKind::Overwatered
        } else if too_hot {
            MoodKind::TooHot
        } else if too_cold {
            MoodKind::TooCold
        } else if needs_light {
            MoodKind::SeekingLight
        } else if too_bright {
            MoodKind::TooBright
        } else if sleepy {
            MoodKind::Sleepy
        } else if soil.is_some() || light.is_some() || temp.is_some() {
            MoodKind::Joyful
        } else {
            MoodKind::Curious
        };

        let style = style_for(mood);
        let result = MoodResult {
            mood,
            face: style.face,
            tip: style.tip,
            play_hydration_cue: is_dry && !self.last_hydration_alert,
            play_celebration_cue: celebratory && !self.last_celebration,
        };

        self.last_hydration_alert = is_dry;
        self.last_celebration = celebratory;

        result
    }
}

/// A dimension votes only when flagged valid and not NaN.
fn valid(flag: bool, value: f32) -> Option<f32> {
    (flag && !value.is_nan()).then_some(value)
}
