// Plantey — Ambient Music Policy
//
// Decides when the background loop may run.  It sits above the engine: the
// engine only reports whether something plays and whether that is ambient.

use crate::config::AMBIENT_COOLDOWN_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbientAction {
    None,
    Start,
    Stop,
}

#[derive(Debug, Clone)]
pub struct AmbientPolicy {
    enabled: bool,
    cooldown_ms: u32,
    last_foreground_ms: u32,
}

impl AmbientPolicy {
    pub fn new(enabled: bool, now_ms: u32) -> Self {
        Self {
            enabled,
            cooldown_ms: AMBIENT_COOLDOWN_MS,
            last_foreground_ms: now_ms,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// A button gesture or a foreground sound just happened.
    pub fn note_foreground(&mut self, now_ms: u32) {
        self.last_foreground_ms = now_ms;
    }

    /// `on_face`: the face page is showing.  `playing` / `ambient_active`
    /// mirror the engine queries.
    pub fn decide(&mut self, now_ms: u32, on_face: bool, playing: bool, ambient_active: bool) -> AmbientAction {
        if ambient_active {
            let quiet = now_ms.wrapping_sub(self.last_foreground_ms) >= self.cooldown_ms;
            return if !self.enabled || !on_face || !quiet {
                AmbientAction::Stop
            } else {
                AmbientAction::None
            };
        }

        if playing {
            // Foreground sound keeps pushing the resume point back.
            self.last_foreground_ms = now_ms;
            return AmbientAction::None;
        }

        if self.enabled && on_face && now_ms.wrapping_sub(self.last_foreground_ms) >= self.cooldown_ms {
            AmbientAction::Start
        } else {
            AmbientAction::None
        }
    }
}
