// Plantey — Melody Tables
//
// Static step tables handed to `AudioEngine::play_melody`.

use super::MelodyStep;

// Equal-tempered pitches used below (Hz).
const C5: f32 = 523.25;
const D5: f32 = 587.33;
const E5: f32 = 659.25;
const G4: f32 = 392.00;
const G5: f32 = 783.99;
const A4: f32 = 440.00;
const A5: f32 = 880.00;
const C6: f32 = 1046.50;

/// Major triad for the "play demo" action.
pub const DEMO_CHORD: [f32; 3] = [C5, E5, G5];
pub const DEMO_CHORD_MS: u16 = 900;

/// Short click acknowledging a button gesture.
pub const CLICK_TONE_HZ: f32 = 1760.0;
pub const CLICK_TONE_MS: u16 = 18;

/// Falling "I'm thirsty" phrase.
pub static HYDRATION_CUE: [MelodyStep; 4] = [
    MelodyStep::note(A5, 120, 40),
    MelodyStep::note(E5, 120, 40),
    MelodyStep::note(C5, 220, 80),
    MelodyStep::note(A4, 320, 0),
];

/// Rising arpeggio when every reading is comfortable.
pub static CELEBRATION_CUE: [MelodyStep; 5] = [
    MelodyStep::note(C5, 90, 20),
    MelodyStep::note(E5, 90, 20),
    MelodyStep::note(G5, 90, 20),
    MelodyStep::note(C6, 260, 60),
    MelodyStep::note(G5, 120, 0),
];

pub static BOOT_CHIME: [MelodyStep; 3] = [
    MelodyStep::note(G4, 80, 30),
    MelodyStep::note(C5, 80, 30),
    MelodyStep::note(E5, 160, 0),
];

/// Sparse background loop for the face page.
pub static AMBIENT_LOOP: [MelodyStep; 8] = [
    MelodyStep::note(E5, 140, 360),
    MelodyStep::note(G5, 140, 360),
    MelodyStep::note(D5, 180, 620),
    MelodyStep::rest(1200),
    MelodyStep::note(C5, 140, 360),
    MelodyStep::note(E5, 140, 360),
    MelodyStep::note(G4, 220, 900),
    MelodyStep::rest(2400),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cues_end_on_a_sounding_note() {
        for table in [&HYDRATION_CUE[..], &CELEBRATION_CUE[..], &BOOT_CHIME[..]] {
            assert!(!table.is_empty());
            assert!(!table[table.len() - 1].is_rest());
        }
    }

    #[test]
    fn ambient_loop_breathes() {
        assert!(AMBIENT_LOOP.iter().any(|s| s.is_rest()));
        assert!(AMBIENT_LOOP.iter().all(|s| s.pause_ms > 0));
    }
}
