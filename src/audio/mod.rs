// Plantey — Non-blocking Audio Engine
//
// Single-voice buzzer sequencer.  Tones, arpeggiated chords, and melodies
// are all advanced by `tick(now_ms)` from the companion loop; nothing in
// here ever sleeps.

pub mod ambient;
pub mod melodies;

use crate::config::*;

/// Whatever actually makes the sound (LEDC PWM on the device).
pub trait ToneOutput {
    /// Sound `freq_hz` until told otherwise.
    fn set_tone(&mut self, freq_hz: f32);
    fn silence(&mut self);
}

/// One entry of a melody table.  A step with no frequency or no duration is
/// a rest: nothing sounds, only the pause elapses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MelodyStep {
    pub freq_hz: f32,
    pub duration_ms: u16,
    pub pause_ms: u16,
}

impl MelodyStep {
    pub const fn note(freq_hz: f32, duration_ms: u16, pause_ms: u16) -> Self {
        Self { freq_hz, duration_ms, pause_ms }
    }

    pub const fn rest(pause_ms: u16) -> Self {
        Self { freq_hz: 0.0, duration_ms: 0, pause_ms }
    }

    pub fn is_rest(&self) -> bool {
        self.freq_hz <= 0.0 || self.duration_ms == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    Idle,
    Tone,
    Chord,
}

#[derive(Debug, Clone, Copy)]
struct Pause {
    started_ms: u32,
    duration_ms: u32,
}

#[derive(Debug, Clone, Copy)]
struct Melody {
    steps: &'static [MelodyStep],
    index: usize,
    looping: bool,
    ambient: bool,
    pause: Option<Pause>,
}

pub struct AudioEngine<O> {
    output: O,
    mode: PlaybackMode,

    chord: [f32; MAX_CHORD_NOTES],
    chord_len: usize,
    chord_index: usize,
    chord_cycle_ms: u32,
    last_chord_switch_ms: u32,

    playback_start_ms: u32,
    playback_duration_ms: u32,
    current_freq_hz: f32,

    melody: Option<Melody>,
}

impl<O: ToneOutput> AudioEngine<O> {
    pub fn new(output: O) -> Self {
        let mut engine = Self {
            output,
            mode: PlaybackMode::Idle,
            chord: [0.0; MAX_CHORD_NOTES],
            chord_len: 0,
            chord_index: 0,
            chord_cycle_ms: u32::from(CHORD_CYCLE_DEFAULT_MS),
            last_chord_switch_ms: 0,
            playback_start_ms: 0,
            playback_duration_ms: 0,
            current_freq_hz: 0.0,
            melody: None,
        };
        engine.stop();
        engine
    }

    // -----------------------------------------------------------------------
    // Foreground playback
    // -----------------------------------------------------------------------

    /// Play a single tone; `duration_ms == 0` holds it until `stop()`.
    /// A non-positive frequency is the same as `stop()`.
    pub fn play_tone(&mut self, freq_hz: f32, duration_ms: u16, now_ms: u32) {
        self.melody = None;
        if freq_hz <= 0.0 {
            self.stop();
            return;
        }
        self.start_tone(freq_hz, duration_ms, now_ms);
    }

    /// Arpeggiate up to four notes, switching every `cycle_ms` (at least
    /// 4 ms).  Extra notes are ignored; an empty chord stops playback.
    pub fn play_chord(&mut self, freqs_hz: &[f32], duration_ms: u16, cycle_ms: u16, now_ms: u32) {
        self.melody = None;
        let len = freqs_hz.len().min(MAX_CHORD_NOTES);
        if len == 0 {
            self.stop();
            return;
        }

        self.chord[..len].copy_from_slice(&freqs_hz[..len]);
        self.chord_len = len;
        self.chord_index = 0;
        self.chord_cycle_ms = u32::from(cycle_ms.max(CHORD_CYCLE_MIN_MS));
        self.mode = PlaybackMode::Chord;
        self.begin_playback(duration_ms, now_ms);
        self.apply_frequency(self.chord[0]);
        self.last_chord_switch_ms = now_ms;
    }

    /// Sequence a melody table from its first step.  An empty table leaves
    /// the engine idle.
    pub fn play_melody(&mut self, steps: &'static [MelodyStep], looping: bool, ambient: bool, now_ms: u32) {
        self.stop();
        if steps.is_empty() {
            return;
        }
        self.melody = Some(Melody {
            steps,
            index: 0,
            looping,
            ambient,
            pause: None,
        });
        self.start_step(now_ms);
    }

    /// Silence output and forget every playback state, melodies included.
    pub fn stop(&mut self) {
        self.output.silence();
        self.mode = PlaybackMode::Idle;
        self.chord_len = 0;
        self.chord_index = 0;
        self.current_freq_hz = 0.0;
        self.melody = None;
    }

    // -----------------------------------------------------------------------
    // Polling
    // -----------------------------------------------------------------------

    pub fn tick(&mut self, now_ms: u32) {
        // Inter-step pause of a running melody.
        if let Some(pause) = self.melody.as_ref().and_then(|m| m.pause) {
            if now_ms.wrapping_sub(pause.started_ms) >= pause.duration_ms {
                self.advance_melody(now_ms);
            }
            return;
        }

        if self.mode == PlaybackMode::Idle {
            return;
        }

        if self.playback_duration_ms > 0
            && now_ms.wrapping_sub(self.playback_start_ms) >= self.playback_duration_ms
        {
            if self.melody.is_some() {
                self.end_step(now_ms);
            } else {
                self.stop();
            }
            return;
        }

        if self.mode == PlaybackMode::Chord
            && self.chord_len > 1
            && now_ms.wrapping_sub(self.last_chord_switch_ms) >= self.chord_cycle_ms
        {
            self.chord_index = (self.chord_index + 1) % self.chord_len;
            self.apply_frequency(self.chord[self.chord_index]);
            self.last_chord_switch_ms = now_ms;
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Anything sounding, or a melody sequencing (pauses included).
    pub fn is_playing(&self) -> bool {
        self.mode != PlaybackMode::Idle || self.melody.is_some()
    }

    pub fn is_ambient_active(&self) -> bool {
        self.melody.is_some_and(|m| m.ambient)
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// Frequency currently driven, 0 when silent.
    pub fn current_frequency(&self) -> f32 {
        self.current_freq_hz
    }

    /// Notes held by the current chord.
    pub fn chord_notes(&self) -> &[f32] {
        &self.chord[..self.chord_len]
    }

    pub fn melody_step(&self) -> Option<usize> {
        self.melody.map(|m| m.index)
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn start_tone(&mut self, freq_hz: f32, duration_ms: u16, now_ms: u32) {
        self.chord[0] = freq_hz;
        self.chord_len = 1;
        self.chord_index = 0;
        self.mode = PlaybackMode::Tone;
        self.begin_playback(duration_ms, now_ms);
        self.apply_frequency(freq_hz);
    }

    fn begin_playback(&mut self, duration_ms: u16, now_ms: u32) {
        self.playback_start_ms = now_ms;
        self.playback_duration_ms = u32::from(duration_ms);
    }

    fn start_step(&mut self, now_ms: u32) {
        let Some(melody) = self.melody.as_ref() else {
            return;
        };
        let step = melody.steps[melody.index];
        if step.is_rest() {
            self.end_step(now_ms);
        } else {
            self.start_tone(step.freq_hz, step.duration_ms, now_ms);
        }
    }

    /// Silence the current step and wait out its pause.
    fn end_step(&mut self, now_ms: u32) {
        self.apply_frequency(0.0);
        self.mode = PlaybackMode::Idle;
        self.chord_len = 0;
        if let Some(melody) = self.melody.as_mut() {
            melody.pause = Some(Pause {
                started_ms: now_ms,
                duration_ms: u32::from(melody.steps[melody.index].pause_ms),
            });
        }
    }

    fn advance_melody(&mut self, now_ms: u32) {
        let Some(melody) = self.melody.as_mut() else {
            return;
        };
        melody.pause = None;
        melody.index += 1;
        if melody.index >= melody.steps.len() {
            if !melody.looping {
                self.stop();
                return;
            }
            melody.index = 0;
        }
        self.start_step(now_ms);
    }

    fn apply_frequency(&mut self, freq_hz: f32) {
        if freq_hz <= 0.0 {
            self.output.silence();
            self.current_freq_hz = 0.0;
            return;
        }
        self.output.set_tone(freq_hz);
        self.current_freq_hz = freq_hz;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        log: Vec<f32>,
    }

    impl ToneOutput for Recorder {
        fn set_tone(&mut self, freq_hz: f32) {
            self.log.push(freq_hz);
        }
        fn silence(&mut self) {
            self.log.push(0.0);
        }
    }

    fn engine() -> AudioEngine<Recorder> {
        AudioEngine::new(Recorder::default())
    }

    const TWO_STEP: &[MelodyStep] = &[MelodyStep::note(440.0, 100, 50), MelodyStep::note(0.0, 0, 200)];

    #[test]
    fn bounded_tone_stops_itself() {
        let mut a = engine();
        a.play_tone(880.0, 100, 0);
        assert_eq!(a.mode(), PlaybackMode::Tone);
        a.tick(99);
        assert!(a.is_playing());
        a.tick(100);
        assert!(!a.is_playing());
        assert_eq!(a.current_frequency(), 0.0);
    }

    #[test]
    fn zero_duration_tone_holds_until_stop() {
        let mut a = engine();
        a.play_tone(523.0, 0, 0);
        a.tick(60_000);
        assert_eq!(a.current_frequency(), 523.0);
        a.stop();
        assert!(!a.is_playing());
    }

    #[test]
    fn non_positive_tone_is_stop() {
        let mut a = engine();
        a.play_tone(440.0, 0, 0);
        a.play_tone(-1.0, 100, 5);
        assert_eq!(a.mode(), PlaybackMode::Idle);
        assert_eq!(a.output().log.last(), Some(&0.0));
    }

    #[test]
    fn chord_keeps_first_four_notes_and_cycles() {
        let mut a = engine();
        a.play_chord(&[100.0, 200.0, 300.0, 400.0, 500.0, 600.0], 0, 10, 0);
        assert_eq!(a.chord_notes(), &[100.0, 200.0, 300.0, 400.0]);

        let mut heard = vec![a.current_frequency()];
        for t in (10..=80).step_by(10) {
            a.tick(t);
            heard.push(a.current_frequency());
        }
        assert_eq!(heard, vec![100.0, 200.0, 300.0, 400.0, 100.0, 200.0, 300.0, 400.0, 100.0]);
    }

    #[test]
    fn chord_cycle_is_clamped() {
        let mut a = engine();
        a.play_chord(&[100.0, 200.0], 0, 1, 0);
        a.tick(3);
        assert_eq!(a.current_frequency(), 100.0);
        a.tick(4);
        assert_eq!(a.current_frequency(), 200.0);
    }

    #[test]
    fn empty_chord_stops() {
        let mut a = engine();
        a.play_tone(440.0, 0, 0);
        a.play_chord(&[], 100, 12, 0);
        assert!(!a.is_playing());
    }

    #[test]
    fn bounded_chord_stops_itself() {
        let mut a = engine();
        a.play_chord(&[300.0, 400.0], 50, 12, 0);
        for t in (12..=48).step_by(12) {
            a.tick(t);
        }
        a.tick(49);
        assert_eq!(a.mode(), PlaybackMode::Chord);
        assert!(a.current_frequency() > 0.0);

        a.tick(50);
        assert_eq!(a.mode(), PlaybackMode::Idle);
        assert_eq!(a.current_frequency(), 0.0);
        assert_eq!(a.output().log.last(), Some(&0.0));
    }

    #[test]
    fn looping_melody_restarts_after_last_pause() {
        let mut a = engine();
        a.play_melody(TWO_STEP, true, false, 0);
        assert_eq!(a.current_frequency(), 440.0);

        a.tick(100); // tone over, 50 ms pause
        assert_eq!(a.current_frequency(), 0.0);
        assert!(a.is_playing());
        a.tick(150); // rest step, 200 ms pause
        assert_eq!(a.melody_step(), Some(1));
        assert_eq!(a.current_frequency(), 0.0);
        a.tick(349);
        assert_eq!(a.melody_step(), Some(1));
        a.tick(350);
        assert_eq!(a.melody_step(), Some(0));
        assert_eq!(a.current_frequency(), 440.0);
    }

    #[test]
    fn one_shot_melody_returns_to_idle() {
        let mut a = engine();
        a.play_melody(TWO_STEP, false, false, 0);
        a.tick(100);
        a.tick(150);
        assert!(a.is_playing());
        a.tick(350);
        assert!(!a.is_playing());
        assert_eq!(a.melody_step(), None);
    }

    #[test]
    fn empty_melody_is_a_no_op() {
        let mut a = engine();
        a.play_melody(&[], true, true, 0);
        assert!(!a.is_playing());
        assert!(!a.is_ambient_active());
    }

    #[test]
    fn foreground_sound_cancels_ambient_melody() {
        let mut a = engine();
        a.play_melody(TWO_STEP, true, true, 0);
        assert!(a.is_ambient_active());

        a.play_tone(660.0, 50, 10);
        assert!(!a.is_ambient_active());
        a.tick(60);
        assert!(!a.is_playing());

        a.play_melody(TWO_STEP, true, true, 100);
        a.play_chord(&[300.0, 400.0], 50, 12, 110);
        assert!(!a.is_ambient_active());
        assert_eq!(a.mode(), PlaybackMode::Chord);
    }
}
