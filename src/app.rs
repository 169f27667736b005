// Plantey — Companion Loop
//
// Owns every core component and drives them from one `tick(now_ms)` called
// at ~100 Hz.  Per tick:
//   1. Drain pending commands (non-blocking).
//   2. Poll the buttons and act on at most one gesture.
//   3. Sample sensors and re-evaluate the mood every 1.5 s.
//   4. Advance the buzzer sequencer and the ambient policy.
//   5. Redraw the current page when a frame is due.

use std::sync::mpsc::Receiver;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use rand::Rng;

use crate::audio::ambient::{AmbientAction, AmbientPolicy};
use crate::audio::melodies::*;
use crate::audio::{AudioEngine, MelodyStep, ToneOutput};
use crate::blink::BlinkScheduler;
use crate::config::*;
use crate::events::{ButtonEvent, ButtonEventKind, Command, EnvironmentSnapshot};
use crate::input::{ButtonInput, InputLevel};
use crate::mood::{FaceExpression, MoodEngine, MoodResult, Thresholds};
use crate::sensing::{SensorBackend, SensorSuite};
use crate::ui::face::draw_face;
use crate::ui::framebuffer::FrameBuffer;
use crate::ui::pages::{PageAction, PageController, PageId};
use crate::ui::screens;

pub struct Companion<P, O, B, R> {
    input: ButtonInput<P>,
    sensors: SensorSuite<B>,
    mood: MoodEngine,
    audio: AudioEngine<O>,
    blink: BlinkScheduler<R>,
    pages: PageController,
    ambient: AmbientPolicy,
    commands: Receiver<Command>,

    frame: FrameBuffer,
    current: MoodResult,
    last_sample_ms: Option<u32>,
    last_frame_ms: u32,
    last_interaction_ms: Option<u32>,
    heart_since_ms: Option<u32>,
    redraw: bool,

    contrast: u8,
    contrast_dirty: bool,
}

impl<P, O, B, R> Companion<P, O, B, R>
where
    P: InputLevel,
    O: ToneOutput,
    B: SensorBackend,
    R: Rng,
{
    pub fn new(
        mut input: ButtonInput<P>,
        sensors: SensorSuite<B>,
        audio: AudioEngine<O>,
        rng: R,
        commands: Receiver<Command>,
        now_ms: u32,
    ) -> Self {
        input.begin(now_ms);
        Self {
            input,
            sensors,
            mood: MoodEngine::default(),
            audio,
            blink: BlinkScheduler::new(rng, now_ms),
            pages: PageController::new(),
            ambient: AmbientPolicy::new(AMBIENT_ENABLED_DEFAULT, now_ms),
            commands,
            frame: FrameBuffer::new(),
            current: MoodResult::default(),
            last_sample_ms: None,
            last_frame_ms: now_ms,
            last_interaction_ms: None,
            heart_since_ms: None,
            redraw: true,
            contrast: DEFAULT_CONTRAST,
            contrast_dirty: false,
        }
    }

    /// Draw the boot splash into the frame buffer.
    pub fn show_splash(&mut self, line1: &str, line2: Option<&str>) {
        self.frame.clear_all();
        if let Err(e) = screens::draw_splash(&mut self.frame, line1, line2) {
            match e {}
        }
    }

    /// Start the boot chime; the first `tick` replaces the splash.
    pub fn boot(&mut self, now_ms: u32) {
        self.audio.play_melody(&BOOT_CHIME, false, false, now_ms);
        self.ambient.note_foreground(now_ms);
        log::info!("Companion booted");
    }

    /// One pass of the loop.  Returns `true` when a new frame was drawn and
    /// should be flushed to the display.
    pub fn tick(&mut self, now_ms: u32) -> bool {
        while let Ok(command) = self.commands.try_recv() {
            self.handle_command(command, now_ms);
        }

        if let Some(event) = self.input.poll(now_ms) {
            self.handle_button(event, now_ms);
        }

        let sample_due = self
            .last_sample_ms
            .map_or(true, |t| now_ms.wrapping_sub(t) >= SENSOR_SAMPLE_INTERVAL_MS);
        if sample_due {
            self.last_sample_ms = Some(now_ms);
            self.sample(now_ms);
        }

        self.audio.tick(now_ms);
        self.run_ambient(now_ms);

        let blinking = self.blink.tick(now_ms);
        if self.redraw || now_ms.wrapping_sub(self.last_frame_ms) >= FACE_FRAME_INTERVAL_MS {
            self.render(now_ms, blinking);
            self.last_frame_ms = now_ms;
            self.redraw = false;
            return true;
        }
        false
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn mood(&self) -> &MoodResult {
        &self.current
    }

    pub fn page(&self) -> PageId {
        self.pages.page()
    }

    pub fn snapshot(&self) -> &EnvironmentSnapshot {
        self.sensors.last()
    }

    pub fn thresholds(&self) -> &Thresholds {
        self.mood.thresholds()
    }

    pub fn audio(&self) -> &AudioEngine<O> {
        &self.audio
    }

    pub fn sensors(&self) -> &SensorSuite<B> {
        &self.sensors
    }

    pub fn ambient_enabled(&self) -> bool {
        self.ambient.is_enabled()
    }

    pub fn contrast(&self) -> u8 {
        self.contrast
    }

    /// New contrast value if it changed since the last call.
    pub fn take_contrast_change(&mut self) -> Option<u8> {
        std::mem::take(&mut self.contrast_dirty).then_some(self.contrast)
    }

    /// The face as it would be drawn at `now_ms`, overlays included.
    pub fn current_face(&self, now_ms: u32) -> FaceExpression {
        let mut face = self.current.face;
        face.heart = self
            .heart_since_ms
            .is_some_and(|t| now_ms.wrapping_sub(t) < CELEBRATION_HEART_MS);
        face.interaction_pulse_ms = self.last_interaction_ms.map_or(u16::MAX, |t| {
            u16::try_from(now_ms.wrapping_sub(t)).unwrap_or(u16::MAX)
        });
        face
    }

    // -----------------------------------------------------------------------
    // Sensing & mood
    // -----------------------------------------------------------------------

    fn sample(&mut self, now_ms: u32) {
        let env = self.sensors.sample();
        let result = self.mood.evaluate(&env);

        if result.mood != self.current.mood {
            log::info!(
                "Mood {} → {} ({})",
                self.current.mood.display_name(),
                result.mood.display_name(),
                result.tip
            );
            self.redraw = true;
        }

        if result.play_hydration_cue {
            log::info!("Hydration cue (soil {:.0}%)", env.soil_moisture_pct);
            self.play_foreground_melody(&HYDRATION_CUE, now_ms);
        } else if result.play_celebration_cue {
            log::info!("Celebration cue");
            self.play_foreground_melody(&CELEBRATION_CUE, now_ms);
            self.heart_since_ms = Some(now_ms);
        }

        self.current = result;
    }

    fn play_foreground_melody(&mut self, steps: &'static [MelodyStep], now_ms: u32) {
        self.audio.play_melody(steps, false, false, now_ms);
        self.ambient.note_foreground(now_ms);
    }

    // -----------------------------------------------------------------------
    // Input & commands
    // -----------------------------------------------------------------------

    fn handle_button(&mut self, event: ButtonEvent, now_ms: u32) {
        self.ambient.note_foreground(now_ms);
        if !matches!(event.kind, ButtonEventKind::Click | ButtonEventKind::LongPress) {
            return;
        }

        log::debug!("Button {:?} {:?}", event.id, event.kind);
        self.last_interaction_ms = Some(now_ms);
        self.redraw = true;

        let action = self.pages.handle_event(event);
        self.apply_page_action(action, now_ms);
    }

    fn apply_page_action(&mut self, action: PageAction, now_ms: u32) {
        if action.play_demo_chord {
            self.play_demo(now_ms);
        } else {
            self.audio.play_tone(CLICK_TONE_HZ, CLICK_TONE_MS, now_ms);
        }

        if let Some(target) = action.calibration {
            self.sensors.capture_calibration(target);
        }
        if action.contrast_delta != 0 {
            self.adjust_contrast(action.contrast_delta);
        }
        if action.toggle_ambient {
            let enabled = !self.ambient.is_enabled();
            self.ambient.set_enabled(enabled);
            log::info!("Ambient music {}", if enabled { "enabled" } else { "disabled" });
        }
    }

    fn handle_command(&mut self, command: Command, now_ms: u32) {
        log::debug!("Command {:?}", command);
        match command {
            Command::PlayDemo => self.play_demo(now_ms),
            Command::Calibrate(target) => {
                self.sensors.capture_calibration(target);
                self.redraw = true;
            }
            Command::ApplyProfile(profile) => {
                if profile.apply_to(&mut self.mood) {
                    self.last_sample_ms = None;
                }
            }
            Command::ResetProfile => {
                let defaults = Thresholds::default();
                self.mood.set_soil_thresholds(defaults.soil_dry_pct, defaults.soil_soggy_pct);
                self.mood.set_light_thresholds(defaults.light_low_pct, defaults.light_high_pct);
                self.mood
                    .set_temperature_comfort_range(defaults.comfort_temp_min_c, defaults.comfort_temp_max_c);
                log::info!("Care profile cleared, default thresholds restored");
                self.last_sample_ms = None;
            }
            Command::AdjustContrast(delta) => self.adjust_contrast(delta),
            Command::SetAmbient(enabled) => self.ambient.set_enabled(enabled),
        }
    }

    fn play_demo(&mut self, now_ms: u32) {
        self.audio
            .play_chord(&DEMO_CHORD, DEMO_CHORD_MS, CHORD_CYCLE_DEFAULT_MS, now_ms);
        self.ambient.note_foreground(now_ms);
    }

    fn adjust_contrast(&mut self, delta: i8) {
        let next = (i16::from(self.contrast) + i16::from(delta)).clamp(0, 255) as u8;
        if next != self.contrast {
            self.contrast = next;
            self.contrast_dirty = true;
            log::info!("Display contrast → {}", next);
        }
    }

    fn run_ambient(&mut self, now_ms: u32) {
        let on_face = self.pages.page() == PageId::Mood;
        let action = self.ambient.decide(
            now_ms,
            on_face,
            self.audio.is_playing(),
            self.audio.is_ambient_active(),
        );
        match action {
            AmbientAction::Start => {
                self.audio.play_melody(&AMBIENT_LOOP, true, true, now_ms);
                log::debug!("Ambient loop started");
            }
            AmbientAction::Stop => {
                self.audio.stop();
                log::debug!("Ambient loop stopped");
            }
            AmbientAction::None => {}
        }
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    fn render(&mut self, now_ms: u32, blinking: bool) {
        let face = self.current_face(now_ms);
        let env = *self.sensors.last();
        let tip = self.current.tip;
        let title = self.current.mood.display_name();
        let ambient = self.audio.is_ambient_active();
        let page = self.pages.page();
        let (index, count) = (self.pages.index(), self.pages.count());

        self.frame.clear_all();
        if let Err(e) = draw_page(&mut self.frame, page, &face, title, blinking, tip, &env, ambient) {
            match e {}
        }
        if page != PageId::Mood {
            if let Err(e) = screens::draw_footer(&mut self.frame, page, index, count) {
                match e {}
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_page<D>(
    target: &mut D,
    page: PageId,
    face: &FaceExpression,
    title: &str,
    blinking: bool,
    tip: &str,
    env: &EnvironmentSnapshot,
    ambient: bool,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    match page {
        PageId::Mood => draw_face(target, face, title, blinking),
        PageId::Stats => screens::draw_stats(target, env),
        PageId::Tips => screens::draw_tips(target, tip, env),
        PageId::Debug => screens::draw_debug(target, env, ambient),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ButtonId;
    use crate::input::Button;
    use crate::mood::MoodKind;
    use crate::profile::CareProfile;
    use crate::sensing::ClimateReading;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::mpsc::{self, Sender};

    #[derive(Clone)]
    struct FakePin(Rc<Cell<bool>>);

    impl InputLevel for FakePin {
        fn is_high(&mut self) -> bool {
            self.0.get()
        }
    }

    struct Mute;

    impl ToneOutput for Mute {
        fn set_tone(&mut self, _freq_hz: f32) {}
        fn silence(&mut self) {}
    }

    struct Fixed {
        soil: u16,
        light: u16,
    }

    impl SensorBackend for Fixed {
        fn read_soil_raw(&mut self) -> anyhow::Result<u16> {
            Ok(self.soil)
        }
        fn read_light_raw(&mut self) -> anyhow::Result<u16> {
            Ok(self.light)
        }
        fn read_climate(&mut self) -> anyhow::Result<ClimateReading> {
            Ok(ClimateReading { temperature_c: 22.0, humidity_pct: 50.0 })
        }
    }

    type TestCompanion = Companion<FakePin, Mute, Fixed, StdRng>;

    struct Rig {
        app: TestCompanion,
        left: Rc<Cell<bool>>,
        right: Rc<Cell<bool>>,
        tx: Sender<Command>,
    }

    // Pins idle high (active-low buttons).
    fn rig(soil: u16, light: u16) -> Rig {
        let left = Rc::new(Cell::new(true));
        let right = Rc::new(Cell::new(true));
        let buttons = ButtonInput::new(
            Button::new(FakePin(left.clone()), ButtonId::Left, true, BUTTON_DEBOUNCE_MS, BUTTON_LONG_PRESS_MS),
            Button::new(FakePin(right.clone()), ButtonId::Right, true, BUTTON_DEBOUNCE_MS, BUTTON_LONG_PRESS_MS),
        )
        .with_both(BUTTON_DEBOUNCE_MS, BUTTON_LONG_PRESS_MS);
        let (tx, rx) = mpsc::channel();
        let app = Companion::new(
            buttons,
            SensorSuite::new(Fixed { soil, light }),
            AudioEngine::new(Mute),
            StdRng::seed_from_u64(7),
            rx,
            0,
        );
        Rig { app, left, right, tx }
    }

    fn run(app: &mut TestCompanion, from: u32, to: u32) {
        for t in (from..to).step_by(LOOP_POLL_INTERVAL_MS as usize) {
            app.tick(t);
        }
    }

    // Comfortable readings: soil ~60 %, light ~50 %, 22 °C.
    const SOIL_OK: u16 = 2180;
    const LIGHT_OK: u16 = 1850;

    #[test]
    fn dry_soil_plays_hydration_cue_on_first_sample() {
        let mut r = rig(SOIL_RAW_DRY_DEFAULT, LIGHT_OK);
        r.app.tick(0);
        assert_eq!(r.app.mood().mood, MoodKind::Thirsty);
        assert!(r.app.audio().is_playing());
        assert!(!r.app.audio().is_ambient_active());
    }

    #[test]
    fn right_click_moves_to_stats_page() {
        let mut r = rig(SOIL_OK, LIGHT_OK);
        run(&mut r.app, 0, 100);
        r.right.set(false);
        run(&mut r.app, 100, 200);
        r.right.set(true);
        run(&mut r.app, 200, 300);
        assert_eq!(r.app.page(), PageId::Stats);
        assert!(r.left.get());
    }

    #[test]
    fn celebration_shows_heart_then_ambient_starts() {
        let mut r = rig(SOIL_OK, LIGHT_OK);
        r.app.tick(0);
        assert!(r.app.current_face(10).heart);
        assert!(!r.app.current_face(CELEBRATION_HEART_MS).heart);

        run(&mut r.app, 10, 12_000);
        assert!(r.app.audio().is_ambient_active());
    }

    #[test]
    fn disabled_ambient_stays_quiet() {
        let mut r = rig(SOIL_OK, LIGHT_OK);
        r.tx.send(Command::SetAmbient(false)).unwrap();
        run(&mut r.app, 0, 12_000);
        assert!(!r.app.ambient_enabled());
        assert!(!r.app.audio().is_playing());
    }

    #[test]
    fn profile_commands_swap_thresholds() {
        let mut r = rig(SOIL_OK, LIGHT_OK);
        let profile = CareProfile { species: "Cactus".into(), soil_dry_pct: 10.0, valid: true, ..CareProfile::default() };
        r.tx.send(Command::ApplyProfile(profile)).unwrap();
        r.app.tick(0);
        assert_eq!(r.app.thresholds().soil_dry_pct, 10.0);

        r.tx.send(Command::ResetProfile).unwrap();
        r.app.tick(10);
        assert_eq!(*r.app.thresholds(), Thresholds::default());
    }

    #[test]
    fn contrast_saturates_and_reports_once() {
        let mut r = rig(SOIL_OK, LIGHT_OK);
        for _ in 0..3 {
            r.tx.send(Command::AdjustContrast(i8::MAX)).unwrap();
        }
        r.app.tick(0);
        assert_eq!(r.app.take_contrast_change(), Some(255));
        assert_eq!(r.app.take_contrast_change(), None);
    }

    #[test]
    fn gesture_starts_interaction_pulse() {
        let mut r = rig(SOIL_OK, LIGHT_OK);
        assert_eq!(r.app.current_face(0).interaction_pulse_ms, u16::MAX);
        r.tx.send(Command::PlayDemo).unwrap();
        run(&mut r.app, 0, 100);
        r.left.set(false);
        run(&mut r.app, 100, 200);
        r.left.set(true);
        run(&mut r.app, 200, 260);
        let face = r.app.current_face(300);
        assert!(face.pulse_visible());
        assert_eq!(r.app.page(), PageId::Debug);
    }
}
