// Plantey — Button Input
//
// Debounced button handler with press, release, click, and long-press
// detection.  Designed to be polled at ~100 Hz from the companion loop.
//
// Timestamps are the wrapping millisecond counter from `now_ms()`; every
// interval is measured with `wrapping_sub`, so the counter rolling over
// after ~49 days does not disturb debouncing.

use crate::events::{ButtonEvent, ButtonEventKind, ButtonId};

/// Raw electrical level of a digital input.
pub trait InputLevel {
    fn is_high(&mut self) -> bool;
}

// ---------------------------------------------------------------------------
// Debouncer — the per-button state machine, independent of any pin
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Debouncer {
    id: ButtonId,
    debounce_ms: u16,
    long_press_ms: u16,

    last_reading: bool,
    stable: bool,
    last_change_ms: u32,

    pressed_at: Option<u32>,
    long_press_sent: bool,
}

impl Debouncer {
    pub fn new(id: ButtonId, debounce_ms: u16, long_press_ms: u16) -> Self {
        Self {
            id,
            debounce_ms,
            long_press_ms,
            last_reading: false,
            stable: false,
            last_change_ms: 0,
            pressed_at: None,
            long_press_sent: false,
        }
    }

    /// Adopt the instantaneous level as the settled state.  A button held at
    /// boot therefore reports no `Pressed`, and its release is a plain
    /// `Released` rather than a `Click`.
    pub fn prime(&mut self, active: bool, now_ms: u32) {
        self.stable = active;
        self.last_reading = active;
        self.last_change_ms = now_ms;
        self.pressed_at = None;
        self.long_press_sent = false;
    }

    /// Feed one normalised reading (`true` = active).
    pub fn update(&mut self, active: bool, now_ms: u32) -> Option<ButtonEvent> {
        // ---- debounce filter ----
        if active != self.last_reading {
            self.last_change_ms = now_ms;
            self.last_reading = active;
        }

        if now_ms.wrapping_sub(self.last_change_ms) < u32::from(self.debounce_ms) {
            // Signal still bouncing — wait.
            return None;
        }

        // ---- settled edge ----
        if active != self.stable {
            self.stable = active;

            if active {
                self.pressed_at = Some(now_ms);
                self.long_press_sent = false;
                return Some(self.event(ButtonEventKind::Pressed));
            }

            let held_ms = self.pressed_at.map(|t| now_ms.wrapping_sub(t));
            let kind = match held_ms {
                Some(ms) if !self.long_press_sent && ms >= u32::from(self.debounce_ms) => {
                    ButtonEventKind::Click
                }
                _ => ButtonEventKind::Released,
            };
            self.pressed_at = None;
            self.long_press_sent = false;
            return Some(self.event(kind));
        }

        // ---- held ----
        if self.stable && !self.long_press_sent {
            if let Some(t) = self.pressed_at {
                if now_ms.wrapping_sub(t) >= u32::from(self.long_press_ms) {
                    self.long_press_sent = true;
                    return Some(self.event(ButtonEventKind::LongPress));
                }
            }
        }

        None
    }

    /// Debounced level.
    pub fn is_pressed(&self) -> bool {
        self.stable
    }

    pub fn id(&self) -> ButtonId {
        self.id
    }

    fn event(&self, kind: ButtonEventKind) -> ButtonEvent {
        ButtonEvent::new(kind, self.id)
    }
}

// ---------------------------------------------------------------------------
// Button — a debouncer bound to one physical pin
// ---------------------------------------------------------------------------

pub struct Button<P> {
    pin: P,
    active_low: bool,
    debouncer: Debouncer,
}

impl<P: InputLevel> Button<P> {
    pub fn new(pin: P, id: ButtonId, active_low: bool, debounce_ms: u16, long_press_ms: u16) -> Self {
        Self {
            pin,
            active_low,
            debouncer: Debouncer::new(id, debounce_ms, long_press_ms),
        }
    }

    pub fn begin(&mut self, now_ms: u32) {
        let active = self.read_active();
        self.debouncer.prime(active, now_ms);
    }

    /// Call every ~10 ms from the companion loop.
    pub fn update(&mut self, now_ms: u32) -> Option<ButtonEvent> {
        let active = self.read_active();
        self.debouncer.update(active, now_ms)
    }

    pub fn is_pressed(&self) -> bool {
        self.debouncer.is_pressed()
    }

    /// Current physical level normalised against polarity (`true` = active).
    pub fn read_active(&mut self) -> bool {
        self.pin.is_high() != self.active_low
    }
}

// ---------------------------------------------------------------------------
// ButtonInput — left/right pair plus the optional "both" gesture
// ---------------------------------------------------------------------------

pub struct ButtonInput<P> {
    left: Button<P>,
    right: Button<P>,
    both: Option<Debouncer>,
    // Set once the combined press settles; cleared when both buttons are up.
    chorded: bool,
}

impl<P: InputLevel> ButtonInput<P> {
    pub fn new(left: Button<P>, right: Button<P>) -> Self {
        Self { left, right, both: None, chorded: false }
    }

    /// Also track a combined press of both buttons, debounced over the
    /// logical AND of the two pins.
    pub fn with_both(mut self, debounce_ms: u16, long_press_ms: u16) -> Self {
        self.both = Some(Debouncer::new(ButtonId::Both, debounce_ms, long_press_ms));
        self
    }

    pub fn begin(&mut self, now_ms: u32) {
        self.left.begin(now_ms);
        self.right.begin(now_ms);
        if let Some(both) = self.both.as_mut() {
            let active = self.left.is_pressed() && self.right.is_pressed();
            both.prime(active, now_ms);
            self.chorded = active;
        }
    }

    /// Sample every button and report at most one event.
    ///
    /// Priority is Both, then Left, then Right.  Every debouncer is updated
    /// on every poll and a lower-priority event raised on the same poll is
    /// discarded rather than deferred.  The combined press settles on the
    /// same poll as the later button, so with Left/Right first every Both
    /// edge would be lost.
    ///
    /// While Both is tracked, a single button's `Click` or `LongPress` is
    /// withheld if the other button is held or the press has turned into a
    /// chord.  A staggered two-button hold reports only the Both gesture.
    pub fn poll(&mut self, now_ms: u32) -> Option<ButtonEvent> {
        let left_active = self.left.read_active();
        let right_active = self.right.read_active();

        let left = self.left.debouncer.update(left_active, now_ms);
        let right = self.right.debouncer.update(right_active, now_ms);
        let both = self
            .both
            .as_mut()
            .and_then(|b| b.update(left_active && right_active, now_ms));

        let (left, right) = match self.both.as_ref().map(Debouncer::is_pressed) {
            Some(both_down) => {
                self.chorded |= both_down;
                let left_down = self.left.is_pressed();
                let right_down = self.right.is_pressed();
                let left = left.filter(|e| !self.is_chord_gesture(e.kind, right_down));
                let right = right.filter(|e| !self.is_chord_gesture(e.kind, left_down));
                if !left_down && !right_down {
                    self.chorded = false;
                }
                (left, right)
            }
            None => (left, right),
        };

        both.or(left).or(right)
    }

    fn is_chord_gesture(&self, kind: ButtonEventKind, other_down: bool) -> bool {
        matches!(kind, ButtonEventKind::Click | ButtonEventKind::LongPress)
            && (other_down || self.chorded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    const DEBOUNCE: u16 = 35;
    const LONG: u16 = 700;

    #[derive(Clone)]
    struct FakePin(Rc<Cell<bool>>);

    impl InputLevel for FakePin {
        fn is_high(&mut self) -> bool {
            self.0.get()
        }
    }

    fn fake_pin(high: bool) -> (FakePin, Rc<Cell<bool>>) {
        let level = Rc::new(Cell::new(high));
        (FakePin(level.clone()), level)
    }

    fn kinds(d: &mut Debouncer, script: &[(u32, bool)]) -> Vec<ButtonEventKind> {
        script
            .iter()
            .filter_map(|&(t, level)| d.update(level, t))
            .map(|e| e.kind)
            .collect()
    }

    #[test]
    fn bounce_inside_window_emits_nothing() {
        let mut d = Debouncer::new(ButtonId::Left, DEBOUNCE, LONG);
        d.prime(false, 0);
        let events = kinds(&mut d, &[(100, true), (110, false), (120, true), (130, false), (200, false)]);
        assert!(events.is_empty());
        assert!(!d.is_pressed());
    }

    #[test]
    fn short_press_is_pressed_then_click() {
        let mut d = Debouncer::new(ButtonId::Right, DEBOUNCE, LONG);
        d.prime(false, 0);
        let events = kinds(
            &mut d,
            &[(100, true), (120, true), (140, true), (300, false), (320, false), (340, false)],
        );
        assert_eq!(events, vec![ButtonEventKind::Pressed, ButtonEventKind::Click]);
    }

    #[test]
    fn long_press_fires_once_and_release_is_not_a_click() {
        let mut d = Debouncer::new(ButtonId::Left, DEBOUNCE, LONG);
        d.prime(false, 0);
        let mut script: Vec<(u32, bool)> = (0..400).map(|i| (100 + i * 10, true)).collect();
        script.push((4200, false));
        script.push((4250, false));
        let events = kinds(&mut d, &script);
        assert_eq!(
            events,
            vec![ButtonEventKind::Pressed, ButtonEventKind::LongPress, ButtonEventKind::Released]
        );

        // Re-press arms the long press again.
        let again: Vec<(u32, bool)> = (0..100).map(|i| (5000 + i * 10, true)).collect();
        let events = kinds(&mut d, &again);
        assert_eq!(events, vec![ButtonEventKind::Pressed, ButtonEventKind::LongPress]);
    }

    #[test]
    fn held_at_boot_releases_without_click() {
        let mut d = Debouncer::new(ButtonId::Left, DEBOUNCE, LONG);
        d.prime(true, 0);
        let events = kinds(&mut d, &[(10, true), (2000, true), (2100, false), (2200, false)]);
        assert_eq!(events, vec![ButtonEventKind::Released]);
    }

    #[test]
    fn survives_counter_wraparound() {
        let start = u32::MAX - 50;
        let mut d = Debouncer::new(ButtonId::Left, DEBOUNCE, LONG);
        d.prime(false, start - 100);
        let script = [
            (start, true),
            (start.wrapping_add(40), true),
            (start.wrapping_add(100), false),
            (start.wrapping_add(140), false),
        ];
        let events = kinds(&mut d, &script);
        assert_eq!(events, vec![ButtonEventKind::Pressed, ButtonEventKind::Click]);
    }

    #[test]
    fn button_normalises_active_low_pins() {
        let (pin, level) = fake_pin(true);
        let mut button = Button::new(pin, ButtonId::Left, true, DEBOUNCE, LONG);
        button.begin(0);
        assert!(!button.is_pressed());

        level.set(false);
        assert_eq!(button.update(100), None);
        let evt = button.update(140);
        assert_eq!(evt, Some(ButtonEvent::new(ButtonEventKind::Pressed, ButtonId::Left)));
    }

    #[test]
    fn poll_prefers_left_and_drops_same_tick_right_event() {
        let (lp, left) = fake_pin(true);
        let (rp, right) = fake_pin(true);
        let mut input = ButtonInput::new(
            Button::new(lp, ButtonId::Left, true, DEBOUNCE, LONG),
            Button::new(rp, ButtonId::Right, true, DEBOUNCE, LONG),
        );
        input.begin(0);

        left.set(false);
        right.set(false);
        assert_eq!(input.poll(100), None);
        let evt = input.poll(140);
        assert_eq!(evt, Some(ButtonEvent::new(ButtonEventKind::Pressed, ButtonId::Left)));
        // Right's press was consumed on the same poll and is gone.
        assert_eq!(input.poll(150), None);
    }

    #[test]
    fn both_gesture_long_press_is_reported() {
        let (lp, left) = fake_pin(true);
        let (rp, right) = fake_pin(true);
        let mut input = ButtonInput::new(
            Button::new(lp, ButtonId::Left, true, DEBOUNCE, LONG),
            Button::new(rp, ButtonId::Right, true, DEBOUNCE, LONG),
        )
        .with_both(DEBOUNCE, LONG);
        input.begin(0);

        // Left goes down first, right follows 200 ms later.
        left.set(false);
        let mut seen = Vec::new();
        for t in (100..300).step_by(10) {
            seen.extend(input.poll(t));
        }
        right.set(false);
        for t in (300..1400).step_by(10) {
            seen.extend(input.poll(t));
        }

        assert!(seen.contains(&ButtonEvent::new(ButtonEventKind::Pressed, ButtonId::Left)));
        assert!(seen.contains(&ButtonEvent::new(ButtonEventKind::Pressed, ButtonId::Both)));
        assert!(seen.contains(&ButtonEvent::new(ButtonEventKind::LongPress, ButtonId::Both)));
        // Right's edges land on the same polls as the combined gesture.
        assert!(!seen.iter().any(|e| e.id == ButtonId::Right));
        // Left's own long press is withheld while right is down.
        assert!(!seen.contains(&ButtonEvent::new(ButtonEventKind::LongPress, ButtonId::Left)));
    }

    fn paired() -> (ButtonInput<FakePin>, Rc<Cell<bool>>, Rc<Cell<bool>>) {
        let (lp, left) = fake_pin(true);
        let (rp, right) = fake_pin(true);
        let mut input = ButtonInput::new(
            Button::new(lp, ButtonId::Left, true, DEBOUNCE, LONG),
            Button::new(rp, ButtonId::Right, true, DEBOUNCE, LONG),
        )
        .with_both(DEBOUNCE, LONG);
        input.begin(0);
        (input, left, right)
    }

    fn run(input: &mut ButtonInput<FakePin>, from: u32, to: u32, seen: &mut Vec<ButtonEvent>) {
        for t in (from..to).step_by(10) {
            seen.extend(input.poll(t));
        }
    }

    fn single_gestures(seen: &[ButtonEvent]) -> Vec<ButtonEvent> {
        seen.iter()
            .filter(|e| e.id != ButtonId::Both)
            .filter(|e| matches!(e.kind, ButtonEventKind::Click | ButtonEventKind::LongPress))
            .copied()
            .collect()
    }

    #[test]
    fn staggered_two_button_hold_reports_only_both() {
        let (mut input, left, right) = paired();
        let mut seen = Vec::new();

        // Left 20 ms ahead of right, held 1.5 s, released in the same order.
        left.set(false);
        run(&mut input, 100, 120, &mut seen);
        right.set(false);
        run(&mut input, 120, 1600, &mut seen);
        left.set(true);
        run(&mut input, 1600, 1620, &mut seen);
        right.set(true);
        run(&mut input, 1620, 1800, &mut seen);

        assert!(single_gestures(&seen).is_empty(), "{:?}", seen);
        assert!(seen.contains(&ButtonEvent::new(ButtonEventKind::LongPress, ButtonId::Both)));
    }

    #[test]
    fn staggered_two_button_tap_reports_no_single_click() {
        let (mut input, left, right) = paired();
        let mut seen = Vec::new();

        left.set(false);
        run(&mut input, 100, 120, &mut seen);
        right.set(false);
        run(&mut input, 120, 300, &mut seen);
        left.set(true);
        run(&mut input, 300, 320, &mut seen);
        // Right lets go last, after left has already settled up.
        run(&mut input, 320, 400, &mut seen);
        right.set(true);
        run(&mut input, 400, 600, &mut seen);

        assert!(single_gestures(&seen).is_empty(), "{:?}", seen);
        assert!(seen.contains(&ButtonEvent::new(ButtonEventKind::Click, ButtonId::Both)));

        // The chord is over: a lone click on right works again.
        right.set(false);
        run(&mut input, 600, 700, &mut seen);
        right.set(true);
        seen.clear();
        run(&mut input, 700, 800, &mut seen);
        assert_eq!(seen, vec![ButtonEvent::new(ButtonEventKind::Click, ButtonId::Right)]);
    }
}
