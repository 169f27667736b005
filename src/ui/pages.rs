// Plantey — Page Navigation
//
// Four pages cycled with left/right clicks.  Long presses carry
// page-specific actions; they are reported back for the companion loop to
// carry out.

use crate::events::{ButtonEvent, ButtonEventKind, ButtonId, CalibrationTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageId {
    Mood,
    Stats,
    Tips,
    Debug,
}

impl PageId {
    pub const ALL: [PageId; 4] = [PageId::Mood, PageId::Stats, PageId::Tips, PageId::Debug];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Mood  => "Mood",
            Self::Stats => "Stats",
            Self::Tips  => "Tips",
            Self::Debug => "Debug",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageAction {
    pub page_changed: bool,
    pub calibration: Option<CalibrationTarget>,
    pub play_demo_chord: bool,
    pub contrast_delta: i8,
    pub toggle_ambient: bool,
}

#[derive(Debug, Clone)]
pub struct PageController {
    index: usize,
}

impl Default for PageController {
    fn default() -> Self {
        Self::new()
    }
}

impl PageController {
    pub fn new() -> Self {
        Self { index: 0 }
    }

    pub fn page(&self) -> PageId {
        PageId::ALL[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        PageId::ALL.len()
    }

    pub fn handle_event(&mut self, event: ButtonEvent) -> PageAction {
        let mut action = PageAction::default();

        match (event.kind, event.id) {
            (ButtonEventKind::Click, ButtonId::Left) => {
                self.change_page(-1);
                action.page_changed = true;
            }
            (ButtonEventKind::Click, ButtonId::Right) => {
                self.change_page(1);
                action.page_changed = true;
            }
            (ButtonEventKind::LongPress, ButtonId::Both) => {
                action.toggle_ambient = true;
            }
            (ButtonEventKind::LongPress, id) => {
                let left = id == ButtonId::Left;
                match self.page() {
                    PageId::Mood => action.play_demo_chord = true,
                    PageId::Stats => {
                        action.calibration = Some(if left {
                            CalibrationTarget::SoilDry
                        } else {
                            CalibrationTarget::SoilWet
                        });
                    }
                    PageId::Tips => {
                        action.calibration = Some(if left {
                            CalibrationTarget::LightDark
                        } else {
                            CalibrationTarget::LightBright
                        });
                    }
                    PageId::Debug => action.contrast_delta = if left { -10 } else { 10 },
                }
            }
            _ => {}
        }

        if action.page_changed {
            log::debug!("Page → {}", self.page().title());
        }
        action
    }

    fn change_page(&mut self, delta: isize) {
        let count = PageId::ALL.len() as isize;
        self.index = (self.index as isize + delta).rem_euclid(count) as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(id: ButtonId) -> ButtonEvent {
        ButtonEvent::new(ButtonEventKind::Click, id)
    }

    fn long(id: ButtonId) -> ButtonEvent {
        ButtonEvent::new(ButtonEventKind::LongPress, id)
    }

    #[test]
    fn clicks_wrap_around() {
        let mut pages = PageController::new();
        assert!(pages.handle_event(click(ButtonId::Left)).page_changed);
        assert_eq!(pages.page(), PageId::Debug);
        pages.handle_event(click(ButtonId::Right));
        assert_eq!(pages.page(), PageId::Mood);
        pages.handle_event(click(ButtonId::Right));
        assert_eq!(pages.page(), PageId::Stats);
    }

    #[test]
    fn long_press_actions_depend_on_page() {
        let mut pages = PageController::new();
        assert!(pages.handle_event(long(ButtonId::Right)).play_demo_chord);

        pages.handle_event(click(ButtonId::Right));
        assert_eq!(pages.handle_event(long(ButtonId::Left)).calibration, Some(CalibrationTarget::SoilDry));
        assert_eq!(pages.handle_event(long(ButtonId::Right)).calibration, Some(CalibrationTarget::SoilWet));

        pages.handle_event(click(ButtonId::Right));
        assert_eq!(pages.handle_event(long(ButtonId::Left)).calibration, Some(CalibrationTarget::LightDark));

        pages.handle_event(click(ButtonId::Right));
        assert_eq!(pages.handle_event(long(ButtonId::Left)).contrast_delta, -10);
    }

    #[test]
    fn both_long_press_toggles_ambient_anywhere() {
        let mut pages = PageController::new();
        pages.handle_event(click(ButtonId::Right));
        let action = pages.handle_event(long(ButtonId::Both));
        assert!(action.toggle_ambient);
        assert_eq!(action.calibration, None);
    }

    #[test]
    fn press_and_release_do_nothing() {
        let mut pages = PageController::new();
        let action = pages.handle_event(ButtonEvent::new(ButtonEventKind::Pressed, ButtonId::Left));
        assert_eq!(action, PageAction::default());
        assert_eq!(pages.page(), PageId::Mood);
    }
}
