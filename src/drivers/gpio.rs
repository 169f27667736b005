// Plantey — Button GPIO
//
// Both buttons are wired to ground with the internal pull-up enabled, so the
// pins idle high and read low while pressed.

use esp_idf_hal::gpio::{AnyIOPin, Input, InputMode, Pin, PinDriver, Pull};

use crate::input::InputLevel;

impl<T: Pin, MODE: InputMode> InputLevel for PinDriver<'_, T, MODE> {
    fn is_high(&mut self) -> bool {
        PinDriver::is_high(self)
    }
}

/// Input driver with pull-up, ready for `input::Button`.
pub fn button_pin(pin: AnyIOPin) -> anyhow::Result<PinDriver<'static, AnyIOPin, Input>> {
    let mut driver = PinDriver::input(pin)?;
    driver.set_pull(Pull::Up)?;
    Ok(driver)
}
