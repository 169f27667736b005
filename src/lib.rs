// Plantey — Smart Planter Companion
//
// Platform-neutral core: input debouncing, mood evaluation, the buzzer
// sequencer, blink scheduling, sensing conversion, and page rendering.
// Hardware sits behind small traits; the ESP-IDF implementations live in
// `drivers` and only build for the device.

pub mod app;
pub mod audio;
pub mod blink;
pub mod config;
pub mod events;
pub mod input;
pub mod mood;
pub mod profile;
pub mod sensing;
pub mod ui;

#[cfg(target_os = "espidf")]
pub mod drivers;
