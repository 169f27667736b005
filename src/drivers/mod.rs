// Plantey — ESP-IDF hardware drivers.  Device builds only.

pub mod analog;
pub mod buzzer;
pub mod display;
pub mod gpio;
