// Plantey — Firmware Entry Point
//
// Device boot sequence:
//   1. Bring up logging, I2C, the SH1106, buttons, buzzer, and sensors.
//   2. Show the splash for BOOT_SPLASH_DISPLAY_MS.
//   3. Spawn the companion thread, which polls at ~100 Hz and flushes a
//      frame whenever the loop draws one.
//
// On the development host the same loop runs as a desk simulation against
// a synthetic drying plant.

use std::sync::mpsc;

use plantey::app::Companion;
use plantey::audio::AudioEngine;
use plantey::config::*;
use plantey::events::{ButtonId, Command};
use plantey::input::{Button, ButtonInput, InputLevel};
use plantey::sensing::SensorSuite;

fn main() -> anyhow::Result<()> {
    #[cfg(target_os = "espidf")]
    return device::run();

    #[cfg(not(target_os = "espidf"))]
    return desk::run();
}

fn buttons<P: InputLevel>(left: P, right: P) -> ButtonInput<P> {
    ButtonInput::new(
        Button::new(left, ButtonId::Left, BUTTONS_ACTIVE_LOW, BUTTON_DEBOUNCE_MS, BUTTON_LONG_PRESS_MS),
        Button::new(right, ButtonId::Right, BUTTONS_ACTIVE_LOW, BUTTON_DEBOUNCE_MS, BUTTON_LONG_PRESS_MS),
    )
    .with_both(BUTTON_DEBOUNCE_MS, BUTTON_LONG_PRESS_MS)
}

// ---------------------------------------------------------------------------
// Device
// ---------------------------------------------------------------------------
#[cfg(target_os = "espidf")]
mod device {
    use std::sync::Mutex;
    use std::thread;
    use std::time::Duration;

    use esp_idf_hal::gpio::IOPin;
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::prelude::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use plantey::drivers::analog::PlanterSensors;
    use plantey::drivers::buzzer::LedcBuzzer;
    use plantey::drivers::display::{SharedBus, Sh1106};
    use plantey::drivers::gpio::button_pin;

    use super::*;

    /// Milliseconds since boot (wraps at ~49 days; every consumer uses
    /// `wrapping_sub`).
    pub fn now_ms() -> u32 {
        unsafe { (esp_idf_sys::esp_timer_get_time() / 1000) as u32 }
    }

    pub fn run() -> anyhow::Result<()> {
        esp_idf_svc::sys::link_patches();
        esp_idf_svc::log::EspLogger::initialize_default();
        log::info!("Plantey firmware starting…");

        let peripherals = Peripherals::take()?;

        // ---- I2C bus + display ---------------------------------------------
        let i2c_config = I2cConfig::new().baudrate(400u32.kHz().into());
        let i2c = I2cDriver::new(
            peripherals.i2c0,
            peripherals.pins.gpio8, // SDA
            peripherals.pins.gpio9, // SCL
            &i2c_config,
        )?;
        let bus: SharedBus = Box::leak(Box::new(Mutex::new(i2c)));

        let mut display = Sh1106::new(bus);
        if !display.is_connected() {
            // Keep running so the serial log stays useful.
            log::error!("SH1106 not responding at {:#04x}", I2C_ADDR_OLED);
        }
        if let Err(e) = display.init(DEFAULT_CONTRAST) {
            log::error!("Display init failed: {}", e);
        }

        // ---- Inputs, buzzer, sensors ---------------------------------------
        let left = button_pin(peripherals.pins.gpio20.downgrade())?;
        let right = button_pin(peripherals.pins.gpio21.downgrade())?;
        let buzzer = LedcBuzzer::new(PIN_BUZZER)?;
        let sensors = PlanterSensors::new()?;
        let rng = SmallRng::seed_from_u64(u64::from(unsafe { esp_idf_sys::esp_random() }));

        // Remote control surfaces would feed this channel.
        let (_command_tx, command_rx) = mpsc::channel::<Command>();

        let mut companion = Companion::new(
            buttons(left, right),
            SensorSuite::new(sensors),
            AudioEngine::new(buzzer),
            rng,
            command_rx,
            now_ms(),
        );

        companion.show_splash("Plantey", Some("waking up..."));
        if let Err(e) = display.flush(companion.frame()) {
            log::error!("Display flush failed: {}", e);
        }
        thread::sleep(Duration::from_millis(BOOT_SPLASH_DISPLAY_MS));

        thread::Builder::new()
            .name("companion".into())
            .stack_size(STACK_COMPANION)
            .spawn(move || {
                log::info!("Companion task started");
                companion.boot(now_ms());
                let poll = Duration::from_millis(LOOP_POLL_INTERVAL_MS);
                loop {
                    if companion.tick(now_ms()) {
                        if let Err(e) = display.flush(companion.frame()) {
                            log::warn!("Display flush failed: {}", e);
                        }
                    }
                    if let Some(contrast) = companion.take_contrast_change() {
                        if let Err(e) = display.set_contrast(contrast) {
                            log::warn!("Contrast update failed: {}", e);
                        }
                    }
                    thread::sleep(poll);
                }
            })?;

        // All work happens in the companion thread.
        loop {
            thread::sleep(Duration::from_secs(60));
        }
    }
}

// ---------------------------------------------------------------------------
// Desk simulation (host)
// ---------------------------------------------------------------------------
#[cfg(not(target_os = "espidf"))]
mod desk {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use plantey::audio::ToneOutput;
    use plantey::profile::CareProfile;
    use plantey::sensing::{ClimateReading, SensorBackend};

    use super::*;

    const SIMULATED_MS: u32 = 5 * 60 * 1000;

    /// Buttons nobody touches.
    struct Untouched;

    impl InputLevel for Untouched {
        fn is_high(&mut self) -> bool {
            BUTTONS_ACTIVE_LOW
        }
    }

    struct LoggedBuzzer;

    impl ToneOutput for LoggedBuzzer {
        fn set_tone(&mut self, freq_hz: f32) {
            log::trace!("buzzer {:.0} Hz", freq_hz);
        }
        fn silence(&mut self) {
            log::trace!("buzzer off");
        }
    }

    /// Freshly watered pot drying out on a sunny sill.  Every tenth climate
    /// read fails the checksum, like a flaky DHT11.
    struct DryingPlant {
        reads: u32,
    }

    impl SensorBackend for DryingPlant {
        fn read_soil_raw(&mut self) -> anyhow::Result<u16> {
            self.reads += 1;
            Ok((1700 + self.reads * 8).min(u32::from(SOIL_RAW_DRY_DEFAULT)) as u16)
        }

        fn read_light_raw(&mut self) -> anyhow::Result<u16> {
            Ok(1600)
        }

        fn read_climate(&mut self) -> anyhow::Result<ClimateReading> {
            if self.reads % 10 == 9 {
                anyhow::bail!("checksum mismatch");
            }
            Ok(ClimateReading {
                temperature_c: 21.0 + (self.reads % 7) as f32 * 0.3,
                humidity_pct: 48.0,
            })
        }
    }

    pub fn run() -> anyhow::Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        log::info!("Plantey desk simulation ({} s simulated)", SIMULATED_MS / 1000);

        let (command_tx, command_rx) = mpsc::channel();
        let mut companion = Companion::new(
            buttons(Untouched, Untouched),
            SensorSuite::new(DryingPlant { reads: 0 }),
            AudioEngine::new(LoggedBuzzer),
            StdRng::seed_from_u64(0x5EED),
            command_rx,
            0,
        );

        command_tx.send(Command::ApplyProfile(CareProfile {
            species: "Boston fern".into(),
            soil_dry_pct: 40.0,
            soil_soggy_pct: 90.0,
            valid: true,
            ..CareProfile::default()
        }))?;

        companion.boot(0);
        let mut frames = 0u32;
        for now in (0..SIMULATED_MS).step_by(LOOP_POLL_INTERVAL_MS as usize) {
            if now == 120_000 {
                command_tx.send(Command::PlayDemo)?;
            }
            if companion.tick(now) {
                frames += 1;
            }
        }

        let env = companion.snapshot();
        log::info!(
            "Done: mood {} | soil {:.0}% light {:.0}% | {} frames drawn",
            companion.mood().mood.display_name(),
            env.soil_moisture_pct,
            env.light_pct,
            frames
        );
        Ok(())
    }
}
