// Plantey — Hardware & System Configuration
// Target: ESP32-C3 Super Mini (RISC-V)

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (ESP32-C3 Super Mini pinout)
// ---------------------------------------------------------------------------
pub const PIN_SOIL_SENSOR: i32 = 0;   // ADC1_CH0 — capacitive soil probe
pub const PIN_LDR_SENSOR: i32 = 1;    // ADC1_CH1 — photoresistor divider
pub const PIN_BUZZER: i32 = 2;        // LEDC tone output (post-boot safe)
pub const PIN_DHT: i32 = 3;           // DHT11 single-wire data
pub const PIN_I2C_SDA: i32 = 8;       // I2C data line
pub const PIN_I2C_SCL: i32 = 9;       // I2C clock line
pub const PIN_BUTTON_LEFT: i32 = 20;  // INPUT_PULLUP, active LOW
pub const PIN_BUTTON_RIGHT: i32 = 21; // INPUT_PULLUP, active LOW
pub const BUTTONS_ACTIVE_LOW: bool = true;

// ---------------------------------------------------------------------------
// I2C Bus / Display (SH1106 OLED)
// ---------------------------------------------------------------------------
pub const I2C_ADDR_OLED: u8 = 0x3C;
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks
pub const SCREEN_WIDTH: u32 = 128;
pub const SCREEN_HEIGHT: u32 = 64;
pub const DISPLAY_BUFFER_SIZE: usize = (SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize) / 8; // 1024
pub const DEFAULT_CONTRAST: u8 = 160;

// ---------------------------------------------------------------------------
// Buzzer (LEDC PWM)
// ---------------------------------------------------------------------------
pub const BUZZER_LEDC_RESOLUTION_BITS: u32 = 10;
pub const BUZZER_IDLE_FREQ_HZ: u32 = 2000;
pub const CHORD_CYCLE_DEFAULT_MS: u16 = 12;
pub const CHORD_CYCLE_MIN_MS: u16 = 4;
pub const MAX_CHORD_NOTES: usize = 4;

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_COMPANION: usize = 12 * 1024;

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const SENSOR_SAMPLE_INTERVAL_MS: u32 = 1500;
pub const LOOP_POLL_INTERVAL_MS: u64 = 10;         // 100 Hz input poll
pub const FACE_FRAME_INTERVAL_MS: u32 = 90;
pub const BUTTON_DEBOUNCE_MS: u16 = 35;
pub const BUTTON_LONG_PRESS_MS: u16 = 700;
pub const BLINK_INTERVAL_MIN_MS: u32 = 2500;
pub const BLINK_INTERVAL_MAX_MS: u32 = 6000;
pub const BLINK_DURATION_MS: u32 = 160;
pub const AMBIENT_COOLDOWN_MS: u32 = 8000;         // quiet time before ambient resumes
pub const AMBIENT_ENABLED_DEFAULT: bool = true;
pub const CELEBRATION_HEART_MS: u32 = 3000;
pub const INTERACTION_PULSE_VISIBLE_MS: u16 = 900;
pub const BOOT_SPLASH_DISPLAY_MS: u64 = 1200;

// ---------------------------------------------------------------------------
// Sensor calibration defaults (12-bit ADC counts)
// ---------------------------------------------------------------------------
pub const SOIL_RAW_DRY_DEFAULT: u16 = 3200;  // higher value => drier
pub const SOIL_RAW_WET_DEFAULT: u16 = 1500;  // lower value => wetter
pub const LIGHT_RAW_DARK_DEFAULT: u16 = 3500;
pub const LIGHT_RAW_BRIGHT_DEFAULT: u16 = 200;
pub const SOIL_ALPHA: f32 = 0.10;            // EMA smoothing factor
pub const LIGHT_ALPHA: f32 = 0.10;

// ---------------------------------------------------------------------------
// Mood thresholds (percent / °C)
// ---------------------------------------------------------------------------
pub const SOIL_DRY_THRESHOLD_PCT: f32 = 35.0;
pub const SOIL_SOGGY_THRESHOLD_PCT: f32 = 85.0;
pub const LIGHT_LOW_THRESHOLD_PCT: f32 = 25.0;
pub const LIGHT_HIGH_THRESHOLD_PCT: f32 = 90.0;
pub const COMFORT_TEMP_MIN_C: f32 = 17.0;
pub const COMFORT_TEMP_MAX_C: f32 = 28.0;
