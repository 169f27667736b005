// Plantey — Piezo Buzzer (LEDC PWM)
//
// Tone = 50 % duty at the requested frequency; silence = 0 % duty.  The LEDC
// peripheral is driven through raw ESP-IDF calls; the C3 only has the
// low-speed group.

use esp_idf_sys::{self as sys, esp};

use crate::audio::ToneOutput;
use crate::config::*;

const SPEED_MODE: sys::ledc_mode_t = sys::ledc_mode_t_LEDC_LOW_SPEED_MODE;
const TIMER: sys::ledc_timer_t = sys::ledc_timer_t_LEDC_TIMER_0;
const CHANNEL: sys::ledc_channel_t = sys::ledc_channel_t_LEDC_CHANNEL_0;
const HALF_DUTY: u32 = 1 << (BUZZER_LEDC_RESOLUTION_BITS - 1);

pub struct LedcBuzzer {
    freq_hz: u32,
}

impl LedcBuzzer {
    pub fn new(gpio: i32) -> anyhow::Result<Self> {
        unsafe {
            let timer_cfg = sys::ledc_timer_config_t {
                speed_mode: SPEED_MODE,
                duty_resolution: BUZZER_LEDC_RESOLUTION_BITS,
                timer_num: TIMER,
                freq_hz: BUZZER_IDLE_FREQ_HZ,
                ..core::mem::zeroed()
            };
            esp!(sys::ledc_timer_config(&timer_cfg))?;

            let chan_cfg = sys::ledc_channel_config_t {
                gpio_num: gpio,
                speed_mode: SPEED_MODE,
                channel: CHANNEL,
                timer_sel: TIMER,
                duty: 0,
                hpoint: 0,
                ..core::mem::zeroed()
            };
            esp!(sys::ledc_channel_config(&chan_cfg))?;
        }
        log::info!("Buzzer on GPIO{} ({}-bit LEDC)", gpio, BUZZER_LEDC_RESOLUTION_BITS);
        Ok(Self { freq_hz: BUZZER_IDLE_FREQ_HZ })
    }

    fn set_duty(&self, duty: u32) -> anyhow::Result<()> {
        unsafe {
            esp!(sys::ledc_set_duty(SPEED_MODE, CHANNEL, duty))?;
            esp!(sys::ledc_update_duty(SPEED_MODE, CHANNEL))?;
        }
        Ok(())
    }

    fn drive(&mut self, freq_hz: u32) -> anyhow::Result<()> {
        if freq_hz != self.freq_hz {
            unsafe { esp!(sys::ledc_set_freq(SPEED_MODE, TIMER, freq_hz))? };
            self.freq_hz = freq_hz;
        }
        self.set_duty(HALF_DUTY)
    }
}

impl ToneOutput for LedcBuzzer {
    fn set_tone(&mut self, freq_hz: f32) {
        let hz = freq_hz.round().max(1.0) as u32;
        if let Err(e) = self.drive(hz) {
            log::warn!("Buzzer tone {} Hz failed: {}", hz, e);
        }
    }

    fn silence(&mut self) {
        if let Err(e) = self.set_duty(0) {
            log::warn!("Buzzer silence failed: {}", e);
        }
    }
}
