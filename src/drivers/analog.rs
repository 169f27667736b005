// Plantey — Soil / Light ADC + DHT11
//
// Soil probe and LDR divider on ADC1 (oneshot driver, 11 dB attenuation for
// the full 0–3.3 V swing).  The DHT11 single-wire protocol is bit-banged on
// a plain GPIO with microsecond busy-waits.

use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail};
use esp_idf_sys::{self as sys, esp};

use crate::config::*;
use crate::sensing::{ClimateReading, SensorBackend};

pub struct PlanterSensors {
    adc: sys::adc_oneshot_unit_handle_t,
    soil_channel: sys::adc_channel_t,
    light_channel: sys::adc_channel_t,
    dht_gpio: i32,
}

// The oneshot handle is only ever used from the companion thread.
unsafe impl Send for PlanterSensors {}

impl PlanterSensors {
    pub fn new() -> anyhow::Result<Self> {
        // ESP32-C3: GPIOn maps to ADC1 channel n for GPIO0–4.
        let soil_channel = PIN_SOIL_SENSOR as sys::adc_channel_t;
        let light_channel = PIN_LDR_SENSOR as sys::adc_channel_t;

        let mut adc: sys::adc_oneshot_unit_handle_t = core::ptr::null_mut();
        unsafe {
            let unit_cfg = sys::adc_oneshot_unit_init_cfg_t {
                unit_id: sys::adc_unit_t_ADC_UNIT_1,
                ulp_mode: sys::adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
                ..core::mem::zeroed()
            };
            esp!(sys::adc_oneshot_new_unit(&unit_cfg, &mut adc))?;

            let chan_cfg = sys::adc_oneshot_chan_cfg_t {
                atten: sys::adc_atten_t_ADC_ATTEN_DB_11,
                bitwidth: sys::adc_bitwidth_t_ADC_BITWIDTH_12,
            };
            esp!(sys::adc_oneshot_config_channel(adc, soil_channel, &chan_cfg))?;
            esp!(sys::adc_oneshot_config_channel(adc, light_channel, &chan_cfg))?;

            esp!(sys::gpio_reset_pin(PIN_DHT))?;
            esp!(sys::gpio_set_pull_mode(PIN_DHT, sys::gpio_pull_mode_t_GPIO_PULLUP_ONLY))?;
        }

        log::info!(
            "Sensors ready (soil ADC1_CH{}, light ADC1_CH{}, DHT11 GPIO{})",
            soil_channel,
            light_channel,
            PIN_DHT
        );
        Ok(Self { adc, soil_channel, light_channel, dht_gpio: PIN_DHT })
    }

    fn read_channel(&mut self, channel: sys::adc_channel_t) -> anyhow::Result<u16> {
        let mut raw: i32 = 0;
        unsafe { esp!(sys::adc_oneshot_read(self.adc, channel, &mut raw))? };
        Ok(raw.clamp(0, 4095) as u16)
    }

    // -----------------------------------------------------------------------
    // DHT11
    // -----------------------------------------------------------------------

    /// Busy-wait while the line sits at `level`; returns how long it did.
    fn wait_while(&self, level: u32, timeout_us: i64) -> anyhow::Result<i64> {
        let start = unsafe { sys::esp_timer_get_time() };
        loop {
            let now = unsafe { sys::esp_timer_get_time() };
            if unsafe { sys::gpio_get_level(self.dht_gpio) } as u32 != level {
                return Ok(now - start);
            }
            if now - start > timeout_us {
                bail!("DHT11 timeout waiting for level {} to end", level);
            }
        }
    }

    fn read_dht_frame(&mut self) -> anyhow::Result<[u8; 5]> {
        let pin = self.dht_gpio;

        // Start signal: pull low ≥18 ms, release, then hand the line over.
        unsafe {
            esp!(sys::gpio_set_direction(pin, sys::gpio_mode_t_GPIO_MODE_OUTPUT))?;
            esp!(sys::gpio_set_level(pin, 0))?;
        }
        thread::sleep(Duration::from_millis(20));
        unsafe {
            esp!(sys::gpio_set_level(pin, 1))?;
            sys::esp_rom_delay_us(30);
            esp!(sys::gpio_set_direction(pin, sys::gpio_mode_t_GPIO_MODE_INPUT))?;
        }

        // Sensor response: ~80 µs low, ~80 µs high.
        self.wait_while(1, 100)?;
        self.wait_while(0, 100)?;
        self.wait_while(1, 100)?;

        let mut frame = [0u8; 5];
        for bit in 0..40 {
            self.wait_while(0, 80)?;
            let high_us = self.wait_while(1, 100)?;
            if high_us > 40 {
                frame[bit / 8] |= 0x80 >> (bit % 8);
            }
        }
        Ok(frame)
    }
}

impl SensorBackend for PlanterSensors {
    fn read_soil_raw(&mut self) -> anyhow::Result<u16> {
        self.read_channel(self.soil_channel)
    }

    fn read_light_raw(&mut self) -> anyhow::Result<u16> {
        self.read_channel(self.light_channel)
    }

    fn read_climate(&mut self) -> anyhow::Result<ClimateReading> {
        let frame = self.read_dht_frame()?;
        decode_dht11(&frame)
    }
}

fn decode_dht11(frame: &[u8; 5]) -> anyhow::Result<ClimateReading> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(anyhow!("DHT11 checksum mismatch ({:#04x} != {:#04x})", sum, frame[4]));
    }
    let humidity_pct = f32::from(frame[0]) + f32::from(frame[1]) * 0.1;
    let magnitude = f32::from(frame[2]) + f32::from(frame[3] & 0x7F) * 0.1;
    let temperature_c = if frame[3] & 0x80 != 0 { -magnitude } else { magnitude };
    Ok(ClimateReading { temperature_c, humidity_pct })
}
