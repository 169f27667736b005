// Plantey — SH1106 OLED Driver
//
// Register-level driver over the shared I2C bus.  The SH1106 has 132
// columns of RAM; the visible 128 start at column 2.

use std::sync::Mutex;

use anyhow::anyhow;
use esp_idf_hal::i2c::I2cDriver;

use crate::config::*;
use crate::ui::framebuffer::FrameBuffer;

/// Thread-safe handle to a shared I2C bus.
pub type SharedBus = &'static Mutex<I2cDriver<'static>>;

const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;
const COLUMN_OFFSET: u8 = 2;

const CMD_DISPLAY_OFF: u8 = 0xAE;
const CMD_DISPLAY_ON: u8 = 0xAF;
const CMD_SET_CONTRAST: u8 = 0x81;
const CMD_PAGE_ADDR: u8 = 0xB0;

const INIT_SEQUENCE: &[u8] = &[
    CMD_DISPLAY_OFF,
    0xD5, 0x80, // clock divide / oscillator
    0xA8, 0x3F, // multiplex 1/64
    0xD3, 0x00, // display offset
    0x40,       // start line 0
    0xAD, 0x8B, // DC-DC on
    0xA1,       // segment remap
    0xC8,       // COM scan descending
    0xDA, 0x12, // COM pins
    0xD9, 0x1F, // pre-charge
    0xDB, 0x40, // VCOMH
    0xA4,       // resume from RAM
    0xA6,       // normal (not inverted)
];

pub struct Sh1106 {
    bus: SharedBus,
}

impl Sh1106 {
    pub fn new(bus: SharedBus) -> Self {
        Self { bus }
    }

    /// Probe the controller with a NOP.
    pub fn is_connected(&self) -> bool {
        self.command(&[0xE3]).is_ok()
    }

    pub fn init(&mut self, contrast: u8) -> anyhow::Result<()> {
        self.command(INIT_SEQUENCE)?;
        self.set_contrast(contrast)?;
        self.command(&[CMD_DISPLAY_ON])?;
        log::info!("SH1106 initialised (contrast {})", contrast);
        Ok(())
    }

    pub fn set_contrast(&mut self, contrast: u8) -> anyhow::Result<()> {
        self.command(&[CMD_SET_CONTRAST, contrast])
    }

    pub fn flush(&mut self, frame: &FrameBuffer) -> anyhow::Result<()> {
        let mut packet = [0u8; SCREEN_WIDTH as usize + 1];
        packet[0] = CONTROL_DATA;

        for page in 0..FrameBuffer::PAGES {
            self.command(&[
                CMD_PAGE_ADDR | page as u8,
                COLUMN_OFFSET & 0x0F,
                0x10 | (COLUMN_OFFSET >> 4),
            ])?;
            packet[1..].copy_from_slice(frame.page(page));
            self.write(&packet)?;
        }
        Ok(())
    }

    fn command(&self, bytes: &[u8]) -> anyhow::Result<()> {
        let mut packet = Vec::with_capacity(bytes.len() + 1);
        packet.push(CONTROL_COMMAND);
        packet.extend_from_slice(bytes);
        self.write(&packet)
    }

    fn write(&self, bytes: &[u8]) -> anyhow::Result<()> {
        let mut bus = self.bus.lock().map_err(|_| anyhow!("I2C bus mutex poisoned"))?;
        bus.write(I2C_ADDR_OLED, bytes, I2C_TIMEOUT_TICKS)?;
        Ok(())
    }
}
