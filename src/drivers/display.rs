// Tilt Timer - SSD1306 OLED Driver
//
// Register-level driver over the shared I2C bus with a local frame buffer.
// Drawing goes through `embedded_graphics`; the current rotation maps the
// layout's logical coordinates onto the panel so text reads upright on
// whichever face the cube is standing on.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use tilt_timer::config::*;
use tilt_timer::screen;
use tilt_timer::{Display, Rotation, Screen};

use super::{lock_bus, SharedBus};

const WIDTH: usize = SCREEN_WIDTH as usize;
const PAGES: usize = SCREEN_HEIGHT as usize / 8;

// I2C control bytes
const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

/// SSD1306 commands
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const RESUME_FROM_RAM: u8 = 0xA4;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_COLUMN_ADDR: u8 = 0x21;
    pub const SET_PAGE_ADDR: u8 = 0x22;
    pub const NOP: u8 = 0xE3;
}

pub struct OledDisplay {
    bus: SharedBus,
    /// 1 bit per pixel, organised as 8 pages of 128 columns.
    buffer: [u8; DISPLAY_BUFFER_SIZE],
    rotation: Rotation,
}

impl OledDisplay {
    pub fn new(bus: SharedBus) -> Self {
        Self {
            bus,
            buffer: [0; DISPLAY_BUFFER_SIZE],
            rotation: Rotation::Rotate0,
        }
    }

    /// The SSD1306 has no ID register; an ACKed no-op is enough.
    pub fn is_connected(&self) -> bool {
        self.command(&[cmd::NOP]).is_ok()
    }

    /// Power up the panel (internal charge pump, 128x64) and blank it.
    pub fn init(&mut self) -> anyhow::Result<()> {
        self.command(&[
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80,
            cmd::SET_MUX_RATIO,
            (SCREEN_HEIGHT - 1) as u8,
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_CHARGE_PUMP,
            0x14,
            cmd::SET_MEMORY_MODE,
            0x00, // horizontal addressing
            cmd::SET_SEG_REMAP,
            cmd::SET_COM_SCAN_DEC,
            cmd::SET_COM_PINS,
            0x12,
            cmd::SET_CONTRAST,
            0xCF,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::RESUME_FROM_RAM,
            cmd::SET_NORMAL,
            cmd::DISPLAY_ON,
        ])?;

        self.buffer.fill(0);
        self.flush()?;
        log::info!("SSD1306 initialised (128x64)");
        Ok(())
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Send the whole frame buffer to the panel.
    pub fn flush(&mut self) -> anyhow::Result<()> {
        self.command(&[
            cmd::SET_COLUMN_ADDR,
            0,
            (WIDTH - 1) as u8,
            cmd::SET_PAGE_ADDR,
            0,
            (PAGES - 1) as u8,
        ])?;

        let mut bus = lock_bus(self.bus)?;
        let mut data = [0u8; WIDTH + 1];
        data[0] = CONTROL_DATA;
        for page in self.buffer.chunks(WIDTH) {
            data[1..].copy_from_slice(page);
            bus.write(I2C_ADDR_OLED, &data, I2C_TIMEOUT_TICKS)?;
        }
        Ok(())
    }

    fn command(&self, commands: &[u8]) -> anyhow::Result<()> {
        let mut bus = lock_bus(self.bus)?;
        for &c in commands {
            bus.write(I2C_ADDR_OLED, &[CONTROL_COMMAND, c], I2C_TIMEOUT_TICKS)?;
        }
        Ok(())
    }

    fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        let index = x as usize + (y as usize / 8) * WIDTH;
        let bit = 1 << (y % 8);
        if on {
            self.buffer[index] |= bit;
        } else {
            self.buffer[index] &= !bit;
        }
    }
}

impl OriginDimensions for OledDisplay {
    fn size(&self) -> Size {
        self.rotation.logical_size()
    }
}

impl DrawTarget for OledDisplay {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some((x, y)) = self.rotation.to_physical(point) {
                self.set_pixel(x, y, color.is_on());
            }
        }
        Ok(())
    }
}

impl Display for OledDisplay {
    fn render(&mut self, rotation: Rotation, content: &Screen) {
        self.set_rotation(rotation);
        self.buffer.fill(0);
        screen::draw(self, content).unwrap_or_else(|never| match never {});

        if let Err(e) = self.flush() {
            log::warn!("Display flush failed: {}", e);
        }
    }
}
