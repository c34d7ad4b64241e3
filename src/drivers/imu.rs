// Tilt Timer - LIS3DH Accelerometer Driver
//
// Probes WHO_AM_I, configures ±2 g high-resolution sampling and burst-reads
// the three axes in m/s² over the bus it shares with the OLED.

use tilt_timer::config::*;
use tilt_timer::{Accelerometer, SensorData};

use super::{lock_bus, SharedBus};

// LIS3DH register addresses
const REG_WHO_AM_I: u8 = 0x0F;
const REG_CTRL_REG1: u8 = 0x20;
const REG_CTRL_REG4: u8 = 0x23;
const REG_OUT_X_L: u8 = 0x28; // Start of 6-byte X/Y/Z burst
const AUTO_INCREMENT: u8 = 0x80;
const WHO_AM_I_EXPECTED: u8 = 0x33;

// CTRL_REG1: ODR 50 Hz, normal power, X/Y/Z enabled
const CTRL_REG1_50HZ_XYZ: u8 = 0x47;
// CTRL_REG4: block data update, ±2 g, high-resolution
const CTRL_REG4_BDU_2G_HR: u8 = 0x88;

pub struct Lis3dh {
    bus: SharedBus,
}

impl Lis3dh {
    pub fn new(bus: SharedBus) -> Self {
        Self { bus }
    }

    /// Verify the device is reachable on the I2C bus.
    pub fn is_connected(&self) -> bool {
        let Ok(mut bus) = lock_bus(self.bus) else {
            return false;
        };
        let mut buf = [0u8; 1];
        match bus.write_read(I2C_ADDR_LIS3DH, &[REG_WHO_AM_I], &mut buf, I2C_TIMEOUT_TICKS) {
            Ok(()) => buf[0] == WHO_AM_I_EXPECTED,
            Err(_) => false,
        }
    }

    /// Enable all axes at 50 Hz, ±2 g, high-resolution output.
    pub fn init(&self) -> anyhow::Result<()> {
        let mut bus = lock_bus(self.bus)?;

        bus.write(I2C_ADDR_LIS3DH, &[REG_CTRL_REG1, CTRL_REG1_50HZ_XYZ], I2C_TIMEOUT_TICKS)?;
        bus.write(I2C_ADDR_LIS3DH, &[REG_CTRL_REG4, CTRL_REG4_BDU_2G_HR], I2C_TIMEOUT_TICKS)?;

        log::info!("LIS3DH initialised (±2g, 50Hz, high-res)");
        Ok(())
    }

    /// Burst-read all 3 axes and convert to m/s².
    pub fn read_data(&self) -> anyhow::Result<SensorData> {
        let mut bus = lock_bus(self.bus)?;
        let mut raw = [0u8; 6];
        bus.write_read(
            I2C_ADDR_LIS3DH,
            &[REG_OUT_X_L | AUTO_INCREMENT],
            &mut raw,
            I2C_TIMEOUT_TICKS,
        )?;

        Ok(SensorData {
            ax: to_ms2([raw[0], raw[1]]),
            ay: to_ms2([raw[2], raw[3]]),
            az: to_ms2([raw[4], raw[5]]),
        })
    }
}

/// Left-justified little-endian sample → m/s².
fn to_ms2(bytes: [u8; 2]) -> f32 {
    i16::from_le_bytes(bytes) as f32 / ACCEL_SCALE_2G * STANDARD_GRAVITY
}

impl Accelerometer for Lis3dh {
    fn sample(&mut self) -> SensorData {
        match self.read_data() {
            Ok(data) => data,
            Err(e) => {
                log::warn!("LIS3DH read error: {}", e);
                SensorData::default()
            }
        }
    }
}
