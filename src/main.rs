// Tilt Timer - Firmware Entry Point
//
// Boot sequence:
//   1. Bring up the shared I2C bus (OLED + LIS3DH).
//   2. Initialise the OLED; a dead display halts the device.
//   3. Probe and configure the LIS3DH; a missing sensor halts the device.
//   4. Configure the LED and the piezo, both off.
//   5. Spawn the timer task, which starts on the menu screen.
//
// Only builds for ESP-IDF targets.  The timer logic itself lives in the
// `tilt_timer` library and is tested on the host with `cargo test --lib`.

#[cfg(target_os = "espidf")]
mod drivers;
#[cfg(target_os = "espidf")]
mod tasks;

#[cfg(target_os = "espidf")]
use std::sync::Mutex;
#[cfg(target_os = "espidf")]
use std::thread;
#[cfg(target_os = "espidf")]
use std::time::Duration;

#[cfg(target_os = "espidf")]
use esp_idf_hal::gpio::{OutputPin, PinDriver};
#[cfg(target_os = "espidf")]
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
#[cfg(target_os = "espidf")]
use esp_idf_hal::prelude::*;

#[cfg(target_os = "espidf")]
use tilt_timer::config::*;

#[cfg(target_os = "espidf")]
use crate::drivers::actuator::AlarmOutputs;
#[cfg(target_os = "espidf")]
use crate::drivers::display::OledDisplay;
#[cfg(target_os = "espidf")]
use crate::drivers::imu::Lis3dh;

// ---------------------------------------------------------------------------
// Utility: milliseconds since boot (wraps at ~49 days; every delta in the
// timer logic uses wrapping arithmetic)
// ---------------------------------------------------------------------------
#[cfg(target_os = "espidf")]
pub fn now_ms() -> u32 {
    unsafe { (esp_idf_sys::esp_timer_get_time() / 1000) as u32 }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------
#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!("Tilt Timer firmware starting…");

    // ---- Peripherals ------------------------------------------------------
    let peripherals = Peripherals::take()?;

    // ---- I2C bus (shared between OLED and LIS3DH) -------------------------
    let i2c_config = I2cConfig::new().baudrate(I2C_BAUDRATE_KHZ.kHz().into());
    let i2c: I2cDriver<'static> = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio23, // SDA
        peripherals.pins.gpio22, // SCL
        &i2c_config,
    )?;
    // The bus lives for the entire programme (embedded firmware never exits).
    let i2c_bus: &'static Mutex<I2cDriver<'static>> = Box::leak(Box::new(Mutex::new(i2c)));

    // ---- OLED -------------------------------------------------------------
    let mut display = OledDisplay::new(i2c_bus);
    if !display.is_connected() {
        halt("Could not find SSD1306");
    }
    if let Err(e) = display.init() {
        halt(&format!("SSD1306 init failed: {e}"));
    }

    // ---- LIS3DH -----------------------------------------------------------
    let imu = Lis3dh::new(i2c_bus);
    if !imu.is_connected() {
        halt("Could not find LIS3DH");
    }
    if let Err(e) = imu.init() {
        halt(&format!("LIS3DH configuration failed: {e}"));
    }

    // ---- Outputs ----------------------------------------------------------
    let led = PinDriver::output(peripherals.pins.gpio27.downgrade_output())?;
    let outputs = AlarmOutputs::new(led, peripherals.pins.gpio12.downgrade_output())?;

    log::info!("System ready");

    // ---- Spawn the control loop (maps to a FreeRTOS task via std::thread) --
    thread::Builder::new()
        .name("timer".into())
        .stack_size(STACK_TIMER)
        .spawn(move || {
            tasks::timer::timer_task(imu, display, outputs);
        })?;

    // Main thread has nothing left to do; park it forever.
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("tilt-timer is ESP32 firmware: build it for an ESP-IDF target, or run `cargo test --lib` for the host tests");
}

// ---------------------------------------------------------------------------
// Boot helpers
// ---------------------------------------------------------------------------

/// Unrecoverable boot fault: keep reporting it over the serial log and never
/// hand control to the timer.
#[cfg(target_os = "espidf")]
fn halt(reason: &str) -> ! {
    log::error!("{}", reason);
    loop {
        thread::sleep(Duration::from_millis(HALT_LOG_INTERVAL_MS));
        log::error!("Halted: {}", reason);
    }
}
