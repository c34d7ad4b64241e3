// Tilt Timer - Hardware & System Configuration
// Target: Adafruit Feather ESP32 + SSD1306 OLED + LIS3DH accelerometer

use crate::alarm::Note;

// ---------------------------------------------------------------------------
// I2C Bus (OLED and LIS3DH share one bus: SDA GPIO23, SCL GPIO22)
// ---------------------------------------------------------------------------
pub const I2C_ADDR_LIS3DH: u8 = 0x18;
pub const I2C_ADDR_OLED: u8 = 0x3C;
pub const I2C_BAUDRATE_KHZ: u32 = 400;
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks

// ---------------------------------------------------------------------------
// Display (SSD1306 OLED)
// ---------------------------------------------------------------------------
pub const SCREEN_WIDTH: u32 = 128;
pub const SCREEN_HEIGHT: u32 = 64;
pub const DISPLAY_BUFFER_SIZE: usize = (SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize) / 8; // 1024

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_TIMER: usize = 8192;

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const LOOP_INTERVAL_MS: u64 = 50;        // control loop cadence
pub const COUNTDOWN_TICK_MS: u32 = 1000;
pub const AXIS_CHANGE_BUFFER_MS: u32 = 500;  // sustained reorientation before cancel
pub const ALARM_BLINK_MS: u32 = 1000;        // LED toggles every second
pub const HALT_LOG_INTERVAL_MS: u64 = 5000;

// ---------------------------------------------------------------------------
// Face detection (m/s²)
// ---------------------------------------------------------------------------
pub const AXIS_G_MIN: f32 = 9.0;
pub const AXIS_G_MAX: f32 = 11.5;
pub const STANDARD_GRAVITY: f32 = 9.80665;

// ---------------------------------------------------------------------------
// Countdown durations (seconds), named after the printed legend
//  -Y →  5 s  (bottom)
//  +X → 10 s  (right)
//  +Y → 15 s  (top)
//  -X → 30 s  (left)
// ---------------------------------------------------------------------------
pub const COUNT_NEG_Y_SEC: u32 = 5;
pub const COUNT_POS_X_SEC: u32 = 10;
pub const COUNT_POS_Y_SEC: u32 = 15;
pub const COUNT_NEG_X_SEC: u32 = 30;

// ---------------------------------------------------------------------------
// Alarm melody (frequency 0 = rest)
// ---------------------------------------------------------------------------
pub const MELODY: [Note; 13] = [
    Note::new(659, 150),
    Note::new(587, 150),
    Note::new(370, 300),
    Note::new(415, 300),
    Note::new(554, 150),
    Note::new(494, 150),
    Note::new(294, 300),
    Note::new(330, 300),
    Note::new(494, 150),
    Note::new(440, 150),
    Note::new(277, 300),
    Note::new(330, 300),
    Note::new(440, 600),
];

// ---------------------------------------------------------------------------
// LIS3DH Sensor Scale Factors
// ---------------------------------------------------------------------------
pub const ACCEL_SCALE_2G: f32 = 16380.0; // LSB/g at ±2 g, high-resolution
