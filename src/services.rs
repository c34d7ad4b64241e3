// Tilt Timer - Hardware Service Interfaces
//
// The state machine only talks to hardware through these traits.  The
// firmware implements them on the ESP32 drivers; tests use recorders.

use crate::events::SensorData;
use crate::screen::{Rotation, Screen};

/// Source of acceleration samples, polled once per loop iteration.
pub trait Accelerometer {
    /// Latest acceleration in m/s².  Read failures are reported as a zero
    /// vector, which classifies as no face.
    fn sample(&mut self) -> SensorData;
}

/// Idempotent full-screen render.
pub trait Display {
    fn render(&mut self, rotation: Rotation, screen: &Screen);
}

/// LED and tone generator.  Commands take effect immediately.
pub trait Actuator {
    fn set_led(&mut self, on: bool);
    fn play_tone(&mut self, freq_hz: u32);
    fn stop_tone(&mut self);
}
