// Tilt Timer - Core Logic
//
// A cube-shaped kitchen timer: the face it rests on selects a countdown,
// and when time is up it blinks and plays a melody until it is turned over.
//
// Everything in this crate is hardware-independent and runs on the host.
// The ESP32 drivers and the control-loop task live in the binary.

pub mod alarm;
pub mod config;
pub mod countdown;
pub mod debounce;
pub mod events;
pub mod face;
pub mod machine;
pub mod screen;
pub mod services;

pub use events::{Mode, SensorData};
pub use face::Face;
pub use machine::StateMachine;
pub use screen::{Rotation, Screen};
pub use services::{Accelerometer, Actuator, Display};
