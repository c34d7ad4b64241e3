// Tilt Timer - Control Loop Task
//
// The only task on the device.  Samples the accelerometer and steps the
// state machine at ~20 Hz; all timing inside the machine is driven by the
// timestamp passed in, so nothing here ever waits on a timer.

use std::thread;
use std::time::{Duration, Instant};

use tilt_timer::config::*;
use tilt_timer::{Accelerometer, Actuator, Display, StateMachine};

pub fn timer_task<I, D, A>(mut imu: I, display: D, actuator: A)
where
    I: Accelerometer,
    D: Display,
    A: Actuator,
{
    log::info!("Timer task started");

    let mut machine = StateMachine::new(display, actuator);
    let interval = Duration::from_millis(LOOP_INTERVAL_MS);

    loop {
        let tick_start = Instant::now();

        let sample = imu.sample();
        machine.step(crate::now_ms(), sample);

        // Sleep for the remainder of the interval to hold the loop cadence.
        let elapsed = tick_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}
