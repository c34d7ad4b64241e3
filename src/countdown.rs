// Tilt Timer - Countdown Session
//
// Non-blocking per-second countdown.  The control loop calls `tick` every
// iteration; state only changes when a one-second boundary has passed.

use crate::config::*;
use crate::face::{Face, FaceProfile};
use crate::screen::Rotation;

/// Outcome of a single `tick` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Unchanged,
    /// One second elapsed; `remaining_seconds` went down by one.
    Decremented,
    /// The countdown was already at zero when the next second elapsed.
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownSession {
    pub total_seconds: u32,
    pub remaining_seconds: u32,
    pub axis_label: char,
    pub rotation: Rotation,
    pub locked_face: Face,
    last_tick: u32,
}

impl CountdownSession {
    pub fn start(face: Face, profile: FaceProfile, now: u32) -> Self {
        Self {
            total_seconds: profile.seconds,
            remaining_seconds: profile.seconds,
            axis_label: profile.axis_label,
            rotation: profile.rotation,
            locked_face: face,
            last_tick: now,
        }
    }

    /// Advance the countdown against the monotonic clock.
    ///
    /// Fires at most once per call.  The reference timestamp moves forward
    /// by exactly one tick period so a late loop iteration does not stretch
    /// the following seconds.
    pub fn tick(&mut self, now: u32) -> Tick {
        if now.wrapping_sub(self.last_tick) < COUNTDOWN_TICK_MS {
            return Tick::Unchanged;
        }
        self.last_tick = self.last_tick.wrapping_add(COUNTDOWN_TICK_MS);

        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
            Tick::Decremented
        } else {
            Tick::Expired
        }
    }
}
