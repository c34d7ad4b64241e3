// Tilt Timer - Orientation Debounce
//
// Filters out bumps and sensor glitches while a countdown or alarm is
// running.  The session is only cancelled once the cube has been off its
// locked face for a full `AXIS_CHANGE_BUFFER_MS`.

use crate::config::*;
use crate::face::Face;

/// Result of feeding one sample to the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Debounce {
    Stable,
    /// The cube has left its locked face for good; return to the menu.
    Interrupted,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DebounceGuard {
    /// Timestamp (ms) at which the current mismatch started, if any.
    change_started_at: Option<u32>,
}

impl DebounceGuard {
    pub const fn new() -> Self {
        Self {
            change_started_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.change_started_at.is_some()
    }

    /// Drop any pending interrupt.
    pub fn reset(&mut self) {
        self.change_started_at = None;
    }

    /// Compare the sensed face against the locked one.
    ///
    /// `Face::None` never matches, so lying flat or shaking the cube counts
    /// toward the window like any other face.  `Interrupted` is one-shot:
    /// the guard clears itself when it fires.
    pub fn update(&mut self, sensed: Face, locked: Face, now: u32) -> Debounce {
        if sensed == locked && !sensed.is_none() {
            self.change_started_at = None;
            return Debounce::Stable;
        }

        match self.change_started_at {
            None => {
                self.change_started_at = Some(now);
                Debounce::Stable
            }
            Some(started) if now.wrapping_sub(started) >= AXIS_CHANGE_BUFFER_MS => {
                self.change_started_at = None;
                Debounce::Interrupted
            }
            Some(_) => Debounce::Stable,
        }
    }
}
