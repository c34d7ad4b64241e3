// Tilt Timer - Alarm Sequencer
//
// Two independent periodic processes share the loop clock while the alarm
// is active: a 1 Hz LED blink and a looping melody.  Neither blocks; each
// `tick` reports what (if anything) the outputs should change to.

use crate::config::*;
use crate::face::Face;
use crate::screen::Rotation;

// ---------------------------------------------------------------------------
// Melody entries
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    /// Tone frequency in Hz; 0 is a rest.
    pub freq_hz: u32,
    pub duration_ms: u32,
}

impl Note {
    pub const fn new(freq_hz: u32, duration_ms: u32) -> Self {
        Self {
            freq_hz,
            duration_ms,
        }
    }

    pub fn is_rest(&self) -> bool {
        self.freq_hz == 0
    }
}

/// Output changes requested by one `tick`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlarmTick {
    /// New LED level, when the blink toggled.
    pub led: Option<bool>,
    /// Note to start, when the melody advanced.
    pub note: Option<Note>,
}

// ---------------------------------------------------------------------------
// Alarm session
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmSession {
    pub rotation: Rotation,
    pub locked_face: Face,
    note_index: usize,
    note_started_at: u32,
    blink_on: bool,
    blink_toggled_at: u32,
}

impl AlarmSession {
    /// Start with the LED off and the first melody note due immediately.
    pub fn start(locked_face: Face, rotation: Rotation, now: u32) -> Self {
        Self {
            rotation,
            locked_face,
            note_index: 0,
            note_started_at: now,
            blink_on: false,
            blink_toggled_at: now,
        }
    }

    pub fn note_index(&self) -> usize {
        self.note_index
    }

    pub fn current_note(&self) -> Note {
        MELODY[self.note_index]
    }

    pub fn blink_on(&self) -> bool {
        self.blink_on
    }

    pub fn tick(&mut self, now: u32) -> AlarmTick {
        AlarmTick {
            led: self.tick_blink(now),
            note: self.tick_melody(now),
        }
    }

    fn tick_blink(&mut self, now: u32) -> Option<bool> {
        let elapsed = now.wrapping_sub(self.blink_toggled_at);
        if elapsed < ALARM_BLINK_MS {
            return None;
        }
        self.blink_toggled_at = next_reference(self.blink_toggled_at, ALARM_BLINK_MS, elapsed, now);
        self.blink_on = !self.blink_on;
        Some(self.blink_on)
    }

    fn tick_melody(&mut self, now: u32) -> Option<Note> {
        let duration = self.current_note().duration_ms;
        let elapsed = now.wrapping_sub(self.note_started_at);
        if elapsed < duration {
            return None;
        }
        self.note_started_at = next_reference(self.note_started_at, duration, elapsed, now);
        self.note_index = (self.note_index + 1) % MELODY.len();

        let note = self.current_note();
        log::debug!("Alarm note {} ({} Hz)", self.note_index, note.freq_hz);
        Some(note)
    }
}

/// Advance a period reference by one period, or re-synchronise to `now`
/// when the loop has fallen more than a whole period behind.
fn next_reference(reference: u32, period: u32, elapsed: u32, now: u32) -> u32 {
    if elapsed >= period.saturating_mul(2) {
        now
    } else {
        reference.wrapping_add(period)
    }
}
