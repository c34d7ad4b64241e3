// Tilt Timer - Sensor Samples & Mode Reporting

// ---------------------------------------------------------------------------
// Sensor Data (3-axis acceleration from the LIS3DH, m/s²)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorData {
    pub ax: f32,
    pub ay: f32,
    pub az: f32,
}

impl SensorData {
    pub const fn new(ax: f32, ay: f32, az: f32) -> Self {
        Self { ax, ay, az }
    }
}

// ---------------------------------------------------------------------------
// Mode: which of the three top-level behaviours is active
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Waiting for the cube to be set down on a timer face.
    #[default]
    Menu,
    /// Counting down the duration selected by the locked face.
    Countdown,
    /// Time is up: blinking and playing the melody until reoriented.
    Alarm,
}

impl Mode {
    /// Human-readable label for logging.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Countdown => "countdown",
            Self::Alarm => "alarm",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_defaults_to_menu() {
        assert_eq!(Mode::default(), Mode::Menu);
        assert_eq!(Mode::default().display_name(), "menu");
        assert_eq!(Mode::Alarm.display_name(), "alarm");
    }
}
