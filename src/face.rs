// Tilt Timer - Face Classification
//
// Maps an acceleration vector onto the face of the cube that is resting on
// the table.  Only the four side faces select a timer; lying flat (Z axis
// vertical), moving, or tilted readings classify as `Face::None`.

use crate::config::*;
use crate::events::SensorData;
use crate::screen::Rotation;

// ---------------------------------------------------------------------------
// Face
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Face {
    /// No axis clearly aligned with gravity.
    #[default]
    None,
    NegY,
    PosX,
    PosY,
    NegX,
}

impl Face {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Short label for logging.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::NegY => "-Y",
            Self::PosX => "+X",
            Self::PosY => "+Y",
            Self::NegX => "-X",
        }
    }
}

/// Classify a raw acceleration vector.
///
/// Axes are tested in the fixed order Y, X, Z so exact ties resolve towards
/// Y, then X.  The dominant axis must also lie inside the gravity window
/// [`AXIS_G_MIN`]..=[`AXIS_G_MAX`].
pub fn classify(x: f32, y: f32, z: f32) -> Face {
    let ax = x.abs();
    let ay = y.abs();
    let az = z.abs();

    if ay >= ax && ay >= az && in_gravity_window(ay) {
        if y > 0.0 {
            Face::PosY
        } else {
            Face::NegY
        }
    } else if ax >= ay && ax >= az && in_gravity_window(ax) {
        if x > 0.0 {
            Face::PosX
        } else {
            Face::NegX
        }
    } else {
        // Z-up / Z-down is the neutral menu position, everything else is
        // ambiguous.  Neither selects a face.
        Face::None
    }
}

/// Convenience wrapper for a full sensor sample.
pub fn classify_sample(sample: &SensorData) -> Face {
    classify(sample.ax, sample.ay, sample.az)
}

fn in_gravity_window(magnitude: f32) -> bool {
    (AXIS_G_MIN..=AXIS_G_MAX).contains(&magnitude)
}

// ---------------------------------------------------------------------------
// Per-face countdown settings
// ---------------------------------------------------------------------------

/// What a face selects when the cube is set down on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceProfile {
    pub seconds: u32,
    pub axis_label: char,
    pub rotation: Rotation,
}

impl FaceProfile {
    /// Look up the countdown for a face.  `Face::None` selects nothing.
    ///
    /// The X faces are wired crossed relative to the legend in `config`:
    /// a `PosX` reading runs the 30 s timer at rotation 1 and `NegX` the
    /// 10 s timer at rotation 3.  Durations and rotations swap together, so
    /// the text is upright on the face that carries the matching label.
    pub fn for_face(face: Face) -> Option<Self> {
        let (seconds, axis_label, rotation) = match face {
            Face::None => return None,
            Face::NegY => (COUNT_NEG_Y_SEC, 'Y', Rotation::Rotate0),
            Face::PosX => (COUNT_NEG_X_SEC, 'X', Rotation::Rotate90),
            Face::PosY => (COUNT_POS_Y_SEC, 'Y', Rotation::Rotate180),
            Face::NegX => (COUNT_POS_X_SEC, 'X', Rotation::Rotate270),
        };
        Some(Self {
            seconds,
            axis_label,
            rotation,
        })
    }
}
