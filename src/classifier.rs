//! Threshold classifier mapping face features to eye and mouth states.
//!
//! Every frame is classified from scratch: there is no smoothing or
//! hysteresis between frames. Rule order is significant; the first matching
//! rule wins.

use crate::{features::FaceFeatures, thresholds::Thresholds};
use std::fmt;

/// Eye state shown in rows 0-4 of the display.
///
/// Discriminants are the pattern-table indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EyeState {
    UpperLeft = 0,
    UpperMid = 1,
    UpperRight = 2,
    MidLeft = 3,
    MidMid = 4,
    MidRight = 5,
    LowerLeft = 6,
    LowerMid = 7,
    LowerRight = 8,
    Close = 9,
    CloseTightly = 10,
    WinkLeft = 11,
    WinkRight = 12,
    Open = 13,
    /// Two-hand gesture override
    TtPose = 14,
}

/// Mouth state shown in rows 5-7 of the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MouthState {
    Smile = 0,
    Scowl = 1,
    Close = 2,
    Open = 3,
    Kiss = 4,
}

impl EyeState {
    /// Number of eye states
    pub const COUNT: usize = 15;

    /// All states in table order
    pub const ALL: [Self; Self::COUNT] = [
        Self::UpperLeft,
        Self::UpperMid,
        Self::UpperRight,
        Self::MidLeft,
        Self::MidMid,
        Self::MidRight,
        Self::LowerLeft,
        Self::LowerMid,
        Self::LowerRight,
        Self::Close,
        Self::CloseTightly,
        Self::WinkLeft,
        Self::WinkRight,
        Self::Open,
        Self::TtPose,
    ];

    /// Pattern-table index
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// State for a pattern-table index, `None` when out of range
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Directional cell of the 3x3 gaze grid; `row` and `col` are 0..3
    #[must_use]
    pub fn from_grid(row: usize, col: usize) -> Self {
        Self::from_index(row * 3 + col).unwrap_or(Self::MidMid)
    }

    /// Upper-snake name shown on the status readout
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UpperLeft => "UPPER_LEFT",
            Self::UpperMid => "UPPER_MID",
            Self::UpperRight => "UPPER_RIGHT",
            Self::MidLeft => "MID_LEFT",
            Self::MidMid => "MID_MID",
            Self::MidRight => "MID_RIGHT",
            Self::LowerLeft => "LOWER_LEFT",
            Self::LowerMid => "LOWER_MID",
            Self::LowerRight => "LOWER_RIGHT",
            Self::Close => "CLOSE",
            Self::CloseTightly => "CLOSE_TIGHTLY",
            Self::WinkLeft => "WINK_LEFT",
            Self::WinkRight => "WINK_RIGHT",
            Self::Open => "OPEN",
            Self::TtPose => "TT_POSE",
        }
    }
}

impl MouthState {
    /// Number of mouth states
    pub const COUNT: usize = 5;

    /// All states in table order
    pub const ALL: [Self; Self::COUNT] = [Self::Smile, Self::Scowl, Self::Close, Self::Open, Self::Kiss];

    /// Pattern-table index
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// State for a pattern-table index, `None` when out of range
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Upper-snake name shown on the status readout
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Smile => "SMILE",
            Self::Scowl => "SCOWL",
            Self::Close => "CLOSE",
            Self::Open => "OPEN",
            Self::Kiss => "KISS",
        }
    }
}

impl Default for EyeState {
    fn default() -> Self {
        Self::MidMid
    }
}

impl Default for MouthState {
    fn default() -> Self {
        Self::Close
    }
}

impl fmt::Display for EyeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for MouthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classified (eye, mouth) pair for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Expression {
    pub eyes: EyeState,
    pub mouth: MouthState,
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "eyes={} mouth={}", self.eyes, self.mouth)
    }
}

/// Classify the eyes.
///
/// Any non-finite eye feature yields MID_MID.
#[must_use]
pub fn classify_eyes(f: &FaceFeatures, t: &Thresholds) -> EyeState {
    let eye_features = [f.left_ear, f.right_ear, f.avg_ear, f.gaze_h, f.gaze_v];
    if !eye_features.iter().all(|v| v.is_finite()) {
        EyeState::MidMid
    } else if f.left_ear < t.eye_tight && f.right_ear < t.eye_tight {
        EyeState::CloseTightly
    } else if f.avg_ear < t.eye_open {
        EyeState::Close
    } else if (f.left_ear - f.right_ear).abs() > t.eye_wink_diff {
        // the narrower eye is the winking one
        if f.left_ear < f.right_ear {
            EyeState::WinkRight
        } else {
            EyeState::WinkLeft
        }
    } else if f.avg_ear > t.eye_wide_open {
        EyeState::Open
    } else {
        classify_gaze(f.gaze_h, f.gaze_v, t)
    }
}

/// Cell of the 3x3 gaze grid.
///
/// Columns are mirrored: a small horizontal ratio selects the RIGHT column.
#[must_use]
pub fn classify_gaze(gaze_h: f64, gaze_v: f64, t: &Thresholds) -> EyeState {
    let col = if gaze_h < t.gaze_h_left {
        2
    } else if gaze_h > t.gaze_h_right {
        0
    } else {
        1
    };

    let row = if gaze_v < t.gaze_v_up {
        0
    } else if gaze_v > t.gaze_v_down {
        2
    } else {
        1
    };

    EyeState::from_grid(row, col)
}

/// Classify the mouth.
///
/// Any non-finite mouth feature yields CLOSE.
#[must_use]
pub fn classify_mouth(f: &FaceFeatures, t: &Thresholds) -> MouthState {
    if ![f.mar, f.smile, f.mouth_width_ratio].iter().all(|v| v.is_finite()) {
        MouthState::Close
    } else if f.mouth_width_ratio < t.mouth_kiss_width_ratio {
        MouthState::Kiss
    } else if f.mar > t.mouth_open {
        MouthState::Open
    } else if f.smile < t.mouth_smile {
        MouthState::Smile
    } else if f.smile > (t.mouth_smile * 2.0).abs() {
        MouthState::Scowl
    } else {
        MouthState::Close
    }
}

/// Classify both eyes and mouth
#[must_use]
pub fn classify(f: &FaceFeatures, t: &Thresholds) -> Expression {
    Expression {
        eyes: classify_eyes(f, t),
        mouth: classify_mouth(f, t),
    }
}
