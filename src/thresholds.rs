//! Tunable classification thresholds and the live tuning surface.
//!
//! Values are never validated: an inverted or out-of-range setting simply
//! moves classification boundaries.

use crate::{Error, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};

/// Classifier thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Mean EAR below this is a closed pair of eyes
    pub eye_open: f64,
    /// Mean EAR above this is wide open
    pub eye_wide_open: f64,
    /// Both EARs below this is a tight squeeze
    pub eye_tight: f64,
    /// EAR difference between eyes above this is a wink
    pub eye_wink_diff: f64,
    /// Horizontal gaze below this selects the right-hand column (mirrored camera)
    pub gaze_h_left: f64,
    /// Horizontal gaze above this selects the left-hand column
    pub gaze_h_right: f64,
    /// Vertical gaze below this is looking up
    pub gaze_v_up: f64,
    /// Vertical gaze above this is looking down
    pub gaze_v_down: f64,
    /// MAR above this is an open mouth
    pub mouth_open: f64,
    /// Smile score below this (negative) is a smile; above twice its magnitude is a scowl
    pub mouth_smile: f64,
    /// Mouth-to-face width ratio below this is a kiss
    pub mouth_kiss_width_ratio: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            eye_open: 0.095,
            eye_wide_open: 0.53,
            eye_tight: 0.15,
            eye_wink_diff: 0.15,
            gaze_h_left: 0.4,
            gaze_h_right: 0.6,
            gaze_v_up: 0.35,
            gaze_v_down: 0.65,
            mouth_open: 0.15,
            mouth_smile: -0.02,
            mouth_kiss_width_ratio: 0.25,
        }
    }
}

/// Name of a single threshold, as used by the tuning surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdKey {
    EyeOpen,
    EyeWideOpen,
    EyeTight,
    EyeWinkDiff,
    GazeHLeft,
    GazeHRight,
    GazeVUp,
    GazeVDown,
    MouthOpen,
    MouthSmile,
    MouthKissWidthRatio,
}

/// Operator control range for a threshold. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ThresholdKey {
    /// Every key, in display order
    pub const ALL: [Self; 11] = [
        Self::EyeOpen,
        Self::EyeWideOpen,
        Self::EyeTight,
        Self::EyeWinkDiff,
        Self::GazeHLeft,
        Self::GazeHRight,
        Self::GazeVUp,
        Self::GazeVDown,
        Self::MouthOpen,
        Self::MouthSmile,
        Self::MouthKissWidthRatio,
    ];

    /// snake_case name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::EyeOpen => "eye_open",
            Self::EyeWideOpen => "eye_wide_open",
            Self::EyeTight => "eye_tight",
            Self::EyeWinkDiff => "eye_wink_diff",
            Self::GazeHLeft => "gaze_h_left",
            Self::GazeHRight => "gaze_h_right",
            Self::GazeVUp => "gaze_v_up",
            Self::GazeVDown => "gaze_v_down",
            Self::MouthOpen => "mouth_open",
            Self::MouthSmile => "mouth_smile",
            Self::MouthKissWidthRatio => "mouth_kiss_width_ratio",
        }
    }

    /// Slider range offered to the operator, if the key is exposed on the panel
    #[must_use]
    pub const fn range(self) -> Option<ThresholdRange> {
        let (min, max, step) = match self {
            Self::EyeOpen => (0.01, 0.1, 0.005),
            Self::EyeWideOpen => (0.1, 0.6, 0.01),
            Self::GazeHLeft => (0.1, 0.5, 0.01),
            Self::GazeHRight => (0.5, 0.9, 0.01),
            Self::MouthOpen => (0.05, 0.5, 0.01),
            Self::MouthSmile => (-0.1, 0.1, 0.01),
            Self::MouthKissWidthRatio => (0.1, 0.6, 0.01),
            Self::EyeTight | Self::EyeWinkDiff | Self::GazeVUp | Self::GazeVDown => return None,
        };
        Some(ThresholdRange { min, max, step })
    }
}

impl fmt::Display for ThresholdKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ThresholdKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| Error::UnknownThreshold(s.to_string()))
    }
}

impl Thresholds {
    /// Read a threshold by key
    #[must_use]
    pub const fn get(&self, key: ThresholdKey) -> f64 {
        match key {
            ThresholdKey::EyeOpen => self.eye_open,
            ThresholdKey::EyeWideOpen => self.eye_wide_open,
            ThresholdKey::EyeTight => self.eye_tight,
            ThresholdKey::EyeWinkDiff => self.eye_wink_diff,
            ThresholdKey::GazeHLeft => self.gaze_h_left,
            ThresholdKey::GazeHRight => self.gaze_h_right,
            ThresholdKey::GazeVUp => self.gaze_v_up,
            ThresholdKey::GazeVDown => self.gaze_v_down,
            ThresholdKey::MouthOpen => self.mouth_open,
            ThresholdKey::MouthSmile => self.mouth_smile,
            ThresholdKey::MouthKissWidthRatio => self.mouth_kiss_width_ratio,
        }
    }

    /// Overwrite a threshold by key
    pub fn set(&mut self, key: ThresholdKey, value: f64) {
        let slot = match key {
            ThresholdKey::EyeOpen => &mut self.eye_open,
            ThresholdKey::EyeWideOpen => &mut self.eye_wide_open,
            ThresholdKey::EyeTight => &mut self.eye_tight,
            ThresholdKey::EyeWinkDiff => &mut self.eye_wink_diff,
            ThresholdKey::GazeHLeft => &mut self.gaze_h_left,
            ThresholdKey::GazeHRight => &mut self.gaze_h_right,
            ThresholdKey::GazeVUp => &mut self.gaze_v_up,
            ThresholdKey::GazeVDown => &mut self.gaze_v_down,
            ThresholdKey::MouthOpen => &mut self.mouth_open,
            ThresholdKey::MouthSmile => &mut self.mouth_smile,
            ThresholdKey::MouthKissWidthRatio => &mut self.mouth_kiss_width_ratio,
        };
        *slot = value;
    }
}

/// Thresholds shared between the tuning surface and the frame pipeline
#[derive(Debug, Clone, Default)]
pub struct SharedThresholds {
    inner: Arc<RwLock<Thresholds>>,
}

impl SharedThresholds {
    /// Wrap an initial set of thresholds
    #[must_use]
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            inner: Arc::new(RwLock::new(thresholds)),
        }
    }

    /// Consistent copy for classifying one frame
    #[must_use]
    pub fn snapshot(&self) -> Thresholds {
        *self.inner.read()
    }

    /// Write one threshold; the last write wins
    pub fn set(&self, key: ThresholdKey, value: f64) {
        self.inner.write().set(key, value);
    }

    /// Restore the built-in defaults
    pub fn reset(&self) {
        *self.inner.write() = Thresholds::default();
    }
}
