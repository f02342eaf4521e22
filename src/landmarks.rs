//! Landmark sets delivered by the detector for one video frame.
//!
//! The detector is an external oracle: it hands over an optional face mesh and
//! up to two hand skeletons per frame. Nothing here is retained across frames.

use crate::{
    constants::{NUM_FACE_LANDMARKS, NUM_HAND_LANDMARKS},
    geometry::Point2D,
};
use serde::{Deserialize, Serialize};

/// Raw detector output for a single video frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkFrame {
    /// Face mesh points, absent when no face was detected
    pub face: Option<Vec<Point2D>>,
    /// One point list per detected hand
    pub hands: Vec<Vec<Point2D>>,
}

impl LandmarkFrame {
    /// Borrow the face mesh if it is present and complete
    #[must_use]
    pub fn face_landmarks(&self) -> Option<FaceLandmarks<'_>> {
        self.face.as_deref().and_then(FaceLandmarks::new)
    }

    /// Borrow every complete hand skeleton; truncated hands are dropped
    #[must_use]
    pub fn hand_landmarks(&self) -> Vec<HandLandmarks<'_>> {
        self.hands.iter().filter_map(|h| HandLandmarks::new(h)).collect()
    }
}

/// A complete face mesh
#[derive(Debug, Clone, Copy)]
pub struct FaceLandmarks<'a> {
    points: &'a [Point2D],
}

impl<'a> FaceLandmarks<'a> {
    /// Wrap a point slice, `None` if it is shorter than a full mesh
    #[must_use]
    pub fn new(points: &'a [Point2D]) -> Option<Self> {
        (points.len() >= NUM_FACE_LANDMARKS).then_some(Self { points })
    }

    /// Point at a named mesh index
    #[must_use]
    pub fn point(&self, index: usize) -> Point2D {
        self.points[index]
    }
}

/// A complete hand skeleton
#[derive(Debug, Clone, Copy)]
pub struct HandLandmarks<'a> {
    points: &'a [Point2D],
}

impl<'a> HandLandmarks<'a> {
    /// Wrap a point slice, `None` if it is shorter than a full skeleton
    #[must_use]
    pub fn new(points: &'a [Point2D]) -> Option<Self> {
        (points.len() >= NUM_HAND_LANDMARKS).then_some(Self { points })
    }

    /// Point at a named skeleton index
    #[must_use]
    pub fn point(&self, index: usize) -> Point2D {
        self.points[index]
    }
}
