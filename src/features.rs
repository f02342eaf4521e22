//! Scalar expression features derived from a face mesh.
//!
//! All values are plain ratios. Degenerate geometry (a zero-length reference
//! distance) yields NaN, which never satisfies a classification threshold.

use crate::{
    constants::face,
    geometry::{distance, finite_or_nan, mean2, ratio},
    landmarks::FaceLandmarks,
};
use std::fmt;

/// Features consumed by the classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceFeatures {
    /// Left eye aspect ratio (lid opening over corner distance)
    pub left_ear: f64,
    /// Right eye aspect ratio
    pub right_ear: f64,
    /// Mean of both eye aspect ratios
    pub avg_ear: f64,
    /// Horizontal iris position, 0 at the inner corner and 1 at the outer corner
    pub gaze_h: f64,
    /// Vertical iris position, 0 at the top lid and 1 at the bottom lid
    pub gaze_v: f64,
    /// Mouth aspect ratio (inner lip opening over mouth width)
    pub mar: f64,
    /// Corner height relative to lip centre; negative when corners are raised
    pub smile: f64,
    /// Mouth width over cheek-to-cheek face width
    pub mouth_width_ratio: f64,
}

impl FaceFeatures {
    /// Extract all features from a face mesh
    #[must_use]
    pub fn extract(lm: &FaceLandmarks<'_>) -> Self {
        let l_inner = lm.point(face::LEFT_EYE_INNER);
        let l_outer = lm.point(face::LEFT_EYE_OUTER);
        let l_top = lm.point(face::LEFT_EYE_TOP);
        let l_bottom = lm.point(face::LEFT_EYE_BOTTOM);
        let l_iris = lm.point(face::LEFT_IRIS);

        let r_inner = lm.point(face::RIGHT_EYE_INNER);
        let r_outer = lm.point(face::RIGHT_EYE_OUTER);
        let r_top = lm.point(face::RIGHT_EYE_TOP);
        let r_bottom = lm.point(face::RIGHT_EYE_BOTTOM);
        let r_iris = lm.point(face::RIGHT_IRIS);

        let m_left = lm.point(face::MOUTH_LEFT);
        let m_right = lm.point(face::MOUTH_RIGHT);
        let m_top = lm.point(face::MOUTH_TOP);
        let m_bottom = lm.point(face::MOUTH_BOTTOM);

        let left_ear = ratio(distance(l_top, l_bottom), distance(l_inner, l_outer));
        let right_ear = ratio(distance(r_top, r_bottom), distance(r_inner, r_outer));

        let gaze_h = mean2(
            ratio(l_iris.x - l_inner.x, l_outer.x - l_inner.x),
            ratio(r_iris.x - r_inner.x, r_outer.x - r_inner.x),
        );
        let gaze_v = mean2(
            ratio(l_iris.y - l_top.y, l_bottom.y - l_top.y),
            ratio(r_iris.y - r_top.y, r_bottom.y - r_top.y),
        );

        let mouth_width = distance(m_left, m_right);
        let face_width = distance(lm.point(face::CHEEK_LEFT), lm.point(face::CHEEK_RIGHT));

        let lip_center_y = (m_top.y + m_bottom.y) / 2.0;
        let corners_y = (m_left.y + m_right.y) / 2.0;

        Self {
            left_ear,
            right_ear,
            avg_ear: mean2(left_ear, right_ear),
            gaze_h,
            gaze_v,
            mar: ratio(distance(m_top, m_bottom), mouth_width),
            smile: ratio(finite_or_nan(corners_y - lip_center_y), mouth_width),
            mouth_width_ratio: ratio(mouth_width, face_width),
        }
    }

    /// True when every feature is a usable number
    #[must_use]
    pub fn is_finite(&self) -> bool {
        [
            self.left_ear,
            self.right_ear,
            self.avg_ear,
            self.gaze_h,
            self.gaze_v,
            self.mar,
            self.smile,
            self.mouth_width_ratio,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

impl fmt::Display for FaceFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "L-EAR: {:.2} R-EAR: {:.2} Gaze H: {:.2} Gaze V: {:.2} Smile: {:.2} MAR: {:.2} Width: {:.2}",
            self.left_ear,
            self.right_ear,
            self.gaze_h,
            self.gaze_v,
            self.smile,
            self.mar,
            self.mouth_width_ratio
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constants::NUM_FACE_LANDMARKS, geometry::Point2D};

    /// Neutral face: eyes 0.1 wide and 0.03 tall, iris centred, flat closed mouth
    fn neutral_mesh() -> Vec<Point2D> {
        let mut pts = vec![Point2D::new(0.5, 0.5); NUM_FACE_LANDMARKS];
        pts[face::LEFT_EYE_INNER] = Point2D::new(0.30, 0.40);
        pts[face::LEFT_EYE_OUTER] = Point2D::new(0.40, 0.40);
        pts[face::LEFT_EYE_TOP] = Point2D::new(0.35, 0.385);
        pts[face::LEFT_EYE_BOTTOM] = Point2D::new(0.35, 0.415);
        pts[face::LEFT_IRIS] = Point2D::new(0.35, 0.40);

        pts[face::RIGHT_EYE_INNER] = Point2D::new(0.60, 0.40);
        pts[face::RIGHT_EYE_OUTER] = Point2D::new(0.70, 0.40);
        pts[face::RIGHT_EYE_TOP] = Point2D::new(0.65, 0.385);
        pts[face::RIGHT_EYE_BOTTOM] = Point2D::new(0.65, 0.415);
        pts[face::RIGHT_IRIS] = Point2D::new(0.65, 0.40);

        pts[face::MOUTH_LEFT] = Point2D::new(0.40, 0.70);
        pts[face::MOUTH_RIGHT] = Point2D::new(0.60, 0.70);
        pts[face::MOUTH_TOP] = Point2D::new(0.50, 0.70);
        pts[face::MOUTH_BOTTOM] = Point2D::new(0.50, 0.70);

        pts[face::CHEEK_LEFT] = Point2D::new(0.20, 0.55);
        pts[face::CHEEK_RIGHT] = Point2D::new(0.80, 0.55);
        pts
    }

    #[test]
    fn test_extract_neutral() {
        let mesh = neutral_mesh();
        let f = FaceFeatures::extract(&FaceLandmarks::new(&mesh).unwrap());

        assert!((f.left_ear - 0.3).abs() < 1e-9);
        assert!((f.right_ear - 0.3).abs() < 1e-9);
        assert!((f.avg_ear - 0.3).abs() < 1e-9);
        assert!((f.gaze_h - 0.5).abs() < 1e-9);
        assert!((f.gaze_v - 0.5).abs() < 1e-9);
        assert!(f.mar.abs() < 1e-9);
        assert!(f.smile.abs() < 1e-9);
        assert!((f.mouth_width_ratio - 0.2 / 0.6).abs() < 1e-9);
        assert!(f.is_finite());
    }

    #[test]
    fn test_raised_corners_score_negative() {
        let mut mesh = neutral_mesh();
        mesh[face::MOUTH_LEFT].y = 0.68;
        mesh[face::MOUTH_RIGHT].y = 0.68;
        let f = FaceFeatures::extract(&FaceLandmarks::new(&mesh).unwrap());
        assert!((f.smile - (-0.1)).abs() < 1e-9);
    }

    #[test]
    fn test_iris_near_inner_corner() {
        let mut mesh = neutral_mesh();
        mesh[face::LEFT_IRIS].x = 0.32;
        mesh[face::RIGHT_IRIS].x = 0.62;
        let f = FaceFeatures::extract(&FaceLandmarks::new(&mesh).unwrap());
        assert!((f.gaze_h - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_coincident_points_give_nan() {
        let mesh = vec![Point2D::new(0.5, 0.5); NUM_FACE_LANDMARKS];
        let f = FaceFeatures::extract(&FaceLandmarks::new(&mesh).unwrap());
        assert!(f.left_ear.is_nan());
        assert!(f.gaze_h.is_nan());
        assert!(f.mar.is_nan());
        assert!(f.mouth_width_ratio.is_nan());
        assert!(!f.is_finite());
    }
}
