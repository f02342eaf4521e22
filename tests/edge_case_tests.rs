//! Edge case tests for degenerate geometry, odd configurations and table lookups


use expression_matrix::{
    classifier::{classify, EyeState, Expression, MouthState},
    config::Config,
    constants::{face, NUM_FACE_LANDMARKS},
    features::FaceFeatures,
    geometry::Point2D,
    landmarks::{FaceLandmarks, LandmarkFrame},
    patterns::{render, render_indices},
    pipeline::ExpressionPipeline,
    thresholds::{ThresholdKey, Thresholds},
};
use std::time::Instant;
use test_helpers::FaceSpec;

#[test]
fn test_collapsed_mesh_routes_to_neutral() {
    let mesh = vec![Point2D::new(0.5, 0.5); NUM_FACE_LANDMARKS];
    let features = FaceFeatures::extract(&FaceLandmarks::new(&mesh).unwrap());
    assert!(!features.is_finite());
    assert_eq!(classify(&features, &Thresholds::default()), Expression::default());
}

#[test]
fn test_zero_width_mouth_routes_to_close() {
    let mut mesh = FaceSpec::default().mesh();
    mesh[face::MOUTH_RIGHT] = mesh[face::MOUTH_LEFT];
    let features = FaceFeatures::extract(&FaceLandmarks::new(&mesh).unwrap());
    assert!(features.mar.is_nan());
    assert!(features.smile.is_nan());
    // zero over a non-zero face width is a real ratio
    assert_eq!(features.mouth_width_ratio, 0.0);
    assert_eq!(classify(&features, &Thresholds::default()).mouth, MouthState::Close);
}

#[test]
fn test_collapsed_eye_corners_route_to_mid_mid() {
    let spec = FaceSpec {
        gaze_v: 0.1,
        ..FaceSpec::default()
    };
    let mut mesh = spec.mesh();
    mesh[face::LEFT_EYE_OUTER] = mesh[face::LEFT_EYE_INNER];
    mesh[face::RIGHT_EYE_OUTER] = mesh[face::RIGHT_EYE_INNER];

    let features = FaceFeatures::extract(&FaceLandmarks::new(&mesh).unwrap());
    assert!(features.left_ear.is_nan());
    assert!(features.gaze_h.is_nan());
    assert!(features.gaze_v.is_finite());

    let mut pipeline = ExpressionPipeline::new(&Config::default());
    let frame = LandmarkFrame {
        face: Some(mesh),
        hands: Vec::new(),
    };
    let report = pipeline.process_frame(&frame, Instant::now()).unwrap();
    assert_eq!(report.expression.eyes, EyeState::MidMid);
    assert_eq!(report.expression.mouth, MouthState::Close);
}

#[test]
fn test_collapsed_face_width_is_not_a_kiss() {
    let mut mesh = FaceSpec::default().mesh();
    mesh[face::CHEEK_RIGHT] = mesh[face::CHEEK_LEFT];
    let features = FaceFeatures::extract(&FaceLandmarks::new(&mesh).unwrap());
    assert!(features.mouth_width_ratio.is_nan());
    assert_eq!(classify(&features, &Thresholds::default()).mouth, MouthState::Close);
}

#[test]
fn test_non_finite_coordinates_do_not_panic() {
    let mut pipeline = ExpressionPipeline::new(&Config::default());
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, f64::MAX, -1e300] {
        let mut mesh = FaceSpec::default().mesh();
        mesh[face::LEFT_EYE_TOP] = Point2D::new(bad, bad);
        mesh[face::MOUTH_LEFT] = Point2D::new(bad, 0.7);
        let frame = LandmarkFrame {
            face: Some(mesh),
            hands: Vec::new(),
        };
        assert!(pipeline.process_frame(&frame, Instant::now()).is_some());
    }
}

#[test]
fn test_random_meshes_do_not_panic() {
    let thresholds = Thresholds::default();
    for _ in 0..200 {
        let mesh: Vec<Point2D> = (0..NUM_FACE_LANDMARKS)
            .map(|_| Point2D::new(rand::random::<f64>(), rand::random::<f64>()))
            .collect();
        let features = FaceFeatures::extract(&FaceLandmarks::new(&mesh).unwrap());
        let expression = classify(&features, &thresholds);
        assert_eq!(render(expression).rows().len(), 8);
    }
}

#[test]
fn test_truncated_face_is_skipped() {
    let mut pipeline = ExpressionPipeline::new(&Config::default());
    let mut mesh = FaceSpec::default().mesh();
    mesh.truncate(468);
    let frame = LandmarkFrame {
        face: Some(mesh),
        hands: Vec::new(),
    };
    assert!(pipeline.process_frame(&frame, Instant::now()).is_none());
}

#[test]
fn test_inverted_vertical_bounds() {
    let mut pipeline = ExpressionPipeline::new(&Config::default());
    let tuner = pipeline.thresholds();
    tuner.set(ThresholdKey::GazeVUp, 0.9);
    tuner.set(ThresholdKey::GazeVDown, 0.1);

    // up is tested first, so every vertical ratio below 0.9 reads as up
    let report = pipeline.process_frame(&FaceSpec::default().frame(), Instant::now()).unwrap();
    assert_eq!(report.expression.eyes, EyeState::UpperMid);
}

#[test]
fn test_positive_smile_threshold() {
    // a positive smile threshold makes the smile band swallow the scowl band
    let mut pipeline = ExpressionPipeline::new(&Config::default());
    pipeline.thresholds().set(ThresholdKey::MouthSmile, 0.05);
    let spec = FaceSpec {
        smile: 0.03,
        ..FaceSpec::default()
    };
    let report = pipeline.process_frame(&spec.frame(), Instant::now()).unwrap();
    assert_eq!(report.expression.mouth, MouthState::Smile);
}

#[test]
fn test_extreme_threshold_values() {
    let mut pipeline = ExpressionPipeline::new(&Config::default());
    let tuner = pipeline.thresholds();
    for key in ThresholdKey::ALL {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 0.0, -1.0, 1e9] {
            tuner.set(key, value);
            assert!(pipeline.process_frame(&FaceSpec::default().frame(), Instant::now()).is_some());
        }
        tuner.reset();
    }
}

#[test]
fn test_out_of_range_state_indices() {
    let neutral = render(Expression::default());
    assert_eq!(render_indices(EyeState::COUNT, MouthState::COUNT), neutral);
    assert_eq!(render_indices(usize::MAX, usize::MAX), neutral);
    assert_eq!(
        render_indices(EyeState::Open.index(), 1000),
        render(Expression {
            eyes: EyeState::Open,
            mouth: MouthState::Close
        })
    );
}
