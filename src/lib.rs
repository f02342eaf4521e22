//! Expression matrix library: drive an 8x8 LED display from a live face.
//!
//! The library turns facial and hand landmarks (from an external detector)
//! into a pair of eye and mouth states, renders them as an 8x8 bitmap and
//! streams that bitmap to the display as one line of hex per frame.
//!
//! The pipeline consists of:
//! 1. Feature extraction: eye/mouth aspect ratios, gaze and smile scores
//! 2. Threshold classification into one of 15 eye and 5 mouth states
//! 3. A two-hand gesture that can override the eye state
//! 4. Pattern lookup, rotation and mirroring to match the display mounting
//! 5. Hex encoding with deduplication and rate limiting on the display link
//!
//! # Examples
//!
//! ## Classifying a frame
//!
//! ```no_run
//! use expression_matrix::{
//!     classifier::classify, features::FaceFeatures, landmarks::LandmarkFrame,
//!     thresholds::Thresholds,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let line = std::fs::read_to_string("frame.json")?;
//! let frame: LandmarkFrame = serde_json::from_str(&line)?;
//!
//! if let Some(face) = frame.face_landmarks() {
//!     let features = FaceFeatures::extract(&face);
//!     let expression = classify(&features, &Thresholds::default());
//!     println!("{expression}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Rendering for a rotated display
//!
//! ```
//! use expression_matrix::{
//!     bitmap::Rotation,
//!     classifier::{EyeState, Expression, MouthState},
//!     transport::{encode_expression, Orientation},
//! };
//!
//! let expression = Expression { eyes: EyeState::MidMid, mouth: MouthState::Close };
//! assert_eq!(encode_expression(expression, Orientation::default()), "E700004200007E00\n");
//!
//! let upside_down = Orientation { rotation: Rotation::Cw180, mirror: false };
//! assert_eq!(encode_expression(expression, upside_down).len(), 17);
//! ```
//!
//! ## Complete pipeline
//!
//! ```no_run
//! use expression_matrix::{config::Config, pipeline::ExpressionPipeline};
//! use std::io::{self, BufReader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_file("matrix.yaml")?;
//! let mut pipeline = ExpressionPipeline::new(&config);
//! pipeline.connect_port(None)?;
//!
//! let stats = pipeline.run(BufReader::new(io::stdin()))?;
//! println!("{} frames sent", stats.sent);
//! # Ok(())
//! # }
//! ```

/// Distance and ratio primitives
pub mod geometry;

/// Detector output for one video frame
pub mod landmarks;

/// Eye, gaze and mouth features
pub mod features;

/// Tunable thresholds and the live tuning surface
pub mod thresholds;

/// Eye and mouth state classification
pub mod classifier;

/// Two-hand gesture override
pub mod gesture;

/// Glyph tables for each state
pub mod patterns;

/// Packed 8x8 bitmap with rotate and mirror
pub mod bitmap;

/// Wire encoding and the throttled display link
pub mod transport;

/// Per-frame pipeline and input loop
pub mod pipeline;

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
