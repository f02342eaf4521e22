//! Per-frame pipeline: landmarks to features, classification, gesture
//! override and throttled transmission, plus the control messages that
//! retune it while running.

use crate::{
    bitmap::Rotation,
    classifier::{classify, Expression},
    config::Config,
    constants::face,
    features::FaceFeatures,
    gesture,
    landmarks::LandmarkFrame,
    thresholds::{SharedThresholds, ThresholdKey},
    transport::{open_port, ConnectionState, FrameSender, Orientation, SendOutcome, Sink},
    Error, Result,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::{
    io::BufRead,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

/// One line of the input stream
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputMessage {
    /// Detector output for a video frame
    Frame(LandmarkFrame),
    /// Retune one threshold
    SetThreshold { key: String, value: f64 },
    /// Restore default thresholds
    ResetThresholds,
    /// Change display rotation
    SetRotation { degrees: u16 },
    /// Toggle row mirroring
    SetMirror { enabled: bool },
    /// Open the display link; falls back to the configured port
    Connect {
        #[serde(default)]
        port: Option<PathBuf>,
    },
    /// Close the display link
    Disconnect,
}

impl InputMessage {
    /// Decode one JSON line
    ///
    /// # Errors
    ///
    /// Returns `Parse` when the line is not a recognised message
    pub fn parse(line: &str) -> Result<Self> {
        serde_json::from_str(line).map_err(|e| Error::Parse(e.to_string()))
    }
}

/// Result of classifying one video frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Final state pair after the gesture override
    pub expression: Expression,
    /// Features the classifier saw
    pub features: FaceFeatures,
    /// What happened on the display link
    pub outcome: SendOutcome,
}

/// Counters for one run of the input loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Lines read
    pub lines: usize,
    /// Frame messages received
    pub frames: usize,
    /// Frames that carried a face and were classified
    pub classified: usize,
    /// Frames written to the display link
    pub sent: usize,
    /// Lines that could not be decoded or applied
    pub rejected: usize,
}

/// Expression pipeline state
#[derive(Debug)]
pub struct ExpressionPipeline {
    thresholds: SharedThresholds,
    orientation: Orientation,
    sender: FrameSender,
    port: Option<PathBuf>,
    baud_rate: u32,
    last_expression: Option<Expression>,
}

impl ExpressionPipeline {
    /// Build a pipeline from configuration; no link is opened yet
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            thresholds: SharedThresholds::new(config.thresholds),
            orientation: config.display.orientation(),
            sender: FrameSender::new(config.transport.min_send_interval()),
            port: config.transport.port.clone(),
            baud_rate: config.transport.baud_rate,
            last_expression: None,
        }
    }

    /// Handle to the live thresholds for an external tuning surface
    #[must_use]
    pub fn thresholds(&self) -> SharedThresholds {
        self.thresholds.clone()
    }

    /// Current display orientation
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Change display rotation
    pub fn set_rotation(&mut self, rotation: Rotation) {
        info!("Display rotation set to {}", rotation);
        self.orientation.rotation = rotation;
    }

    /// Change row mirroring
    pub fn set_mirror(&mut self, mirror: bool) {
        info!("Display mirror {}", if mirror { "on" } else { "off" });
        self.orientation.mirror = mirror;
    }

    /// Last classified expression, if any frame carried a face
    #[must_use]
    pub const fn last_expression(&self) -> Option<Expression> {
        self.last_expression
    }

    /// Display link status
    #[must_use]
    pub fn connection_state(&self) -> ConnectionState {
        self.sender.state()
    }

    /// Attach an already-open sink
    pub fn connect(&mut self, sink: Sink) {
        self.sender.connect(sink);
    }

    /// Open a device node, or the configured port when `path` is `None`.
    /// Does nothing when a link is already attached.
    ///
    /// # Errors
    ///
    /// Returns `TransportUnavailable` when no port is known or it cannot be opened
    pub fn connect_port(&mut self, path: Option<&Path>) -> Result<()> {
        if self.sender.state() == ConnectionState::Connected {
            debug!("Connect requested while connected");
            return Ok(());
        }
        let path = path
            .or(self.port.as_deref())
            .ok_or_else(|| Error::TransportUnavailable("No port configured".to_string()))?;
        let sink = open_port(path, self.baud_rate)?;
        self.sender.connect(sink);
        Ok(())
    }

    /// Close the display link
    pub fn disconnect(&mut self) {
        self.sender.disconnect();
    }

    /// Classify one video frame and offer it to the display link.
    ///
    /// Returns `None` when the frame has no usable face; nothing is sent and
    /// the display keeps its previous image.
    pub fn process_frame(&mut self, frame: &LandmarkFrame, now: Instant) -> Option<FrameReport> {
        let Some(face_lm) = frame.face_landmarks() else {
            debug!("No face in frame, skipping");
            return None;
        };

        let thresholds = self.thresholds.snapshot();
        let features = FaceFeatures::extract(&face_lm);
        if !features.is_finite() {
            debug!("Degenerate face geometry: {}", features);
        }

        let hands = frame.hand_landmarks();
        let expression = gesture::apply_override(
            classify(&features, &thresholds),
            &hands,
            face_lm.point(face::NOSE_TIP),
        );

        debug!("{} | {}", expression, features);
        self.last_expression = Some(expression);

        let outcome = match self.sender.send(expression, self.orientation, now) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Display link lost: {e}");
                SendOutcome::LinkLost
            }
        };

        Some(FrameReport {
            expression,
            features,
            outcome,
        })
    }

    /// Apply one input message
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid rotation or a failed connect; the
    /// pipeline stays usable either way
    pub fn handle(&mut self, message: InputMessage, now: Instant) -> Result<Option<FrameReport>> {
        match message {
            InputMessage::Frame(frame) => return Ok(self.process_frame(&frame, now)),
            InputMessage::SetThreshold { key, value } => {
                let key: ThresholdKey = key.parse()?;
                debug!("Threshold {} = {}", key, value);
                self.thresholds.set(key, value);
            }
            InputMessage::ResetThresholds => {
                info!("Thresholds reset to defaults");
                self.thresholds.reset();
            }
            InputMessage::SetRotation { degrees } => self.set_rotation(Rotation::try_from(degrees)?),
            InputMessage::SetMirror { enabled } => self.set_mirror(enabled),
            InputMessage::Connect { port } => self.connect_port(port.as_deref())?,
            InputMessage::Disconnect => self.disconnect(),
        }
        Ok(None)
    }

    /// Consume newline-delimited JSON messages until the input ends.
    ///
    /// Bad lines and link failures are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading from `reader` fails
    pub fn run<R: BufRead>(&mut self, reader: R) -> Result<RunStats> {
        info!("Starting expression pipeline");
        let start = Instant::now();
        let mut last_report = Instant::now();
        let mut stats = RunStats::default();

        for line in reader.lines() {
            let line = line?;
            stats.lines += 1;
            if line.trim().is_empty() {
                continue;
            }

            let message = match InputMessage::parse(&line) {
                Ok(message) => message,
                Err(e) => {
                    warn!("Skipping line {}: {}", stats.lines, e);
                    stats.rejected += 1;
                    continue;
                }
            };

            if matches!(message, InputMessage::Frame(_)) {
                stats.frames += 1;
            }

            match self.handle(message, Instant::now()) {
                Ok(Some(report)) => {
                    stats.classified += 1;
                    if matches!(report.outcome, SendOutcome::Sent(_)) {
                        stats.sent += 1;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Line {}: {}", stats.lines, e);
                    stats.rejected += 1;
                }
            }

            if last_report.elapsed() >= Duration::from_secs(5) {
                let fps = stats.frames as f64 / start.elapsed().as_secs_f64();
                info!(
                    "{:.1} frames/s, {} classified, {} sent, link {}",
                    fps,
                    stats.classified,
                    stats.sent,
                    self.connection_state()
                );
                last_report = Instant::now();
            }
        }

        info!(
            "Input ended after {} frames ({} classified, {} sent)",
            stats.frames, stats.classified, stats.sent
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thresholds::Thresholds;

    #[test]
    fn test_parse_control_messages() {
        let msg = InputMessage::parse(r#"{"type": "set_threshold", "key": "gaze_h_left", "value": 0.3}"#).unwrap();
        assert!(matches!(
            msg,
            InputMessage::SetThreshold { ref key, .. } if key == "gaze_h_left"
        ));

        let msg = InputMessage::parse(r#"{"type": "connect"}"#).unwrap();
        assert!(matches!(msg, InputMessage::Connect { port: None }));

        let msg = InputMessage::parse(r#"{"type": "frame", "face": null, "hands": []}"#).unwrap();
        assert!(matches!(msg, InputMessage::Frame(_)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(InputMessage::parse("not json"), Err(Error::Parse(_))));
        assert!(matches!(
            InputMessage::parse(r#"{"type": "set_threshold", "key": "eye_open"}"#),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_unknown_threshold_message() {
        let mut pipeline = ExpressionPipeline::new(&Config::default());
        let msg = InputMessage::parse(r#"{"type": "set_threshold", "key": "eye_squint", "value": 1}"#).unwrap();
        let result = pipeline.handle(msg, Instant::now());
        assert!(matches!(result, Err(Error::UnknownThreshold(ref k)) if k == "eye_squint"));
        assert_eq!(pipeline.thresholds().snapshot(), Thresholds::default());
    }

    #[test]
    fn test_frame_without_face_is_skipped() {
        let mut pipeline = ExpressionPipeline::new(&Config::default());
        let report = pipeline.process_frame(&LandmarkFrame::default(), Instant::now());
        assert!(report.is_none());
        assert!(pipeline.last_expression().is_none());
    }

    #[test]
    fn test_invalid_rotation_message() {
        let mut pipeline = ExpressionPipeline::new(&Config::default());
        let result = pipeline.handle(InputMessage::SetRotation { degrees: 45 }, Instant::now());
        assert!(result.is_err());
        assert_eq!(pipeline.orientation().rotation, Rotation::None);

        pipeline
            .handle(InputMessage::SetRotation { degrees: 270 }, Instant::now())
            .unwrap();
        assert_eq!(pipeline.orientation().rotation, Rotation::Cw270);
    }

    #[test]
    fn test_connect_without_port() {
        let mut pipeline = ExpressionPipeline::new(&Config::default());
        let result = pipeline.connect_port(None);
        assert!(matches!(result, Err(Error::TransportUnavailable(_))));
        assert_eq!(pipeline.connection_state(), ConnectionState::Disconnected);
    }
}
