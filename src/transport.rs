//! Wire encoding and throttled delivery of frames to the display link.
//!
//! A wire frame is 16 uppercase hex digits and a newline. Frames are dropped
//! when they arrive within the minimum send interval of the previous write or
//! when they repeat the previous write byte for byte. Any write failure
//! disconnects the link; the caller keeps classifying regardless.

use crate::{
    bitmap::{BitmapFrame, Rotation},
    classifier::Expression,
    constants::DEFAULT_MIN_SEND_INTERVAL_MS,
    patterns, Error, Result,
};
use log::{debug, info};
use std::{
    fmt,
    fs::OpenOptions,
    io::{ErrorKind, Write},
    path::Path,
    time::{Duration, Instant},
};

/// Writable byte sink for encoded frames
pub type Sink = Box<dyn Write + Send>;

/// Link status reported to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected => f.write_str("Connected"),
            Self::Disconnected => f.write_str("Disconnected"),
        }
    }
}

/// Outcome of offering one frame to the sender
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Written to the link
    Sent(String),
    /// No link attached; nothing was encoded
    NoTransport,
    /// Arrived inside the minimum send interval
    RateLimited,
    /// Same bytes as the last successful write
    Duplicate,
    /// The write failed and the link was dropped
    LinkLost,
}

/// Last successful write, used for throttling and deduplication
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportFrameState {
    /// Wire frame last written, including the newline
    pub last_sent: Option<String>,
    /// When it was written
    pub last_sent_at: Option<Instant>,
}

/// Display mounting applied to every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Orientation {
    pub rotation: Rotation,
    pub mirror: bool,
}

/// Encode a frame for the wire
#[must_use]
pub fn encode_frame(frame: &BitmapFrame) -> String {
    let mut line = frame.to_hex();
    line.push('\n');
    line
}

/// Look up, transform and encode an expression
#[must_use]
pub fn encode_expression(expression: Expression, orientation: Orientation) -> String {
    let frame = patterns::render(expression).transform(orientation.rotation, orientation.mirror);
    encode_frame(&frame)
}

/// Open a display device node for writing.
///
/// Line settings are not configured here; `baud_rate` is advisory and only
/// logged. Set the line speed on the host, e.g. `stty -F <device> <baud>`.
///
/// # Errors
///
/// Returns `TransportUnavailable` if the device does not exist or cannot be opened
pub fn open_port<P: AsRef<Path>>(path: P, baud_rate: u32) -> Result<Sink> {
    let path = path.as_ref();
    let file = OpenOptions::new().write(true).open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::TransportUnavailable(format!("No device at {}", path.display())),
        _ => Error::TransportUnavailable(format!("Failed to open {}: {e}", path.display())),
    })?;
    info!("Opened display link {} at {} baud", path.display(), baud_rate);
    Ok(Box::new(file))
}

/// Serialised frame writer owning the link and its throttle state
pub struct FrameSender {
    sink: Option<Sink>,
    state: TransportFrameState,
    min_interval: Duration,
}

impl Default for FrameSender {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_MIN_SEND_INTERVAL_MS))
    }
}

impl fmt::Debug for FrameSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameSender")
            .field("connected", &self.sink.is_some())
            .field("state", &self.state)
            .field("min_interval", &self.min_interval)
            .finish()
    }
}

impl FrameSender {
    /// Create a sender with no link attached
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            sink: None,
            state: TransportFrameState::default(),
            min_interval,
        }
    }

    /// Attach a link. Ignored when one is already attached.
    ///
    /// Returns true if the sink was attached
    pub fn connect(&mut self, sink: Sink) -> bool {
        if self.sink.is_some() {
            debug!("Display link already connected");
            return false;
        }
        self.sink = Some(sink);
        self.state = TransportFrameState::default();
        info!("Display link connected");
        true
    }

    /// Drop the link and forget the last frame
    pub fn disconnect(&mut self) {
        if self.sink.take().is_some() {
            info!("Display link disconnected");
        }
        self.state = TransportFrameState::default();
    }

    /// Current link status
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        if self.sink.is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    /// Throttle state, for inspection
    #[must_use]
    pub const fn frame_state(&self) -> &TransportFrameState {
        &self.state
    }

    /// Offer an expression for sending at time `now`
    ///
    /// # Errors
    ///
    /// Returns `TransportWrite` when the link fails; the link has already been
    /// dropped by the time the error is returned
    pub fn send(&mut self, expression: Expression, orientation: Orientation, now: Instant) -> Result<SendOutcome> {
        if self.sink.is_none() {
            return Ok(SendOutcome::NoTransport);
        }

        if let Some(at) = self.state.last_sent_at {
            if now.saturating_duration_since(at) < self.min_interval {
                return Ok(SendOutcome::RateLimited);
            }
        }

        let line = encode_expression(expression, orientation);
        if self.state.last_sent.as_deref() == Some(line.as_str()) {
            return Ok(SendOutcome::Duplicate);
        }

        let written = match self.sink.as_mut() {
            Some(sink) => sink.write_all(line.as_bytes()).and_then(|()| sink.flush()),
            None => return Ok(SendOutcome::NoTransport),
        };

        match written {
            Ok(()) => {
                debug!("Sent frame {}", line.trim_end());
                self.state = TransportFrameState {
                    last_sent: Some(line.clone()),
                    last_sent_at: Some(now),
                };
                Ok(SendOutcome::Sent(line))
            }
            Err(e) => {
                debug!("Write error: {e}");
                self.disconnect();
                Err(Error::TransportWrite(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{EyeState, MouthState};
    use parking_lot::Mutex;
    use std::{io, sync::Arc};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::BrokenPipe, "unplugged"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn smile() -> Expression {
        Expression {
            eyes: EyeState::MidMid,
            mouth: MouthState::Smile,
        }
    }

    #[test]
    fn test_encode_neutral() {
        let line = encode_expression(Expression::default(), Orientation::default());
        assert_eq!(line, "E700004200007E00\n");
        assert_eq!(line.len(), crate::constants::WIRE_FRAME_LEN);
    }

    #[test]
    fn test_no_transport_is_noop() {
        let mut sender = FrameSender::default();
        let out = sender.send(smile(), Orientation::default(), Instant::now()).unwrap();
        assert_eq!(out, SendOutcome::NoTransport);
        assert_eq!(sender.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_rate_limit_and_dedup() {
        let buf = SharedBuf::default();
        let mut sender = FrameSender::default();
        assert!(sender.connect(Box::new(buf.clone())));

        let t0 = Instant::now();
        let o = Orientation::default();
        assert!(matches!(sender.send(smile(), o, t0).unwrap(), SendOutcome::Sent(_)));
        assert_eq!(
            sender.send(Expression::default(), o, t0 + Duration::from_millis(10)).unwrap(),
            SendOutcome::RateLimited
        );
        assert_eq!(
            sender.send(smile(), o, t0 + Duration::from_millis(500)).unwrap(),
            SendOutcome::Duplicate
        );
        assert!(matches!(
            sender.send(Expression::default(), o, t0 + Duration::from_millis(60)).unwrap(),
            SendOutcome::Sent(_)
        ));

        let written = String::from_utf8(buf.0.lock().clone()).unwrap();
        assert_eq!(written.lines().count(), 2);
    }

    #[test]
    fn test_duplicate_state_is_dropped_after_interval() {
        let buf = SharedBuf::default();
        let mut sender = FrameSender::default();
        sender.connect(Box::new(buf.clone()));
        let t0 = Instant::now();
        sender.send(smile(), Orientation::default(), t0).unwrap();
        let later = sender
            .send(smile(), Orientation::default(), t0 + Duration::from_secs(5))
            .unwrap();
        assert_eq!(later, SendOutcome::Duplicate);
        assert_eq!(buf.0.lock().len(), 17);
    }

    #[test]
    fn test_orientation_changes_bytes() {
        let plain = encode_expression(smile(), Orientation::default());
        let rotated = encode_expression(
            smile(),
            Orientation {
                rotation: Rotation::Cw180,
                mirror: false,
            },
        );
        assert_ne!(plain, rotated);
    }

    #[test]
    fn test_write_failure_disconnects() {
        let mut sender = FrameSender::default();
        sender.connect(Box::new(BrokenPipe));
        let err = sender.send(smile(), Orientation::default(), Instant::now());
        assert!(matches!(err, Err(Error::TransportWrite(_))));
        assert_eq!(sender.state(), ConnectionState::Disconnected);
        assert_eq!(sender.frame_state(), &TransportFrameState::default());

        // next frame simply has nowhere to go
        let next = sender.send(smile(), Orientation::default(), Instant::now()).unwrap();
        assert_eq!(next, SendOutcome::NoTransport);
    }

    #[test]
    fn test_connect_is_idempotent_and_resets_state() {
        let first = SharedBuf::default();
        let second = SharedBuf::default();
        let mut sender = FrameSender::default();
        assert!(sender.connect(Box::new(first.clone())));
        assert!(!sender.connect(Box::new(second.clone())));

        sender.send(smile(), Orientation::default(), Instant::now()).unwrap();
        assert_eq!(first.0.lock().len(), 17);
        assert!(second.0.lock().is_empty());

        sender.disconnect();
        assert!(sender.frame_state().last_sent.is_none());
        assert!(sender.connect(Box::new(second.clone())));
        // the same frame goes out again on a fresh link
        let out = sender.send(smile(), Orientation::default(), Instant::now()).unwrap();
        assert!(matches!(out, SendOutcome::Sent(_)));
    }

    #[test]
    fn test_open_missing_port() {
        let result = open_port("/nonexistent/tty-display", crate::constants::DEFAULT_BAUD_RATE);
        assert!(matches!(result, Err(Error::TransportUnavailable(_))));
    }
}
