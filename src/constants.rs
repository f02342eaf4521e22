//! Constants used throughout the application

/// Number of points in a face landmark set
pub const NUM_FACE_LANDMARKS: usize = 478;

/// Number of points in a hand landmark set
pub const NUM_HAND_LANDMARKS: usize = 21;

/// Face landmark indices, named from the subject's point of view
pub mod face {
    /// Nose tip, used to split hands into screen-left and screen-right
    pub const NOSE_TIP: usize = 1;

    pub const LEFT_EYE_INNER: usize = 33;
    pub const LEFT_EYE_OUTER: usize = 133;
    pub const LEFT_EYE_TOP: usize = 159;
    pub const LEFT_EYE_BOTTOM: usize = 145;
    pub const LEFT_IRIS: usize = 468;

    pub const RIGHT_EYE_INNER: usize = 362;
    pub const RIGHT_EYE_OUTER: usize = 263;
    pub const RIGHT_EYE_TOP: usize = 386;
    pub const RIGHT_EYE_BOTTOM: usize = 374;
    pub const RIGHT_IRIS: usize = 473;

    pub const MOUTH_LEFT: usize = 61;
    pub const MOUTH_RIGHT: usize = 291;
    /// Inner upper lip
    pub const MOUTH_TOP: usize = 13;
    /// Inner lower lip
    pub const MOUTH_BOTTOM: usize = 14;

    pub const CHEEK_LEFT: usize = 234;
    pub const CHEEK_RIGHT: usize = 454;
}

/// Hand landmark indices
pub mod hand {
    pub const WRIST: usize = 0;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_TIP: usize = 8;
}

/// Rows contributed by the eye pattern
pub const EYE_ROWS: usize = 5;

/// Rows contributed by the mouth pattern
pub const MOUTH_ROWS: usize = 3;

/// Bytes in one packed 8x8 frame
pub const FRAME_BYTES: usize = EYE_ROWS + MOUTH_ROWS;

/// Length of an encoded wire frame: 16 hex digits plus the newline
pub const WIRE_FRAME_LEN: usize = FRAME_BYTES * 2 + 1;

/// Minimum interval between two transport writes (20 frames per second)
pub const DEFAULT_MIN_SEND_INTERVAL_MS: u64 = 50;

/// Line speed requested when opening the display link
pub const DEFAULT_BAUD_RATE: u32 = 115_200;
