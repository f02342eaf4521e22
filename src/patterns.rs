//! 8x8 glyph fragments for each eye and mouth state.
//!
//! Eye fragments fill rows 0-4, mouth fragments rows 5-7. Bit 7 of each row
//! is the leftmost pixel.

use crate::{
    bitmap::BitmapFrame,
    classifier::{EyeState, Expression, MouthState},
    constants::{EYE_ROWS, MOUTH_ROWS},
};

/// Eye fragments indexed by `EyeState::index`
pub const EYE_PATTERNS: [[u8; EYE_ROWS]; EyeState::COUNT] = [
    // UPPER_LEFT
    [0b1110_0111, 0b0000_0000, 0b0010_0001, 0b0000_0000, 0b0000_0000],
    // UPPER_MID
    [0b1110_0111, 0b0000_0000, 0b0100_0010, 0b0000_0000, 0b0000_0000],
    // UPPER_RIGHT
    [0b1110_0111, 0b0000_0000, 0b1000_0100, 0b0000_0000, 0b0000_0000],
    // MID_LEFT
    [0b1110_0111, 0b0000_0000, 0b0000_0000, 0b0010_0001, 0b0000_0000],
    // MID_MID
    [0b1110_0111, 0b0000_0000, 0b0000_0000, 0b0100_0010, 0b0000_0000],
    // MID_RIGHT
    [0b1110_0111, 0b0000_0000, 0b0000_0000, 0b1000_0100, 0b0000_0000],
    // LOWER_LEFT
    [0b1110_0111, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0010_0001],
    // LOWER_MID
    [0b1110_0111, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0100_0010],
    // LOWER_RIGHT
    [0b1110_0111, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b1000_0100],
    // CLOSE
    [0b0000_0000, 0b0000_0000, 0b0000_0000, 0b1110_0111, 0b0000_0000],
    // CLOSE_TIGHTLY
    [0b1000_0001, 0b0100_0010, 0b0010_0100, 0b0100_0010, 0b1000_0001],
    // WINK_LEFT
    [0b1000_0000, 0b0100_0000, 0b0010_0111, 0b0100_0000, 0b1000_0000],
    // WINK_RIGHT
    [0b0000_0001, 0b0000_0010, 0b1110_0100, 0b0000_0010, 0b0000_0001],
    // OPEN
    [0b0100_0010, 0b1010_0101, 0b1010_0101, 0b1010_0101, 0b0100_0010],
    // TT_POSE
    [0b0000_0000, 0b1110_0111, 0b0100_0010, 0b0100_0010, 0b0100_0010],
];

/// Mouth fragments indexed by `MouthState::index`
pub const MOUTH_PATTERNS: [[u8; MOUTH_ROWS]; MouthState::COUNT] = [
    // SMILE
    [0b0000_0000, 0b0100_0010, 0b0011_1100],
    // SCOWL
    [0b0000_0000, 0b0011_1100, 0b0100_0010],
    // CLOSE
    [0b0000_0000, 0b0111_1110, 0b0000_0000],
    // OPEN
    [0b0011_1100, 0b0010_0100, 0b0011_1100],
    // KISS
    [0b0001_1000, 0b0001_1000, 0b0000_0000],
];

/// Eye fragment for a state
#[must_use]
pub const fn eye_pattern(state: EyeState) -> [u8; EYE_ROWS] {
    EYE_PATTERNS[state.index()]
}

/// Mouth fragment for a state
#[must_use]
pub const fn mouth_pattern(state: MouthState) -> [u8; MOUTH_ROWS] {
    MOUTH_PATTERNS[state.index()]
}

/// Eye fragment for a raw table index; out-of-range falls back to MID_MID
#[must_use]
pub fn eye_pattern_at(index: usize) -> [u8; EYE_ROWS] {
    EYE_PATTERNS
        .get(index)
        .copied()
        .unwrap_or(EYE_PATTERNS[EyeState::MidMid.index()])
}

/// Mouth fragment for a raw table index; out-of-range falls back to CLOSE
#[must_use]
pub fn mouth_pattern_at(index: usize) -> [u8; MOUTH_ROWS] {
    MOUTH_PATTERNS
        .get(index)
        .copied()
        .unwrap_or(MOUTH_PATTERNS[MouthState::Close.index()])
}

/// Assemble an untransformed frame: eye rows followed by mouth rows
#[must_use]
pub fn compose(eyes: [u8; EYE_ROWS], mouth: [u8; MOUTH_ROWS]) -> BitmapFrame {
    let mut rows = [0u8; EYE_ROWS + MOUTH_ROWS];
    rows[..EYE_ROWS].copy_from_slice(&eyes);
    rows[EYE_ROWS..].copy_from_slice(&mouth);
    BitmapFrame::new(rows)
}

/// Untransformed frame for a classified expression
#[must_use]
pub fn render(expression: Expression) -> BitmapFrame {
    compose(eye_pattern(expression.eyes), mouth_pattern(expression.mouth))
}

/// Untransformed frame for raw table indices, with neutral fallbacks
#[must_use]
pub fn render_indices(eye_index: usize, mouth_index: usize) -> BitmapFrame {
    compose(eye_pattern_at(eye_index), mouth_pattern_at(mouth_index))
}
