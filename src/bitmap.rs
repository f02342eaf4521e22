//! Packed 8x8 bitmap and the rotate/mirror transforms that match the
//! physical mounting of the display.
//!
//! Row `i` is byte `i`; column `j` is bit `7 - j` of that byte.

use crate::{constants::FRAME_BYTES, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

/// One 8x8 frame, eight row bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BitmapFrame([u8; FRAME_BYTES]);

/// Clockwise rotation applied before the frame is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    None,
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    /// Angle in degrees
    #[must_use]
    pub const fn degrees(self) -> u16 {
        match self {
            Self::None => 0,
            Self::Cw90 => 90,
            Self::Cw180 => 180,
            Self::Cw270 => 270,
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = Error;

    fn try_from(degrees: u16) -> Result<Self> {
        match degrees {
            0 => Ok(Self::None),
            90 => Ok(Self::Cw90),
            180 => Ok(Self::Cw180),
            270 => Ok(Self::Cw270),
            other => Err(Error::InvalidInput(format!(
                "Rotation must be 0, 90, 180 or 270 degrees, got {other}"
            ))),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

impl BitmapFrame {
    /// Wrap eight row bytes
    #[must_use]
    pub const fn new(rows: [u8; FRAME_BYTES]) -> Self {
        Self(rows)
    }

    /// Row bytes, top row first
    #[must_use]
    pub const fn rows(&self) -> &[u8; FRAME_BYTES] {
        &self.0
    }

    /// Pixel at `(row, col)`, both 0..8
    #[must_use]
    pub const fn pixel(&self, row: usize, col: usize) -> bool {
        self.0[row] & (0x80 >> col) != 0
    }

    /// Rotate clockwise
    #[must_use]
    pub fn rotate(self, rotation: Rotation) -> Self {
        match rotation {
            Rotation::None => self,
            Rotation::Cw90 => self.permute(|i, j| (j, 7 - i)),
            Rotation::Cw180 => self.permute(|i, j| (7 - i, 7 - j)),
            Rotation::Cw270 => self.permute(|i, j| (7 - j, i)),
        }
    }

    /// Reverse the columns of every row
    #[must_use]
    pub fn mirror(self) -> Self {
        Self(self.0.map(u8::reverse_bits))
    }

    /// Rotation first, then the optional mirror
    #[must_use]
    pub fn transform(self, rotation: Rotation, mirror: bool) -> Self {
        let rotated = self.rotate(rotation);
        if mirror {
            rotated.mirror()
        } else {
            rotated
        }
    }

    /// Uppercase hex, two digits per row, no terminator
    #[must_use]
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(FRAME_BYTES * 2);
        for byte in &self.0 {
            // writing to a String cannot fail
            let _ = write!(out, "{byte:02X}");
        }
        out
    }

    /// Move each set pixel `(i, j)` to `dest(i, j)` in a fresh buffer
    fn permute(self, dest: impl Fn(usize, usize) -> (usize, usize)) -> Self {
        let mut out = [0u8; FRAME_BYTES];
        for i in 0..8 {
            for j in 0..8 {
                if self.pixel(i, j) {
                    let (r, c) = dest(i, j);
                    out[r] |= 0x80 >> c;
                }
            }
        }
        Self(out)
    }
}

impl From<[u8; FRAME_BYTES]> for BitmapFrame {
    fn from(rows: [u8; FRAME_BYTES]) -> Self {
        Self(rows)
    }
}

impl fmt::Display for BitmapFrame {
    /// Render as eight lines of `#` and `.`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8 {
            for col in 0..8 {
                f.write_char(if self.pixel(row, col) { '#' } else { '.' })?;
            }
            if row < 7 {
                f.write_char('\n')?;
            }
        }
        Ok(())
    }
}
