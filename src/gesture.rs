//! Two-hand "TT" gesture that overrides the eye state.
//!
//! Each hand must have its index finger curled down and its thumb tucked
//! toward the palm. Which direction counts as "tucked" depends on which side
//! of the nose tip the wrist sits, so the check works for either physical hand.

use crate::{
    classifier::{EyeState, Expression},
    constants::hand,
    geometry::Point2D,
    landmarks::HandLandmarks,
};

/// Side of the image a hand occupies relative to the nose tip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenSide {
    /// Wrist left of the nose tip (subject's right hand on a mirrored feed)
    Left,
    /// Wrist at or right of the nose tip
    Right,
}

/// Per-hand pose evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandPose {
    pub side: ScreenSide,
    pub index_down: bool,
    pub thumb_inward: bool,
}

impl HandPose {
    /// Evaluate one hand against the nose tip
    #[must_use]
    pub fn evaluate(hand_lm: &HandLandmarks<'_>, nose_tip: Point2D) -> Self {
        let wrist = hand_lm.point(hand::WRIST);
        let thumb_tip = hand_lm.point(hand::THUMB_TIP);
        let thumb_ip = hand_lm.point(hand::THUMB_IP);

        let index_down = hand_lm.point(hand::INDEX_TIP).y > hand_lm.point(hand::INDEX_MCP).y;

        let (side, thumb_inward) = if wrist.x < nose_tip.x {
            (ScreenSide::Left, thumb_tip.x > thumb_ip.x)
        } else {
            (ScreenSide::Right, thumb_tip.x < thumb_ip.x)
        };

        Self {
            side,
            index_down,
            thumb_inward,
        }
    }

    /// Hand is in its half of the gesture
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.index_down && self.thumb_inward
    }
}

/// True when exactly two hands are present and a valid hand sits on each side
#[must_use]
pub fn detect_tt_pose(hands: &[HandLandmarks<'_>], nose_tip: Point2D) -> bool {
    if hands.len() != 2 {
        return false;
    }

    let mut left_valid = false;
    let mut right_valid = false;
    for hand_lm in hands {
        let pose = HandPose::evaluate(hand_lm, nose_tip);
        if pose.is_valid() {
            match pose.side {
                ScreenSide::Left => left_valid = true,
                ScreenSide::Right => right_valid = true,
            }
        }
    }

    left_valid && right_valid
}

/// Replace the eye state when the gesture is held; the mouth is untouched
#[must_use]
pub fn apply_override(expression: Expression, hands: &[HandLandmarks<'_>], nose_tip: Point2D) -> Expression {
    if detect_tt_pose(hands, nose_tip) {
        Expression {
            eyes: EyeState::TtPose,
            ..expression
        }
    } else {
        expression
    }
}
