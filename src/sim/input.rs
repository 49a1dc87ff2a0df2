//! Pointer and keyboard to paddle position
//!
//! No queueing: each event writes the paddle x directly and the latest write
//! is what the next tick sees.

use crate::clamp_to;
use crate::consts::KEY_NUDGE_FRACTION;

/// Horizontal direction of a key nudge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Map a `KeyboardEvent.key` value; unmapped keys give `None`
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" => Some(Direction::Left),
            "ArrowRight" | "d" => Some(Direction::Right),
            _ => None,
        }
    }

    #[inline]
    pub fn sign(&self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// Paddle x that centers the paddle under an absolute pointer position
pub fn pointer_paddle_x(
    pointer_x: f32,
    arena_left: f32,
    arena_width: f32,
    paddle_width: f32,
) -> f32 {
    let x = pointer_x - arena_left - paddle_width / 2.0;
    clamp_to(x, 0.0, arena_width - paddle_width)
}

/// Paddle x after one key press
pub fn nudge_paddle_x(
    paddle_x: f32,
    direction: Direction,
    arena_width: f32,
    paddle_width: f32,
) -> f32 {
    let shift = paddle_width * KEY_NUDGE_FRACTION;
    clamp_to(paddle_x + shift * direction.sign(), 0.0, arena_width - paddle_width)
}
