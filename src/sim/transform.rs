//! Login button to paddle morph
//!
//! Captures where the button is on screen once, then interpolates it into the
//! paddle's resting slot while a ball fades in above it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Arena;
use crate::consts::*;
use crate::platform::Rect;
use crate::{clamp_to, ease_in_out_cubic, lerp, paddle_width_for};

/// Start and end geometry of the morph, relative to the arena's top-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformMeta {
    pub start: Rect,
    pub end: Rect,
    pub ball_start: Vec2,
    pub ball_end: Vec2,
}

impl TransformMeta {
    /// Snapshot the button position and compute the paddle slot
    pub fn capture(arena_rect: Rect, button_rect: Rect) -> Self {
        let arena = Arena::from(arena_rect);
        let start = button_rect.relative_to(&arena_rect);
        let end_width = paddle_width_for(arena.width);

        Self {
            start,
            end: Rect::new(
                arena.width / 2.0 - end_width / 2.0,
                arena.paddle_top(),
                end_width,
                PADDLE_HEIGHT,
            ),
            ball_start: start.center(),
            ball_end: arena.ball_spawn(),
        }
    }
}

/// What the renderer draws for one morph frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformFrame {
    pub paddle: Rect,
    pub ball: Vec2,
    pub ball_opacity: f32,
    /// Eased progress
    pub eased: f32,
    /// Raw progress, for fades that should not ease
    pub linear: f32,
}

/// Drives the morph from wall-clock time
#[derive(Debug, Clone, PartialEq)]
pub struct TransformAnimator {
    meta: TransformMeta,
    started_ms: f64,
    duration_ms: f64,
    progress: f32,
}

impl TransformAnimator {
    pub fn new(meta: TransformMeta, started_ms: f64, duration_ms: f64) -> Self {
        Self {
            meta,
            started_ms,
            duration_ms,
            progress: 0.0,
        }
    }

    pub fn meta(&self) -> &TransformMeta {
        &self.meta
    }

    /// Raw progress in [0, 1]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_done(&self) -> bool {
        self.progress >= 1.0
    }

    /// Advance to `now_ms`; returns true once the morph is complete
    pub fn step(&mut self, now_ms: f64) -> bool {
        self.progress = progress_at(now_ms - self.started_ms, self.duration_ms);
        self.is_done()
    }

    /// Interpolated geometry at the current progress
    pub fn frame(&self) -> TransformFrame {
        let linear = self.progress;
        let eased = ease_in_out_cubic(linear);
        let m = &self.meta;

        TransformFrame {
            paddle: Rect::new(
                lerp(m.start.x, m.end.x, eased),
                lerp(m.start.y, m.end.y, eased),
                lerp(m.start.width, m.end.width, eased),
                lerp(m.start.height, m.end.height, eased),
            ),
            ball: m.ball_start.lerp(m.ball_end, eased),
            ball_opacity: clamp_to((linear - 0.25) / 0.75, 0.0, 1.0),
            eased,
            linear,
        }
    }
}

/// `min(1, elapsed / duration)`, floored at 0
pub fn progress_at(elapsed_ms: f64, duration_ms: f64) -> f32 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    (elapsed_ms / duration_ms).clamp(0.0, 1.0) as f32
}
