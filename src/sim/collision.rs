//! Collision detection and response
//!
//! Everything is axis-aligned: the arena walls, the paddle's top surface and
//! the enemy card. The ball is a circle.

use glam::Vec2;

use super::state::{Arena, BallState, EnemyState, PaddleState};
use crate::clamp_to;
use crate::consts::*;

/// Axis along which a contact is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Result of a ball vs rectangle overlap test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectContact {
    /// Axis of least penetration
    pub axis: Axis,
    /// Depth along that axis
    pub penetration: f32,
}

/// Reflect the ball off the left, right and top walls.
///
/// The bottom is open: falling out is the loss condition.
pub fn bounce_off_walls(ball: &mut BallState, arena_width: f32) {
    let r = ball.radius();

    if ball.pos.x <= r {
        ball.pos.x = r;
        ball.vel.x = ball.vel.x.abs();
    } else if ball.pos.x >= arena_width - r {
        ball.pos.x = arena_width - r;
        ball.vel.x = -ball.vel.x.abs();
    }

    if ball.pos.y <= r {
        ball.pos.y = r;
        ball.vel.y = ball.vel.y.abs();
    }
}

/// Move the enemy one step and keep it inside its roaming box
/// `[padding, width - padding] x [padding * 1.2, height * 0.6]`.
pub fn advance_enemy(enemy: &mut EnemyState, arena: Arena) {
    enemy.x += enemy.vel.x;
    enemy.y += enemy.vel.y;

    let min_x = ENEMY_PADDING;
    let max_x = arena.width - ENEMY_PADDING;
    if enemy.x <= min_x || enemy.x + enemy.width >= max_x {
        enemy.vel.x = -enemy.vel.x;
        enemy.x = clamp_to(enemy.x, min_x, max_x - enemy.width);
    }

    let min_y = ENEMY_PADDING * ENEMY_TOP_PADDING_FACTOR;
    let max_y = arena.height * ENEMY_ROAM_HEIGHT_FRACTION;
    if enemy.y <= min_y || enemy.y + enemy.height >= max_y {
        enemy.vel.y = -enemy.vel.y;
        enemy.y = clamp_to(enemy.y, min_y, max_y - enemy.height);
    }
}

/// Did the ball's leading (bottom) edge cross the paddle's top plane this
/// step while overlapping the paddle horizontally?
pub fn crosses_paddle(
    prev_y: f32,
    next: Vec2,
    radius: f32,
    paddle: &PaddleState,
    paddle_top: f32,
) -> bool {
    let within_x = next.x + radius >= paddle.x && next.x - radius <= paddle.x + paddle.width;
    let crossing = prev_y + radius <= paddle_top && next.y + radius >= paddle_top;
    within_x && crossing
}

/// Horizontal velocity after a paddle hit.
///
/// Offset from the paddle center, normalized to [-1, 1], times the steer speed.
pub fn paddle_steer(ball_x: f32, paddle: &PaddleState) -> f32 {
    let half = paddle.width / 2.0;
    if half <= 0.0 {
        return 0.0;
    }
    let hit_point = (ball_x - paddle.center()) / half;
    hit_point * PADDLE_STEER_SPEED
}

/// Circle vs axis-aligned rectangle.
///
/// Returns the axis of minimum penetration. Equal depths resolve
/// horizontally.
pub fn ball_rect_contact(center: Vec2, radius: f32, enemy: &EnemyState) -> Option<RectContact> {
    let left = enemy.x;
    let right = enemy.x + enemy.width;
    let top = enemy.y;
    let bottom = enemy.y + enemy.height;

    let overlaps = center.x + radius > left
        && center.x - radius < right
        && center.y + radius > top
        && center.y - radius < bottom;
    if !overlaps {
        return None;
    }

    let overlap_left = center.x + radius - left;
    let overlap_right = right - (center.x - radius);
    let overlap_top = center.y + radius - top;
    let overlap_bottom = bottom - (center.y - radius);

    let min_horizontal = overlap_left.min(overlap_right);
    let min_vertical = overlap_top.min(overlap_bottom);

    if min_horizontal <= min_vertical {
        Some(RectContact {
            axis: Axis::Horizontal,
            penetration: min_horizontal,
        })
    } else {
        Some(RectContact {
            axis: Axis::Vertical,
            penetration: min_vertical,
        })
    }
}

/// Flip the velocity along `axis` and nudge the ball one step out
pub fn reflect_along(ball: &mut BallState, axis: Axis) {
    match axis {
        Axis::Horizontal => {
            ball.vel.x = -ball.vel.x;
            ball.pos.x += ball.vel.x;
        }
        Axis::Vertical => {
            ball.vel.y = -ball.vel.y;
            ball.pos.y += ball.vel.y;
        }
    }
}
