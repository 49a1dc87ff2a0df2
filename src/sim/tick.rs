//! Per-frame battle step
//!
//! One call advances the battle by one discrete step. Velocities are in px per
//! tick, so game speed follows the display refresh rate.

use super::collision::{
    advance_enemy, ball_rect_contact, bounce_off_walls, crosses_paddle, paddle_steer, reflect_along,
};
use super::state::{Arena, BattleState};
use crate::consts::*;

/// What the step decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// State advanced, battle continues
    Running,
    /// Enemy hp hit 0 this step; state left untouched
    Victory,
    /// Ball fell out the bottom this step; state left untouched
    Defeat,
}

/// Advance the battle by one step against the freshly measured `arena`.
///
/// On `Victory`/`Defeat` the previous state is kept as is; the phase change
/// stops further stepping.
pub fn tick(state: &mut BattleState, arena: Arena) -> TickOutcome {
    let prev = *state;
    let mut next = prev;
    let radius = prev.ball.radius();
    let paddle_top = arena.paddle_top();

    next.ball.pos += prev.ball.vel;
    next.hit_cooldown = prev.hit_cooldown.saturating_sub(1);
    next.combo = (prev.combo - COMBO_DECAY).max(0.0);

    bounce_off_walls(&mut next.ball, arena.width);
    advance_enemy(&mut next.enemy, arena);

    // Paddle x may be stale if the arena shrank since the last input
    next.paddle.clamp_to_arena(arena.width);

    if crosses_paddle(prev.ball.pos.y, next.ball.pos, radius, &next.paddle, paddle_top) {
        next.ball.pos.y = paddle_top - radius;
        next.ball.vel.y = -next.ball.vel.y.abs();
        next.ball.vel.x = paddle_steer(next.ball.pos.x, &next.paddle);
        next.combo = (prev.combo + COMBO_PADDLE_BONUS).min(COMBO_PADDLE_CAP);
    } else if next.ball.pos.y + radius > arena.height {
        return TickOutcome::Defeat;
    }

    if next.hit_cooldown == 0 {
        if let Some(contact) = ball_rect_contact(next.ball.pos, radius, &next.enemy) {
            reflect_along(&mut next.ball, contact.axis);

            next.enemy.hp = next.enemy.hp.saturating_sub(1);
            next.enemy.wobble = WOBBLE_PEAK;
            next.enemy.vel.x *= ENEMY_SPEEDUP_X;
            next.enemy.vel.y *= ENEMY_SPEEDUP_Y;
            next.hit_cooldown = HIT_COOLDOWN_TICKS;
            next.combo = (prev.combo + COMBO_ENEMY_BONUS).min(COMBO_MAX);

            if next.enemy.hp == 0 {
                return TickOutcome::Victory;
            }
        }
    }

    if next.enemy.wobble > 0.0 {
        next.enemy.wobble *= WOBBLE_DECAY;
    }

    next.arena = arena;
    *state = next;
    TickOutcome::Running
}
