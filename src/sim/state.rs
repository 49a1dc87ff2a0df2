//! Battle state and core simulation types

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::platform::Rect;
use crate::{clamp_to, paddle_width_for};

/// Top-level lifecycle of the sign-in experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Sign-in form waiting for submit
    #[default]
    Form,
    /// Fake credential check
    Loading,
    /// Login button morphing into the paddle
    Transforming,
    /// Live brick-breaker battle
    Battle,
    /// Enemy card defeated
    Victory,
    /// Ball fell past the paddle
    Defeat,
}

impl Phase {
    /// Victory and Defeat need an explicit reset
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Victory | Phase::Defeat)
    }
}

/// Arena size (px), measured from the host layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// y of the paddle's top surface
    #[inline]
    pub fn paddle_top(&self) -> f32 {
        self.height - PADDLE_OFFSET
    }

    /// Where the ball rests above the paddle at battle start
    pub fn ball_spawn(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height - PADDLE_OFFSET - PADDLE_HEIGHT)
    }
}

impl From<Rect> for Arena {
    fn from(rect: Rect) -> Self {
        Self::new(rect.width, rect.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    /// Center position
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
}

impl BallState {
    #[inline]
    pub fn radius(&self) -> f32 {
        BALL_RADIUS
    }
}

/// The paddle (what used to be the login button)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaddleState {
    /// Left edge
    pub x: f32,
    pub width: f32,
}

impl PaddleState {
    /// Rightmost legal left edge for an arena of the given width
    #[inline]
    pub fn max_x(&self, arena_width: f32) -> f32 {
        arena_width - self.width
    }

    /// Keep the paddle fully inside the arena
    pub fn clamp_to_arena(&mut self, arena_width: f32) {
        self.x = clamp_to(self.x, 0.0, self.max_x(arena_width));
    }

    #[inline]
    pub fn center(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// The sign-in card, now roaming the upper arena as the enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyState {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub vel: Vec2,
    pub hp: u32,
    pub max_hp: u32,
    /// Shake magnitude after a hit (cosmetic, decays toward 0)
    pub wobble: f32,
}

impl EnemyState {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Remaining health as a percentage
    pub fn hp_percent(&self) -> f32 {
        if self.max_hp == 0 {
            return 0.0;
        }
        (self.hp as f32 / self.max_hp as f32 * 100.0).max(0.0)
    }

    /// Rotation the renderer applies to the card (degrees)
    pub fn wobble_degrees(&self) -> f32 {
        self.wobble * 8.0
    }
}

/// Everything the battle loop owns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    pub ball: BallState,
    pub paddle: PaddleState,
    pub arena: Arena,
    pub enemy: EnemyState,
    /// Ticks until the enemy can be hit again
    pub hit_cooldown: u32,
    /// Decaying intensity bumped by hits (cosmetic)
    pub combo: f32,
}

impl BattleState {
    /// Fresh battle laid out for the measured arena and enemy card.
    ///
    /// Enemy speed is the only random input; pass a seeded RNG to pin it.
    pub fn spawn<R: Rng>(arena: Arena, enemy_size: Vec2, rng: &mut R) -> Self {
        let paddle_width = paddle_width_for(arena.width);
        let enemy_x = clamp_to(
            arena.width / 2.0 - enemy_size.x / 2.0,
            ENEMY_PADDING,
            arena.width - enemy_size.x - ENEMY_PADDING,
        );

        Self {
            ball: BallState {
                pos: arena.ball_spawn(),
                vel: BALL_LAUNCH_VELOCITY,
            },
            paddle: PaddleState {
                x: arena.width / 2.0 - paddle_width / 2.0,
                width: paddle_width,
            },
            arena,
            enemy: EnemyState {
                x: enemy_x,
                y: ENEMY_PADDING * 2.0,
                width: enemy_size.x,
                height: enemy_size.y,
                vel: Vec2::new(
                    ENEMY_VX_BASE + rng.random::<f32>() * ENEMY_VX_SPREAD,
                    ENEMY_VY_BASE + rng.random::<f32>() * ENEMY_VY_SPREAD,
                ),
                hp: ENEMY_HP,
                max_hp: ENEMY_HP,
                wobble: 0.0,
            },
            hit_cooldown: 0,
            combo: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_layout() {
        let mut rng = Pcg32::seed_from_u64(7);
        let state = BattleState::spawn(Arena::new(800.0, 600.0), Vec2::new(360.0, 400.0), &mut rng);

        assert_eq!(state.paddle.width, 160.0);
        assert_eq!(state.paddle.x, 320.0);
        assert_eq!(state.ball.pos, Vec2::new(400.0, 496.0));
        assert_eq!(state.ball.vel, BALL_LAUNCH_VELOCITY);
        assert_eq!(state.enemy.x, 220.0);
        assert_eq!(state.enemy.y, 48.0);
        assert_eq!(state.enemy.hp, ENEMY_HP);
        assert_eq!(state.hit_cooldown, 0);
        assert_eq!(state.combo, 0.0);
    }

    #[test]
    fn test_spawn_enemy_speed_ranges() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..200 {
            let s = BattleState::spawn(Arena::new(800.0, 600.0), Vec2::new(64.0, 64.0), &mut rng);
            assert!(s.enemy.vel.x >= 2.2 && s.enemy.vel.x < 3.4);
            assert!(s.enemy.vel.y >= 1.8 && s.enemy.vel.y < 3.2);
        }
    }

    #[test]
    fn test_spawn_is_reproducible() {
        let a = BattleState::spawn(
            Arena::new(800.0, 600.0),
            Vec2::new(64.0, 64.0),
            &mut Pcg32::seed_from_u64(99),
        );
        let b = BattleState::spawn(
            Arena::new(800.0, 600.0),
            Vec2::new(64.0, 64.0),
            &mut Pcg32::seed_from_u64(99),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_wide_enemy_clamps_to_padding() {
        let mut rng = Pcg32::seed_from_u64(1);
        let s = BattleState::spawn(Arena::new(300.0, 600.0), Vec2::new(400.0, 100.0), &mut rng);
        assert_eq!(s.enemy.x, ENEMY_PADDING);
    }

    #[test]
    fn test_paddle_clamp_narrow_arena() {
        let mut paddle = PaddleState { x: 50.0, width: 160.0 };
        paddle.clamp_to_arena(100.0);
        assert_eq!(paddle.x, 0.0);
    }

    #[test]
    fn test_hp_percent() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut s = BattleState::spawn(Arena::new(800.0, 600.0), Vec2::new(64.0, 64.0), &mut rng);
        s.enemy.hp = 5;
        assert_eq!(s.enemy.hp_percent(), 50.0);
    }
}
