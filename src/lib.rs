//! Brick Login - a sign-in form that fights back
//!
//! Core modules:
//! - `sim`: Phase state machine, arena simulation, morph animation, input adapter
//! - `platform`: Layout measurement contract (DOM on wasm, fixed rects elsewhere)
//! - `settings`: Presentation preferences

pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Ball diameter (px)
    pub const BALL_SIZE: f32 = 20.0;
    pub const BALL_RADIUS: f32 = BALL_SIZE / 2.0;
    /// Ball velocity at battle start (px per tick)
    pub const BALL_LAUNCH_VELOCITY: Vec2 = Vec2::new(4.5, -5.4);

    /// Paddle height (px)
    pub const PADDLE_HEIGHT: f32 = 24.0;
    /// Distance from arena bottom to paddle top
    pub const PADDLE_OFFSET: f32 = 80.0;
    /// Paddle width is this fraction of the arena, kept within [MIN, MAX]
    pub const PADDLE_WIDTH_FRACTION: f32 = 0.2;
    pub const PADDLE_MIN_WIDTH: f32 = 160.0;
    pub const PADDLE_MAX_WIDTH: f32 = 220.0;
    /// Horizontal ball speed at the paddle edge (steering)
    pub const PADDLE_STEER_SPEED: f32 = 6.0;
    /// Paddle shift per key press, as a fraction of paddle width
    pub const KEY_NUDGE_FRACTION: f32 = 0.22;

    /// Gap kept between the enemy card and the arena edges
    pub const ENEMY_PADDING: f32 = 24.0;
    /// Top bound multiplier on ENEMY_PADDING
    pub const ENEMY_TOP_PADDING_FACTOR: f32 = 1.2;
    /// Enemy roams only in the upper part of the arena
    pub const ENEMY_ROAM_HEIGHT_FRACTION: f32 = 0.6;
    pub const ENEMY_HP: u32 = 10;
    /// Enemy spawn speed: base + random * spread
    pub const ENEMY_VX_BASE: f32 = 2.2;
    pub const ENEMY_VX_SPREAD: f32 = 1.2;
    pub const ENEMY_VY_BASE: f32 = 1.8;
    pub const ENEMY_VY_SPREAD: f32 = 1.4;
    /// Enemy speed multipliers applied on every hit
    pub const ENEMY_SPEEDUP_X: f32 = 1.05;
    pub const ENEMY_SPEEDUP_Y: f32 = 1.07;

    /// Ticks during which the enemy ignores further hits
    pub const HIT_COOLDOWN_TICKS: u32 = 14;
    pub const WOBBLE_PEAK: f32 = 1.2;
    pub const WOBBLE_DECAY: f32 = 0.85;

    /// Combo bookkeeping (cosmetic)
    pub const COMBO_DECAY: f32 = 0.01;
    pub const COMBO_PADDLE_BONUS: f32 = 0.75;
    pub const COMBO_PADDLE_CAP: f32 = 4.5;
    pub const COMBO_ENEMY_BONUS: f32 = 1.2;
    pub const COMBO_MAX: f32 = 6.0;

    /// Fake "verifying credentials" delay before the morph (ms)
    pub const LOADING_DELAY_MS: f64 = 900.0;
    /// Button-to-paddle morph duration (ms)
    pub const TRANSFORM_DURATION_MS: f64 = 1100.0;
}

/// Cubic ease-in-out on [0, 1]
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamp `value` into [min, max].
///
/// Unlike `f32::clamp` this never panics: if `max < min` the result is `min`,
/// which is what an arena narrower than the paddle needs.
#[inline]
pub fn clamp_to(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// Paddle width for a given arena width
#[inline]
pub fn paddle_width_for(arena_width: f32) -> f32 {
    clamp_to(
        arena_width * consts::PADDLE_WIDTH_FRACTION,
        consts::PADDLE_MIN_WIDTH,
        consts::PADDLE_MAX_WIDTH,
    )
}
