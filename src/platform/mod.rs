//! Platform abstraction layer
//!
//! The simulation never touches the DOM. Whatever hosts it answers
//! bounding-box queries for three elements: the arena container, the enemy
//! card and the login button.

#[cfg(target_arch = "wasm32")]
pub mod web;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in page (client) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// This rect expressed relative to `origin`'s top-left corner
    pub fn relative_to(&self, origin: &Rect) -> Rect {
        Rect::new(self.x - origin.x, self.y - origin.y, self.width, self.height)
    }
}

/// On-demand layout measurements.
///
/// `None` means the element is not mounted (yet). Callers degrade instead of
/// failing: battle setup retries next frame, the morph is skipped.
pub trait LayoutProbe {
    fn arena_rect(&self) -> Option<Rect>;
    fn enemy_rect(&self) -> Option<Rect>;
    fn login_button_rect(&self) -> Option<Rect>;
}

/// Fixed measurements, for headless runs and tests
#[derive(Debug, Clone, Default)]
pub struct StaticLayout {
    pub arena: Option<Rect>,
    pub enemy: Option<Rect>,
    pub login_button: Option<Rect>,
}

impl StaticLayout {
    /// Arena at the page origin with a centered enemy card and login button
    pub fn centered(arena_width: f32, arena_height: f32) -> Self {
        let card = Rect::new(arena_width / 2.0 - 160.0, arena_height / 2.0 - 120.0, 320.0, 240.0);
        let button = Rect::new(card.x + 24.0, card.bottom() - 72.0, card.width - 48.0, 40.0);
        Self {
            arena: Some(Rect::new(0.0, 0.0, arena_width, arena_height)),
            enemy: Some(card),
            login_button: Some(button),
        }
    }
}

impl LayoutProbe for StaticLayout {
    fn arena_rect(&self) -> Option<Rect> {
        self.arena
    }

    fn enemy_rect(&self) -> Option<Rect> {
        self.enemy
    }

    fn login_button_rect(&self) -> Option<Rect> {
        self.login_button
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_to() {
        let arena = Rect::new(100.0, 50.0, 800.0, 600.0);
        let button = Rect::new(300.0, 400.0, 200.0, 40.0);
        let rel = button.relative_to(&arena);
        assert_eq!(rel, Rect::new(200.0, 350.0, 200.0, 40.0));
    }

    #[test]
    fn test_centered_layout_fits_arena() {
        let layout = StaticLayout::centered(800.0, 600.0);
        let arena = layout.arena_rect().unwrap();
        let card = layout.enemy_rect().unwrap();
        let button = layout.login_button_rect().unwrap();
        assert!(card.left() >= arena.left() && card.right() <= arena.right());
        assert!(button.top() > card.top() && button.bottom() < card.bottom());
    }
}
