//! DOM-backed layout probe

use web_sys::Document;

use super::{LayoutProbe, Rect};

pub const ARENA_ID: &str = "arena";
pub const ENEMY_ID: &str = "enemy-card";
pub const LOGIN_BUTTON_ID: &str = "login-button";

/// Measures elements by id with `getBoundingClientRect`, fresh on every call
pub struct DomLayout {
    document: Document,
}

impl DomLayout {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn measure(&self, id: &str) -> Option<Rect> {
        let el = self.document.get_element_by_id(id)?;
        let r = el.get_bounding_client_rect();
        Some(Rect::new(
            r.left() as f32,
            r.top() as f32,
            r.width() as f32,
            r.height() as f32,
        ))
    }
}

impl LayoutProbe for DomLayout {
    fn arena_rect(&self) -> Option<Rect> {
        self.measure(ARENA_ID)
    }

    fn enemy_rect(&self) -> Option<Rect> {
        self.measure(ENEMY_ID)
    }

    fn login_button_rect(&self) -> Option<Rect> {
        self.measure(LOGIN_BUTTON_ID)
    }
}
