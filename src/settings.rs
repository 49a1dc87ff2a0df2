//! Presentation settings
//!
//! Supplied by the host page as JSON in the arena's `data-settings`
//! attribute. Read once at startup and never written back. Nothing here
//! changes phase timing or how hard the battle is.

use serde::{Deserialize, Serialize};

/// Attribute on the arena element that carries the settings JSON
pub const SETTINGS_ATTRIBUTE: &str = "data-settings";

/// HUD preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Show the combo meter in the HUD
    pub show_combo: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self { show_combo: true }
    }
}

impl Settings {
    /// Parse settings JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => Some(settings),
            Err(e) => {
                log::warn!("Ignoring malformed settings: {}", e);
                None
            }
        }
    }

    /// Settings from an optional attribute value, defaults when absent or bad
    pub fn from_attribute(raw: Option<&str>) -> Self {
        match raw.and_then(Self::from_json) {
            Some(settings) => {
                log::info!("Loaded settings from page");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}
