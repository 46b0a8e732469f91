//! Game settings and tuning
//!
//! Persisted in LocalStorage so a page can ship its own feel for the ball.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::PhysicsParams;

/// Camera-follow (auto-scroll) tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollParams {
    /// Top edge of the dead zone as a fraction of viewport height
    pub margin_top: f32,
    /// Distance of the dead zone's bottom edge from the viewport bottom
    pub margin_bottom: f32,
    /// Pixels per frame when the ball sits on the viewport edge
    pub max_speed: f32,
}

impl Default for ScrollParams {
    fn default() -> Self {
        Self {
            margin_top: SCROLL_MARGIN_TOP,
            margin_bottom: SCROLL_MARGIN_BOTTOM,
            max_speed: MAX_SCROLL_SPEED,
        }
    }
}

/// Delays for deferred effects, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingParams {
    pub smooth_scroll_restore_ms: u32,
    pub highlight_clear_ms: u32,
}

impl Default for TimingParams {
    fn default() -> Self {
        Self {
            smooth_scroll_restore_ms: SMOOTH_SCROLL_RESTORE_MS,
            highlight_clear_ms: HIGHLIGHT_CLEAR_MS,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: PhysicsParams,
    pub scroll: ScrollParams,
    pub timing: TimingParams,

    // === Accessibility ===
    /// Reduced motion (jump to cards instead of smooth scrolling)
    pub reduced_motion: bool,
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "page_ball_settings";

    /// Parse settings, filling anything missing with defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
