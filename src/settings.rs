//! Host settings and preferences
//!
//! Stored as JSON: LocalStorage in the browser, `pokepong.json` in the
//! working directory for the native host (read only).

use serde::{Deserialize, Serialize};

use crate::consts::{COLLISION_FACTOR, HEADLESS_STEP_MS};
use crate::scene::SceneKind;
use crate::sim::{Side, TickInput};

/// Which paddles are driven by the demo autopilot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Autopilot {
    pub left: bool,
    pub right: bool,
}

impl Autopilot {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn only(side: Side) -> Self {
        match side {
            Side::Left => Self {
                left: true,
                right: false,
            },
            Side::Right => Self {
                left: false,
                right: true,
            },
        }
    }

    /// Copy the enabled sides into a tick input
    pub fn apply(&self, input: &mut TickInput) {
        input.autopilot_left = self.left;
        input.autopilot_right = self.right;
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Scene to run
    pub scene: SceneKind,

    // === Physics ===
    /// Hitbox multiplier for entity overlap tests
    pub collision_factor: f32,
    /// Upper bound on a frame's delta time (seconds); `None` keeps raw deltas
    pub max_frame_delta: Option<f32>,

    // === Demo ===
    pub autopilot: Autopilot,

    // === Headless host ===
    /// Frames to simulate before giving up on a result
    pub headless_frames: u32,
    /// Simulated time between frames (milliseconds)
    pub headless_step_ms: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scene: SceneKind::Pong,

            collision_factor: COLLISION_FACTOR,
            max_frame_delta: None,

            autopilot: Autopilot::none(),

            headless_frames: 3600,
            headless_step_ms: HEADLESS_STEP_MS,
        }
    }
}

impl Settings {
    /// Clamp a raw frame delta according to `max_frame_delta`
    pub fn clamp_delta(&self, dt: f32) -> f32 {
        match self.max_frame_delta {
            Some(max) => dt.min(max),
            None => dt,
        }
    }

    /// Parse settings JSON, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed settings: {}", e);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "pokepong_settings";

    /// Settings file for the native host
    #[cfg(not(target_arch = "wasm32"))]
    const SETTINGS_FILE: &'static str = "pokepong.json";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
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
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from `pokepong.json` when present
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::fs::read_to_string(Self::SETTINGS_FILE) {
            Ok(json) => {
                log::info!("Loaded settings from {}", Self::SETTINGS_FILE);
                Self::from_json(&json)
            }
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_json_roundtrip() {
        let settings = Settings {
            scene: SceneKind::Orchard,
            max_frame_delta: Some(0.1),
            autopilot: Autopilot::only(Side::Right),
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json), settings);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        assert_eq!(Settings::from_json("{ not json"), Settings::default());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "scene": "orchard" }"#);
        assert_eq!(settings.scene, SceneKind::Orchard);
        assert_eq!(settings.collision_factor, COLLISION_FACTOR);
        assert_eq!(settings.max_frame_delta, None);

        let settings = Settings::from_json(r#"{ "autopilot": { "left": true } }"#);
        assert_eq!(settings.autopilot, Autopilot::only(Side::Left));
    }

    #[test]
    fn test_clamp_delta() {
        let mut settings = Settings::default();
        assert_eq!(settings.clamp_delta(2.0), 2.0);
        settings.max_frame_delta = Some(0.25);
        assert_eq!(settings.clamp_delta(2.0), 0.25);
        assert_eq!(settings.clamp_delta(0.1), 0.1);
    }

    #[test]
    fn test_autopilot_apply() {
        let mut input = TickInput::default();
        Autopilot::only(Side::Left).apply(&mut input);
        assert!(input.autopilot_left);
        assert!(!input.autopilot_right);
    }
}
