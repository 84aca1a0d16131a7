//! Player preferences
//!
//! Persisted separately from game state in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::audio::AudioPolicy;
use crate::config::{BoardSizePolicy, GameConfig};
use crate::consts::{EAT_PITCH, TICK_INTERVAL_MS};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Sound toggle shown next to the play button
    pub sound_on: bool,
    /// Keep effects silent on phones and tablets
    pub mute_effects_on_mobile: bool,
    /// Output volume (0.0 - 1.0)
    pub volume: f32,
    /// Playback rate of the eat cue
    pub eat_pitch: f32,

    // === Gameplay ===
    /// Time between ticks (ms); lower is faster
    pub tick_interval_ms: f64,
    /// Viewport-width to board-size mapping
    pub board_sizes: BoardSizePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_on: true,
            mute_effects_on_mobile: true,
            volume: 0.8,
            eat_pitch: EAT_PITCH,
            tick_interval_ms: TICK_INTERVAL_MS,
            board_sizes: BoardSizePolicy::default(),
        }
    }
}

impl Settings {
    /// Audio policy for a device
    pub fn audio_policy(&self, is_mobile: bool) -> AudioPolicy {
        AudioPolicy {
            sound_on: self.sound_on,
            mute_effects_on_mobile: self.mute_effects_on_mobile,
            is_mobile,
        }
    }

    /// Game configuration for a viewport of the given width
    pub fn game_config(&self, viewport_width: f64) -> GameConfig {
        GameConfig {
            board_size: self.board_sizes.size_for_viewport(viewport_width),
            tick_interval_ms: self.tick_interval_ms,
            ..Default::default()
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "snake_rush_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(err) => log::warn!("Ignoring stored settings: {}", err),
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
            if let Ok(json) = serde_json::to_string(self) {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Settings not saved (storage full or blocked)");
                } else {
                    log::info!("Settings saved");
                }
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
