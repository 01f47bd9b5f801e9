//! Audio preference persistence
//!
//! BGM and SFX toggles survive reloads via LocalStorage, independently of
//! everything else (no game state is ever saved).

use serde::{Deserialize, Serialize};

/// User-facing audio toggles
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Looped background music
    pub bgm_enabled: bool,
    /// One-shot sound effects
    pub sfx_enabled: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            bgm_enabled: true,
            sfx_enabled: true,
        }
    }
}

impl AudioSettings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "granny_dash_audio_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded audio settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default audio settings");
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
                log::info!("Audio settings saved");
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_everything() {
        let settings = AudioSettings::default();
        assert!(settings.bgm_enabled);
        assert!(settings.sfx_enabled);
    }

    #[test]
    fn test_roundtrip_json() {
        let settings = AudioSettings {
            bgm_enabled: false,
            sfx_enabled: true,
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: AudioSettings = serde_json::from_str(&json).unwrap();
        assert!(!back.bgm_enabled);
        assert!(back.sfx_enabled);
    }
}
