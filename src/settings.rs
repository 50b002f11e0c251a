//! Player preferences
//!
//! Persisted separately from progression as one JSON blob.

use serde::{Deserialize, Serialize};

use crate::progression::KeyValueStore;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Background music on/off
    pub music_enabled: bool,
    /// Mute when the tab is hidden or loses focus
    pub mute_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_enabled: true,
            mute_on_blur: true,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "colorDashSettings";

    /// Volume actually applied to sound effects
    pub fn effective_sfx_volume(&self) -> f32 {
        self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
    }

    /// Whether the background loop should be playing
    pub fn music_audible(&self) -> bool {
        self.music_enabled && self.master_volume > 0.0
    }

    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn toggle_music(&mut self) -> bool {
        self.music_enabled = !self.music_enabled;
        self.music_enabled
    }

    /// Load settings, falling back to defaults when absent or unreadable
    pub fn load(storage: &impl KeyValueStore) -> Self {
        if let Some(json) = storage.get_item(Self::STORAGE_KEY) {
            match serde_json::from_str::<Settings>(&json) {
                Ok(mut settings) => {
                    settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
                    settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring corrupt settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, storage: &mut impl KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Failed to save settings: {}", e),
            },
            Err(e) => log::warn!("Failed to encode settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::MemoryStore;

    #[test]
    fn round_trip() {
        let mut storage = MemoryStore::new();
        let mut settings = Settings::default();
        settings.set_master_volume(0.5);
        settings.toggle_music();
        settings.save(&mut storage);
        assert_eq!(Settings::load(&storage), settings);
    }

    #[test]
    fn music_toggle_gates_the_loop() {
        let mut settings = Settings::default();
        assert!(settings.music_audible());
        assert!(!settings.toggle_music());
        assert!(!settings.music_audible());
        settings.toggle_music();
        settings.set_master_volume(0.0);
        assert!(!settings.music_audible());
    }

    #[test]
    fn old_blobs_with_unknown_fields_still_load() {
        let storage = MemoryStore::with_items([(
            Settings::STORAGE_KEY,
            r#"{"music_enabled": false, "reduced_motion": true}"#,
        )]);
        let settings = Settings::load(&storage);
        assert!(!settings.music_enabled);
        assert_eq!(settings.master_volume, 0.8);
    }

    #[test]
    fn volumes_clamp() {
        let mut settings = Settings::default();
        settings.set_sfx_volume(3.0);
        settings.set_master_volume(-1.0);
        assert_eq!(settings.sfx_volume, 1.0);
        assert_eq!(settings.effective_sfx_volume(), 0.0);
    }

    #[test]
    fn corrupt_or_partial_json() {
        let storage = MemoryStore::with_items([(Settings::STORAGE_KEY, "nope")]);
        assert_eq!(Settings::load(&storage), Settings::default());

        let storage =
            MemoryStore::with_items([(Settings::STORAGE_KEY, r#"{"master_volume": 7.0}"#)]);
        let settings = Settings::load(&storage);
        assert_eq!(settings.master_volume, 1.0);
        assert!(settings.music_enabled);
    }
}
