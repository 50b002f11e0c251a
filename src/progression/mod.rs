//! Progression that outlives a run: best distance, coins and skins
//!
//! Each field lives under its own storage key and is written back the moment
//! it changes. Missing or corrupt values load as defaults.

pub mod store;

pub use store::{KeyValueStore, MemoryStore, StorageError};

use serde::{Deserialize, Serialize};

pub const KEY_BEST_DISTANCE: &str = "colorDashHighestDistance";
pub const KEY_COINS: &str = "colorDashCoins";
pub const KEY_SELECTED_SKIN: &str = "colorDashSelectedSkin";
pub const KEY_OWNED_SKINS: &str = "colorDashOwnedSkins";

/// Skin every player owns from the start
pub const DEFAULT_SKIN: &str = "default";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionState {
    /// Highest distance ever reached
    pub best_distance: f32,
    /// Spendable coin balance
    pub coins: u32,
    /// Purchased skin ids (the default skin is implicit)
    pub owned_skins: Vec<String>,
    pub selected_skin: String,
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self {
            best_distance: 0.0,
            coins: 0,
            owned_skins: Vec::new(),
            selected_skin: DEFAULT_SKIN.to_string(),
        }
    }
}

impl ProgressionState {
    pub fn owns(&self, skin_id: &str) -> bool {
        skin_id == DEFAULT_SKIN || self.owned_skins.iter().any(|s| s == skin_id)
    }
}

/// Progression state plus the storage it is mirrored to
#[derive(Debug)]
pub struct ProgressionStore<S: KeyValueStore> {
    storage: S,
    state: ProgressionState,
}

impl<S: KeyValueStore> ProgressionStore<S> {
    /// Read every field, falling back to defaults for anything unusable
    pub fn load(storage: S) -> Self {
        let best_distance = storage
            .get_item(KEY_BEST_DISTANCE)
            .and_then(|s| parse_field(KEY_BEST_DISTANCE, &s, |s| s.trim().parse::<f32>().ok()))
            .filter(|d| d.is_finite() && *d >= 0.0)
            .unwrap_or(0.0);

        let coins = storage
            .get_item(KEY_COINS)
            .and_then(|s| parse_field(KEY_COINS, &s, |s| s.trim().parse::<u32>().ok()))
            .unwrap_or(0);

        let owned_skins = storage
            .get_item(KEY_OWNED_SKINS)
            .and_then(|s| parse_field(KEY_OWNED_SKINS, &s, |s| serde_json::from_str(s).ok()))
            .unwrap_or_default();

        let mut state = ProgressionState {
            best_distance,
            coins,
            owned_skins,
            selected_skin: DEFAULT_SKIN.to_string(),
        };
        if let Some(selected) = storage.get_item(KEY_SELECTED_SKIN) {
            if state.owns(&selected) {
                state.selected_skin = selected;
            } else {
                log::warn!("Selected skin '{}' is not owned, using default", selected);
            }
        }

        log::info!(
            "Loaded progression: best {:.0}m, {} coins, {} skins owned",
            state.best_distance,
            state.coins,
            state.owned_skins.len()
        );
        Self { storage, state }
    }

    pub fn state(&self) -> &ProgressionState {
        &self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Shared with other persisted records (settings)
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Store `distance` as the new best if it beats the old one
    pub fn record_distance(&mut self, distance: f32) -> bool {
        if !(distance > self.state.best_distance) {
            return false;
        }
        self.state.best_distance = distance;
        self.write(KEY_BEST_DISTANCE, &distance.to_string());
        true
    }

    /// Add to the balance; returns the new total
    pub fn add_coins(&mut self, amount: u32) -> u32 {
        self.state.coins = self.state.coins.saturating_add(amount);
        self.write(KEY_COINS, &self.state.coins.to_string());
        self.state.coins
    }

    /// Deduct `amount` if affordable. The balance never goes negative.
    pub fn spend_coins(&mut self, amount: u32) -> bool {
        let Some(remaining) = self.state.coins.checked_sub(amount) else {
            return false;
        };
        self.state.coins = remaining;
        self.write(KEY_COINS, &remaining.to_string());
        true
    }

    pub fn unlock_skin(&mut self, skin_id: &str) {
        if self.state.owns(skin_id) {
            return;
        }
        self.state.owned_skins.push(skin_id.to_string());
        match serde_json::to_string(&self.state.owned_skins) {
            Ok(json) => self.write(KEY_OWNED_SKINS, &json),
            Err(e) => log::warn!("Failed to encode owned skins: {}", e),
        }
    }

    /// Select an owned skin. Unowned skins are refused.
    pub fn select_skin(&mut self, skin_id: &str) -> bool {
        if !self.state.owns(skin_id) {
            return false;
        }
        self.state.selected_skin = skin_id.to_string();
        self.write(KEY_SELECTED_SKIN, skin_id);
        true
    }

    /// Failed writes keep the in-memory value; the next successful write
    /// of the field catches storage up.
    fn write(&mut self, key: &str, value: &str) {
        if let Err(e) = self.storage.set_item(key, value) {
            log::warn!("Failed to persist {}: {}", key, e);
        }
    }
}

fn parse_field<T>(key: &str, raw: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<T> {
    let value = parse(raw);
    if value.is_none() {
        log::warn!("Ignoring corrupt value for {}: {:?}", key, raw);
    }
    value
}
