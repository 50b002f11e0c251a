//! Cosmetic runner skins and the shop
//!
//! The catalog is static. Ownership and selection live in the progression
//! store, so a skin's `owned` flag is computed whenever the shop is viewed.

use serde::{Deserialize, Serialize};

use crate::progression::{DEFAULT_SKIN, KeyValueStore, ProgressionState, ProgressionStore};

/// Runner outline drawn for a skin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkinShape {
    Rectangle,
    Circle,
    Triangle,
    Star,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skin {
    pub id: &'static str,
    pub name: &'static str,
    pub shape: SkinShape,
    pub price: u32,
}

pub const CATALOG: [Skin; 4] = [
    Skin {
        id: DEFAULT_SKIN,
        name: "Square",
        shape: SkinShape::Rectangle,
        price: 0,
    },
    Skin {
        id: "circle",
        name: "Circle",
        shape: SkinShape::Circle,
        price: 50,
    },
    Skin {
        id: "triangle",
        name: "Triangle",
        shape: SkinShape::Triangle,
        price: 100,
    },
    Skin {
        id: "star",
        name: "Star",
        shape: SkinShape::Star,
        price: 200,
    },
];

pub fn find(id: &str) -> Option<&'static Skin> {
    CATALOG.iter().find(|s| s.id == id)
}

/// Shape for the selected skin, Rectangle if the id is unknown
pub fn selected_shape(state: &ProgressionState) -> SkinShape {
    find(&state.selected_skin)
        .map(|s| s.shape)
        .unwrap_or(SkinShape::Rectangle)
}

/// A catalog entry as shown in the shop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopEntry {
    pub skin: &'static Skin,
    pub owned: bool,
    pub selected: bool,
}

pub fn shop_entries(state: &ProgressionState) -> Vec<ShopEntry> {
    CATALOG
        .iter()
        .map(|skin| ShopEntry {
            skin,
            owned: state.owns(skin.id),
            selected: state.selected_skin == skin.id,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseResult {
    Purchased { remaining: u32 },
    AlreadyOwned,
    InsufficientCoins { needed: u32 },
    UnknownSkin,
}

/// Result of clicking a shop card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopOutcome {
    Selected,
    Purchase(PurchaseResult),
}

impl<S: KeyValueStore> ProgressionStore<S> {
    /// Buy a skin with coins. Nothing changes unless the purchase succeeds.
    pub fn purchase_skin(&mut self, skin_id: &str) -> PurchaseResult {
        let Some(skin) = find(skin_id) else {
            return PurchaseResult::UnknownSkin;
        };
        if self.state().owns(skin.id) {
            return PurchaseResult::AlreadyOwned;
        }
        if !self.spend_coins(skin.price) {
            return PurchaseResult::InsufficientCoins {
                needed: skin.price - self.state().coins,
            };
        }
        self.unlock_skin(skin.id);
        log::info!("Purchased skin '{}' for {} coins", skin.id, skin.price);
        PurchaseResult::Purchased {
            remaining: self.state().coins,
        }
    }

    /// Shop card behaviour: select when owned, otherwise try to buy
    pub fn activate_skin(&mut self, skin_id: &str) -> ShopOutcome {
        if find(skin_id).is_some() && self.select_skin(skin_id) {
            return ShopOutcome::Selected;
        }
        ShopOutcome::Purchase(self.purchase_skin(skin_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::{KEY_COINS, MemoryStore};

    fn store_with_coins(coins: &str) -> ProgressionStore<MemoryStore> {
        ProgressionStore::load(MemoryStore::with_items([(KEY_COINS, coins)]))
    }

    #[test]
    fn catalog_prices() {
        assert_eq!(find("default").unwrap().price, 0);
        assert_eq!(find("circle").unwrap().price, 50);
        assert_eq!(find("triangle").unwrap().price, 100);
        assert_eq!(find("star").unwrap().price, 200);
        assert!(find("hexagon").is_none());
    }

    #[test]
    fn purchase_deducts_and_unlocks() {
        let mut store = store_with_coins("120");
        assert_eq!(
            store.purchase_skin("triangle"),
            PurchaseResult::Purchased { remaining: 20 }
        );
        assert!(store.state().owns("triangle"));
        assert_eq!(store.purchase_skin("triangle"), PurchaseResult::AlreadyOwned);
        assert_eq!(store.state().coins, 20);
    }

    #[test]
    fn purchase_refused_when_short() {
        let mut store = store_with_coins("30");
        assert_eq!(
            store.purchase_skin("circle"),
            PurchaseResult::InsufficientCoins { needed: 20 }
        );
        assert_eq!(store.state().coins, 30);
        assert!(!store.state().owns("circle"));
    }

    #[test]
    fn unknown_skin_cannot_be_bought_or_selected() {
        let mut store = store_with_coins("500");
        assert_eq!(
            store.activate_skin("hexagon"),
            ShopOutcome::Purchase(PurchaseResult::UnknownSkin)
        );
        assert_eq!(store.state().selected_skin, "default");
    }

    #[test]
    fn activate_buys_then_selects() {
        let mut store = store_with_coins("60");
        assert_eq!(
            store.activate_skin("circle"),
            ShopOutcome::Purchase(PurchaseResult::Purchased { remaining: 10 })
        );
        assert_eq!(store.activate_skin("circle"), ShopOutcome::Selected);
        assert_eq!(store.state().selected_skin, "circle");
        assert_eq!(selected_shape(store.state()), SkinShape::Circle);
    }

    #[test]
    fn shop_entries_reflect_ownership() {
        let mut store = store_with_coins("50");
        store.purchase_skin("circle");
        let entries = shop_entries(store.state());
        assert_eq!(entries.len(), 4);
        assert!(entries[0].owned && entries[0].selected);
        assert!(entries[1].owned && !entries[1].selected);
        assert!(!entries[2].owned);
    }
}
