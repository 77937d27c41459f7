use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::client_state::{ProductSnapshot, StatePersistence, StorageScope};
use crate::shared::constants::WISHLIST_STORAGE_PREFIX;

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedWishlist {
    items: Vec<ProductSnapshot>,
}

/// Saved-for-later products, set semantics keyed by product id.
pub struct WishlistStore {
    scope: StorageScope,
    items: Vec<ProductSnapshot>,
    persistence: Box<dyn StatePersistence>,
}

impl WishlistStore {
    pub fn new(scope: StorageScope, persistence: Box<dyn StatePersistence>) -> Self {
        let mut store = Self {
            scope,
            items: Vec::new(),
            persistence,
        };
        store.items = store.load_scope();
        store
    }

    pub fn items(&self) -> &[ProductSnapshot] {
        &self.items
    }

    pub fn contains(&self, product_id: Uuid) -> bool {
        self.items.iter().any(|p| p.id == product_id)
    }

    /// Add the product if absent, remove it if present. Returns true when
    /// the product ended up in the wishlist.
    pub fn toggle(&mut self, product: ProductSnapshot) -> bool {
        let added = if self.contains(product.id) {
            self.items.retain(|p| p.id != product.id);
            false
        } else {
            self.items.push(product);
            true
        };
        self.persist();
        added
    }

    pub fn remove(&mut self, product_id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|p| p.id != product_id);
        let removed = self.items.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Re-key on auth change; no merging between scopes.
    pub fn switch_scope(&mut self, scope: StorageScope) {
        if self.scope == scope {
            return;
        }
        self.scope = scope;
        self.items = self.load_scope();
    }

    fn storage_key(&self) -> String {
        self.scope.key(WISHLIST_STORAGE_PREFIX)
    }

    fn load_scope(&self) -> Vec<ProductSnapshot> {
        self.persistence
            .load(&self.storage_key())
            .and_then(|raw| serde_json::from_str::<PersistedWishlist>(&raw).ok())
            .map(|p| p.items)
            .unwrap_or_default()
    }

    fn persist(&mut self) {
        let payload = PersistedWishlist {
            items: self.items.clone(),
        };
        match serde_json::to_string(&payload) {
            Ok(json) => {
                let key = self.storage_key();
                self.persistence.save(&key, &json);
            }
            Err(e) => tracing::warn!("Failed to serialize wishlist state: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::client_state::{snapshot, InMemoryPersistence};

    #[test]
    fn toggle_adds_then_removes() {
        let mut wishlist =
            WishlistStore::new(StorageScope::Guest, Box::new(InMemoryPersistence::new()));

        assert!(wishlist.toggle(snapshot(1, "GPU", 100, 5)));
        assert!(wishlist.contains(Uuid::from_u128(1)));

        assert!(!wishlist.toggle(snapshot(1, "GPU", 100, 5)));
        assert!(!wishlist.contains(Uuid::from_u128(1)));
    }

    #[test]
    fn wishlist_survives_reload_within_scope() {
        let persistence = InMemoryPersistence::new();
        {
            let mut wishlist =
                WishlistStore::new(StorageScope::Guest, Box::new(persistence.clone()));
            wishlist.toggle(snapshot(1, "RAM", 3200, 20));
        }
        let reloaded = WishlistStore::new(StorageScope::Guest, Box::new(persistence));
        assert_eq!(reloaded.items().len(), 1);
    }

    #[test]
    fn scope_switch_loads_target_scope_only() {
        let persistence = InMemoryPersistence::new();
        let user = Uuid::from_u128(11);

        let mut wishlist = WishlistStore::new(StorageScope::Guest, Box::new(persistence));
        wishlist.toggle(snapshot(1, "Fan", 450, 50));
        wishlist.switch_scope(StorageScope::User(user));

        assert!(wishlist.items().is_empty());
    }
}
