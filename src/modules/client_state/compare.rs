use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::client_state::{ProductSnapshot, StatePersistence, StorageScope};
use crate::shared::constants::{COMPARE_LIST_CAPACITY, COMPARE_STORAGE_PREFIX};

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedCompare {
    items: Vec<ProductSnapshot>,
}

/// Side-by-side comparison list, capped at four products.
///
/// A full list rejects further additions outright rather than evicting the
/// oldest entry; the caller is expected to surface the rejection.
pub struct CompareStore {
    scope: StorageScope,
    items: Vec<ProductSnapshot>,
    persistence: Box<dyn StatePersistence>,
}

impl CompareStore {
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

    pub fn is_full(&self) -> bool {
        self.items.len() >= COMPARE_LIST_CAPACITY
    }

    /// Add a product to the comparison. Returns false (leaving the list
    /// unchanged) when the product is already present or the list is full.
    pub fn add(&mut self, product: ProductSnapshot) -> bool {
        if self.contains(product.id) || self.is_full() {
            return false;
        }
        self.items.push(product);
        self.persist();
        true
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
        self.scope.key(COMPARE_STORAGE_PREFIX)
    }

    fn load_scope(&self) -> Vec<ProductSnapshot> {
        self.persistence
            .load(&self.storage_key())
            .and_then(|raw| serde_json::from_str::<PersistedCompare>(&raw).ok())
            .map(|p| p.items)
            .unwrap_or_default()
    }

    fn persist(&mut self) {
        let payload = PersistedCompare {
            items: self.items.clone(),
        };
        match serde_json::to_string(&payload) {
            Ok(json) => {
                let key = self.storage_key();
                self.persistence.save(&key, &json);
            }
            Err(e) => tracing::warn!("Failed to serialize compare state: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::client_state::{snapshot, InMemoryPersistence};

    fn compare() -> CompareStore {
        CompareStore::new(StorageScope::Guest, Box::new(InMemoryPersistence::new()))
    }

    #[test]
    fn fifth_distinct_product_is_rejected() {
        let mut compare = compare();
        for i in 1..=4 {
            assert!(compare.add(snapshot(i, "P", 100, 5)));
        }
        assert!(compare.is_full());

        let before: Vec<Uuid> = compare.items().iter().map(|p| p.id).collect();
        assert!(!compare.add(snapshot(5, "Rejected", 100, 5)));

        let after: Vec<Uuid> = compare.items().iter().map(|p| p.id).collect();
        assert_eq!(before, after); // no eviction, set unchanged
    }

    #[test]
    fn duplicate_add_is_a_no_op() {
        let mut compare = compare();
        assert!(compare.add(snapshot(1, "GPU", 100, 5)));
        assert!(!compare.add(snapshot(1, "GPU", 100, 5)));
        assert_eq!(compare.items().len(), 1);
    }

    #[test]
    fn remove_frees_a_slot() {
        let mut compare = compare();
        for i in 1..=4 {
            compare.add(snapshot(i, "P", 100, 5));
        }
        assert!(compare.remove(Uuid::from_u128(2)));
        assert!(compare.add(snapshot(5, "New", 100, 5)));
        assert_eq!(compare.items().len(), 4);
    }

    #[test]
    fn scope_switch_does_not_carry_items_over() {
        let persistence = InMemoryPersistence::new();
        let mut compare = CompareStore::new(StorageScope::Guest, Box::new(persistence));
        compare.add(snapshot(1, "GPU", 100, 5));

        compare.switch_scope(StorageScope::User(Uuid::from_u128(3)));
        assert!(compare.items().is_empty());
    }
}
