use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::client_state::{ProductSnapshot, StatePersistence, StorageScope};
use crate::shared::constants::CART_STORAGE_PREFIX;
use crate::shared::pricing;

/// One cart line: a product snapshot plus the chosen quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product: ProductSnapshot,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        pricing::effective_price(self.product.price, self.product.discount_price)
            * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedCart {
    items: Vec<CartLine>,
}

/// Per-session shopping cart keyed by product id.
///
/// Quantities are capped at the snapshot's recorded stock; adding a product
/// already in the cart increments its line instead of duplicating it.
pub struct CartStore {
    scope: StorageScope,
    items: Vec<CartLine>,
    persistence: Box<dyn StatePersistence>,
}

impl CartStore {
    pub fn new(scope: StorageScope, persistence: Box<dyn StatePersistence>) -> Self {
        let mut store = Self {
            scope,
            items: Vec::new(),
            persistence,
        };
        store.items = store.load_scope();
        store
    }

    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of units across all lines.
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|l| l.quantity).sum()
    }

    /// Sum of effective price x quantity across all lines.
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(|l| l.line_total()).sum()
    }

    /// Add a product. An existing line is incremented; the resulting
    /// quantity never exceeds the snapshot's stock.
    pub fn add_item(&mut self, product: ProductSnapshot, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.items.iter_mut().find(|l| l.product.id == product.id) {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .saturating_add(quantity)
                    .min(line.product.stock_quantity);
            }
            None => {
                let quantity = quantity.min(product.stock_quantity);
                if quantity == 0 {
                    return;
                }
                self.items.push(CartLine { product, quantity });
            }
        }
        self.persist();
    }

    /// Set a line's quantity. Zero removes the line; values above stock are
    /// clamped down.
    pub fn update_quantity(&mut self, product_id: Uuid, quantity: u32) {
        if quantity == 0 {
            self.items.retain(|l| l.product.id != product_id);
        } else if let Some(line) = self.items.iter_mut().find(|l| l.product.id == product_id) {
            line.quantity = quantity.min(line.product.stock_quantity);
        } else {
            return;
        }
        self.persist();
    }

    pub fn remove_item(&mut self, product_id: Uuid) {
        let before = self.items.len();
        self.items.retain(|l| l.product.id != product_id);
        if self.items.len() != before {
            self.persist();
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Re-key the store on auth change. The current collection stays
    /// persisted under its old key; whatever the new scope has persisted is
    /// loaded wholesale. Guest contents are never merged into a user's cart.
    pub fn switch_scope(&mut self, scope: StorageScope) {
        if self.scope == scope {
            return;
        }
        self.scope = scope;
        self.items = self.load_scope();
    }

    fn storage_key(&self) -> String {
        self.scope.key(CART_STORAGE_PREFIX)
    }

    fn load_scope(&self) -> Vec<CartLine> {
        self.persistence
            .load(&self.storage_key())
            .and_then(|raw| serde_json::from_str::<PersistedCart>(&raw).ok())
            .map(|p| p.items)
            .unwrap_or_default()
    }

    fn persist(&mut self) {
        let payload = PersistedCart {
            items: self.items.clone(),
        };
        match serde_json::to_string(&payload) {
            Ok(json) => {
                let key = self.storage_key();
                self.persistence.save(&key, &json);
            }
            Err(e) => tracing::warn!("Failed to serialize cart state: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::client_state::{snapshot, InMemoryPersistence};

    fn cart() -> CartStore {
        CartStore::new(StorageScope::Guest, Box::new(InMemoryPersistence::new()))
    }

    #[test]
    fn add_same_product_twice_merges_lines() {
        let mut cart = cart();
        cart.add_item(snapshot(1, "Keyboard", 2500, 10), 1);
        cart.add_item(snapshot(1, "Keyboard", 2500, 10), 2);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn quantity_is_capped_at_stock() {
        let mut cart = cart();
        cart.add_item(snapshot(1, "Mouse", 1200, 3), 2);
        cart.add_item(snapshot(1, "Mouse", 1200, 3), 5);

        assert_eq!(cart.items()[0].quantity, 3);

        cart.update_quantity(Uuid::from_u128(1), 99);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn huge_increments_saturate_instead_of_overflowing() {
        let mut cart = cart();
        cart.add_item(snapshot(1, "Mouse", 1200, u32::MAX), u32::MAX);
        cart.add_item(snapshot(1, "Mouse", 1200, u32::MAX), u32::MAX);

        assert_eq!(cart.items()[0].quantity, u32::MAX);
    }

    #[test]
    fn zero_quantity_removes_line() {
        let mut cart = cart();
        cart.add_item(snapshot(1, "Mouse", 1200, 5), 2);
        cart.update_quantity(Uuid::from_u128(1), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn total_price_uses_effective_prices() {
        let mut cart = cart();
        let mut discounted = snapshot(1, "GPU", 1000, 10);
        discounted.discount_price = Some(Decimal::from(800));
        cart.add_item(discounted, 2);
        cart.add_item(snapshot(2, "PSU", 60, 10), 1);

        assert_eq!(cart.total_price(), Decimal::from(1660));
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn login_loads_user_scope_without_merging_guest_items() {
        let persistence = InMemoryPersistence::new();
        let user = Uuid::from_u128(42);

        // The user persisted a cart in an earlier session
        let mut earlier = CartStore::new(
            StorageScope::User(user),
            Box::new(persistence.clone()),
        );
        earlier.add_item(snapshot(7, "SSD", 4500, 10), 1);

        // A fresh guest session fills a different cart, then logs in
        let mut cart = CartStore::new(StorageScope::Guest, Box::new(persistence.clone()));
        cart.add_item(snapshot(1, "Keyboard", 2500, 10), 2);
        cart.switch_scope(StorageScope::User(user));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].product.name, "SSD");

        // The guest cart is still persisted untouched under its own key
        let guest_again = CartStore::new(StorageScope::Guest, Box::new(persistence));
        assert_eq!(guest_again.items().len(), 1);
        assert_eq!(guest_again.items()[0].product.name, "Keyboard");
    }

    #[test]
    fn logout_presents_empty_guest_cart_when_none_persisted() {
        let persistence = InMemoryPersistence::new();
        let user = Uuid::from_u128(9);

        let mut cart = CartStore::new(StorageScope::User(user), Box::new(persistence));
        cart.add_item(snapshot(1, "Monitor", 30000, 4), 1);
        cart.switch_scope(StorageScope::Guest);

        assert!(cart.is_empty());
    }

    #[test]
    fn persisted_payload_round_trips() {
        let persistence = InMemoryPersistence::new();
        {
            let mut cart = CartStore::new(StorageScope::Guest, Box::new(persistence.clone()));
            cart.add_item(snapshot(1, "Case", 5500, 8), 2);
        }
        let reloaded = CartStore::new(StorageScope::Guest, Box::new(persistence));
        assert_eq!(reloaded.items().len(), 1);
        assert_eq!(reloaded.items()[0].quantity, 2);
    }
}
