//! Client-state collections: cart, compare list and wishlist.
//!
//! These mirror the browser-side stores of the storefront: per-session
//! collections of denormalized product snapshots, persisted under a
//! scope-derived storage key so a guest and each signed-in user keep
//! separate collections. The stores are plain objects constructed per
//! application instance with persistence injected as a side-effect hook,
//! so they can be embedded and tested without any global state.
//!
//! Scope switching deliberately does NOT merge: on login the guest
//! collection is left behind under its own key and the user's previously
//! persisted collection (if any) is loaded wholesale.

pub mod cart;
pub mod compare;
pub mod persistence;
pub mod wishlist;

pub use cart::CartStore;
pub use compare::CompareStore;
pub use persistence::{InMemoryPersistence, StatePersistence};
pub use wishlist::WishlistStore;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who a client-state collection belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageScope {
    Guest,
    User(Uuid),
}

impl StorageScope {
    /// Storage key for this scope, e.g. "cart-storage-guest" or
    /// "cart-storage-<user id>".
    pub fn key(&self, prefix: &str) -> String {
        match self {
            StorageScope::Guest => format!("{}-guest", prefix),
            StorageScope::User(id) => format!("{}-{}", prefix, id),
        }
    }
}

/// Denormalized product snapshot carried by every client-state collection,
/// sufficient to render a line without a live catalog fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub image: Option<String>,
    pub stock_quantity: u32,
    pub brand: String,
}

#[cfg(test)]
pub(crate) fn snapshot(id: u128, name: &str, price: i64, stock: u32) -> ProductSnapshot {
    ProductSnapshot {
        id: Uuid::from_u128(id),
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        price: Decimal::from(price),
        discount_price: None,
        image: None,
        stock_quantity: stock,
        brand: "Acme".to_string(),
    }
}
