use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// A saved component selection. Items reference live products, so a build
/// is a quote at current prices rather than a price snapshot.
#[derive(Debug, Clone, FromRow)]
pub struct PcBuild {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct PcBuildItem {
    pub id: Uuid,
    pub build_id: Uuid,
    pub product_id: Uuid,
    pub component_slot: String,
    pub quantity: i32,
}

/// Build item joined with the product's current pricing.
#[derive(Debug, Clone, FromRow)]
pub struct PcBuildItemRow {
    pub id: Uuid,
    pub build_id: Uuid,
    pub product_id: Uuid,
    pub component_slot: String,
    pub quantity: i32,
    pub product_name: String,
    pub product_slug: String,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
}
