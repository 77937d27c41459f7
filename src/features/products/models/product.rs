use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for product.
///
/// A product referenced by historical order items is never hard-deleted;
/// deletion flips `is_active` (and `is_featured`) instead so order
/// snapshots keep resolving.
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub sku: String,
    pub brand: String,
    pub category_id: Uuid,
    pub stock_quantity: i32,
    pub is_active: bool,
    pub is_featured: bool,
    pub is_offer_product: bool,
    pub offer_type: Option<String>,
    pub offer_start_date: Option<DateTime<Utc>>,
    pub offer_end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row: product columns plus the primary image resolved in SQL.
#[derive(Debug, Clone, FromRow)]
pub struct ProductListRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub sku: String,
    pub brand: String,
    pub category_id: Uuid,
    pub stock_quantity: i32,
    pub is_featured: bool,
    pub primary_image: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ProductImage {
    pub id: Uuid,
    pub product_id: Uuid,
    pub url: String,
    pub alt_text: Option<String>,
    pub is_primary: bool,
    pub sort_order: i32,
}

#[derive(Debug, Clone, FromRow)]
pub struct ProductSpecification {
    pub id: Uuid,
    pub product_id: Uuid,
    pub spec_key: String,
    pub spec_value: String,
    pub sort_order: i32,
}
