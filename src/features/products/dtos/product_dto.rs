use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::products::models::{Product, ProductImage, ProductListRow, ProductSpecification};
use crate::shared::pricing;

/// Filters for the public product listing; combined with `PaginationQuery`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ProductFilterQuery {
    /// Restrict to a category
    pub category: Option<Uuid>,
    /// Exact brand match (case-insensitive)
    pub brand: Option<String>,
    /// Only featured products
    pub featured: Option<bool>,
    /// Case-insensitive match against name, brand and SKU
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Search term
    pub q: String,
    /// Maximum rows to return (default 10, capped at 25)
    pub limit: Option<i64>,
}

/// Catalog listing entry
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductListItemDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    /// Price actually charged: discount price if set, else list price
    pub effective_price: Decimal,
    /// Whole-percent discount for display, 0 when not discounted
    pub discount_percent: u32,
    pub sku: String,
    pub brand: String,
    pub category_id: Uuid,
    pub stock_quantity: i32,
    pub is_featured: bool,
    pub primary_image: Option<String>,
}

impl From<ProductListRow> for ProductListItemDto {
    fn from(r: ProductListRow) -> Self {
        Self {
            effective_price: pricing::effective_price(r.price, r.discount_price),
            discount_percent: pricing::discount_percent(r.price, r.discount_price),
            id: r.id,
            name: r.name,
            slug: r.slug,
            price: r.price,
            discount_price: r.discount_price,
            sku: r.sku,
            brand: r.brand,
            category_id: r.category_id,
            stock_quantity: r.stock_quantity,
            is_featured: r.is_featured,
            primary_image: r.primary_image,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImageDto {
    pub url: String,
    pub alt_text: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl From<ProductImage> for ImageDto {
    fn from(i: ProductImage) -> Self {
        Self {
            url: i.url,
            alt_text: i.alt_text,
            is_primary: i.is_primary,
            sort_order: i.sort_order,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SpecificationDto {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub sort_order: i32,
}

impl From<ProductSpecification> for SpecificationDto {
    fn from(s: ProductSpecification) -> Self {
        Self {
            key: s.spec_key,
            value: s.spec_value,
            sort_order: s.sort_order,
        }
    }
}

/// Full product view with owned collections
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDetailDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub effective_price: Decimal,
    pub discount_percent: u32,
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
    pub images: Vec<ImageDto>,
    pub specifications: Vec<SpecificationDto>,
}

impl ProductDetailDto {
    pub fn from_parts(
        p: Product,
        images: Vec<ProductImage>,
        specifications: Vec<ProductSpecification>,
    ) -> Self {
        Self {
            effective_price: pricing::effective_price(p.price, p.discount_price),
            discount_percent: pricing::discount_percent(p.price, p.discount_price),
            id: p.id,
            name: p.name,
            slug: p.slug,
            description: p.description,
            price: p.price,
            discount_price: p.discount_price,
            sku: p.sku,
            brand: p.brand,
            category_id: p.category_id,
            stock_quantity: p.stock_quantity,
            is_active: p.is_active,
            is_featured: p.is_featured,
            is_offer_product: p.is_offer_product,
            offer_type: p.offer_type,
            offer_start_date: p.offer_start_date,
            offer_end_date: p.offer_end_date,
            images: images.into_iter().map(Into::into).collect(),
            specifications: specifications.into_iter().map(Into::into).collect(),
        }
    }
}

/// Autocomplete row for the search box
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ProductSearchItemDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub brand: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductDto {
    #[validate(length(min = 1, max = 300, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, max = 300, message = "Slug is required"))]
    pub slug: String,

    pub description: Option<String>,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,

    #[validate(length(min = 1, max = 100, message = "SKU is required"))]
    pub sku: String,

    #[validate(length(min = 1, max = 100, message = "Brand is required"))]
    pub brand: String,

    pub category_id: Uuid,

    #[serde(default)]
    pub stock_quantity: i32,

    #[serde(default)]
    pub is_featured: bool,

    #[serde(default)]
    pub is_offer_product: bool,
    pub offer_type: Option<String>,
    pub offer_start_date: Option<DateTime<Utc>>,
    pub offer_end_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub images: Vec<ImageDto>,

    #[serde(default)]
    pub specifications: Vec<SpecificationDto>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductDto {
    #[validate(length(min = 1, max = 300, message = "Name must not be empty"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 300, message = "Slug must not be empty"))]
    pub slug: Option<String>,

    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub discount_price: Option<Decimal>,
    /// Set to true to remove an existing discount
    #[serde(default)]
    pub clear_discount: bool,
    pub sku: Option<String>,
    pub brand: Option<String>,
    pub category_id: Option<Uuid>,
    pub stock_quantity: Option<i32>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub is_offer_product: Option<bool>,
    pub offer_type: Option<String>,
    pub offer_start_date: Option<DateTime<Utc>>,
    pub offer_end_date: Option<DateTime<Utc>>,

    /// When present, replaces the image set wholesale
    pub images: Option<Vec<ImageDto>>,
    /// When present, replaces the specification set wholesale
    pub specifications: Option<Vec<SpecificationDto>>,
}

/// Result of a delete request: what actually happened and why
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeleteOutcomeDto {
    /// Product had historical order items; row kept, flags flipped
    SoftDelete { reason: String },
    /// No referential usage; row and owned collections removed
    HardDelete,
}
