use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::pc_builds::models::{PcBuild, PcBuildItemRow};
use crate::shared::pricing;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePcBuildItemDto {
    pub product_id: Uuid,

    /// cpu, motherboard, ram, storage... free-form, not an enum
    #[validate(length(min = 1, max = 50, message = "Component slot is required"))]
    pub component_slot: String,

    #[validate(range(min = 1, message = "Quantity must be positive"))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePcBuildDto {
    #[validate(length(min = 1, max = 200, message = "Build name is required"))]
    pub name: String,

    #[serde(default)]
    pub is_public: bool,

    #[validate(nested)]
    pub items: Vec<CreatePcBuildItemDto>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PcBuildItemDto {
    pub product_id: Uuid,
    pub product_name: String,
    pub product_slug: String,
    pub component_slot: String,
    pub quantity: i32,
    /// Current effective price of the component
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl From<PcBuildItemRow> for PcBuildItemDto {
    fn from(r: PcBuildItemRow) -> Self {
        let unit_price = pricing::effective_price(r.price, r.discount_price);
        Self {
            line_total: unit_price * Decimal::from(r.quantity),
            product_id: r.product_id,
            product_name: r.product_name,
            product_slug: r.product_slug,
            component_slot: r.component_slot,
            quantity: r.quantity,
            unit_price,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PcBuildResponseDto {
    pub id: Uuid,
    pub name: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub items: Vec<PcBuildItemDto>,
    /// Quoted at current effective prices
    pub total_price: Decimal,
}

impl PcBuildResponseDto {
    pub fn from_parts(build: PcBuild, items: Vec<PcBuildItemRow>) -> Self {
        let items: Vec<PcBuildItemDto> = items.into_iter().map(Into::into).collect();
        let total_price = items.iter().map(|i| i.line_total).sum();
        Self {
            id: build.id,
            name: build.name,
            is_public: build.is_public,
            created_at: build.created_at,
            items,
            total_price,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PcBuildSummaryDto {
    pub id: Uuid,
    pub name: String,
    pub is_public: bool,
    pub item_count: i64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn row(price: &str, discount: Option<&str>, qty: i32) -> PcBuildItemRow {
        PcBuildItemRow {
            id: Uuid::from_u128(1),
            build_id: Uuid::from_u128(2),
            product_id: Uuid::from_u128(3),
            component_slot: "cpu".to_string(),
            quantity: qty,
            product_name: "Ryzen 5 7600".to_string(),
            product_slug: "ryzen-5-7600".to_string(),
            price: dec(price),
            discount_price: discount.map(dec),
        }
    }

    #[test]
    fn total_uses_effective_prices() {
        let build = PcBuild {
            id: Uuid::from_u128(2),
            user_id: Uuid::from_u128(9),
            name: "Budget gaming".to_string(),
            is_public: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let dto = PcBuildResponseDto::from_parts(
            build,
            vec![row("25000", Some("22000"), 1), row("8000", None, 2)],
        );
        assert_eq!(dto.total_price, dec("38000"));
    }
}
