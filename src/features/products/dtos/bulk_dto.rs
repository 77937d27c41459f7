use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Bulk actions an administrator can apply to a set of products.
/// Unrecognized action names are rejected at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Activate,
    Deactivate,
    Feature,
    Unfeature,
    UpdateCategory,
    UpdateStock,
    ApplyDiscount,
    RemoveDiscount,
    /// Bulk delete is always a soft delete
    Delete,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkUpdateDto {
    pub product_ids: Vec<Uuid>,
    pub action: BulkAction,
    /// Required for `update_category`
    pub category_id: Option<Uuid>,
    /// Required for `update_stock`
    pub stock_quantity: Option<i32>,
    /// Required for `apply_discount`: whole percentage, exclusive 0..100
    pub discount_percent: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BulkUpdateResultDto {
    pub requested: usize,
    pub updated: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_actions_parse() {
        let dto: BulkUpdateDto = serde_json::from_str(
            r#"{"product_ids": [], "action": "apply_discount", "discount_percent": "15"}"#,
        )
        .unwrap();
        assert_eq!(dto.action, BulkAction::ApplyDiscount);
    }

    #[test]
    fn unknown_action_is_rejected() {
        let result = serde_json::from_str::<BulkUpdateDto>(
            r#"{"product_ids": [], "action": "explode"}"#,
        );
        assert!(result.is_err());
    }
}
