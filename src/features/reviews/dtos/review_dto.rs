use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::reviews::models::ReviewRow;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReviewDto {
    pub product_id: Uuid,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(length(max = 2000, message = "Comment is too long"))]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewResponseDto {
    pub id: Uuid,
    pub product_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub reviewer_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewRow> for ReviewResponseDto {
    fn from(r: ReviewRow) -> Self {
        Self {
            id: r.id,
            product_id: r.product_id,
            rating: r.rating,
            comment: r.comment,
            reviewer_name: r.reviewer_name,
            created_at: r.created_at,
        }
    }
}

/// Review page for a product, with the aggregate rating.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductReviewsDto {
    pub reviews: Vec<ReviewResponseDto>,
    /// Mean rating over *all* reviews of the product, not just this page
    pub average_rating: Option<Decimal>,
    pub review_count: i64,
}
