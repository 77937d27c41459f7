use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reviews::dtos::{CreateReviewDto, ProductReviewsDto, ReviewResponseDto};
use crate::features::reviews::services::ReviewService;
use crate::shared::types::{ApiResponse, PaginationQuery};

/// Review a product (one review per user per product)
#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = CreateReviewDto,
    responses(
        (status = 200, description = "Review created", body = ApiResponse<ReviewResponseDto>),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Already reviewed")
    ),
    security(("bearer_auth" = [])),
    tag = "reviews"
)]
pub async fn create_review(
    State(service): State<Arc<ReviewService>>,
    user: AuthenticatedUser,
    AppJson(dto): AppJson<CreateReviewDto>,
) -> Result<Json<ApiResponse<ReviewResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let review = service.create(user.user_id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(review),
        Some("Review created".to_string()),
        None,
    )))
}

/// Reviews of a product with the average rating
#[utoipa::path(
    get,
    path = "/api/products/{id}/reviews",
    params(("id" = Uuid, Path, description = "Product id"), PaginationQuery),
    responses(
        (status = 200, description = "Review page", body = ApiResponse<ProductReviewsDto>)
    ),
    tag = "reviews"
)]
pub async fn list_product_reviews(
    State(service): State<Arc<ReviewService>>,
    Path(id): Path<Uuid>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<ProductReviewsDto>>> {
    let reviews = service.list_for_product(id, &pagination).await?;
    Ok(Json(ApiResponse::success(Some(reviews), None, None)))
}
