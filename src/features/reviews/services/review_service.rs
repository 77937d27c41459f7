use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reviews::dtos::{CreateReviewDto, ProductReviewsDto, ReviewResponseDto};
use crate::features::reviews::models::ReviewRow;
use crate::shared::types::PaginationQuery;

pub struct ReviewService {
    pool: PgPool,
}

impl ReviewService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: Uuid, dto: CreateReviewDto) -> Result<ReviewResponseDto> {
        let product_exists: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE id = $1 AND is_active = TRUE",
        )
        .bind(dto.product_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;
        if product_exists == 0 {
            return Err(AppError::NotFound("Product not found".to_string()));
        }

        let already_reviewed: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reviews WHERE product_id = $1 AND user_id = $2",
        )
        .bind(dto.product_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;
        if already_reviewed > 0 {
            return Err(AppError::Conflict(
                "You have already reviewed this product".to_string(),
            ));
        }

        let review = sqlx::query_as::<_, ReviewRow>(
            r#"
            WITH inserted AS (
                INSERT INTO reviews (product_id, user_id, rating, comment)
                VALUES ($1, $2, $3, $4)
                RETURNING id, product_id, user_id, rating, comment, created_at
            )
            SELECT i.id, i.product_id, i.user_id, i.rating, i.comment,
                   CONCAT(u.first_name, ' ', u.last_name) AS reviewer_name,
                   i.created_at
            FROM inserted i
            JOIN users u ON u.id = i.user_id
            "#,
        )
        .bind(dto.product_id)
        .bind(user_id)
        .bind(dto.rating)
        .bind(&dto.comment)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create review: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Review created: product={}, user={}, rating={}",
            review.product_id,
            review.user_id,
            review.rating
        );
        Ok(review.into())
    }

    pub async fn list_for_product(
        &self,
        product_id: Uuid,
        pagination: &PaginationQuery,
    ) -> Result<ProductReviewsDto> {
        let (review_count, average_rating): (i64, Option<Decimal>) = sqlx::query_as(
            "SELECT COUNT(*), ROUND(AVG(rating), 2) FROM reviews WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let reviews = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT r.id, r.product_id, r.user_id, r.rating, r.comment,
                   CONCAT(u.first_name, ' ', u.last_name) AS reviewer_name,
                   r.created_at
            FROM reviews r
            JOIN users u ON u.id = r.user_id
            WHERE r.product_id = $1
            ORDER BY r.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(product_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reviews: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(ProductReviewsDto {
            reviews: reviews.into_iter().map(Into::into).collect(),
            average_rating,
            review_count,
        })
    }
}
