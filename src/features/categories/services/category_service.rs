use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{
    CategoryResponseDto, CategoryTreeDto, CreateCategoryDto, UpdateCategoryDto,
};
use crate::features::categories::models::Category;
use crate::features::products::dtos::ProductListItemDto;
use crate::features::products::models::ProductListRow;
use crate::shared::types::PaginationQuery;

const CATEGORY_COLUMNS: &str =
    "id, parent_id, name, slug, description, is_active, sort_order, created_at, updated_at";

pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE is_active = TRUE \
             ORDER BY sort_order ASC, name ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(categories.into_iter().map(Into::into).collect())
    }

    pub async fn list_tree(&self) -> Result<Vec<CategoryTreeDto>> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE is_active = TRUE \
             ORDER BY sort_order ASC, name ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load category tree: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(CategoryTreeDto::build_tree(categories))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<CategoryResponseDto> {
        let category = self.find_active(slug).await?;
        Ok(category.into())
    }

    /// Products of the category plus its *direct* children. One level of
    /// flattening only: grandchildren are never included.
    pub async fn resolve_products(
        &self,
        slug: &str,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<ProductListItemDto>, i64)> {
        let category = self.find_active(slug).await?;

        let mut category_ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM categories WHERE parent_id = $1 AND is_active = TRUE",
        )
        .bind(category.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load child categories: {:?}", e);
            AppError::Database(e)
        })?;
        category_ids.push(category.id);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products \
             WHERE is_active = TRUE AND category_id = ANY($1)",
        )
        .bind(&category_ids)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let rows = sqlx::query_as::<_, ProductListRow>(
            r#"
            SELECT p.id, p.name, p.slug, p.price, p.discount_price, p.sku, p.brand,
                   p.category_id, p.stock_quantity, p.is_featured,
                   (SELECT i.url FROM product_images i
                    WHERE i.product_id = p.id
                    ORDER BY i.is_primary DESC, i.sort_order ASC
                    LIMIT 1) AS primary_image
            FROM products p
            WHERE p.is_active = TRUE AND p.category_id = ANY($1)
            ORDER BY p.created_at DESC, p.name ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&category_ids)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to resolve category products: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        self.ensure_slug_free(&dto.slug, None).await?;

        if let Some(parent_id) = dto.parent_id {
            self.ensure_parent_exists(parent_id).await?;
        }

        let category = sqlx::query_as::<_, Category>(&format!(
            r#"
            INSERT INTO categories (parent_id, name, slug, description, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(dto.parent_id)
        .bind(&dto.name)
        .bind(&dto.slug)
        .bind(&dto.description)
        .bind(dto.sort_order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create category: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Category created: id={}, slug={}", category.id, category.slug);
        Ok(category.into())
    }

    pub async fn update(
        &self,
        category_id: Uuid,
        dto: UpdateCategoryDto,
    ) -> Result<CategoryResponseDto> {
        let existing = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        if let Some(parent_id) = dto.parent_id {
            if parent_id == category_id {
                return Err(AppError::Validation(
                    "A category cannot be its own parent".to_string(),
                ));
            }
            self.ensure_parent_exists(parent_id).await?;
        }

        let category = sqlx::query_as::<_, Category>(&format!(
            r#"
            UPDATE categories SET
                parent_id = $2, name = $3, description = $4,
                is_active = $5, sort_order = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(category_id)
        .bind(dto.parent_id.or(existing.parent_id))
        .bind(dto.name.as_ref().unwrap_or(&existing.name))
        .bind(dto.description.as_ref().or(existing.description.as_ref()))
        .bind(dto.is_active.unwrap_or(existing.is_active))
        .bind(dto.sort_order.unwrap_or(existing.sort_order))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update category: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(category.into())
    }

    async fn find_active(&self, slug: &str) -> Result<Category> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE slug = $1 AND is_active = TRUE"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load category by slug: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", slug)))
    }

    async fn ensure_slug_free(&self, slug: &str, exclude: Option<Uuid>) -> Result<()> {
        let taken: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM categories WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2)",
        )
        .bind(slug)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if taken > 0 {
            return Err(AppError::Conflict(format!(
                "A category with slug '{}' already exists",
                slug
            )));
        }
        Ok(())
    }

    async fn ensure_parent_exists(&self, parent_id: Uuid) -> Result<()> {
        let found: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE id = $1")
            .bind(parent_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if found == 0 {
            return Err(AppError::Validation(
                "Parent category does not exist".to_string(),
            ));
        }
        Ok(())
    }
}
