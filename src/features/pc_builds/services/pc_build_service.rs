use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::pc_builds::dtos::{CreatePcBuildDto, PcBuildResponseDto, PcBuildSummaryDto};
use crate::features::pc_builds::models::{PcBuild, PcBuildItemRow};
use crate::shared::types::PaginationQuery;

const BUILD_COLUMNS: &str = "id, user_id, name, is_public, created_at, updated_at";

const ITEM_ROW_QUERY: &str = r#"
    SELECT bi.id, bi.build_id, bi.product_id, bi.component_slot, bi.quantity,
           p.name AS product_name, p.slug AS product_slug, p.price, p.discount_price
    FROM pc_build_items bi
    JOIN products p ON p.id = bi.product_id
    WHERE bi.build_id = $1
    ORDER BY bi.component_slot ASC, bi.id
"#;

pub struct PcBuildService {
    pool: PgPool,
}

impl PcBuildService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build and items in one transaction; every component must reference
    /// an active product.
    pub async fn create(&self, user_id: Uuid, dto: CreatePcBuildDto) -> Result<PcBuildResponseDto> {
        if dto.items.is_empty() {
            return Err(AppError::Validation(
                "A build must contain at least one component".to_string(),
            ));
        }

        let product_ids: Vec<Uuid> = dto.items.iter().map(|i| i.product_id).collect();
        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT id) FROM products WHERE id = ANY($1) AND is_active = TRUE",
        )
        .bind(&product_ids)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let distinct: std::collections::HashSet<Uuid> = product_ids.iter().copied().collect();
        if active != distinct.len() as i64 {
            return Err(AppError::Validation(
                "One or more components reference unavailable products".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let build = sqlx::query_as::<_, PcBuild>(&format!(
            r#"
            INSERT INTO pc_builds (user_id, name, is_public)
            VALUES ($1, $2, $3)
            RETURNING {BUILD_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&dto.name)
        .bind(dto.is_public)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create build: {:?}", e);
            AppError::Database(e)
        })?;

        for item in &dto.items {
            sqlx::query(
                "INSERT INTO pc_build_items (build_id, product_id, component_slot, quantity) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(build.id)
            .bind(item.product_id)
            .bind(&item.component_slot)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create build item: {:?}", e);
                AppError::Database(e)
            })?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        tracing::info!("Build created: id={}, user={}", build.id, user_id);

        let items = self.load_items(build.id).await?;
        Ok(PcBuildResponseDto::from_parts(build, items))
    }

    pub async fn list_mine(
        &self,
        user_id: Uuid,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<PcBuildSummaryDto>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pc_builds WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let builds: Vec<(Uuid, String, bool, i64, chrono::DateTime<chrono::Utc>)> = sqlx::query_as(
            r#"
            SELECT b.id, b.name, b.is_public,
                   (SELECT COUNT(*) FROM pc_build_items i WHERE i.build_id = b.id) AS item_count,
                   b.created_at
            FROM pc_builds b
            WHERE b.user_id = $1
            ORDER BY b.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list builds: {:?}", e);
            AppError::Database(e)
        })?;

        let builds = builds
            .into_iter()
            .map(|(id, name, is_public, item_count, created_at)| PcBuildSummaryDto {
                id,
                name,
                is_public,
                item_count,
                created_at,
            })
            .collect();

        Ok((builds, total))
    }

    /// Owner-scoped; a non-owner gets `NotFound`.
    pub async fn get(&self, build_id: Uuid, user_id: Uuid) -> Result<PcBuildResponseDto> {
        let build = self.load_owned(build_id, user_id).await?;
        let items = self.load_items(build_id).await?;
        Ok(PcBuildResponseDto::from_parts(build, items))
    }

    pub async fn delete(&self, build_id: Uuid, user_id: Uuid) -> Result<()> {
        self.load_owned(build_id, user_id).await?;

        // items cascade with the build row
        sqlx::query("DELETE FROM pc_builds WHERE id = $1")
            .bind(build_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete build: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!("Build deleted: id={}, user={}", build_id, user_id);
        Ok(())
    }

    async fn load_owned(&self, build_id: Uuid, user_id: Uuid) -> Result<PcBuild> {
        let build = sqlx::query_as::<_, PcBuild>(&format!(
            "SELECT {BUILD_COLUMNS} FROM pc_builds WHERE id = $1"
        ))
        .bind(build_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Build not found".to_string()))?;

        if build.user_id != user_id {
            return Err(AppError::NotFound("Build not found".to_string()));
        }
        Ok(build)
    }

    async fn load_items(&self, build_id: Uuid) -> Result<Vec<PcBuildItemRow>> {
        sqlx::query_as::<_, PcBuildItemRow>(ITEM_ROW_QUERY)
            .bind(build_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
