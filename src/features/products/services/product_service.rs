use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::products::dtos::{
    BulkAction, BulkUpdateDto, BulkUpdateResultDto, CreateProductDto, DeleteOutcomeDto, ImageDto,
    ProductDetailDto, ProductFilterQuery, ProductListItemDto, ProductSearchItemDto,
    SpecificationDto, UpdateProductDto,
};
use crate::features::products::models::{Product, ProductImage, ProductListRow, ProductSpecification};
use crate::shared::pricing;
use crate::shared::types::PaginationQuery;

const SEARCH_DEFAULT_LIMIT: i64 = 10;
const SEARCH_MAX_LIMIT: i64 = 25;

const PRODUCT_COLUMNS: &str = "id, name, slug, description, price, discount_price, sku, brand, \
     category_id, stock_quantity, is_active, is_featured, is_offer_product, \
     offer_type, offer_start_date, offer_end_date, created_at, updated_at";

/// Catalog queries plus the admin-side write operations.
pub struct ProductService {
    pool: PgPool,
}

impl ProductService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filters: &ProductFilterQuery,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<ProductListItemDto>, i64)> {
        let mut count = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM products p WHERE p.is_active = TRUE",
        );
        push_filters(&mut count, filters);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count products: {:?}", e);
                AppError::Database(e)
            })?;

        let mut query = QueryBuilder::<Postgres>::new(
            r#"
            SELECT p.id, p.name, p.slug, p.price, p.discount_price, p.sku, p.brand,
                   p.category_id, p.stock_quantity, p.is_featured,
                   (SELECT i.url FROM product_images i
                    WHERE i.product_id = p.id
                    ORDER BY i.is_primary DESC, i.sort_order ASC
                    LIMIT 1) AS primary_image
            FROM products p
            WHERE p.is_active = TRUE
            "#,
        );
        push_filters(&mut query, filters);
        query.push(" ORDER BY p.created_at DESC, p.name ASC");
        query.push(" LIMIT ").push_bind(pagination.limit());
        query.push(" OFFSET ").push_bind(pagination.offset());

        let rows: Vec<ProductListRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list products: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<ProductDetailDto> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = $1 AND is_active = TRUE"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load product by slug: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Product '{}' not found", slug)))?;

        let (images, specifications) = self.load_collections(product.id).await?;
        Ok(ProductDetailDto::from_parts(product, images, specifications))
    }

    pub async fn search(&self, term: &str, limit: Option<i64>) -> Result<Vec<ProductSearchItemDto>> {
        let limit = limit.unwrap_or(SEARCH_DEFAULT_LIMIT).clamp(1, SEARCH_MAX_LIMIT);
        let pattern = format!("%{}%", term.trim());

        let rows = sqlx::query_as::<_, ProductSearchItemDto>(
            r#"
            SELECT id, name, slug, price, discount_price, brand
            FROM products
            WHERE is_active = TRUE
              AND (name ILIKE $1 OR brand ILIKE $1 OR sku ILIKE $1)
            ORDER BY name ASC
            LIMIT $2
            "#,
        )
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to search products: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows)
    }

    /// Offer products whose stored window (when both bounds are set)
    /// contains the current time.
    pub async fn list_offers(
        &self,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<ProductListItemDto>, i64)> {
        const WINDOW: &str = "(p.offer_start_date IS NULL OR p.offer_end_date IS NULL \
             OR NOW() BETWEEN p.offer_start_date AND p.offer_end_date)";

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM products p \
             WHERE p.is_active = TRUE AND p.is_offer_product = TRUE AND {WINDOW}"
        ))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count offer products: {:?}", e);
            AppError::Database(e)
        })?;

        let rows = sqlx::query_as::<_, ProductListRow>(&format!(
            r#"
            SELECT p.id, p.name, p.slug, p.price, p.discount_price, p.sku, p.brand,
                   p.category_id, p.stock_quantity, p.is_featured,
                   (SELECT i.url FROM product_images i
                    WHERE i.product_id = p.id
                    ORDER BY i.is_primary DESC, i.sort_order ASC
                    LIMIT 1) AS primary_image
            FROM products p
            WHERE p.is_active = TRUE AND p.is_offer_product = TRUE AND {WINDOW}
            ORDER BY p.created_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list offer products: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    pub async fn create(&self, dto: CreateProductDto) -> Result<ProductDetailDto> {
        validate_discount(dto.price, dto.discount_price)?;
        self.ensure_slug_free(&dto.slug, None).await?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products
                (name, slug, description, price, discount_price, sku, brand, category_id,
                 stock_quantity, is_featured, is_offer_product, offer_type,
                 offer_start_date, offer_end_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&dto.name)
        .bind(&dto.slug)
        .bind(&dto.description)
        .bind(dto.price)
        .bind(dto.discount_price)
        .bind(&dto.sku)
        .bind(&dto.brand)
        .bind(dto.category_id)
        .bind(dto.stock_quantity)
        .bind(dto.is_featured)
        .bind(dto.is_offer_product)
        .bind(&dto.offer_type)
        .bind(dto.offer_start_date)
        .bind(dto.offer_end_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create product: {:?}", e);
            AppError::Database(e)
        })?;

        insert_images(&mut tx, product.id, &dto.images).await?;
        insert_specifications(&mut tx, product.id, &dto.specifications).await?;

        tx.commit().await.map_err(AppError::Database)?;
        tracing::info!("Product created: id={}, slug={}", product.id, product.slug);

        let (images, specifications) = self.load_collections(product.id).await?;
        Ok(ProductDetailDto::from_parts(product, images, specifications))
    }

    pub async fn update(&self, product_id: Uuid, dto: UpdateProductDto) -> Result<ProductDetailDto> {
        if let Some(slug) = &dto.slug {
            self.ensure_slug_free(slug, Some(product_id)).await?;
        }

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let existing = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 FOR UPDATE"
        ))
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load product for update: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        let price = dto.price.unwrap_or(existing.price);
        let discount_price = if dto.clear_discount {
            None
        } else {
            dto.discount_price.or(existing.discount_price)
        };
        validate_discount(price, discount_price)?;

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products SET
                name = $2, slug = $3, description = $4, price = $5, discount_price = $6,
                sku = $7, brand = $8, category_id = $9, stock_quantity = $10,
                is_active = $11, is_featured = $12, is_offer_product = $13,
                offer_type = $14, offer_start_date = $15, offer_end_date = $16,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(product_id)
        .bind(dto.name.as_ref().unwrap_or(&existing.name))
        .bind(dto.slug.as_ref().unwrap_or(&existing.slug))
        .bind(dto.description.as_ref().or(existing.description.as_ref()))
        .bind(price)
        .bind(discount_price)
        .bind(dto.sku.as_ref().unwrap_or(&existing.sku))
        .bind(dto.brand.as_ref().unwrap_or(&existing.brand))
        .bind(dto.category_id.unwrap_or(existing.category_id))
        .bind(dto.stock_quantity.unwrap_or(existing.stock_quantity))
        .bind(dto.is_active.unwrap_or(existing.is_active))
        .bind(dto.is_featured.unwrap_or(existing.is_featured))
        .bind(dto.is_offer_product.unwrap_or(existing.is_offer_product))
        .bind(dto.offer_type.as_ref().or(existing.offer_type.as_ref()))
        .bind(dto.offer_start_date.or(existing.offer_start_date))
        .bind(dto.offer_end_date.or(existing.offer_end_date))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update product: {:?}", e);
            AppError::Database(e)
        })?;

        // Image/specification sets are replaced wholesale when present
        if let Some(images) = &dto.images {
            sqlx::query("DELETE FROM product_images WHERE product_id = $1")
                .bind(product_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            insert_images(&mut tx, product_id, images).await?;
        }
        if let Some(specifications) = &dto.specifications {
            sqlx::query("DELETE FROM product_specifications WHERE product_id = $1")
                .bind(product_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            insert_specifications(&mut tx, product_id, specifications).await?;
        }

        tx.commit().await.map_err(AppError::Database)?;

        let (images, specifications) = self.load_collections(product_id).await?;
        Ok(ProductDetailDto::from_parts(product, images, specifications))
    }

    /// Soft-deletes when historical order items reference the product,
    /// otherwise removes the row together with its reviews and build items.
    pub async fn delete(&self, product_id: Uuid) -> Result<DeleteOutcomeDto> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if exists == 0 {
            return Err(AppError::NotFound("Product not found".to_string()));
        }

        let order_refs: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE product_id = $1")
                .bind(product_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?;

        let outcome = if order_refs > 0 {
            sqlx::query(
                "UPDATE products SET is_active = FALSE, is_featured = FALSE, updated_at = NOW() \
                 WHERE id = $1",
            )
            .bind(product_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

            DeleteOutcomeDto::SoftDelete {
                reason: format!("Product is referenced by {} order item(s)", order_refs),
            }
        } else {
            sqlx::query("DELETE FROM reviews WHERE product_id = $1")
                .bind(product_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            sqlx::query("DELETE FROM pc_build_items WHERE product_id = $1")
                .bind(product_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            // Images and specifications cascade with the row
            sqlx::query("DELETE FROM products WHERE id = $1")
                .bind(product_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;

            DeleteOutcomeDto::HardDelete
        };

        tx.commit().await.map_err(AppError::Database)?;
        tracing::info!("Product deleted: id={}, outcome={:?}", product_id, outcome);
        Ok(outcome)
    }

    pub async fn bulk_update(&self, dto: BulkUpdateDto) -> Result<BulkUpdateResultDto> {
        if dto.product_ids.is_empty() {
            return Err(AppError::Validation(
                "At least one product id is required".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let result = match dto.action {
            BulkAction::Activate => {
                set_flag(&mut tx, &dto.product_ids, "is_active", true).await?
            }
            BulkAction::Deactivate => {
                set_flag(&mut tx, &dto.product_ids, "is_active", false).await?
            }
            BulkAction::Feature => {
                set_flag(&mut tx, &dto.product_ids, "is_featured", true).await?
            }
            BulkAction::Unfeature => {
                set_flag(&mut tx, &dto.product_ids, "is_featured", false).await?
            }
            BulkAction::UpdateCategory => {
                let category_id = dto.category_id.ok_or_else(|| {
                    AppError::Validation("category_id is required for update_category".to_string())
                })?;
                sqlx::query(
                    "UPDATE products SET category_id = $2, updated_at = NOW() \
                     WHERE id = ANY($1)",
                )
                .bind(&dto.product_ids)
                .bind(category_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?
            }
            BulkAction::UpdateStock => {
                let stock = dto.stock_quantity.ok_or_else(|| {
                    AppError::Validation("stock_quantity is required for update_stock".to_string())
                })?;
                if stock < 0 {
                    return Err(AppError::Validation(
                        "stock_quantity must not be negative".to_string(),
                    ));
                }
                sqlx::query(
                    "UPDATE products SET stock_quantity = $2, updated_at = NOW() \
                     WHERE id = ANY($1)",
                )
                .bind(&dto.product_ids)
                .bind(stock)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?
            }
            BulkAction::ApplyDiscount => {
                let pct = dto.discount_percent.ok_or_else(|| {
                    AppError::Validation(
                        "discount_percent is required for apply_discount".to_string(),
                    )
                })?;
                if !pricing::is_valid_discount_percent(pct) {
                    return Err(AppError::Validation(
                        "discount_percent must be between 0 and 100 exclusive".to_string(),
                    ));
                }
                // Always derived from the current list price. Rows where the
                // rounded result would not sit strictly below the list price
                // (tiny percentages on low-priced items) are left untouched.
                sqlx::query(
                    "UPDATE products \
                     SET discount_price = ROUND(price * (1 - $2 / 100), 2), updated_at = NOW() \
                     WHERE id = ANY($1) AND ROUND(price * (1 - $2 / 100), 2) < price",
                )
                .bind(&dto.product_ids)
                .bind(pct)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?
            }
            BulkAction::RemoveDiscount => {
                sqlx::query(
                    "UPDATE products SET discount_price = NULL, updated_at = NOW() \
                     WHERE id = ANY($1)",
                )
                .bind(&dto.product_ids)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?
            }
            BulkAction::Delete => {
                sqlx::query(
                    "UPDATE products \
                     SET is_active = FALSE, is_featured = FALSE, updated_at = NOW() \
                     WHERE id = ANY($1)",
                )
                .bind(&dto.product_ids)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?
            }
        };

        tx.commit().await.map_err(AppError::Database)?;

        let updated = result.rows_affected();
        tracing::info!(
            "Bulk product update: action={:?}, requested={}, updated={}",
            dto.action,
            dto.product_ids.len(),
            updated
        );

        Ok(BulkUpdateResultDto {
            requested: dto.product_ids.len(),
            updated,
        })
    }

    /// Admin view: includes inactive (soft-deleted) products.
    pub async fn get_admin(&self, product_id: Uuid) -> Result<ProductDetailDto> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load product: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        let (images, specifications) = self.load_collections(product.id).await?;
        Ok(ProductDetailDto::from_parts(product, images, specifications))
    }

    async fn ensure_slug_free(&self, slug: &str, exclude: Option<Uuid>) -> Result<()> {
        let taken: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2)",
        )
        .bind(slug)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if taken > 0 {
            return Err(AppError::Conflict(format!(
                "A product with slug '{}' already exists",
                slug
            )));
        }
        Ok(())
    }

    async fn load_collections(
        &self,
        product_id: Uuid,
    ) -> Result<(Vec<ProductImage>, Vec<ProductSpecification>)> {
        let images = sqlx::query_as::<_, ProductImage>(
            "SELECT id, product_id, url, alt_text, is_primary, sort_order \
             FROM product_images WHERE product_id = $1 \
             ORDER BY is_primary DESC, sort_order ASC",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let specifications = sqlx::query_as::<_, ProductSpecification>(
            "SELECT id, product_id, spec_key, spec_value, sort_order \
             FROM product_specifications WHERE product_id = $1 \
             ORDER BY sort_order ASC, spec_key ASC",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok((images, specifications))
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filters: &ProductFilterQuery) {
    if let Some(category) = filters.category {
        query.push(" AND p.category_id = ").push_bind(category);
    }
    if let Some(brand) = &filters.brand {
        query.push(" AND p.brand ILIKE ").push_bind(brand.clone());
    }
    if let Some(featured) = filters.featured {
        query.push(" AND p.is_featured = ").push_bind(featured);
    }
    if let Some(search) = &filters.search {
        let pattern = format!("%{}%", search.trim());
        query
            .push(" AND (p.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.brand ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.sku ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

async fn set_flag(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    product_ids: &[Uuid],
    column: &str,
    value: bool,
) -> Result<sqlx::postgres::PgQueryResult> {
    // `column` is a compile-time literal chosen by the BulkAction match
    sqlx::query(&format!(
        "UPDATE products SET {column} = $2, updated_at = NOW() WHERE id = ANY($1)"
    ))
    .bind(product_ids)
    .bind(value)
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        tracing::error!("Bulk flag update failed: {:?}", e);
        AppError::Database(e)
    })
}

fn validate_discount(price: Decimal, discount_price: Option<Decimal>) -> Result<()> {
    if let Some(discount) = discount_price {
        if discount <= Decimal::ZERO || discount >= price {
            return Err(AppError::Validation(
                "Discount price must be positive and below the list price".to_string(),
            ));
        }
    }
    Ok(())
}

async fn insert_images(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    product_id: Uuid,
    images: &[ImageDto],
) -> Result<()> {
    for image in images {
        sqlx::query(
            "INSERT INTO product_images (product_id, url, alt_text, is_primary, sort_order) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(product_id)
        .bind(&image.url)
        .bind(&image.alt_text)
        .bind(image.is_primary)
        .bind(image.sort_order)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert product image: {:?}", e);
            AppError::Database(e)
        })?;
    }
    Ok(())
}

async fn insert_specifications(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    product_id: Uuid,
    specifications: &[SpecificationDto],
) -> Result<()> {
    for spec in specifications {
        sqlx::query(
            "INSERT INTO product_specifications (product_id, spec_key, spec_value, sort_order) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(product_id)
        .bind(&spec.key)
        .bind(&spec.value)
        .bind(spec.sort_order)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert product specification: {:?}", e);
            AppError::Database(e)
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn discount_must_sit_below_list_price() {
        assert!(validate_discount(dec("1000"), None).is_ok());
        assert!(validate_discount(dec("1000"), Some(dec("800"))).is_ok());
        assert!(validate_discount(dec("1000"), Some(dec("1000"))).is_err());
        assert!(validate_discount(dec("1000"), Some(dec("1200"))).is_err());
        assert!(validate_discount(dec("1000"), Some(dec("0"))).is_err());
    }

    async fn seed_category(pool: &PgPool) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO categories (name, slug) VALUES ('Components', 'components') RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn seed_product(pool: &PgPool, category_id: Uuid, slug: &str, price: &str) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO products (name, slug, price, sku, brand, category_id, stock_quantity) \
             VALUES ($1, $1, $2, $1, 'Acme', $3, 10) RETURNING id",
        )
        .bind(slug)
        .bind(dec(price))
        .bind(category_id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn seed_order_item_for(pool: &PgPool, product_id: Uuid) {
        let order_id: Uuid = sqlx::query_scalar(
            "INSERT INTO orders (order_number, customer_name, customer_email, customer_mobile, \
             address, district, payment_method, delivery_method, subtotal, total) \
             VALUES ('ORD-20250901-0000aa', 'Test Shopper', 'shopper@example.com', '01700000000', \
             '12 Road', 'Dhaka', 'cod', 'courier', 12000, 12060) RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, product_name, product_slug, \
             quantity, unit_price, total) VALUES ($1, $2, 'gtx-1060', 'gtx-1060', 1, 12000, 12000)",
        )
        .bind(order_id)
        .bind(product_id)
        .execute(pool)
        .await
        .unwrap();
    }

    #[sqlx::test]
    async fn delete_soft_deletes_order_referenced_product(pool: PgPool) {
        let service = ProductService::new(pool.clone());
        let category_id = seed_category(&pool).await;
        let product_id = seed_product(&pool, category_id, "gtx-1060", "12000").await;
        seed_order_item_for(&pool, product_id).await;

        let outcome = service.delete(product_id).await.unwrap();
        assert!(matches!(outcome, DeleteOutcomeDto::SoftDelete { .. }));

        // The row survives and stays reachable through the admin view
        let detail = service.get_admin(product_id).await.unwrap();
        assert!(!detail.is_active);
        assert!(!detail.is_featured);
    }

    #[sqlx::test]
    async fn delete_hard_deletes_unreferenced_product_with_collections(pool: PgPool) {
        let service = ProductService::new(pool.clone());
        let category_id = seed_category(&pool).await;
        let product_id = seed_product(&pool, category_id, "rtx-4090", "250000").await;
        sqlx::query("INSERT INTO product_images (product_id, url) VALUES ($1, 'https://cdn.example.com/rtx.jpg')")
            .bind(product_id)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO product_specifications (product_id, spec_key, spec_value) VALUES ($1, 'VRAM', '24 GB')")
            .bind(product_id)
            .execute(&pool)
            .await
            .unwrap();

        let outcome = service.delete(product_id).await.unwrap();
        assert!(matches!(outcome, DeleteOutcomeDto::HardDelete));

        assert!(matches!(
            service.get_admin(product_id).await,
            Err(AppError::NotFound(_))
        ));
        let images: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM product_images WHERE product_id = $1")
                .bind(product_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        let specifications: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM product_specifications WHERE product_id = $1")
                .bind(product_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(images, 0);
        assert_eq!(specifications, 0);
    }

    #[sqlx::test]
    async fn bulk_discount_skips_rows_where_rounding_reaches_list_price(pool: PgPool) {
        let service = ProductService::new(pool.clone());
        let category_id = seed_category(&pool).await;
        let product_id = seed_product(&pool, category_id, "sata-cable", "1000").await;

        // 0.0001% of 1000 rounds back to 1000.00, which would violate
        // discount < price; the row must be skipped, not clamped up.
        let result = service
            .bulk_update(BulkUpdateDto {
                product_ids: vec![product_id],
                action: BulkAction::ApplyDiscount,
                category_id: None,
                stock_quantity: None,
                discount_percent: Some(dec("0.0001")),
            })
            .await
            .unwrap();
        assert_eq!(result.updated, 0);

        let discount: Option<Decimal> =
            sqlx::query_scalar("SELECT discount_price FROM products WHERE id = $1")
                .bind(product_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(discount, None);

        // A sane percentage still applies, derived from the list price
        let result = service
            .bulk_update(BulkUpdateDto {
                product_ids: vec![product_id],
                action: BulkAction::ApplyDiscount,
                category_id: None,
                stock_quantity: None,
                discount_percent: Some(dec("20")),
            })
            .await
            .unwrap();
        assert_eq!(result.updated, 1);

        let discount: Option<Decimal> =
            sqlx::query_scalar("SELECT discount_price FROM products WHERE id = $1")
                .bind(product_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(discount, Some(dec("800.00")));
    }
}
