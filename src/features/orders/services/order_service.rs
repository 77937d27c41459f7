use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::orders::dtos::{
    CreateOrderDto, OrderFilterQuery, OrderResponseDto, OrderSummaryDto, UpdateOrderStatusDto,
};
use crate::features::orders::models::{Order, OrderItem, OrderStatus, PaymentStatus};
use crate::shared::constants::ORDER_CANCELLATION_WINDOW_MINUTES;
use crate::shared::types::PaginationQuery;

const ORDER_COLUMNS: &str = "id, order_number, user_id, customer_name, customer_email, \
     customer_mobile, address, district, upazilla, payment_method, delivery_method, \
     delivery_charge, subtotal, total, status, payment_status, payment_ref_id, \
     payment_metadata, created_at, updated_at";

const ITEM_COLUMNS: &str =
    "id, order_id, product_id, product_name, product_slug, quantity, unit_price, total";

/// Checkout, customer order access and the admin order views.
pub struct OrderService {
    pool: PgPool,
}

impl OrderService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the order and all items in one transaction. Amounts are
    /// recomputed server-side; stock is not decremented at checkout.
    pub async fn create(
        &self,
        user_id: Option<Uuid>,
        dto: CreateOrderDto,
    ) -> Result<OrderResponseDto> {
        if dto.items.is_empty() {
            return Err(AppError::Validation(
                "An order must contain at least one item".to_string(),
            ));
        }
        for item in &dto.items {
            if item.quantity <= 0 {
                return Err(AppError::Validation(
                    "Item quantity must be positive".to_string(),
                ));
            }
            if item.unit_price <= Decimal::ZERO {
                return Err(AppError::Validation(
                    "Item price must be positive".to_string(),
                ));
            }
        }
        if dto.delivery_charge < Decimal::ZERO {
            return Err(AppError::Validation(
                "Delivery charge must not be negative".to_string(),
            ));
        }

        let (subtotal, total) = compute_totals(&dto.items, dto.delivery_charge);
        let order_number = generate_order_number(Utc::now());

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders
                (order_number, user_id, customer_name, customer_email, customer_mobile,
                 address, district, upazilla, payment_method, delivery_method,
                 delivery_charge, subtotal, total)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(&order_number)
        .bind(user_id)
        .bind(&dto.customer_name)
        .bind(&dto.customer_email)
        .bind(&dto.customer_mobile)
        .bind(&dto.address)
        .bind(&dto.district)
        .bind(&dto.upazilla)
        .bind(&dto.payment_method)
        .bind(&dto.delivery_method)
        .bind(dto.delivery_charge)
        .bind(subtotal)
        .bind(total)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create order: {:?}", e);
            AppError::Database(e)
        })?;

        let mut items = Vec::with_capacity(dto.items.len());
        for item in &dto.items {
            // Snapshot the product name/slug at checkout time
            let product: Option<(String, String)> = sqlx::query_as(
                "SELECT name, slug FROM products WHERE id = $1 AND is_active = TRUE",
            )
            .bind(item.product_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;

            let (product_name, product_slug) = product.ok_or_else(|| {
                AppError::Validation(format!("Product {} is not available", item.product_id))
            })?;

            let line_total = item.unit_price * Decimal::from(item.quantity);
            let inserted = sqlx::query_as::<_, OrderItem>(&format!(
                r#"
                INSERT INTO order_items
                    (order_id, product_id, product_name, product_slug, quantity, unit_price, total)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING {ITEM_COLUMNS}
                "#
            ))
            .bind(order.id)
            .bind(item.product_id)
            .bind(&product_name)
            .bind(&product_slug)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(line_total)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create order item: {:?}", e);
                AppError::Database(e)
            })?;
            items.push(inserted);
        }

        tx.commit().await.map_err(AppError::Database)?;
        tracing::info!(
            "Order created: id={}, number={}, total={}",
            order.id,
            order.order_number,
            order.total
        );

        Ok(OrderResponseDto::from_parts(order, items))
    }

    /// Owner-scoped fetch. A non-owner gets `NotFound`, never `Forbidden`,
    /// so order ids cannot be probed.
    pub async fn get(&self, order_id: Uuid, user_id: Uuid) -> Result<OrderResponseDto> {
        let order = self.load_order(order_id).await?;
        if order.user_id != Some(user_id) {
            return Err(AppError::NotFound("Order not found".to_string()));
        }
        let items = self.load_items(order_id).await?;
        Ok(OrderResponseDto::from_parts(order, items))
    }

    pub async fn list_mine(
        &self,
        user_id: Uuid,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<OrderSummaryDto>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list orders: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((orders.into_iter().map(Into::into).collect(), total))
    }

    /// Customer cancellation: hard-deletes the order and its items in one
    /// transaction when the cancellation policy allows it.
    pub async fn cancel(&self, order_id: Uuid, user_id: Uuid) -> Result<()> {
        let order = self.load_order(order_id).await?;

        if order.user_id != Some(user_id) {
            return Err(AppError::Unauthorized(
                "You can only cancel your own orders".to_string(),
            ));
        }
        check_cancellation_policy(order.created_at, order.status, Utc::now())?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        // items cascade with the order row
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to cancel order: {:?}", e);
                AppError::Database(e)
            })?;
        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!("Order cancelled: id={}, number={}", order_id, order.order_number);
        Ok(())
    }

    pub async fn list_admin(
        &self,
        filters: &OrderFilterQuery,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<OrderSummaryDto>, i64)> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM orders WHERE TRUE");
        push_order_filters(&mut count, filters);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE TRUE"
        ));
        push_order_filters(&mut query, filters);
        query.push(" ORDER BY created_at DESC");
        query.push(" LIMIT ").push_bind(pagination.limit());
        query.push(" OFFSET ").push_bind(pagination.offset());

        let orders: Vec<Order> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list orders for admin: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((orders.into_iter().map(Into::into).collect(), total))
    }

    pub async fn get_admin(&self, order_id: Uuid) -> Result<OrderResponseDto> {
        let order = self.load_order(order_id).await?;
        let items = self.load_items(order_id).await?;
        Ok(OrderResponseDto::from_parts(order, items))
    }

    /// Free-form transition: any status can follow any other.
    pub async fn update_status(
        &self,
        order_id: Uuid,
        dto: UpdateOrderStatusDto,
    ) -> Result<OrderResponseDto> {
        if dto.status.is_none() && dto.payment_status.is_none() {
            return Err(AppError::Validation(
                "At least one of status or payment_status is required".to_string(),
            ));
        }

        let existing = self.load_order(order_id).await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders SET status = $2, payment_status = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order_id)
        .bind(dto.status.unwrap_or(existing.status))
        .bind(dto.payment_status.unwrap_or(existing.payment_status))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update order status: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Order status updated: id={}, status={:?}, payment_status={:?}",
            order.id,
            order.status,
            order.payment_status
        );

        let items = self.load_items(order_id).await?;
        Ok(OrderResponseDto::from_parts(order, items))
    }

    /// Called by the payment callback after provider-side verification.
    pub async fn mark_paid(
        &self,
        order_id: Uuid,
        payment_ref_id: &str,
        metadata: serde_json::Value,
    ) -> Result<()> {
        let updated = sqlx::query(
            "UPDATE orders SET payment_status = $2, payment_ref_id = $3, \
             payment_metadata = $4, updated_at = NOW() WHERE id = $1",
        )
        .bind(order_id)
        .bind(PaymentStatus::Paid)
        .bind(payment_ref_id)
        .bind(metadata)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to mark order paid: {:?}", e);
            AppError::Database(e)
        })?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("Order not found".to_string()));
        }
        tracing::info!("Order marked paid: id={}, ref={}", order_id, payment_ref_id);
        Ok(())
    }

    pub async fn load_order(&self, order_id: Uuid) -> Result<Order> {
        sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load order: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
    }

    async fn load_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>> {
        sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id"
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}

fn push_order_filters(query: &mut QueryBuilder<'_, Postgres>, filters: &OrderFilterQuery) {
    if let Some(status) = filters.status {
        query.push(" AND status = ").push_bind(status);
    }
    if let Some(payment_status) = filters.payment_status {
        query.push(" AND payment_status = ").push_bind(payment_status);
    }
    if let Some(search) = &filters.search {
        let pattern = format!("%{}%", search.trim());
        query
            .push(" AND (order_number ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR customer_email ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

/// Server-side amounts: Σ line totals, plus the delivery charge.
fn compute_totals(
    items: &[crate::features::orders::dtos::CreateOrderItemDto],
    delivery_charge: Decimal,
) -> (Decimal, Decimal) {
    let subtotal: Decimal = items
        .iter()
        .map(|i| i.unit_price * Decimal::from(i.quantity))
        .sum();
    (subtotal, subtotal + delivery_charge)
}

/// `ORD-<yyyymmdd>-<6 hex>`, human-facing and unique-indexed.
fn generate_order_number(now: DateTime<Utc>) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..0x100_0000);
    format!("ORD-{}-{:06x}", now.format("%Y%m%d"), suffix)
}

/// Pure cancellation policy: a customer may cancel within the window and
/// only before fulfilment starts moving.
fn check_cancellation_policy(
    created_at: DateTime<Utc>,
    status: OrderStatus,
    now: DateTime<Utc>,
) -> Result<()> {
    if status.blocks_cancellation() {
        return Err(AppError::PolicyViolation(format!(
            "Orders with status '{:?}' can no longer be cancelled",
            status
        )));
    }
    if now - created_at > Duration::minutes(ORDER_CANCELLATION_WINDOW_MINUTES) {
        return Err(AppError::PolicyViolation(format!(
            "Orders can only be cancelled within {} minutes of placement",
            ORDER_CANCELLATION_WINDOW_MINUTES
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(minutes_ago: i64) -> DateTime<Utc> {
        Utc::now() - Duration::minutes(minutes_ago)
    }

    #[test]
    fn cancel_allowed_inside_window() {
        assert!(check_cancellation_policy(placed(29), OrderStatus::Pending, Utc::now()).is_ok());
        assert!(check_cancellation_policy(placed(0), OrderStatus::Confirmed, Utc::now()).is_ok());
    }

    #[test]
    fn cancel_rejected_after_window() {
        let result = check_cancellation_policy(placed(31), OrderStatus::Pending, Utc::now());
        assert!(matches!(result, Err(AppError::PolicyViolation(_))));
    }

    #[test]
    fn cancel_rejected_once_fulfilment_started() {
        for status in [
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            let result = check_cancellation_policy(placed(1), status, Utc::now());
            assert!(matches!(result, Err(AppError::PolicyViolation(_))));
        }
    }

    #[test]
    fn processing_still_cancellable_inside_window() {
        assert!(check_cancellation_policy(placed(10), OrderStatus::Processing, Utc::now()).is_ok());
    }

    #[test]
    fn totals_are_recomputed_from_lines() {
        use crate::features::orders::dtos::CreateOrderItemDto;
        use std::str::FromStr;

        let items = vec![CreateOrderItemDto {
            product_id: Uuid::from_u128(1),
            quantity: 2,
            unit_price: Decimal::from_str("1000").unwrap(),
        }];
        let (subtotal, total) = compute_totals(&items, Decimal::from_str("60").unwrap());
        assert_eq!(subtotal, Decimal::from_str("2000").unwrap());
        assert_eq!(total, Decimal::from_str("2060").unwrap());
    }

    #[test]
    fn order_number_shape() {
        let number = generate_order_number(Utc::now());
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ORD");
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 6);
        assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
    }

    use crate::features::orders::dtos::CreateOrderItemDto;
    use std::str::FromStr;

    async fn seed_user(pool: &PgPool) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO users (email, password_hash, first_name, last_name) \
             VALUES ('shopper@example.com', 'x', 'Test', 'Shopper') RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn seed_product(pool: &PgPool) -> Uuid {
        let category_id: Uuid = sqlx::query_scalar(
            "INSERT INTO categories (name, slug) VALUES ('Components', 'components') RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap();
        sqlx::query_scalar(
            "INSERT INTO products (name, slug, price, sku, brand, category_id, stock_quantity) \
             VALUES ('RAM Stick', 'ram-stick', 1000, 'RAM-01', 'Acme', $1, 10) RETURNING id",
        )
        .bind(category_id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn checkout_dto(product_id: Uuid) -> CreateOrderDto {
        CreateOrderDto {
            customer_name: "Test Shopper".to_string(),
            customer_email: "shopper@example.com".to_string(),
            customer_mobile: "01700000000".to_string(),
            address: "12 Road".to_string(),
            district: "Dhaka".to_string(),
            upazilla: None,
            payment_method: "cod".to_string(),
            delivery_method: "courier".to_string(),
            delivery_charge: Decimal::from_str("60").unwrap(),
            items: vec![CreateOrderItemDto {
                product_id,
                quantity: 2,
                unit_price: Decimal::from_str("1000").unwrap(),
            }],
        }
    }

    #[sqlx::test]
    async fn fresh_order_cancels_and_disappears_with_its_items(pool: PgPool) {
        let service = OrderService::new(pool.clone());
        let user_id = seed_user(&pool).await;
        let product_id = seed_product(&pool).await;

        let order = service
            .create(Some(user_id), checkout_dto(product_id))
            .await
            .unwrap();
        assert_eq!(order.subtotal, Decimal::from_str("2000").unwrap());
        assert_eq!(order.total, Decimal::from_str("2060").unwrap());

        // A just-placed order is well inside the cancellation window
        service.cancel(order.id, user_id).await.unwrap();

        assert!(matches!(
            service.get(order.id, user_id).await,
            Err(AppError::NotFound(_))
        ));
        let items: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE order_id = $1")
                .bind(order.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(items, 0);
    }

    #[sqlx::test]
    async fn guest_checkout_stores_order_without_account(pool: PgPool) {
        let service = OrderService::new(pool.clone());
        let product_id = seed_product(&pool).await;

        let order = service.create(None, checkout_dto(product_id)).await.unwrap();

        let owner: Option<Uuid> =
            sqlx::query_scalar("SELECT user_id FROM orders WHERE id = $1")
                .bind(order.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(owner, None);
    }
}
