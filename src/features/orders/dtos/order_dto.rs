use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::orders::models::{Order, OrderItem, OrderStatus, PaymentStatus};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderItemDto {
    pub product_id: Uuid,
    pub quantity: i32,
    /// Line and order totals are recomputed server-side from this price;
    /// client-submitted totals are never trusted.
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderDto {
    #[validate(length(min = 1, max = 200, message = "Customer name is required"))]
    pub customer_name: String,

    #[validate(email(message = "A valid email is required"))]
    pub customer_email: String,

    #[validate(length(min = 1, max = 20, message = "Mobile number is required"))]
    pub customer_mobile: String,

    #[validate(length(min = 1, max = 500, message = "Address is required"))]
    pub address: String,

    #[validate(length(min = 1, max = 100, message = "District is required"))]
    pub district: String,

    pub upazilla: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Payment method is required"))]
    pub payment_method: String,

    #[validate(length(min = 1, max = 50, message = "Delivery method is required"))]
    pub delivery_method: String,

    pub delivery_charge: Decimal,

    pub items: Vec<CreateOrderItemDto>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderItemDto {
    pub product_id: Uuid,
    pub product_name: String,
    pub product_slug: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total: Decimal,
}

impl From<OrderItem> for OrderItemDto {
    fn from(i: OrderItem) -> Self {
        Self {
            product_id: i.product_id,
            product_name: i.product_name,
            product_slug: i.product_slug,
            quantity: i.quantity,
            unit_price: i.unit_price,
            total: i.total,
        }
    }
}

/// Full order view with line items.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderResponseDto {
    pub id: Uuid,
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_mobile: String,
    pub address: String,
    pub district: String,
    pub upazilla: Option<String>,
    pub payment_method: String,
    pub delivery_method: String,
    pub delivery_charge: Decimal,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemDto>,
}

impl OrderResponseDto {
    pub fn from_parts(order: Order, items: Vec<OrderItem>) -> Self {
        Self {
            id: order.id,
            order_number: order.order_number,
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            customer_mobile: order.customer_mobile,
            address: order.address,
            district: order.district,
            upazilla: order.upazilla,
            payment_method: order.payment_method,
            delivery_method: order.delivery_method,
            delivery_charge: order.delivery_charge,
            subtotal: order.subtotal,
            total: order.total,
            status: order.status,
            payment_status: order.payment_status,
            created_at: order.created_at,
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

/// List row without items.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderSummaryDto {
    pub id: Uuid,
    pub order_number: String,
    pub customer_name: String,
    pub total: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderSummaryDto {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            order_number: o.order_number,
            customer_name: o.customer_name,
            total: o.total,
            status: o.status,
            payment_status: o.payment_status,
            created_at: o.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct OrderFilterQuery {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    /// Match against order number or customer email
    pub search: Option<String>,
}

/// Free-form status update; at least one field must be present.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusDto {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}
