use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::orders::dtos::{
    CreateOrderDto, OrderFilterQuery, OrderResponseDto, OrderSummaryDto, UpdateOrderStatusDto,
};
use crate::features::orders::services::OrderService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Place an order. Guests may order without a token; a token attaches the
/// order to the account for later listing and cancellation.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderDto,
    responses(
        (status = 200, description = "Order placed", body = ApiResponse<OrderResponseDto>),
        (status = 400, description = "Validation error")
    ),
    security((), ("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn create_order(
    State(service): State<Arc<OrderService>>,
    user: Option<AuthenticatedUser>,
    AppJson(dto): AppJson<CreateOrderDto>,
) -> Result<Json<ApiResponse<OrderResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let order = service.create(user.map(|u| u.user_id), dto).await?;
    Ok(Json(ApiResponse::success(
        Some(order),
        Some("Order placed".to_string()),
        None,
    )))
}

/// Orders of the authenticated user, newest first
#[utoipa::path(
    get,
    path = "/api/orders",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Order page", body = ApiResponse<Vec<OrderSummaryDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn list_my_orders(
    State(service): State<Arc<OrderService>>,
    user: AuthenticatedUser,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<OrderSummaryDto>>>> {
    let (orders, total) = service.list_mine(user.user_id, &pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(orders),
        None,
        Some(Meta { total }),
    )))
}

/// Single order, owner only
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order detail", body = ApiResponse<OrderResponseDto>),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn get_order(
    State(service): State<Arc<OrderService>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OrderResponseDto>>> {
    let order = service.get(id, user.user_id).await?;
    Ok(Json(ApiResponse::success(Some(order), None, None)))
}

/// Cancel an order within the cancellation window
#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order cancelled"),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Outside the cancellation window or already fulfilled")
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn cancel_order(
    State(service): State<Arc<OrderService>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.cancel(id, user.user_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Order cancelled".to_string()),
        None,
    )))
}

/// All orders with filters (admin)
#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(OrderFilterQuery, PaginationQuery),
    responses(
        (status = 200, description = "Order page", body = ApiResponse<Vec<OrderSummaryDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "admin-orders"
)]
pub async fn list_orders_admin(
    State(service): State<Arc<OrderService>>,
    Query(filters): Query<OrderFilterQuery>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<OrderSummaryDto>>>> {
    let (orders, total) = service.list_admin(&filters, &pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(orders),
        None,
        Some(Meta { total }),
    )))
}

/// Order detail (admin)
#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order detail", body = ApiResponse<OrderResponseDto>),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin-orders"
)]
pub async fn get_order_admin(
    State(service): State<Arc<OrderService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OrderResponseDto>>> {
    let order = service.get_admin(id).await?;
    Ok(Json(ApiResponse::success(Some(order), None, None)))
}

/// Update order and/or payment status (admin)
#[utoipa::path(
    put,
    path = "/api/admin/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateOrderStatusDto,
    responses(
        (status = 200, description = "Order updated", body = ApiResponse<OrderResponseDto>),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin-orders"
)]
pub async fn update_order_status(
    State(service): State<Arc<OrderService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateOrderStatusDto>,
) -> Result<Json<ApiResponse<OrderResponseDto>>> {
    let order = service.update_status(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(order),
        Some("Order updated".to_string()),
        None,
    )))
}
