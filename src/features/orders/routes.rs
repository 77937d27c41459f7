use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::core::middleware;
use crate::features::auth::services::TokenService;
use crate::features::orders::handlers;
use crate::features::orders::services::OrderService;

/// Checkout accepts guests, so order creation sits outside the protected
/// tree behind the optional-auth layer: a token attaches the order to the
/// account, no token places a guest order.
pub fn public_routes(service: Arc<OrderService>, tokens: Arc<TokenService>) -> Router {
    Router::new()
        .route("/api/orders", post(handlers::create_order))
        .route_layer(axum::middleware::from_fn_with_state(
            tokens,
            middleware::optional_auth_middleware,
        ))
        .with_state(service)
}

pub fn protected_routes(service: Arc<OrderService>) -> Router {
    Router::new()
        .route("/api/orders", get(handlers::list_my_orders))
        .route("/api/orders/{id}", get(handlers::get_order))
        .route("/api/orders/{id}", delete(handlers::cancel_order))
        .with_state(service)
}

pub fn admin_routes(service: Arc<OrderService>) -> Router {
    Router::new()
        .route("/orders", get(handlers::list_orders_admin))
        .route("/orders/{id}", get(handlers::get_order_admin))
        .route("/orders/{id}/status", put(handlers::update_order_status))
        .with_state(service)
}
