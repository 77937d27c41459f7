use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::features::products::handlers;
use crate::features::products::services::ProductService;

pub fn public_routes(service: Arc<ProductService>) -> Router {
    Router::new()
        .route("/api/products", get(handlers::list_products))
        // Literal segments before the slug capture
        .route("/api/products/search", get(handlers::search_products))
        .route("/api/products/offers", get(handlers::list_offers))
        .route("/api/products/{slug}", get(handlers::get_product))
        .with_state(service)
}

pub fn admin_routes(service: Arc<ProductService>) -> Router {
    Router::new()
        .route("/products", post(handlers::create_product))
        .route("/products/bulk", post(handlers::bulk_update_products))
        .route("/products/{id}", get(handlers::get_product_admin))
        .route("/products/{id}", put(handlers::update_product))
        .route("/products/{id}", delete(handlers::delete_product))
        .with_state(service)
}
