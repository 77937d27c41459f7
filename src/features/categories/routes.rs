use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

pub fn public_routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/categories/tree", get(handlers::get_category_tree))
        .route("/api/categories/{slug}", get(handlers::get_category))
        .route(
            "/api/categories/{slug}/products",
            get(handlers::get_category_products),
        )
        .with_state(service)
}

pub fn admin_routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/categories", post(handlers::create_category))
        .route("/categories/{id}", put(handlers::update_category))
        .with_state(service)
}
