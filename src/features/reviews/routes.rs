use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::reviews::handlers;
use crate::features::reviews::services::ReviewService;

pub fn public_routes(service: Arc<ReviewService>) -> Router {
    Router::new()
        // Same segment name as the product detail route; the value here is
        // the product id, extracted as a Uuid.
        .route(
            "/api/products/{slug}/reviews",
            get(handlers::list_product_reviews),
        )
        .with_state(service)
}

pub fn protected_routes(service: Arc<ReviewService>) -> Router {
    Router::new()
        .route("/api/reviews", post(handlers::create_review))
        .with_state(service)
}
