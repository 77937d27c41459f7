use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::payments::handlers::{self, PaymentState};

pub fn public_routes(state: Arc<PaymentState>) -> Router {
    Router::new()
        .route(
            "/api/payments/nagad/callback",
            get(handlers::nagad_callback),
        )
        .with_state(state)
}

pub fn protected_routes(state: Arc<PaymentState>) -> Router {
    Router::new()
        .route(
            "/api/payments/nagad/initialize/{order_id}",
            post(handlers::initialize_payment),
        )
        .with_state(state)
}
