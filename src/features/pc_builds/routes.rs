use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::features::pc_builds::handlers;
use crate::features::pc_builds::services::PcBuildService;

pub fn protected_routes(service: Arc<PcBuildService>) -> Router {
    Router::new()
        .route("/api/pc-builds", post(handlers::create_build))
        .route("/api/pc-builds", get(handlers::list_my_builds))
        .route("/api/pc-builds/{id}", get(handlers::get_build))
        .route("/api/pc-builds/{id}", delete(handlers::delete_build))
        .with_state(service)
}
