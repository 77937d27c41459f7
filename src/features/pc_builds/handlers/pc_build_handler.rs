use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::pc_builds::dtos::{CreatePcBuildDto, PcBuildResponseDto, PcBuildSummaryDto};
use crate::features::pc_builds::services::PcBuildService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Save a PC build
#[utoipa::path(
    post,
    path = "/api/pc-builds",
    request_body = CreatePcBuildDto,
    responses(
        (status = 200, description = "Build saved", body = ApiResponse<PcBuildResponseDto>),
        (status = 400, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "pc-builds"
)]
pub async fn create_build(
    State(service): State<Arc<PcBuildService>>,
    user: AuthenticatedUser,
    AppJson(dto): AppJson<CreatePcBuildDto>,
) -> Result<Json<ApiResponse<PcBuildResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let build = service.create(user.user_id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(build),
        Some("Build saved".to_string()),
        None,
    )))
}

/// Builds of the authenticated user
#[utoipa::path(
    get,
    path = "/api/pc-builds",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Build page", body = ApiResponse<Vec<PcBuildSummaryDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "pc-builds"
)]
pub async fn list_my_builds(
    State(service): State<Arc<PcBuildService>>,
    user: AuthenticatedUser,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<PcBuildSummaryDto>>>> {
    let (builds, total) = service.list_mine(user.user_id, &pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(builds),
        None,
        Some(Meta { total }),
    )))
}

/// Single build with quoted total, owner only
#[utoipa::path(
    get,
    path = "/api/pc-builds/{id}",
    params(("id" = Uuid, Path, description = "Build id")),
    responses(
        (status = 200, description = "Build detail", body = ApiResponse<PcBuildResponseDto>),
        (status = 404, description = "Build not found")
    ),
    security(("bearer_auth" = [])),
    tag = "pc-builds"
)]
pub async fn get_build(
    State(service): State<Arc<PcBuildService>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PcBuildResponseDto>>> {
    let build = service.get(id, user.user_id).await?;
    Ok(Json(ApiResponse::success(Some(build), None, None)))
}

/// Delete a build, owner only
#[utoipa::path(
    delete,
    path = "/api/pc-builds/{id}",
    params(("id" = Uuid, Path, description = "Build id")),
    responses(
        (status = 200, description = "Build deleted"),
        (status = 404, description = "Build not found")
    ),
    security(("bearer_auth" = [])),
    tag = "pc-builds"
)]
pub async fn delete_build(
    State(service): State<Arc<PcBuildService>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Build deleted".to_string()),
        None,
    )))
}
