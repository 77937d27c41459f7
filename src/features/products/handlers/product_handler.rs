use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::products::dtos::{
    BulkUpdateDto, BulkUpdateResultDto, CreateProductDto, DeleteOutcomeDto, ProductDetailDto,
    ProductFilterQuery, ProductListItemDto, ProductSearchItemDto, SearchQuery, UpdateProductDto,
};
use crate::features::products::services::ProductService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};
use crate::shared::validation::SLUG_REGEX;

/// Browse the catalog with optional filters
#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductFilterQuery, PaginationQuery),
    responses(
        (status = 200, description = "Product page", body = ApiResponse<Vec<ProductListItemDto>>)
    ),
    tag = "products"
)]
pub async fn list_products(
    State(service): State<Arc<ProductService>>,
    Query(filters): Query<ProductFilterQuery>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ProductListItemDto>>>> {
    let (products, total) = service.list(&filters, &pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(products),
        None,
        Some(Meta { total }),
    )))
}

/// Autocomplete search
#[utoipa::path(
    get,
    path = "/api/products/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching products", body = ApiResponse<Vec<ProductSearchItemDto>>)
    ),
    tag = "products"
)]
pub async fn search_products(
    State(service): State<Arc<ProductService>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<ProductSearchItemDto>>>> {
    if query.q.trim().is_empty() {
        return Err(AppError::Validation("Search term is required".to_string()));
    }
    let products = service.search(&query.q, query.limit).await?;
    Ok(Json(ApiResponse::success(Some(products), None, None)))
}

/// Active offer products within their offer window
#[utoipa::path(
    get,
    path = "/api/products/offers",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Offer products", body = ApiResponse<Vec<ProductListItemDto>>)
    ),
    tag = "products"
)]
pub async fn list_offers(
    State(service): State<Arc<ProductService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ProductListItemDto>>>> {
    let (products, total) = service.list_offers(&pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(products),
        None,
        Some(Meta { total }),
    )))
}

/// Product detail with images and specifications
#[utoipa::path(
    get,
    path = "/api/products/{slug}",
    params(("slug" = String, Path, description = "Product slug")),
    responses(
        (status = 200, description = "Product detail", body = ApiResponse<ProductDetailDto>),
        (status = 404, description = "Product not found")
    ),
    tag = "products"
)]
pub async fn get_product(
    State(service): State<Arc<ProductService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<ProductDetailDto>>> {
    let product = service.get_by_slug(&slug).await?;
    Ok(Json(ApiResponse::success(Some(product), None, None)))
}

/// Create a product (admin)
#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = CreateProductDto,
    responses(
        (status = 200, description = "Product created", body = ApiResponse<ProductDetailDto>),
        (status = 409, description = "Slug already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "admin-products"
)]
pub async fn create_product(
    State(service): State<Arc<ProductService>>,
    AppJson(dto): AppJson<CreateProductDto>,
) -> Result<Json<ApiResponse<ProductDetailDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    if !SLUG_REGEX.is_match(&dto.slug) {
        return Err(AppError::Validation("Invalid slug format".to_string()));
    }

    let product = service.create(dto).await?;
    Ok(Json(ApiResponse::success(
        Some(product),
        Some("Product created".to_string()),
        None,
    )))
}

/// Update a product (admin); image and specification sets replace wholesale
#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpdateProductDto,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductDetailDto>),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Slug already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "admin-products"
)]
pub async fn update_product(
    State(service): State<Arc<ProductService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateProductDto>,
) -> Result<Json<ApiResponse<ProductDetailDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    if let Some(ref slug) = dto.slug {
        if !SLUG_REGEX.is_match(slug) {
            return Err(AppError::Validation("Invalid slug format".to_string()));
        }
    }

    let product = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(product),
        Some("Product updated".to_string()),
        None,
    )))
}

/// Admin product detail, including soft-deleted products
#[utoipa::path(
    get,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product detail", body = ApiResponse<ProductDetailDto>),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin-products"
)]
pub async fn get_product_admin(
    State(service): State<Arc<ProductService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProductDetailDto>>> {
    let product = service.get_admin(id).await?;
    Ok(Json(ApiResponse::success(Some(product), None, None)))
}

/// Delete a product (admin): soft when order history references it
#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Delete outcome", body = ApiResponse<DeleteOutcomeDto>),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin-products"
)]
pub async fn delete_product(
    State(service): State<Arc<ProductService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeleteOutcomeDto>>> {
    let outcome = service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        Some(outcome),
        Some("Product deleted".to_string()),
        None,
    )))
}

/// Apply one action to many products at once (admin)
#[utoipa::path(
    post,
    path = "/api/admin/products/bulk",
    request_body = BulkUpdateDto,
    responses(
        (status = 200, description = "Affected row count", body = ApiResponse<BulkUpdateResultDto>),
        (status = 400, description = "Missing or invalid action parameters")
    ),
    security(("bearer_auth" = [])),
    tag = "admin-products"
)]
pub async fn bulk_update_products(
    State(service): State<Arc<ProductService>>,
    AppJson(dto): AppJson<BulkUpdateDto>,
) -> Result<Json<ApiResponse<BulkUpdateResultDto>>> {
    let result = service.bulk_update(dto).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}
