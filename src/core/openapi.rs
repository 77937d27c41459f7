use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::orders::{
    dtos as orders_dtos, handlers as orders_handlers, models as orders_models,
};
use crate::features::payments::{dtos as payments_dtos, handlers as payments_handlers};
use crate::features::pc_builds::{dtos as pc_builds_dtos, handlers as pc_builds_handlers};
use crate::features::products::{dtos as products_dtos, handlers as products_handlers};
use crate::features::reviews::{dtos as reviews_dtos, handlers as reviews_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::get_me,
        // Categories (public)
        categories_handlers::list_categories,
        categories_handlers::get_category_tree,
        categories_handlers::get_category,
        categories_handlers::get_category_products,
        // Products (public)
        products_handlers::list_products,
        products_handlers::search_products,
        products_handlers::list_offers,
        products_handlers::get_product,
        // Reviews
        reviews_handlers::list_product_reviews,
        reviews_handlers::create_review,
        // Orders (protected)
        orders_handlers::create_order,
        orders_handlers::list_my_orders,
        orders_handlers::get_order,
        orders_handlers::cancel_order,
        // PC builds (protected)
        pc_builds_handlers::create_build,
        pc_builds_handlers::list_my_builds,
        pc_builds_handlers::get_build,
        pc_builds_handlers::delete_build,
        // Payments
        payments_handlers::initialize_payment,
        payments_handlers::nagad_callback,
        // Admin
        products_handlers::create_product,
        products_handlers::get_product_admin,
        products_handlers::update_product,
        products_handlers::delete_product,
        products_handlers::bulk_update_products,
        categories_handlers::create_category,
        categories_handlers::update_category,
        orders_handlers::list_orders_admin,
        orders_handlers::get_order_admin,
        orders_handlers::update_order_status,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::AuthResponseDto,
            auth::dtos::AuthUserDto,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::dtos::AuthUserDto>,
            // Categories
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryTreeDto,
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<Vec<categories_dtos::CategoryTreeDto>>,
            // Products
            products_dtos::ProductListItemDto,
            products_dtos::ProductSearchItemDto,
            products_dtos::ProductDetailDto,
            products_dtos::ImageDto,
            products_dtos::SpecificationDto,
            products_dtos::CreateProductDto,
            products_dtos::UpdateProductDto,
            products_dtos::DeleteOutcomeDto,
            products_dtos::BulkAction,
            products_dtos::BulkUpdateDto,
            products_dtos::BulkUpdateResultDto,
            ApiResponse<Vec<products_dtos::ProductListItemDto>>,
            ApiResponse<Vec<products_dtos::ProductSearchItemDto>>,
            ApiResponse<products_dtos::ProductDetailDto>,
            ApiResponse<products_dtos::DeleteOutcomeDto>,
            ApiResponse<products_dtos::BulkUpdateResultDto>,
            // Reviews
            reviews_dtos::CreateReviewDto,
            reviews_dtos::ReviewResponseDto,
            reviews_dtos::ProductReviewsDto,
            ApiResponse<reviews_dtos::ReviewResponseDto>,
            ApiResponse<reviews_dtos::ProductReviewsDto>,
            // Orders
            orders_models::OrderStatus,
            orders_models::PaymentStatus,
            orders_dtos::CreateOrderItemDto,
            orders_dtos::CreateOrderDto,
            orders_dtos::OrderItemDto,
            orders_dtos::OrderResponseDto,
            orders_dtos::OrderSummaryDto,
            orders_dtos::UpdateOrderStatusDto,
            ApiResponse<orders_dtos::OrderResponseDto>,
            ApiResponse<Vec<orders_dtos::OrderSummaryDto>>,
            // PC builds
            pc_builds_dtos::CreatePcBuildItemDto,
            pc_builds_dtos::CreatePcBuildDto,
            pc_builds_dtos::PcBuildItemDto,
            pc_builds_dtos::PcBuildResponseDto,
            pc_builds_dtos::PcBuildSummaryDto,
            ApiResponse<pc_builds_dtos::PcBuildResponseDto>,
            ApiResponse<Vec<pc_builds_dtos::PcBuildSummaryDto>>,
            // Payments
            payments_dtos::InitializePaymentDto,
            payments_dtos::PaymentRedirectDto,
            ApiResponse<payments_dtos::PaymentRedirectDto>,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "categories", description = "Product categories (public)"),
        (name = "products", description = "Product catalog (public)"),
        (name = "reviews", description = "Product reviews"),
        (name = "orders", description = "Customer orders"),
        (name = "pc-builds", description = "Saved PC component builds"),
        (name = "payments", description = "Nagad payment gateway"),
        (name = "admin-products", description = "Product management (admin)"),
        (name = "admin-categories", description = "Category management (admin)"),
        (name = "admin-orders", description = "Order management (admin)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "Commerce storefront and back-office API",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
