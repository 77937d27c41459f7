use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Redirect;
use axum::Json;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::payments::dtos::{
    InitializePaymentDto, NagadCallbackQuery, PaymentRedirectDto,
};
use crate::features::payments::services::NagadService;
use crate::shared::types::ApiResponse;

/// Shared state for the payment handlers.
pub struct PaymentState {
    pub nagad: Arc<NagadService>,
    /// Base URL of the storefront for post-payment redirects
    pub frontend_url: String,
}

/// Start a Nagad payment for an order
#[utoipa::path(
    post,
    path = "/api/payments/nagad/initialize/{order_id}",
    params(("order_id" = Uuid, Path, description = "Order id")),
    request_body = InitializePaymentDto,
    responses(
        (status = 200, description = "Gateway redirect URL", body = ApiResponse<PaymentRedirectDto>),
        (status = 404, description = "Order not found"),
        (status = 502, description = "Payment gateway unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "payments"
)]
pub async fn initialize_payment(
    State(state): State<Arc<PaymentState>>,
    user: AuthenticatedUser,
    Path(order_id): Path<Uuid>,
    AppJson(dto): AppJson<InitializePaymentDto>,
) -> Result<Json<ApiResponse<PaymentRedirectDto>>> {
    let redirect = state
        .nagad
        .initialize(order_id, user.user_id, dto.customer_mobile)
        .await?;
    Ok(Json(ApiResponse::success(Some(redirect), None, None)))
}

/// Gateway return URL. The client-supplied status is ignored; the payment
/// is re-verified against the provider, and the customer always ends up on
/// a storefront page, never an error body.
#[utoipa::path(
    get,
    path = "/api/payments/nagad/callback",
    params(NagadCallbackQuery),
    responses(
        (status = 303, description = "Redirect to the order-success or payment-failure page")
    ),
    tag = "payments"
)]
pub async fn nagad_callback(
    State(state): State<Arc<PaymentState>>,
    Query(query): Query<NagadCallbackQuery>,
) -> Redirect {
    let confirmed = match state
        .nagad
        .confirm_callback(&query.payment_ref_id, query.order_id)
        .await
    {
        Ok(confirmed) => confirmed,
        Err(e) => {
            tracing::error!("Payment callback failed: {:?}", e);
            false
        }
    };

    if confirmed {
        Redirect::to(&format!(
            "{}/order-success?order={}",
            state.frontend_url, query.order_id
        ))
    } else {
        let message = urlencoding::encode("Payment could not be verified");
        Redirect::to(&format!(
            "{}/payment-failed?message={}",
            state.frontend_url, message
        ))
    }
}
