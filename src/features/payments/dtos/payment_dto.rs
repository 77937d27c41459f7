use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct InitializePaymentDto {
    /// Wallet number the customer will pay from
    pub customer_mobile: Option<String>,
}

/// Where the client should send the customer to complete payment.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaymentRedirectDto {
    pub payment_ref_id: String,
    pub redirect_url: String,
}

/// Query string the gateway appends when redirecting back. The `status`
/// field is client-controlled and never trusted; the payment is
/// re-verified against the provider before any order mutation.
#[derive(Debug, Deserialize, IntoParams)]
pub struct NagadCallbackQuery {
    pub payment_ref_id: String,
    pub status: Option<String>,
    pub order_id: Uuid,
}
