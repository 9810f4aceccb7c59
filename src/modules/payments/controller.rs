use axum::{Json, extract::State};
use tracing::instrument;

use coursehub_core::AppError;
use coursehub_models::MessageResponse;
use coursehub_models::payments::{
    CapturePaymentDto, CapturePaymentResponse, PaymentSuccessEmailDto, VerifyPaymentDto,
    VerifyPaymentResponse,
};

use crate::middleware::auth::CurrentUser;
use crate::modules::payments::service::PaymentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/v1/payment/capturePayment",
    request_body = CapturePaymentDto,
    responses(
        (status = 200, description = "Gateway order created", body = CapturePaymentResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Students only"),
        (status = 404, description = "Course missing or not published"),
        (status = 409, description = "Already enrolled")
    ),
    tag = "Payments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn capture_payment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(dto): ValidatedJson<CapturePaymentDto>,
) -> Result<Json<CapturePaymentResponse>, AppError> {
    let response = PaymentService::capture_payment(
        &state.db,
        state.payment_gateway.as_ref(),
        &state.payment_config.currency,
        user.user_id,
        dto,
    )
    .await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/v1/payment/verifyPayment",
    request_body = VerifyPaymentDto,
    responses(
        (status = 200, description = "Payment verified and courses unlocked", body = VerifyPaymentResponse),
        (status = 400, description = "Payment verification failed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Payment order not found")
    ),
    tag = "Payments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn verify_payment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(dto): ValidatedJson<VerifyPaymentDto>,
) -> Result<Json<VerifyPaymentResponse>, AppError> {
    let response = PaymentService::verify_payment(
        &state.db,
        &state.email_service,
        &state.payment_config.key_secret,
        user.user_id,
        dto,
    )
    .await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/v1/payment/sendPaymentSuccessEmail",
    request_body = PaymentSuccessEmailDto,
    responses(
        (status = 200, description = "Confirmation email sent", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Payments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn send_payment_success_email(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(dto): ValidatedJson<PaymentSuccessEmailDto>,
) -> Result<Json<MessageResponse>, AppError> {
    let response = PaymentService::send_payment_success_email(
        &state.db,
        &state.email_service,
        &state.payment_config.currency,
        user.user_id,
        dto,
    )
    .await?;
    Ok(Json(response))
}
