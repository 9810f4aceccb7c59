use axum::{Json, extract::State};
use tracing::instrument;

use coursehub_core::AppError;
use coursehub_models::MessageResponse;
use coursehub_models::contact::ContactUsDto;

use crate::modules::contact::service::ContactService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/v1/reach/contactUs",
    request_body = ContactUsDto,
    responses(
        (status = 200, description = "Message received", body = MessageResponse),
        (status = 422, description = "Validation failed")
    ),
    tag = "Contact"
)]
#[instrument(skip(state, dto))]
pub async fn contact_us(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ContactUsDto>,
) -> Result<Json<MessageResponse>, AppError> {
    ContactService::submit(&state.db, &state.email_service, dto).await?;
    Ok(Json(MessageResponse::new("Email sent successfully")))
}
