use axum::{Json, extract::State};
use tracing::instrument;

use coursehub_core::AppError;
use coursehub_models::MessageResponse;
use coursehub_models::users::{
    EnrolledCourse, InstructorCourseStats, UpdateDisplayPictureDto, UpdateProfileDto, User,
};

use crate::middleware::auth::CurrentUser;
use crate::modules::profile::service::ProfileService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    delete,
    path = "/api/v1/profile/deleteProfile",
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Demo accounts cannot delete themselves"),
        (status = 409, description = "Instructor still owns courses")
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<MessageResponse>, AppError> {
    ProfileService::delete_profile(&state.db, user.user_id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

#[utoipa::path(
    put,
    path = "/api/v1/profile/updateProfile",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Demo accounts cannot edit their profile"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<User>, AppError> {
    let updated = ProfileService::update_profile(&state.db, user.user_id, dto).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    get,
    path = "/api/v1/profile/getUserDetails",
    responses(
        (status = 200, description = "Caller's user record", body = User),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_user_details(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<User>, AppError> {
    let details = ProfileService::get_user_details(&state.db, user.user_id).await?;
    Ok(Json(details))
}

#[utoipa::path(
    get,
    path = "/api/v1/profile/getEnrolledCourses",
    responses(
        (status = 200, description = "Enrolled courses with progress", body = Vec<EnrolledCourse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_enrolled_courses(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<EnrolledCourse>>, AppError> {
    let courses = ProfileService::get_enrolled_courses(&state.db, user.user_id).await?;
    Ok(Json(courses))
}

#[utoipa::path(
    put,
    path = "/api/v1/profile/updateDisplayPicture",
    request_body = UpdateDisplayPictureDto,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Invalid image URL")
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_display_picture(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(dto): ValidatedJson<UpdateDisplayPictureDto>,
) -> Result<Json<User>, AppError> {
    let updated =
        ProfileService::update_display_picture(&state.db, user.user_id, &dto.image_url).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    get,
    path = "/api/v1/profile/getInstructorDashboardDetails",
    responses(
        (status = 200, description = "Per-course enrollment and revenue", body = Vec<InstructorCourseStats>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Instructors only")
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_instructor_dashboard_details(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<InstructorCourseStats>>, AppError> {
    let stats = ProfileService::get_instructor_dashboard(&state.db, user.user_id).await?;
    Ok(Json(stats))
}
