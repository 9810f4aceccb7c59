use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::instrument;

use coursehub_core::{AppError, Page, PageParams};
use coursehub_models::ratings::{
    AverageRatingQuery, AverageRatingResponse, CreateRatingDto, Rating, ReviewDetails,
};

use crate::middleware::auth::CurrentUser;
use crate::modules::ratings::service::RatingService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/v1/course/createRating",
    request_body = CreateRatingDto,
    responses(
        (status = 201, description = "Rating created", body = Rating),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Students only, demo accounts excluded"),
        (status = 404, description = "Not enrolled in the course"),
        (status = 409, description = "Course already rated"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Ratings",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_rating(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(dto): ValidatedJson<CreateRatingDto>,
) -> Result<(StatusCode, Json<Rating>), AppError> {
    let rating = RatingService::create_rating(&state.db, user.user_id, dto).await?;
    Ok((StatusCode::CREATED, Json(rating)))
}

#[utoipa::path(
    get,
    path = "/api/v1/course/getAverageRating",
    params(AverageRatingQuery),
    responses(
        (status = 200, description = "Average rating", body = AverageRatingResponse),
        (status = 400, description = "Missing or invalid course_id")
    ),
    tag = "Ratings"
)]
#[instrument(skip(state))]
pub async fn get_average_rating(
    State(state): State<AppState>,
    Query(query): Query<AverageRatingQuery>,
) -> Result<Json<AverageRatingResponse>, AppError> {
    let average = RatingService::get_average_rating(&state.db, query.course_id).await?;
    Ok(Json(average))
}

#[utoipa::path(
    get,
    path = "/api/v1/course/getReviews",
    params(PageParams),
    responses(
        (status = 200, description = "Reviews, highest rating first", body = Page<ReviewDetails>)
    ),
    tag = "Ratings"
)]
#[instrument(skip(state))]
pub async fn get_reviews(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<ReviewDetails>>, AppError> {
    let reviews = RatingService::get_reviews(&state.db, params).await?;
    Ok(Json(reviews))
}
