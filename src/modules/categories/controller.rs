use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use coursehub_core::AppError;
use coursehub_models::MessageResponse;
use coursehub_models::categories::{
    AddCourseToCategoryDto, Category, CategoryPageDetails, CategoryPageDto, CreateCategoryDto,
};

use crate::middleware::auth::CurrentUser;
use crate::modules::categories::service::CategoryService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/v1/course/createCategory",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admins only"),
        (status = 409, description = "Category already exists")
    ),
    tag = "Categories",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let category = CategoryService::create_category(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    get,
    path = "/api/v1/course/showAllCategories",
    responses(
        (status = 200, description = "All categories", body = Vec<Category>)
    ),
    tag = "Categories"
)]
#[instrument(skip(state))]
pub async fn show_all_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = CategoryService::show_all_categories(&state.db).await?;
    Ok(Json(categories))
}

#[utoipa::path(
    post,
    path = "/api/v1/course/getCategoryPageDetails",
    request_body = CategoryPageDto,
    responses(
        (status = 200, description = "Category landing page", body = CategoryPageDetails),
        (status = 404, description = "Category missing or without published courses")
    ),
    tag = "Categories"
)]
#[instrument(skip(state))]
pub async fn get_category_page_details(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CategoryPageDto>,
) -> Result<Json<CategoryPageDetails>, AppError> {
    let details = CategoryService::get_category_page_details(&state.db, dto.category_id).await?;
    Ok(Json(details))
}

#[utoipa::path(
    post,
    path = "/api/v1/course/addCourseToCategory",
    request_body = AddCourseToCategoryDto,
    responses(
        (status = 200, description = "Course moved into the category", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Course or category not found")
    ),
    tag = "Categories",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn add_course_to_category(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(dto): ValidatedJson<AddCourseToCategoryDto>,
) -> Result<Json<MessageResponse>, AppError> {
    let response = CategoryService::add_course_to_category(&state.db, user.user_id, dto).await?;
    Ok(Json(response))
}
