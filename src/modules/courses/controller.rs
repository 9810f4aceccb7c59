use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::instrument;

use coursehub_core::{AppError, Page, PageParams};
use coursehub_models::MessageResponse;
use coursehub_models::courses::{
    Course, CourseDetails, CourseIdDto, CourseSummary, CourseWithContent, CreateCourseDto,
    CreateSectionDto, CreateSubSectionDto, DeleteSectionDto, DeleteSubSectionDto, EditCourseDto,
    FullCourseDetails, SearchCourseDto, SectionWithSubSections, UpdateCourseProgressDto,
    UpdateSectionDto, UpdateSubSectionDto,
};

use crate::middleware::auth::CurrentUser;
use crate::modules::courses::sections::SectionService;
use crate::modules::courses::service::CourseService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/v1/course/createCourse",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Instructors only"),
        (status = 404, description = "Category not found"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_course(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let course = CourseService::create_course(&state.db, user.user_id, dto).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

#[utoipa::path(
    post,
    path = "/api/v1/course/editCourse",
    request_body = EditCourseDto,
    responses(
        (status = 200, description = "Course updated", body = CourseWithContent),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor, or demo account"),
        (status = 404, description = "Course or category not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn edit_course(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(dto): ValidatedJson<EditCourseDto>,
) -> Result<Json<CourseWithContent>, AppError> {
    let course = CourseService::edit_course(&state.db, user.user_id, dto).await?;
    Ok(Json(course))
}

#[utoipa::path(
    get,
    path = "/api/v1/course/getAllCourses",
    params(PageParams),
    responses(
        (status = 200, description = "Published courses", body = Page<CourseSummary>)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_all_courses(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<CourseSummary>>, AppError> {
    let page = CourseService::get_all_courses(&state.db, params).await?;
    Ok(Json(page))
}

#[utoipa::path(
    post,
    path = "/api/v1/course/getCourseDetails",
    request_body = CourseIdDto,
    responses(
        (status = 200, description = "Course details", body = CourseDetails),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_course_details(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CourseIdDto>,
) -> Result<Json<CourseDetails>, AppError> {
    let details = CourseService::get_course_details(&state.db, dto.course_id).await?;
    Ok(Json(details))
}

#[utoipa::path(
    post,
    path = "/api/v1/course/getFullCourseDetails",
    request_body = CourseIdDto,
    responses(
        (status = 200, description = "Course with lectures and progress", body = FullCourseDetails),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not enrolled in this course"),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_full_course_details(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(dto): ValidatedJson<CourseIdDto>,
) -> Result<Json<FullCourseDetails>, AppError> {
    let details =
        CourseService::get_full_course_details(
            &state.db,
            user.user_id,
            user.account_type,
            dto.course_id,
        )
        .await?;
    Ok(Json(details))
}

#[utoipa::path(
    get,
    path = "/api/v1/course/getInstructorCourses",
    responses(
        (status = 200, description = "Caller's courses, newest first", body = Vec<CourseWithContent>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Instructors only")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_instructor_courses(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<CourseWithContent>>, AppError> {
    let courses = CourseService::get_instructor_courses(&state.db, user.user_id).await?;
    Ok(Json(courses))
}

#[utoipa::path(
    delete,
    path = "/api/v1/course/deleteCourse",
    request_body = CourseIdDto,
    responses(
        (status = 200, description = "Course deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admins only, demo accounts excluded"),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CourseIdDto>,
) -> Result<Json<MessageResponse>, AppError> {
    CourseService::delete_course(&state.db, dto.course_id).await?;
    Ok(Json(MessageResponse::new("Course deleted successfully")))
}

#[utoipa::path(
    post,
    path = "/api/v1/course/searchCourse",
    request_body = SearchCourseDto,
    responses(
        (status = 200, description = "Matching published courses", body = Vec<CourseSummary>),
        (status = 422, description = "Validation failed")
    ),
    tag = "Courses"
)]
#[instrument(skip(state, dto))]
pub async fn search_course(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SearchCourseDto>,
) -> Result<Json<Vec<CourseSummary>>, AppError> {
    let courses = CourseService::search_courses(&state.db, &dto.search_query).await?;
    Ok(Json(courses))
}

#[utoipa::path(
    post,
    path = "/api/v1/course/updateCourseProgress",
    request_body = UpdateCourseProgressDto,
    responses(
        (status = 200, description = "Lecture marked complete", body = MessageResponse),
        (status = 400, description = "Lecture already completed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Students only"),
        (status = 404, description = "Not enrolled, or lecture not in course")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_course_progress(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(dto): ValidatedJson<UpdateCourseProgressDto>,
) -> Result<Json<MessageResponse>, AppError> {
    let response = CourseService::update_course_progress(&state.db, user.user_id, dto).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/v1/course/addSection",
    request_body = CreateSectionDto,
    responses(
        (status = 200, description = "Updated course content", body = CourseWithContent),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Course not found")
    ),
    tag = "Course Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn add_section(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(dto): ValidatedJson<CreateSectionDto>,
) -> Result<Json<CourseWithContent>, AppError> {
    let course = SectionService::create_section(&state.db, user.user_id, dto).await?;
    Ok(Json(course))
}

#[utoipa::path(
    post,
    path = "/api/v1/course/updateSection",
    request_body = UpdateSectionDto,
    responses(
        (status = 200, description = "Updated course content", body = CourseWithContent),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Course or section not found")
    ),
    tag = "Course Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_section(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(dto): ValidatedJson<UpdateSectionDto>,
) -> Result<Json<CourseWithContent>, AppError> {
    let course = SectionService::update_section(&state.db, user.user_id, dto).await?;
    Ok(Json(course))
}

#[utoipa::path(
    post,
    path = "/api/v1/course/deleteSection",
    request_body = DeleteSectionDto,
    responses(
        (status = 200, description = "Updated course content", body = CourseWithContent),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor, or demo account"),
        (status = 404, description = "Course or section not found")
    ),
    tag = "Course Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_section(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(dto): ValidatedJson<DeleteSectionDto>,
) -> Result<Json<CourseWithContent>, AppError> {
    let course = SectionService::delete_section(&state.db, user.user_id, dto).await?;
    Ok(Json(course))
}

#[utoipa::path(
    post,
    path = "/api/v1/course/addSubSection",
    request_body = CreateSubSectionDto,
    responses(
        (status = 200, description = "Updated section", body = SectionWithSubSections),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Section not found")
    ),
    tag = "Course Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn add_subsection(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(dto): ValidatedJson<CreateSubSectionDto>,
) -> Result<Json<SectionWithSubSections>, AppError> {
    let section = SectionService::create_subsection(&state.db, user.user_id, dto).await?;
    Ok(Json(section))
}

#[utoipa::path(
    post,
    path = "/api/v1/course/updateSubSection",
    request_body = UpdateSubSectionDto,
    responses(
        (status = 200, description = "Updated section", body = SectionWithSubSections),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Section or lecture not found")
    ),
    tag = "Course Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_subsection(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(dto): ValidatedJson<UpdateSubSectionDto>,
) -> Result<Json<SectionWithSubSections>, AppError> {
    let section = SectionService::update_subsection(&state.db, user.user_id, dto).await?;
    Ok(Json(section))
}

#[utoipa::path(
    post,
    path = "/api/v1/course/deleteSubSection",
    request_body = DeleteSubSectionDto,
    responses(
        (status = 200, description = "Updated section", body = SectionWithSubSections),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Section or lecture not found")
    ),
    tag = "Course Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_subsection(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(dto): ValidatedJson<DeleteSubSectionDto>,
) -> Result<Json<SectionWithSubSections>, AppError> {
    let section = SectionService::delete_subsection(&state.db, user.user_id, dto).await?;
    Ok(Json(section))
}
