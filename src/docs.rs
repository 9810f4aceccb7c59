use serde::Serialize;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use coursehub_models::MessageResponse;
use coursehub_models::categories::{
    AddCourseToCategoryDto, Category, CategoryPageDetails, CategoryPageDto, CategoryWithCourses,
    CreateCategoryDto,
};
use coursehub_models::contact::{ContactRequest, ContactUsDto};
use coursehub_models::courses::{
    Course, CourseDetails, CourseIdDto, CourseStatus, CourseSummary, CourseWithContent,
    CreateCourseDto, CreateSectionDto, CreateSubSectionDto, DeleteSectionDto, DeleteSubSectionDto,
    EditCourseDto, FullCourseDetails, LectureOutline, SearchCourseDto, Section, SectionOutline,
    SectionWithSubSections, SubSection, UpdateCourseProgressDto, UpdateSectionDto,
    UpdateSubSectionDto,
};
use coursehub_models::payments::{
    CapturePaymentDto, CapturePaymentResponse, PaymentStatus, PaymentSuccessEmailDto,
    VerifyPaymentDto, VerifyPaymentResponse,
};
use coursehub_models::ratings::{
    AverageRatingQuery, AverageRatingResponse, CreateRatingDto, Rating, ReviewDetails,
};
use coursehub_models::users::{
    EnrolledCourse, InstructorCourseStats, LoginRequest, LoginResponse, SignupDto,
    UpdateDisplayPictureDto, UpdateProfileDto, User, UserSummary,
};

use crate::middleware::routes::EndpointInfo;

/// Body of every error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Course not found")]
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::signup,
        crate::modules::auth::controller::login,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::edit_course,
        crate::modules::courses::controller::get_all_courses,
        crate::modules::courses::controller::get_course_details,
        crate::modules::courses::controller::get_full_course_details,
        crate::modules::courses::controller::get_instructor_courses,
        crate::modules::courses::controller::delete_course,
        crate::modules::courses::controller::search_course,
        crate::modules::courses::controller::update_course_progress,
        crate::modules::courses::controller::add_section,
        crate::modules::courses::controller::update_section,
        crate::modules::courses::controller::delete_section,
        crate::modules::courses::controller::add_subsection,
        crate::modules::courses::controller::update_subsection,
        crate::modules::courses::controller::delete_subsection,
        crate::modules::categories::controller::create_category,
        crate::modules::categories::controller::show_all_categories,
        crate::modules::categories::controller::get_category_page_details,
        crate::modules::categories::controller::add_course_to_category,
        crate::modules::ratings::controller::create_rating,
        crate::modules::ratings::controller::get_average_rating,
        crate::modules::ratings::controller::get_reviews,
        crate::modules::payments::controller::capture_payment,
        crate::modules::payments::controller::verify_payment,
        crate::modules::payments::controller::send_payment_success_email,
        crate::modules::profile::controller::delete_profile,
        crate::modules::profile::controller::update_profile,
        crate::modules::profile::controller::get_user_details,
        crate::modules::profile::controller::get_enrolled_courses,
        crate::modules::profile::controller::update_display_picture,
        crate::modules::profile::controller::get_instructor_dashboard_details,
        crate::modules::contact::controller::contact_us,
        crate::router::list_routes,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            EndpointInfo,
            User,
            UserSummary,
            SignupDto,
            LoginRequest,
            LoginResponse,
            UpdateProfileDto,
            UpdateDisplayPictureDto,
            EnrolledCourse,
            InstructorCourseStats,
            Category,
            CategoryWithCourses,
            CategoryPageDetails,
            CreateCategoryDto,
            CategoryPageDto,
            AddCourseToCategoryDto,
            CourseStatus,
            Course,
            CourseSummary,
            CourseWithContent,
            CourseDetails,
            FullCourseDetails,
            Section,
            SectionOutline,
            SectionWithSubSections,
            SubSection,
            LectureOutline,
            CreateCourseDto,
            EditCourseDto,
            CourseIdDto,
            SearchCourseDto,
            UpdateCourseProgressDto,
            CreateSectionDto,
            UpdateSectionDto,
            DeleteSectionDto,
            CreateSubSectionDto,
            UpdateSubSectionDto,
            DeleteSubSectionDto,
            Rating,
            ReviewDetails,
            CreateRatingDto,
            AverageRatingQuery,
            AverageRatingResponse,
            PaymentStatus,
            CapturePaymentDto,
            CapturePaymentResponse,
            VerifyPaymentDto,
            VerifyPaymentResponse,
            PaymentSuccessEmailDto,
            ContactRequest,
            ContactUsDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Signup and login"),
        (name = "Courses", description = "Course catalogue and learner progress"),
        (name = "Course Content", description = "Sections and lectures of a course"),
        (name = "Categories", description = "Course categories"),
        (name = "Ratings", description = "Ratings and reviews"),
        (name = "Payments", description = "Checkout and enrollment"),
        (name = "Profile", description = "Account, enrolled courses and instructor dashboard"),
        (name = "Contact", description = "Contact form"),
        (name = "Meta", description = "Route introspection")
    ),
    info(
        title = "CourseHub API",
        version = "0.1.0",
        description = "Course platform API built with Rust, Axum, and PostgreSQL.",
        contact(
            name = "API Support",
            email = "support@coursehub.dev"
        ),
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

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
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_module() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/v1/auth/signup",
            "/api/v1/course/getAllCourses",
            "/api/v1/course/createCategory",
            "/api/v1/payment/capturePayment",
            "/api/v1/profile/getUserDetails",
            "/api/v1/reach/contactUs",
            "/api/v1/routes",
        ] {
            assert!(paths.iter().any(|p| *p == expected), "missing {expected}");
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
