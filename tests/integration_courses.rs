mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_test_course, create_test_lecture, create_test_user, empty_request, enroll,
    json_request, setup_test_app,
};
use coursehub_core::AccountType;
use coursehub_models::courses::CourseStatus;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "./migrations")]
async fn test_instructor_builds_and_publishes_course(pool: PgPool) {
    let admin = create_test_user(&pool, AccountType::Admin, false).await;
    let instructor = create_test_user(&pool, AccountType::Instructor, false).await;
    let app = setup_test_app(pool.clone());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/course/createCategory",
            Some(&admin.token),
            json!({ "name": "Systems", "description": "Low-level programming" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let category_id = body_json(response).await["id"].clone();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/course/createCourse",
            Some(&instructor.token),
            json!({
                "name": "Rust from Scratch",
                "description": "Ownership, traits and async",
                "price": 499,
                "tags": [" rust ", "systems"],
                "category_id": category_id
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let course = body_json(response).await;
    assert_eq!(course["status"], "Draft");
    assert_eq!(course["tags"], json!(["rust", "systems"]));
    let course_id = course["id"].clone();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/course/addSection",
            Some(&instructor.token),
            json!({ "course_id": course_id, "section_name": "Getting started" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let with_content = body_json(response).await;
    let section_id = with_content["sections"][0]["id"].clone();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/course/addSubSection",
            Some(&instructor.token),
            json!({
                "section_id": section_id,
                "title": "Installing the toolchain",
                "time_duration": 125.0,
                "video_url": "https://videos.example.com/install.mp4"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let section = body_json(response).await;
    assert_eq!(section["subsections"].as_array().unwrap().len(), 1);

    // Drafts stay out of the public catalogue
    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/v1/course/getAllCourses", None))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["meta"]["total"], 0);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/course/editCourse",
            Some(&instructor.token),
            json!({ "course_id": course_id, "status": "Published" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(empty_request(
            "GET",
            "/api/v1/course/getAllCourses?page=1&limit=10",
            None,
        ))
        .await
        .unwrap();
    let page = body_json(response).await;
    assert_eq!(page["meta"]["total"], 1);
    assert_eq!(page["data"][0]["name"], "Rust from Scratch");

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/course/getCourseDetails",
            None,
            json!({ "course_id": course_id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let details = body_json(response).await;
    assert_eq!(details["total_duration"], "2m 5s");
    assert!(!details.to_string().contains("video_url"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_other_instructor_cannot_edit(pool: PgPool) {
    let owner = create_test_user(&pool, AccountType::Instructor, false).await;
    let intruder = create_test_user(&pool, AccountType::Instructor, false).await;
    let course = create_test_course(&pool, owner.id, 100, CourseStatus::Draft).await;
    let app = setup_test_app(pool);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/course/editCourse",
            Some(&intruder.token),
            json!({ "course_id": course, "name": "Hijacked" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_progress_and_rating(pool: PgPool) {
    let instructor = create_test_user(&pool, AccountType::Instructor, false).await;
    let student = create_test_user(&pool, AccountType::Student, false).await;
    let course = create_test_course(&pool, instructor.id, 100, CourseStatus::Published).await;
    let (_, lecture) = create_test_lecture(&pool, course, 90.0).await;
    create_test_lecture(&pool, course, 30.0).await;
    enroll(&pool, student.id, course).await;
    let app = setup_test_app(pool);

    let progress = json!({ "course_id": course, "subsection_id": lecture });
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/course/updateCourseProgress",
            Some(&student.token),
            progress.clone(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/course/updateCourseProgress",
            Some(&student.token),
            progress,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(empty_request(
            "GET",
            "/api/v1/profile/getEnrolledCourses",
            Some(&student.token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let enrolled = body_json(response).await;
    assert_eq!(enrolled[0]["completed_lectures"], 1);
    assert_eq!(enrolled[0]["total_lectures"], 2);
    assert_eq!(enrolled[0]["progress_percentage"], 50.0);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/course/createRating",
            Some(&student.token),
            json!({ "course_id": course, "rating": 4, "review": "Clear and practical" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(empty_request(
            "GET",
            &format!("/api/v1/course/getAverageRating?course_id={}", course),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["average_rating"], 4.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_demo_student_cannot_rate(pool: PgPool) {
    let instructor = create_test_user(&pool, AccountType::Instructor, false).await;
    let demo = create_test_user(&pool, AccountType::Student, true).await;
    let course = create_test_course(&pool, instructor.id, 100, CourseStatus::Published).await;
    enroll(&pool, demo.id, course).await;
    let app = setup_test_app(pool.clone());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/course/createRating",
            Some(&demo.token),
            json!({ "course_id": course, "rating": 5, "review": "Great" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let ratings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ratings")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(ratings, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_deletes_course(pool: PgPool) {
    let admin = create_test_user(&pool, AccountType::Admin, false).await;
    let instructor = create_test_user(&pool, AccountType::Instructor, false).await;
    let course = create_test_course(&pool, instructor.id, 100, CourseStatus::Published).await;
    let app = setup_test_app(pool);

    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            "/api/v1/course/deleteCourse",
            Some(&admin.token),
            json!({ "course_id": course }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(json_request(
            "DELETE",
            "/api/v1/course/deleteCourse",
            Some(&admin.token),
            json!({ "course_id": course }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
