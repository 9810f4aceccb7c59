//! Row builders shared by the service tests.

use sqlx::PgPool;
use uuid::Uuid;

use coursehub_core::AccountType;
use coursehub_models::courses::CourseStatus;
use coursehub_models::{CategoryId, CourseId, SectionId, SubSectionId, UserId};

pub async fn create_user(pool: &PgPool, account_type: AccountType, is_demo: bool) -> UserId {
    sqlx::query_scalar::<_, UserId>(
        "INSERT INTO users (first_name, last_name, email, password, account_type, is_demo)
         VALUES ('Test', 'User', $1, 'not-a-real-hash', $2, $3)
         RETURNING id",
    )
    .bind(format!("{}@example.com", Uuid::new_v4()))
    .bind(account_type)
    .bind(is_demo)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_category(pool: &PgPool, name: &str) -> CategoryId {
    sqlx::query_scalar::<_, CategoryId>(
        "INSERT INTO categories (name) VALUES ($1) RETURNING id",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_course(
    pool: &PgPool,
    instructor_id: UserId,
    category_id: Option<CategoryId>,
    price: i64,
    status: CourseStatus,
) -> CourseId {
    sqlx::query_scalar::<_, CourseId>(
        "INSERT INTO courses (name, description, price, instructor_id, category_id, status)
         VALUES ($1, 'A course', $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(format!("Course {}", &Uuid::new_v4().to_string()[..8]))
    .bind(price)
    .bind(instructor_id)
    .bind(category_id)
    .bind(status)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_section(pool: &PgPool, course_id: CourseId, position: i32) -> SectionId {
    sqlx::query_scalar::<_, SectionId>(
        "INSERT INTO sections (course_id, name, position) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(course_id)
    .bind(format!("Section {}", position))
    .bind(position)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_subsection(
    pool: &PgPool,
    section_id: SectionId,
    seconds: f64,
    position: i32,
) -> SubSectionId {
    sqlx::query_scalar::<_, SubSectionId>(
        "INSERT INTO subsections (section_id, title, time_duration, video_url, position)
         VALUES ($1, $2, $3, 'https://videos.example.com/lecture.mp4', $4)
         RETURNING id",
    )
    .bind(section_id)
    .bind(format!("Lecture {}", position))
    .bind(seconds)
    .bind(position)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn enroll(pool: &PgPool, user_id: UserId, course_id: CourseId) {
    sqlx::query("INSERT INTO enrollments (user_id, course_id) VALUES ($1, $2)")
        .bind(user_id)
        .bind(course_id)
        .execute(pool)
        .await
        .unwrap();
}
