use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument};

use coursehub_core::{AppError, format_duration, progress_percentage};
use coursehub_models::users::{
    EnrolledCourse, InstructorCourseStats, USER_COLUMNS, UpdateProfileDto, User,
};
use coursehub_models::{CourseId, UserId};

pub struct ProfileService;

impl ProfileService {
    #[instrument(skip(db))]
    pub async fn get_user_details(db: &PgPool, user_id: UserId) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_profile(
        db: &PgPool,
        user_id: UserId,
        dto: UpdateProfileDto,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                gender = COALESCE($4, gender),
                date_of_birth = COALESCE($5, date_of_birth),
                about = COALESCE($6, about),
                contact_number = COALESCE($7, contact_number),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user_id)
        .bind(dto.first_name.as_deref().map(str::trim))
        .bind(dto.last_name.as_deref().map(str::trim))
        .bind(&dto.gender)
        .bind(dto.date_of_birth)
        .bind(&dto.about)
        .bind(&dto.contact_number)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_display_picture(
        db: &PgPool,
        user_id: UserId,
        image_url: &str,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET image = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user_id)
        .bind(image_url)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    /// Deletes the account together with its enrollments, progress, ratings
    /// and payments. Instructors must remove their courses first.
    #[instrument(skip(db))]
    pub async fn delete_profile(db: &PgPool, user_id: UserId) -> Result<(), AppError> {
        let owned_courses = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM courses WHERE instructor_id = $1",
        )
        .bind(user_id)
        .fetch_one(db)
        .await?;

        if owned_courses > 0 {
            return Err(AppError::conflict(anyhow!(
                "Delete your courses before deleting your account"
            )));
        }

        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(db)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("User not found")));
        }

        info!(%user_id, "Account deleted");
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn get_enrolled_courses(
        db: &PgPool,
        user_id: UserId,
    ) -> Result<Vec<EnrolledCourse>, AppError> {
        #[derive(sqlx::FromRow)]
        struct EnrolledRow {
            id: CourseId,
            name: String,
            description: String,
            thumbnail: Option<String>,
            total_seconds: f64,
            total_lectures: i64,
            completed_lectures: i64,
        }

        let rows = sqlx::query_as::<_, EnrolledRow>(
            "SELECT c.id, c.name, c.description, c.thumbnail,
                    COALESCE(SUM(s.time_duration), 0)::float8 AS total_seconds,
                    COUNT(s.id) AS total_lectures,
                    (SELECT COUNT(*) FROM completed_lectures cl
                     WHERE cl.user_id = $1 AND cl.course_id = c.id) AS completed_lectures
             FROM enrollments e
             JOIN courses c ON c.id = e.course_id
             LEFT JOIN sections sec ON sec.course_id = c.id
             LEFT JOIN subsections s ON s.section_id = sec.id
             WHERE e.user_id = $1
             GROUP BY c.id, e.enrolled_at
             ORDER BY e.enrolled_at DESC",
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| EnrolledCourse {
                id: row.id,
                name: row.name,
                description: row.description,
                thumbnail: row.thumbnail,
                total_duration: format_duration(row.total_seconds),
                progress_percentage: progress_percentage(row.completed_lectures, row.total_lectures),
                total_lectures: row.total_lectures,
                completed_lectures: row.completed_lectures,
            })
            .collect())
    }

    #[instrument(skip(db))]
    pub async fn get_instructor_dashboard(
        db: &PgPool,
        instructor_id: UserId,
    ) -> Result<Vec<InstructorCourseStats>, AppError> {
        let stats = sqlx::query_as::<_, InstructorCourseStats>(
            "SELECT c.id, c.name, c.description,
                    COUNT(e.user_id) AS total_students_enrolled,
                    COUNT(e.user_id) * c.price AS total_amount_generated
             FROM courses c
             LEFT JOIN enrollments e ON e.course_id = c.id
             WHERE c.instructor_id = $1
             GROUP BY c.id
             ORDER BY c.created_at DESC",
        )
        .bind(instructor_id)
        .fetch_all(db)
        .await?;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::fixtures::{
        create_course, create_section, create_subsection, create_user, enroll,
    };
    use axum::http::StatusCode;
    use chrono::NaiveDate;
    use coursehub_core::AccountType;
    use coursehub_models::courses::CourseStatus;

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_profile_keeps_absent_fields(pool: PgPool) {
        let user_id = create_user(&pool, AccountType::Student, false).await;

        let user = ProfileService::update_profile(
            &pool,
            user_id,
            UpdateProfileDto {
                first_name: Some(" Grace ".to_string()),
                date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 9),
                about: Some("Learning Rust".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(user.first_name, "Grace");
        assert_eq!(user.last_name, "User");
        assert_eq!(user.date_of_birth, NaiveDate::from_ymd_opt(1990, 12, 9));
        assert_eq!(user.about.as_deref(), Some("Learning Rust"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_display_picture(pool: PgPool) {
        let user_id = create_user(&pool, AccountType::Student, false).await;

        let user = ProfileService::update_display_picture(
            &pool,
            user_id,
            "https://cdn.example.com/me.png",
        )
        .await
        .unwrap();
        assert_eq!(user.image.as_deref(), Some("https://cdn.example.com/me.png"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_profile_cascades_enrollments(pool: PgPool) {
        let instructor = create_user(&pool, AccountType::Instructor, false).await;
        let student = create_user(&pool, AccountType::Student, false).await;
        let course_id = create_course(&pool, instructor, None, 100, CourseStatus::Published).await;
        enroll(&pool, student, course_id).await;

        ProfileService::delete_profile(&pool, student).await.unwrap();

        let enrollments = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM enrollments")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(enrollments, 0);

        let err = ProfileService::get_user_details(&pool, student)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_profile_instructor_with_courses_conflicts(pool: PgPool) {
        let instructor = create_user(&pool, AccountType::Instructor, false).await;
        create_course(&pool, instructor, None, 100, CourseStatus::Draft).await;

        let err = ProfileService::delete_profile(&pool, instructor)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_enrolled_courses_progress(pool: PgPool) {
        let instructor = create_user(&pool, AccountType::Instructor, false).await;
        let student = create_user(&pool, AccountType::Student, false).await;
        let course_id = create_course(&pool, instructor, None, 100, CourseStatus::Published).await;
        let section = create_section(&pool, course_id, 1).await;
        let done = create_subsection(&pool, section, 60.0, 1).await;
        create_subsection(&pool, section, 60.0, 2).await;
        create_subsection(&pool, section, 5.0, 3).await;
        let empty_course =
            create_course(&pool, instructor, None, 100, CourseStatus::Published).await;
        enroll(&pool, student, course_id).await;
        enroll(&pool, student, empty_course).await;

        sqlx::query(
            "INSERT INTO completed_lectures (user_id, course_id, subsection_id) VALUES ($1, $2, $3)",
        )
        .bind(student)
        .bind(course_id)
        .bind(done)
        .execute(&pool)
        .await
        .unwrap();

        let courses = ProfileService::get_enrolled_courses(&pool, student)
            .await
            .unwrap();
        assert_eq!(courses.len(), 2);

        let course = courses.iter().find(|c| c.id == course_id).unwrap();
        assert_eq!(course.total_lectures, 3);
        assert_eq!(course.completed_lectures, 1);
        assert_eq!(course.progress_percentage, 33.33);
        assert_eq!(course.total_duration, "2m 5s");

        let empty = courses.iter().find(|c| c.id == empty_course).unwrap();
        assert_eq!(empty.progress_percentage, 100.0);
        assert_eq!(empty.total_duration, "0s");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_instructor_dashboard_totals(pool: PgPool) {
        let instructor = create_user(&pool, AccountType::Instructor, false).await;
        let course_id = create_course(&pool, instructor, None, 250, CourseStatus::Published).await;
        for _ in 0..3 {
            let student = create_user(&pool, AccountType::Student, false).await;
            enroll(&pool, student, course_id).await;
        }

        let stats = ProfileService::get_instructor_dashboard(&pool, instructor)
            .await
            .unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].total_students_enrolled, 3);
        assert_eq!(stats[0].total_amount_generated, 750);
    }
}
