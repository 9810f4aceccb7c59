//! Sections and lectures inside a course.
//!
//! Only the instructor who owns the course may change its content. New
//! sections and lectures are appended after the current last position.

use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument};

use coursehub_core::AppError;
use coursehub_models::courses::{
    CourseWithContent, CreateSectionDto, CreateSubSectionDto, DeleteSectionDto,
    DeleteSubSectionDto, Section, SectionWithSubSections, UpdateSectionDto, UpdateSubSectionDto,
};
use coursehub_models::{CourseId, SectionId, UserId};

use super::service::CourseService;

pub struct SectionService;

impl SectionService {
    async fn touch_course(
        tx: &mut sqlx::PgConnection,
        course_id: CourseId,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE courses SET updated_at = NOW() WHERE id = $1")
            .bind(course_id)
            .execute(tx)
            .await?;
        Ok(())
    }

    async fn reload_course(db: &PgPool, course_id: CourseId) -> Result<CourseWithContent, AppError> {
        let course = CourseService::find_course(db, course_id).await?;
        CourseService::load_content(db, course).await
    }

    /// Loads a section and checks that `instructor_id` owns its course.
    async fn find_owned_section(
        db: &PgPool,
        section_id: SectionId,
        instructor_id: UserId,
    ) -> Result<Section, AppError> {
        #[derive(sqlx::FromRow)]
        struct OwnedSection {
            #[sqlx(flatten)]
            section: Section,
            instructor_id: UserId,
        }

        let owned = sqlx::query_as::<_, OwnedSection>(
            "SELECT s.id, s.course_id, s.name, s.position, s.created_at, s.updated_at,
                    c.instructor_id
             FROM sections s
             JOIN courses c ON c.id = s.course_id
             WHERE s.id = $1",
        )
        .bind(section_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Section not found")))?;

        if owned.instructor_id != instructor_id {
            return Err(AppError::forbidden(
                "You are not the instructor of this course",
            ));
        }

        Ok(owned.section)
    }

    #[instrument(skip(db, dto), fields(course_id = %dto.course_id))]
    pub async fn create_section(
        db: &PgPool,
        instructor_id: UserId,
        dto: CreateSectionDto,
    ) -> Result<CourseWithContent, AppError> {
        CourseService::find_owned_course(db, dto.course_id, instructor_id).await?;

        let mut tx = db.begin().await?;

        sqlx::query(
            "INSERT INTO sections (course_id, name, position)
             VALUES ($1, $2,
                     COALESCE((SELECT MAX(position) FROM sections WHERE course_id = $1), 0) + 1)",
        )
        .bind(dto.course_id)
        .bind(dto.section_name.trim())
        .execute(&mut *tx)
        .await?;

        Self::touch_course(&mut tx, dto.course_id).await?;
        tx.commit().await?;

        Self::reload_course(db, dto.course_id).await
    }

    #[instrument(skip(db, dto), fields(section_id = %dto.section_id))]
    pub async fn update_section(
        db: &PgPool,
        instructor_id: UserId,
        dto: UpdateSectionDto,
    ) -> Result<CourseWithContent, AppError> {
        CourseService::find_owned_course(db, dto.course_id, instructor_id).await?;

        let updated = sqlx::query(
            "UPDATE sections SET name = $3, updated_at = NOW()
             WHERE id = $1 AND course_id = $2",
        )
        .bind(dto.section_id)
        .bind(dto.course_id)
        .bind(dto.section_name.trim())
        .execute(db)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Section not found")));
        }

        Self::reload_course(db, dto.course_id).await
    }

    #[instrument(skip(db, dto), fields(section_id = %dto.section_id))]
    pub async fn delete_section(
        db: &PgPool,
        instructor_id: UserId,
        dto: DeleteSectionDto,
    ) -> Result<CourseWithContent, AppError> {
        CourseService::find_owned_course(db, dto.course_id, instructor_id).await?;

        let mut tx = db.begin().await?;

        let deleted = sqlx::query("DELETE FROM sections WHERE id = $1 AND course_id = $2")
            .bind(dto.section_id)
            .bind(dto.course_id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Section not found")));
        }

        Self::touch_course(&mut tx, dto.course_id).await?;
        tx.commit().await?;

        info!(section_id = %dto.section_id, "Section deleted");
        Self::reload_course(db, dto.course_id).await
    }

    #[instrument(skip(db, dto), fields(section_id = %dto.section_id))]
    pub async fn create_subsection(
        db: &PgPool,
        instructor_id: UserId,
        dto: CreateSubSectionDto,
    ) -> Result<SectionWithSubSections, AppError> {
        let section = Self::find_owned_section(db, dto.section_id, instructor_id).await?;

        sqlx::query(
            "INSERT INTO subsections (section_id, title, description, time_duration, video_url, position)
             VALUES ($1, $2, $3, $4, $5,
                     COALESCE((SELECT MAX(position) FROM subsections WHERE section_id = $1), 0) + 1)",
        )
        .bind(section.id)
        .bind(dto.title.trim())
        .bind(&dto.description)
        .bind(dto.time_duration)
        .bind(&dto.video_url)
        .execute(db)
        .await?;

        CourseService::load_section(db, section).await
    }

    #[instrument(skip(db, dto), fields(sub_section_id = %dto.sub_section_id))]
    pub async fn update_subsection(
        db: &PgPool,
        instructor_id: UserId,
        dto: UpdateSubSectionDto,
    ) -> Result<SectionWithSubSections, AppError> {
        let section = Self::find_owned_section(db, dto.section_id, instructor_id).await?;

        let updated = sqlx::query(
            "UPDATE subsections SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                time_duration = COALESCE($5, time_duration),
                video_url = COALESCE($6, video_url),
                updated_at = NOW()
             WHERE id = $1 AND section_id = $2",
        )
        .bind(dto.sub_section_id)
        .bind(section.id)
        .bind(dto.title.as_deref().map(str::trim))
        .bind(&dto.description)
        .bind(dto.time_duration)
        .bind(&dto.video_url)
        .execute(db)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Subsection not found")));
        }

        CourseService::load_section(db, section).await
    }

    #[instrument(skip(db, dto), fields(sub_section_id = %dto.sub_section_id))]
    pub async fn delete_subsection(
        db: &PgPool,
        instructor_id: UserId,
        dto: DeleteSubSectionDto,
    ) -> Result<SectionWithSubSections, AppError> {
        let section = Self::find_owned_section(db, dto.section_id, instructor_id).await?;

        let deleted = sqlx::query("DELETE FROM subsections WHERE id = $1 AND section_id = $2")
            .bind(dto.sub_section_id)
            .bind(section.id)
            .execute(db)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Subsection not found")));
        }

        CourseService::load_section(db, section).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::fixtures::{create_course, create_section, create_subsection, create_user};
    use axum::http::StatusCode;
    use coursehub_core::AccountType;
    use coursehub_models::courses::CourseStatus;

    async fn owned_course(pool: &PgPool) -> (UserId, CourseId) {
        let instructor = create_user(pool, AccountType::Instructor, false).await;
        let course_id = create_course(pool, instructor, None, 100, CourseStatus::Draft).await;
        (instructor, course_id)
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_sections_are_appended(pool: PgPool) {
        let (instructor, course_id) = owned_course(&pool).await;

        for name in ["Basics", "Advanced"] {
            SectionService::create_section(
                &pool,
                instructor,
                CreateSectionDto {
                    course_id,
                    section_name: name.to_string(),
                },
            )
            .await
            .unwrap();
        }

        let course = SectionService::create_section(
            &pool,
            instructor,
            CreateSectionDto {
                course_id,
                section_name: "Capstone".to_string(),
            },
        )
        .await
        .unwrap();

        let names: Vec<&str> = course
            .sections
            .iter()
            .map(|s| s.section.name.as_str())
            .collect();
        assert_eq!(names, ["Basics", "Advanced", "Capstone"]);
        assert_eq!(course.sections[2].section.position, 3);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_section_requires_owner(pool: PgPool) {
        let (_, course_id) = owned_course(&pool).await;
        let intruder = create_user(&pool, AccountType::Instructor, false).await;

        let err = SectionService::create_section(
            &pool,
            intruder,
            CreateSectionDto {
                course_id,
                section_name: "Hijack".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_and_delete_section(pool: PgPool) {
        let (instructor, course_id) = owned_course(&pool).await;
        let section_id = create_section(&pool, course_id, 1).await;
        create_subsection(&pool, section_id, 60.0, 1).await;

        let course = SectionService::update_section(
            &pool,
            instructor,
            UpdateSectionDto {
                course_id,
                section_id,
                section_name: "Renamed".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(course.sections[0].section.name, "Renamed");

        let course = SectionService::delete_section(
            &pool,
            instructor,
            DeleteSectionDto {
                course_id,
                section_id,
            },
        )
        .await
        .unwrap();
        assert!(course.sections.is_empty());

        let lectures = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subsections")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(lectures, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_section_from_other_course_not_found(pool: PgPool) {
        let (instructor, course_id) = owned_course(&pool).await;
        let other_course = create_course(&pool, instructor, None, 100, CourseStatus::Draft).await;
        let section_id = create_section(&pool, other_course, 1).await;

        let err = SectionService::delete_section(
            &pool,
            instructor,
            DeleteSectionDto {
                course_id,
                section_id,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_subsection_lifecycle(pool: PgPool) {
        let (instructor, course_id) = owned_course(&pool).await;
        let section_id = create_section(&pool, course_id, 1).await;

        let section = SectionService::create_subsection(
            &pool,
            instructor,
            CreateSubSectionDto {
                section_id,
                title: "Intro".to_string(),
                description: String::new(),
                time_duration: 90.0,
                video_url: "https://videos.example.com/intro.mp4".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(section.subsections.len(), 1);
        let lecture = section.subsections[0].id;

        let section = SectionService::update_subsection(
            &pool,
            instructor,
            UpdateSubSectionDto {
                section_id,
                sub_section_id: lecture,
                title: None,
                description: Some("What we will cover".to_string()),
                time_duration: Some(120.0),
                video_url: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(section.subsections[0].title, "Intro");
        assert_eq!(section.subsections[0].time_duration, 120.0);

        let section = SectionService::delete_subsection(
            &pool,
            instructor,
            DeleteSubSectionDto {
                section_id,
                sub_section_id: lecture,
            },
        )
        .await
        .unwrap();
        assert!(section.subsections.is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_subsection_requires_owner(pool: PgPool) {
        let (_, course_id) = owned_course(&pool).await;
        let section_id = create_section(&pool, course_id, 1).await;
        let intruder = create_user(&pool, AccountType::Instructor, false).await;

        let err = SectionService::create_subsection(
            &pool,
            intruder,
            CreateSubSectionDto {
                section_id,
                title: "Spam".to_string(),
                description: String::new(),
                time_duration: 1.0,
                video_url: "https://videos.example.com/spam.mp4".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }
}
