use std::collections::HashMap;

use anyhow::anyhow;
use sqlx::{PgExecutor, PgPool};
use tracing::{info, instrument};

use coursehub_core::{AccountType, AppError, Page, PageParams, format_duration};
use coursehub_models::categories::Category;
use coursehub_models::courses::{
    COURSE_COLUMNS, Course, CourseDetails, CourseStatus, CourseSummary, CourseWithContent,
    CreateCourseDto, EditCourseDto, FullCourseDetails, Section, SectionOutline,
    SectionWithSubSections, SubSection, UpdateCourseProgressDto,
};
use coursehub_models::users::UserSummary;
use coursehub_models::{CategoryId, CourseId, MessageResponse, SectionId, SubSectionId, UserId};

/// Listing columns for [`CourseSummary`]. Callers append `WHERE`/`ORDER BY`.
pub(crate) const COURSE_SUMMARY_SELECT: &str = r#"SELECT
        c.id, c.name, c.description, c.price, c.thumbnail, c.tags, c.status,
        c.instructor_id,
        u.first_name AS instructor_first_name,
        u.last_name AS instructor_last_name,
        c.category_id,
        COALESCE((SELECT AVG(r.rating)::float8 FROM ratings r WHERE r.course_id = c.id), 0)
            AS average_rating,
        (SELECT COUNT(*) FROM enrollments e WHERE e.course_id = c.id) AS students_enrolled,
        c.created_at
       FROM courses c
       JOIN users u ON u.id = c.instructor_id
       LEFT JOIN categories cat ON cat.id = c.category_id"#;

const SECTION_COLUMNS: &str = "id, course_id, name, position, created_at, updated_at";
const SUBSECTION_COLUMNS: &str =
    "id, section_id, title, description, time_duration, video_url, position, created_at, updated_at";

/// Escapes `%`, `_` and `\` so user input matches literally inside `ILIKE`.
pub(crate) fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for ch in query.trim().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

pub struct CourseService;

impl CourseService {
    pub async fn find_course<'e>(
        executor: impl PgExecutor<'e>,
        course_id: CourseId,
    ) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!(
            "SELECT {} FROM courses WHERE id = $1",
            COURSE_COLUMNS
        ))
        .bind(course_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))
    }

    /// Loads the course and checks that `instructor_id` owns it.
    pub async fn find_owned_course(
        db: &PgPool,
        course_id: CourseId,
        instructor_id: UserId,
    ) -> Result<Course, AppError> {
        let course = Self::find_course(db, course_id).await?;
        if course.instructor_id != instructor_id {
            return Err(AppError::forbidden(
                "You are not the instructor of this course",
            ));
        }
        Ok(course)
    }

    pub(crate) async fn ensure_category_exists(
        db: &PgPool,
        category_id: CategoryId,
    ) -> Result<(), AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)",
        )
        .bind(category_id)
        .fetch_one(db)
        .await?;

        if !exists {
            return Err(AppError::not_found(anyhow!("Category not found")));
        }
        Ok(())
    }

    /// Attaches ordered sections and lectures to each course with two
    /// batched queries.
    pub async fn attach_content(
        db: &PgPool,
        courses: Vec<Course>,
    ) -> Result<Vec<CourseWithContent>, AppError> {
        if courses.is_empty() {
            return Ok(Vec::new());
        }

        let course_ids: Vec<CourseId> = courses.iter().map(|c| c.id).collect();

        let sections = sqlx::query_as::<_, Section>(&format!(
            "SELECT {} FROM sections WHERE course_id = ANY($1) ORDER BY position, created_at",
            SECTION_COLUMNS
        ))
        .bind(&course_ids)
        .fetch_all(db)
        .await?;

        let section_ids: Vec<SectionId> = sections.iter().map(|s| s.id).collect();

        let subsections = sqlx::query_as::<_, SubSection>(&format!(
            "SELECT {} FROM subsections WHERE section_id = ANY($1) ORDER BY position, created_at",
            SUBSECTION_COLUMNS
        ))
        .bind(&section_ids)
        .fetch_all(db)
        .await?;

        let mut lectures: HashMap<SectionId, Vec<SubSection>> = HashMap::new();
        for sub in subsections {
            lectures.entry(sub.section_id).or_default().push(sub);
        }

        let mut by_course: HashMap<CourseId, Vec<SectionWithSubSections>> = HashMap::new();
        for section in sections {
            let subsections = lectures.remove(&section.id).unwrap_or_default();
            by_course
                .entry(section.course_id)
                .or_default()
                .push(SectionWithSubSections {
                    section,
                    subsections,
                });
        }

        Ok(courses
            .into_iter()
            .map(|course| CourseWithContent {
                sections: by_course.remove(&course.id).unwrap_or_default(),
                course,
            })
            .collect())
    }

    pub async fn load_content(db: &PgPool, course: Course) -> Result<CourseWithContent, AppError> {
        Self::attach_content(db, vec![course])
            .await?
            .pop()
            .ok_or_else(|| AppError::internal_error("Course content could not be loaded"))
    }

    pub(crate) async fn load_section(
        db: &PgPool,
        section: Section,
    ) -> Result<SectionWithSubSections, AppError> {
        let subsections = sqlx::query_as::<_, SubSection>(&format!(
            "SELECT {} FROM subsections WHERE section_id = $1 ORDER BY position, created_at",
            SUBSECTION_COLUMNS
        ))
        .bind(section.id)
        .fetch_all(db)
        .await?;

        Ok(SectionWithSubSections {
            section,
            subsections,
        })
    }

    async fn instructor_summary(db: &PgPool, user_id: UserId) -> Result<UserSummary, AppError> {
        sqlx::query_as::<_, UserSummary>(
            "SELECT id, first_name, last_name, image, about FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_one(db)
        .await
        .map_err(AppError::from)
    }

    async fn category(
        db: &PgPool,
        category_id: Option<CategoryId>,
    ) -> Result<Option<Category>, AppError> {
        let Some(category_id) = category_id else {
            return Ok(None);
        };

        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at, updated_at FROM categories WHERE id = $1",
        )
        .bind(category_id)
        .fetch_optional(db)
        .await?;

        Ok(category)
    }

    #[instrument(skip(db, dto))]
    pub async fn create_course(
        db: &PgPool,
        instructor_id: UserId,
        dto: CreateCourseDto,
    ) -> Result<Course, AppError> {
        Self::ensure_category_exists(db, dto.category_id).await?;

        let tags: Vec<String> = dto
            .tags
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let course = sqlx::query_as::<_, Course>(&format!(
            "INSERT INTO courses
                (name, description, what_you_will_learn, price, thumbnail, tags, instructions,
                 status, instructor_id, category_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {}",
            COURSE_COLUMNS
        ))
        .bind(dto.name.trim())
        .bind(&dto.description)
        .bind(&dto.what_you_will_learn)
        .bind(dto.price)
        .bind(&dto.thumbnail)
        .bind(&tags)
        .bind(&dto.instructions)
        .bind(dto.status.unwrap_or_default())
        .bind(instructor_id)
        .bind(dto.category_id)
        .fetch_one(db)
        .await?;

        info!(course_id = %course.id, %instructor_id, "Course created");
        Ok(course)
    }

    #[instrument(skip(db, dto), fields(course_id = %dto.course_id))]
    pub async fn edit_course(
        db: &PgPool,
        instructor_id: UserId,
        dto: EditCourseDto,
    ) -> Result<CourseWithContent, AppError> {
        Self::find_owned_course(db, dto.course_id, instructor_id).await?;

        if let Some(category_id) = dto.category_id {
            Self::ensure_category_exists(db, category_id).await?;
        }

        let course = sqlx::query_as::<_, Course>(&format!(
            "UPDATE courses SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                what_you_will_learn = COALESCE($4, what_you_will_learn),
                price = COALESCE($5, price),
                thumbnail = COALESCE($6, thumbnail),
                tags = COALESCE($7, tags),
                instructions = COALESCE($8, instructions),
                category_id = COALESCE($9, category_id),
                status = COALESCE($10, status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            COURSE_COLUMNS
        ))
        .bind(dto.course_id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(&dto.description)
        .bind(&dto.what_you_will_learn)
        .bind(dto.price)
        .bind(&dto.thumbnail)
        .bind(&dto.tags)
        .bind(&dto.instructions)
        .bind(dto.category_id)
        .bind(dto.status)
        .fetch_one(db)
        .await?;

        Self::load_content(db, course).await
    }

    #[instrument(skip(db))]
    pub async fn get_all_courses(
        db: &PgPool,
        params: PageParams,
    ) -> Result<Page<CourseSummary>, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM courses WHERE status = $1",
        )
        .bind(CourseStatus::Published)
        .fetch_one(db)
        .await?;

        let courses = sqlx::query_as::<_, CourseSummary>(&format!(
            "{} WHERE c.status = $1 ORDER BY c.created_at DESC LIMIT $2 OFFSET $3",
            COURSE_SUMMARY_SELECT
        ))
        .bind(CourseStatus::Published)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;

        Ok(Page::new(courses, &params, total))
    }

    #[instrument(skip(db))]
    pub async fn get_course_details(
        db: &PgPool,
        course_id: CourseId,
    ) -> Result<CourseDetails, AppError> {
        let course = Self::find_course(db, course_id).await?;
        if course.status != CourseStatus::Published {
            return Err(AppError::not_found(anyhow!("Course not found")));
        }
        let instructor = Self::instructor_summary(db, course.instructor_id).await?;
        let category = Self::category(db, course.category_id).await?;

        let (average_rating, review_count) = sqlx::query_as::<_, (f64, i64)>(
            "SELECT COALESCE(AVG(rating)::float8, 0), COUNT(*) FROM ratings WHERE course_id = $1",
        )
        .bind(course_id)
        .fetch_one(db)
        .await?;

        let students_enrolled = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM enrollments WHERE course_id = $1",
        )
        .bind(course_id)
        .fetch_one(db)
        .await?;

        let content = Self::load_content(db, course).await?;
        let total_duration = format_duration(content.total_seconds());

        Ok(CourseDetails {
            sections: content.sections.iter().map(SectionOutline::from).collect(),
            course: content.course,
            instructor,
            category,
            average_rating,
            review_count,
            students_enrolled,
            total_duration,
        })
    }

    /// Lecture videos are only served to the owning instructor, admins and
    /// enrolled students.
    #[instrument(skip(db))]
    pub async fn get_full_course_details(
        db: &PgPool,
        user_id: UserId,
        account_type: AccountType,
        course_id: CourseId,
    ) -> Result<FullCourseDetails, AppError> {
        let course = Self::find_course(db, course_id).await?;

        if account_type != AccountType::Admin && course.instructor_id != user_id {
            let enrolled = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM enrollments WHERE user_id = $1 AND course_id = $2)",
            )
            .bind(user_id)
            .bind(course_id)
            .fetch_one(db)
            .await?;

            if !enrolled {
                return Err(AppError::forbidden("You are not enrolled in this course"));
            }
        }

        let instructor = Self::instructor_summary(db, course.instructor_id).await?;
        let category = Self::category(db, course.category_id).await?;

        let completed_videos = sqlx::query_scalar::<_, SubSectionId>(
            "SELECT subsection_id FROM completed_lectures
             WHERE user_id = $1 AND course_id = $2
             ORDER BY completed_at",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_all(db)
        .await?;

        let content = Self::load_content(db, course).await?;

        Ok(FullCourseDetails {
            total_duration: format_duration(content.total_seconds()),
            course: content,
            instructor,
            category,
            completed_videos,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_instructor_courses(
        db: &PgPool,
        instructor_id: UserId,
    ) -> Result<Vec<CourseWithContent>, AppError> {
        let courses = sqlx::query_as::<_, Course>(&format!(
            "SELECT {} FROM courses WHERE instructor_id = $1 ORDER BY created_at DESC",
            COURSE_COLUMNS
        ))
        .bind(instructor_id)
        .fetch_all(db)
        .await?;

        Self::attach_content(db, courses).await
    }

    /// Deletes the course with its sections, lectures, enrollments,
    /// progress and ratings.
    #[instrument(skip(db))]
    pub async fn delete_course(db: &PgPool, course_id: CourseId) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(course_id)
            .execute(db)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Course not found")));
        }

        info!(%course_id, "Course deleted");
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn search_courses(
        db: &PgPool,
        search_query: &str,
    ) -> Result<Vec<CourseSummary>, AppError> {
        let pattern = like_pattern(search_query);

        let courses = sqlx::query_as::<_, CourseSummary>(&format!(
            "{} WHERE c.status = $1 AND (
                c.name ILIKE $2
                OR c.description ILIKE $2
                OR cat.name ILIKE $2
                OR EXISTS (SELECT 1 FROM unnest(c.tags) AS tag WHERE tag ILIKE $2)
             )
             ORDER BY c.created_at DESC",
            COURSE_SUMMARY_SELECT
        ))
        .bind(CourseStatus::Published)
        .bind(&pattern)
        .fetch_all(db)
        .await?;

        Ok(courses)
    }

    #[instrument(skip(db))]
    pub async fn update_course_progress(
        db: &PgPool,
        user_id: UserId,
        dto: UpdateCourseProgressDto,
    ) -> Result<MessageResponse, AppError> {
        let enrolled = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE user_id = $1 AND course_id = $2)",
        )
        .bind(user_id)
        .bind(dto.course_id)
        .fetch_one(db)
        .await?;

        if !enrolled {
            return Err(AppError::not_found(anyhow!(
                "Student is not enrolled in this course"
            )));
        }

        let belongs = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM subsections s
                JOIN sections sec ON sec.id = s.section_id
                WHERE s.id = $1 AND sec.course_id = $2
             )",
        )
        .bind(dto.subsection_id)
        .bind(dto.course_id)
        .fetch_one(db)
        .await?;

        if !belongs {
            return Err(AppError::not_found(anyhow!("Subsection not found")));
        }

        let inserted = sqlx::query(
            "INSERT INTO completed_lectures (user_id, course_id, subsection_id)
             VALUES ($1, $2, $3)
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(dto.course_id)
        .bind(dto.subsection_id)
        .execute(db)
        .await?;

        if inserted.rows_affected() == 0 {
            return Err(AppError::bad_request(anyhow!("Subsection already completed")));
        }

        Ok(MessageResponse::new("Course progress updated"))
    }
}
