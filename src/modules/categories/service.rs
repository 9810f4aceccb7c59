use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument};

use coursehub_core::AppError;
use coursehub_models::categories::{
    AddCourseToCategoryDto, Category, CategoryPageDetails, CategoryWithCourses, CreateCategoryDto,
};
use coursehub_models::courses::{CourseStatus, CourseSummary};
use coursehub_models::{CategoryId, MessageResponse, UserId};

use crate::modules::courses::service::{COURSE_SUMMARY_SELECT, CourseService};

const CATEGORY_COLUMNS: &str = "id, name, description, created_at, updated_at";
const MOST_SELLING_LIMIT: i64 = 10;

pub struct CategoryService;

impl CategoryService {
    #[instrument(skip(db, dto), fields(name = %dto.name))]
    pub async fn create_category(db: &PgPool, dto: CreateCategoryDto) -> Result<Category, AppError> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "INSERT INTO categories (name, description) VALUES ($1, $2) RETURNING {}",
            CATEGORY_COLUMNS
        ))
        .bind(dto.name.trim())
        .bind(&dto.description)
        .fetch_one(db)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "Category already exists"))?;

        info!(category_id = %category.id, "Category created");
        Ok(category)
    }

    #[instrument(skip(db))]
    pub async fn show_all_categories(db: &PgPool) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            "SELECT {} FROM categories ORDER BY name",
            CATEGORY_COLUMNS
        ))
        .fetch_all(db)
        .await?;

        Ok(categories)
    }

    async fn published_courses(
        db: &PgPool,
        category_id: CategoryId,
    ) -> Result<Vec<CourseSummary>, AppError> {
        let courses = sqlx::query_as::<_, CourseSummary>(&format!(
            "{} WHERE c.status = $1 AND c.category_id = $2 ORDER BY c.created_at DESC",
            COURSE_SUMMARY_SELECT
        ))
        .bind(CourseStatus::Published)
        .bind(category_id)
        .fetch_all(db)
        .await?;

        Ok(courses)
    }

    /// Selected category, one random other category and the overall top
    /// sellers.
    #[instrument(skip(db))]
    pub async fn get_category_page_details(
        db: &PgPool,
        category_id: CategoryId,
    ) -> Result<CategoryPageDetails, AppError> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {} FROM categories WHERE id = $1",
            CATEGORY_COLUMNS
        ))
        .bind(category_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Category not found")))?;

        let courses = Self::published_courses(db, category_id).await?;
        if courses.is_empty() {
            return Err(AppError::not_found(anyhow!(
                "No courses found for the selected category"
            )));
        }

        let other = sqlx::query_as::<_, Category>(&format!(
            "SELECT {} FROM categories WHERE id <> $1 ORDER BY random() LIMIT 1",
            CATEGORY_COLUMNS
        ))
        .bind(category_id)
        .fetch_optional(db)
        .await?;

        let different_category = match other {
            Some(category) => {
                let courses = Self::published_courses(db, category.id).await?;
                Some(CategoryWithCourses { category, courses })
            }
            None => None,
        };

        let most_selling_courses = sqlx::query_as::<_, CourseSummary>(&format!(
            "{} WHERE c.status = $1 ORDER BY students_enrolled DESC, c.created_at DESC LIMIT $2",
            COURSE_SUMMARY_SELECT
        ))
        .bind(CourseStatus::Published)
        .bind(MOST_SELLING_LIMIT)
        .fetch_all(db)
        .await?;

        Ok(CategoryPageDetails {
            selected_category: CategoryWithCourses { category, courses },
            different_category,
            most_selling_courses,
        })
    }

    #[instrument(skip(db))]
    pub async fn add_course_to_category(
        db: &PgPool,
        instructor_id: UserId,
        dto: AddCourseToCategoryDto,
    ) -> Result<MessageResponse, AppError> {
        let course = CourseService::find_owned_course(db, dto.course_id, instructor_id).await?;
        CourseService::ensure_category_exists(db, dto.category_id).await?;

        if course.category_id == Some(dto.category_id) {
            return Ok(MessageResponse::new("Course already exists in the category"));
        }

        sqlx::query("UPDATE courses SET category_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(dto.course_id)
            .bind(dto.category_id)
            .execute(db)
            .await?;

        Ok(MessageResponse::new("Course added to category"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::fixtures::{create_category, create_course, create_user, enroll};
    use axum::http::StatusCode;
    use coursehub_core::AccountType;

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_category_duplicate_conflicts(pool: PgPool) {
        let dto = CreateCategoryDto {
            name: "Web Development".to_string(),
            description: Some("HTML, CSS and friends".to_string()),
        };

        CategoryService::create_category(&pool, dto.clone()).await.unwrap();
        let err = CategoryService::create_category(&pool, dto).await.unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_show_all_categories_sorted(pool: PgPool) {
        create_category(&pool, "Web").await;
        create_category(&pool, "AI").await;

        let names: Vec<String> = CategoryService::show_all_categories(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["AI", "Web"]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_category_page_details(pool: PgPool) {
        let instructor = create_user(&pool, AccountType::Instructor, false).await;
        let student = create_user(&pool, AccountType::Student, false).await;
        let web = create_category(&pool, "Web").await;
        let ai = create_category(&pool, "AI").await;
        let web_course =
            create_course(&pool, instructor, Some(web), 100, CourseStatus::Published).await;
        let ai_course = create_course(&pool, instructor, Some(ai), 100, CourseStatus::Published).await;
        create_course(&pool, instructor, Some(web), 100, CourseStatus::Draft).await;
        enroll(&pool, student, ai_course).await;

        let page = CategoryService::get_category_page_details(&pool, web)
            .await
            .unwrap();

        assert_eq!(page.selected_category.category.id, web);
        assert_eq!(page.selected_category.courses.len(), 1);
        assert_eq!(page.selected_category.courses[0].id, web_course);

        let different = page.different_category.unwrap();
        assert_eq!(different.category.id, ai);

        assert_eq!(page.most_selling_courses[0].id, ai_course);
        assert_eq!(page.most_selling_courses[0].students_enrolled, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_category_page_without_published_courses(pool: PgPool) {
        let empty = create_category(&pool, "Empty").await;

        let err = CategoryService::get_category_page_details(&pool, empty)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err = CategoryService::get_category_page_details(&pool, CategoryId::new())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_add_course_to_category(pool: PgPool) {
        let instructor = create_user(&pool, AccountType::Instructor, false).await;
        let category = create_category(&pool, "Design").await;
        let course_id = create_course(&pool, instructor, None, 100, CourseStatus::Draft).await;
        let dto = AddCourseToCategoryDto {
            category_id: category,
            course_id,
        };

        let added = CategoryService::add_course_to_category(&pool, instructor, dto)
            .await
            .unwrap();
        assert_eq!(added.message, "Course added to category");

        let again = CategoryService::add_course_to_category(&pool, instructor, dto)
            .await
            .unwrap();
        assert_eq!(again.message, "Course already exists in the category");

        let intruder = create_user(&pool, AccountType::Instructor, false).await;
        let err = CategoryService::add_course_to_category(&pool, intruder, dto)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }
}
