use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::courses::CourseSummary;
use crate::ids::{CategoryId, CourseId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Validate, ToSchema)]
pub struct CategoryPageDto {
    pub category_id: CategoryId,
}

#[derive(Debug, Clone, Copy, Deserialize, Validate, ToSchema)]
pub struct AddCourseToCategoryDto {
    pub category_id: CategoryId,
    pub course_id: CourseId,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryWithCourses {
    pub category: Category,
    pub courses: Vec<CourseSummary>,
}

/// Everything the category landing page shows.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryPageDetails {
    pub selected_category: CategoryWithCourses,
    /// A randomly picked other category, if any exists
    pub different_category: Option<CategoryWithCourses>,
    /// Top sellers across every category
    pub most_selling_courses: Vec<CourseSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_category_requires_name() {
        let dto = CreateCategoryDto {
            name: String::new(),
            description: None,
        };
        assert!(dto.validate().is_err());

        let dto = CreateCategoryDto {
            name: "Web Development".to_string(),
            description: Some("HTML, CSS and friends".to_string()),
        };
        assert!(dto.validate().is_ok());
    }
}
