//! Courses, sections and lectures.
//!
//! A course owns an ordered list of sections; a section owns an ordered list
//! of lectures (subsections). Both orderings are by `position`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::categories::Category;
use crate::ids::{CategoryId, CourseId, SectionId, SubSectionId, UserId};
use crate::users::UserSummary;

pub const COURSE_COLUMNS: &str = "id, name, description, what_you_will_learn, price, thumbnail, \
     tags, instructions, status, instructor_id, category_id, created_at, updated_at";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "course_status", rename_all = "lowercase")]
pub enum CourseStatus {
    #[default]
    Draft,
    Published,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub description: String,
    pub what_you_will_learn: String,
    /// Price in whole currency units
    pub price: i64,
    pub thumbnail: Option<String>,
    pub tags: Vec<String>,
    pub instructions: Vec<String>,
    pub status: CourseStatus,
    pub instructor_id: UserId,
    pub category_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing view used by catalogue, search and category pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CourseSummary {
    pub id: CourseId,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub thumbnail: Option<String>,
    pub tags: Vec<String>,
    pub status: CourseStatus,
    pub instructor_id: UserId,
    pub instructor_first_name: String,
    pub instructor_last_name: String,
    pub category_id: Option<CategoryId>,
    pub average_rating: f64,
    pub students_enrolled: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Section {
    pub id: SectionId,
    pub course_id: CourseId,
    pub name: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SubSection {
    pub id: SubSectionId,
    pub section_id: SectionId,
    pub title: String,
    pub description: String,
    /// Length in seconds
    pub time_duration: f64,
    pub video_url: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A section with its lectures, video URLs included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SectionWithSubSections {
    #[serde(flatten)]
    pub section: Section,
    pub subsections: Vec<SubSection>,
}

/// Lecture as shown to visitors who have not bought the course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LectureOutline {
    pub id: SubSectionId,
    pub title: String,
    pub description: String,
    pub time_duration: f64,
}

impl From<&SubSection> for LectureOutline {
    fn from(sub: &SubSection) -> Self {
        Self {
            id: sub.id,
            title: sub.title.clone(),
            description: sub.description.clone(),
            time_duration: sub.time_duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SectionOutline {
    pub id: SectionId,
    pub name: String,
    pub position: i32,
    pub lectures: Vec<LectureOutline>,
}

impl From<&SectionWithSubSections> for SectionOutline {
    fn from(s: &SectionWithSubSections) -> Self {
        Self {
            id: s.section.id,
            name: s.section.name.clone(),
            position: s.section.position,
            lectures: s.subsections.iter().map(LectureOutline::from).collect(),
        }
    }
}

/// A course together with its full content tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CourseWithContent {
    #[serde(flatten)]
    pub course: Course,
    pub sections: Vec<SectionWithSubSections>,
}

impl CourseWithContent {
    /// Sum of every lecture's duration, in seconds.
    pub fn total_seconds(&self) -> f64 {
        self.sections
            .iter()
            .flat_map(|s| s.subsections.iter())
            .map(|sub| sub.time_duration)
            .sum()
    }

    pub fn total_lectures(&self) -> usize {
        self.sections.iter().map(|s| s.subsections.len()).sum()
    }
}

/// Public course page.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseDetails {
    pub course: Course,
    pub instructor: UserSummary,
    pub category: Option<Category>,
    pub sections: Vec<SectionOutline>,
    pub average_rating: f64,
    pub review_count: i64,
    pub students_enrolled: i64,
    pub total_duration: String,
}

/// Course page for signed-in users, with video URLs and the caller's progress.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FullCourseDetails {
    pub course: CourseWithContent,
    pub instructor: UserSummary,
    pub category: Option<Category>,
    pub total_duration: String,
    pub completed_videos: Vec<SubSectionId>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 5000))]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub what_you_will_learn: String,
    #[validate(range(min = 0))]
    pub price: i64,
    #[validate(url)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub tags: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub instructions: Vec<String>,
    pub category_id: CategoryId,
    pub status: Option<CourseStatus>,
}

/// Partial course update. Absent fields keep their current value.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct EditCourseDto {
    pub course_id: CourseId,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub description: Option<String>,
    #[validate(length(max = 5000))]
    pub what_you_will_learn: Option<String>,
    #[validate(range(min = 0))]
    pub price: Option<i64>,
    #[validate(url)]
    pub thumbnail: Option<String>,
    #[validate(length(max = 20))]
    pub tags: Option<Vec<String>>,
    #[validate(length(max = 50))]
    pub instructions: Option<Vec<String>>,
    pub category_id: Option<CategoryId>,
    pub status: Option<CourseStatus>,
}

#[derive(Debug, Clone, Copy, Deserialize, Validate, ToSchema)]
pub struct CourseIdDto {
    pub course_id: CourseId,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SearchCourseDto {
    #[validate(length(min = 1, max = 200))]
    pub search_query: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseProgressDto {
    pub course_id: CourseId,
    pub subsection_id: SubSectionId,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSectionDto {
    pub course_id: CourseId,
    #[validate(length(min = 1, max = 255))]
    pub section_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateSectionDto {
    pub course_id: CourseId,
    pub section_id: SectionId,
    #[validate(length(min = 1, max = 255))]
    pub section_name: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Validate, ToSchema)]
pub struct DeleteSectionDto {
    pub course_id: CourseId,
    pub section_id: SectionId,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSubSectionDto {
    pub section_id: SectionId,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: String,
    #[validate(range(min = 0.0))]
    pub time_duration: f64,
    #[validate(url)]
    pub video_url: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateSubSectionDto {
    pub section_id: SectionId,
    pub sub_section_id: SubSectionId,
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub time_duration: Option<f64>,
    #[validate(url)]
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Validate, ToSchema)]
pub struct DeleteSubSectionDto {
    pub section_id: SectionId,
    pub sub_section_id: SubSectionId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course() -> Course {
        let now = Utc::now();
        Course {
            id: CourseId::new(),
            name: "Rust for Pythonistas".to_string(),
            description: "Ownership without tears".to_string(),
            what_you_will_learn: String::new(),
            price: 499,
            thumbnail: None,
            tags: vec!["rust".to_string()],
            instructions: vec![],
            status: CourseStatus::Published,
            instructor_id: UserId::new(),
            category_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn lecture(section_id: SectionId, seconds: f64) -> SubSection {
        let now = Utc::now();
        SubSection {
            id: SubSectionId::new(),
            section_id,
            title: "Lecture".to_string(),
            description: String::new(),
            time_duration: seconds,
            video_url: "https://videos.example.com/1.mp4".to_string(),
            position: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn content() -> CourseWithContent {
        let course = course();
        let now = Utc::now();
        let section = Section {
            id: SectionId::new(),
            course_id: course.id,
            name: "Intro".to_string(),
            position: 1,
            created_at: now,
            updated_at: now,
        };
        let subsections = vec![lecture(section.id, 600.0), lecture(section.id, 125.5)];
        CourseWithContent {
            course,
            sections: vec![SectionWithSubSections {
                section,
                subsections,
            }],
        }
    }

    #[test]
    fn test_course_status_serde() {
        assert_eq!(
            serde_json::to_string(&CourseStatus::Published).unwrap(),
            r#""Published""#
        );
        assert_eq!(CourseStatus::default(), CourseStatus::Draft);
    }

    #[test]
    fn test_content_totals() {
        let content = content();
        assert_eq!(content.total_lectures(), 2);
        assert_eq!(content.total_seconds(), 725.5);
    }

    #[test]
    fn test_outline_hides_video_urls() {
        let content = content();
        let outline = SectionOutline::from(&content.sections[0]);
        assert_eq!(outline.lectures.len(), 2);

        let json = serde_json::to_string(&outline).unwrap();
        assert!(!json.contains("video_url"));
        assert!(!json.contains("videos.example.com"));
    }

    #[test]
    fn test_section_with_subsections_flattens_section() {
        let content = content();
        let json = serde_json::to_value(&content.sections[0]).unwrap();
        assert_eq!(json["name"], "Intro");
        assert_eq!(json["subsections"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_create_course_dto_validation() {
        let json = r#"{
            "name": "Rust",
            "description": "Learn Rust",
            "price": -1,
            "category_id": "5f1e0f5e-8f3c-4f38-9e58-3b1c3a3e9d11"
        }"#;
        let dto: CreateCourseDto = serde_json::from_str(json).unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));
    }

    #[test]
    fn test_create_course_dto_defaults() {
        let json = r#"{
            "name": "Rust",
            "description": "Learn Rust",
            "price": 0,
            "category_id": "5f1e0f5e-8f3c-4f38-9e58-3b1c3a3e9d11"
        }"#;
        let dto: CreateCourseDto = serde_json::from_str(json).unwrap();
        assert!(dto.validate().is_ok());
        assert!(dto.tags.is_empty());
        assert!(dto.status.is_none());
    }

    #[test]
    fn test_subsection_dto_rejects_negative_duration() {
        let dto = CreateSubSectionDto {
            section_id: SectionId::new(),
            title: "Borrowing".to_string(),
            description: String::new(),
            time_duration: -3.0,
            video_url: "https://videos.example.com/2.mp4".to_string(),
        };
        assert!(dto.validate().is_err());
    }
}
