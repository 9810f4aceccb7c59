//! Seed rows and the configuration that sizes a seeding run.

use coursehub_core::AccountType;
use coursehub_models::courses::CourseStatus;
use coursehub_models::{CategoryId, CourseId, SectionId, UserId};

pub struct UserSeed {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub account_type: AccountType,
    pub is_demo: bool,
}

pub struct CategorySeed {
    pub name: String,
    pub description: String,
}

pub struct CourseSeed {
    pub name: String,
    pub description: String,
    pub what_you_will_learn: String,
    pub price: i64,
    pub tags: Vec<String>,
    pub status: CourseStatus,
    pub instructor_id: UserId,
    pub category_id: Option<CategoryId>,
}

pub struct SectionSeed {
    pub course_id: CourseId,
    pub name: String,
    pub position: i32,
}

pub struct SubSectionSeed {
    pub section_id: SectionId,
    pub title: String,
    pub description: String,
    pub time_duration: f64,
    pub video_url: String,
    pub position: i32,
}

/// Size of the generated catalog.
#[derive(Clone)]
pub struct CatalogShape {
    pub categories: usize,
    pub courses_per_instructor: usize,
    pub sections_per_course: usize,
    pub lectures_per_section: usize,
}

impl Default for CatalogShape {
    fn default() -> Self {
        Self {
            categories: 8,
            courses_per_instructor: 3,
            sections_per_course: 4,
            lectures_per_section: 5,
        }
    }
}

/// Complete configuration for database seeding.
#[derive(Clone)]
pub struct SeedConfig {
    pub instructors: usize,
    pub students: usize,
    pub enrollments_per_student: usize,
    pub catalog: CatalogShape,
    /// When set, demo instructor and student accounts are upserted with this password.
    pub demo_password: Option<String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            instructors: 5,
            students: 50,
            enrollments_per_student: 3,
            catalog: CatalogShape::default(),
            demo_password: None,
        }
    }
}

impl SeedConfig {
    pub fn new(instructors: usize, students: usize) -> Self {
        Self {
            instructors,
            students,
            ..Default::default()
        }
    }

    pub fn with_catalog(mut self, catalog: CatalogShape) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_enrollments(mut self, per_student: usize) -> Self {
        self.enrollments_per_student = per_student;
        self
    }

    pub fn with_demo_accounts(mut self, password: impl Into<String>) -> Self {
        self.demo_password = Some(password.into());
        self
    }

    pub fn total_courses(&self) -> usize {
        self.instructors * self.catalog.courses_per_instructor
    }

    pub fn total_lectures(&self) -> usize {
        self.total_courses() * self.catalog.sections_per_course * self.catalog.lectures_per_section
    }
}
