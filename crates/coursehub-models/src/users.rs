//! User entities, auth DTOs and profile DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use coursehub_core::AccountType;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::ids::{CourseId, UserId};

/// Column list matching [`User`], for `SELECT`/`RETURNING` clauses.
pub const USER_COLUMNS: &str = "id, first_name, last_name, email, account_type, is_demo, image, \
     gender, date_of_birth, about, contact_number, created_at, updated_at";

/// A user with profile details. The password hash is never part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub account_type: AccountType,
    pub is_demo: bool,
    /// Display picture URL
    pub image: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub about: Option<String>,
    pub contact_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Public view of a user attached to courses and reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserSummary {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub image: Option<String>,
    pub about: Option<String>,
}

fn validate_self_service(account_type: &AccountType) -> Result<(), ValidationError> {
    if account_type.is_self_service() {
        Ok(())
    } else {
        Err(ValidationError::new("account_type")
            .with_message("Only Student or Instructor accounts can sign up".into()))
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignupDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    #[schema(example = "password123")]
    pub password: String,
    pub confirm_password: String,
    pub account_type: AccountType,
    #[validate(length(min = 5, max = 20))]
    pub contact_number: Option<String>,
}

impl SignupDto {
    pub fn passwords_match(&self) -> bool {
        self.password == self.confirm_password
    }

    /// Admin accounts are created from the CLI only.
    pub fn check_account_type(&self) -> Result<(), ValidationError> {
        validate_self_service(&self.account_type)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

/// Partial profile update. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(length(max = 32))]
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(max = 1000))]
    pub about: Option<String>,
    #[validate(length(min = 5, max = 20))]
    pub contact_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateDisplayPictureDto {
    #[validate(url)]
    #[schema(example = "https://cdn.example.com/avatars/jane.png")]
    pub image_url: String,
}

/// A course the caller is enrolled in, with their progress.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EnrolledCourse {
    pub id: CourseId,
    pub name: String,
    pub description: String,
    pub thumbnail: Option<String>,
    pub total_duration: String,
    pub total_lectures: i64,
    pub completed_lectures: i64,
    pub progress_percentage: f64,
}

/// Per-course figures for the instructor dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct InstructorCourseStats {
    pub id: CourseId,
    pub name: String,
    pub description: String,
    pub total_students_enrolled: i64,
    /// Students enrolled times the course price
    pub total_amount_generated: i64,
}
