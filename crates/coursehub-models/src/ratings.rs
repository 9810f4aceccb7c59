use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::{CourseId, RatingId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Rating {
    pub id: RatingId,
    pub user_id: UserId,
    pub course_id: CourseId,
    pub rating: i16,
    pub review: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRatingDto {
    pub course_id: CourseId,
    #[validate(range(min = 1, max = 5))]
    #[schema(minimum = 1, maximum = 5)]
    pub rating: i16,
    #[validate(length(min = 1, max = 2000))]
    pub review: String,
}

#[derive(Debug, Clone, Copy, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AverageRatingQuery {
    pub course_id: CourseId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AverageRatingResponse {
    pub course_id: CourseId,
    /// `0.0` when the course has no ratings yet
    pub average_rating: f64,
    pub total_ratings: i64,
}

/// A rating joined with its author and course, for review carousels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ReviewDetails {
    pub id: RatingId,
    pub rating: i16,
    pub review: String,
    pub created_at: DateTime<Utc>,
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub image: Option<String>,
    pub course_id: CourseId,
    pub course_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(rating: i16) -> CreateRatingDto {
        CreateRatingDto {
            course_id: CourseId::new(),
            rating,
            review: "Clear and well paced".to_string(),
        }
    }

    #[test]
    fn test_rating_bounds() {
        assert!(dto(0).validate().is_err());
        assert!(dto(1).validate().is_ok());
        assert!(dto(5).validate().is_ok());
        assert!(dto(6).validate().is_err());
    }

    #[test]
    fn test_review_required() {
        let dto = CreateRatingDto {
            review: String::new(),
            ..dto(4)
        };
        assert!(dto.validate().is_err());
    }
}
