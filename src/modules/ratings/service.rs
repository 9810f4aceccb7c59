use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument};

use coursehub_core::{AppError, Page, PageParams};
use coursehub_models::ratings::{AverageRatingResponse, CreateRatingDto, Rating, ReviewDetails};
use coursehub_models::{CourseId, UserId};

pub struct RatingService;

impl RatingService {
    #[instrument(skip(db, dto), fields(course_id = %dto.course_id))]
    pub async fn create_rating(
        db: &PgPool,
        user_id: UserId,
        dto: CreateRatingDto,
    ) -> Result<Rating, AppError> {
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

        let rating = sqlx::query_as::<_, Rating>(
            "INSERT INTO ratings (user_id, course_id, rating, review)
             VALUES ($1, $2, $3, $4)
             RETURNING id, user_id, course_id, rating, review, created_at",
        )
        .bind(user_id)
        .bind(dto.course_id)
        .bind(dto.rating)
        .bind(dto.review.trim())
        .fetch_one(db)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "Course is already reviewed by the user"))?;

        info!(rating_id = %rating.id, "Rating created");
        Ok(rating)
    }

    #[instrument(skip(db))]
    pub async fn get_average_rating(
        db: &PgPool,
        course_id: CourseId,
    ) -> Result<AverageRatingResponse, AppError> {
        let (average_rating, total_ratings) = sqlx::query_as::<_, (f64, i64)>(
            "SELECT COALESCE(AVG(rating)::float8, 0), COUNT(*) FROM ratings WHERE course_id = $1",
        )
        .bind(course_id)
        .fetch_one(db)
        .await?;

        Ok(AverageRatingResponse {
            course_id,
            average_rating,
            total_ratings,
        })
    }

    /// All reviews, highest rating first.
    #[instrument(skip(db))]
    pub async fn get_reviews(
        db: &PgPool,
        params: PageParams,
    ) -> Result<Page<ReviewDetails>, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM ratings")
            .fetch_one(db)
            .await?;

        let reviews = sqlx::query_as::<_, ReviewDetails>(
            "SELECT r.id, r.rating, r.review, r.created_at,
                    u.id AS user_id, u.first_name, u.last_name, u.image,
                    c.id AS course_id, c.name AS course_name
             FROM ratings r
             JOIN users u ON u.id = r.user_id
             JOIN courses c ON c.id = r.course_id
             ORDER BY r.rating DESC, r.created_at DESC
             LIMIT $1 OFFSET $2",
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;

        Ok(Page::new(reviews, &params, total))
    }
}
