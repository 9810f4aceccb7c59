use std::collections::BTreeSet;

use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use coursehub_core::AppError;
use coursehub_models::courses::CourseStatus;
use coursehub_models::payments::{
    CapturePaymentDto, CapturePaymentResponse, PaymentStatus, PaymentSuccessEmailDto,
    VerifyPaymentDto, VerifyPaymentResponse,
};
use coursehub_models::{CourseId, MessageResponse, UserId};
use coursehub_observability::{
    track_enrollments, track_payment_captured, track_payment_verification,
};

use crate::modules::payments::gateway::{PaymentGateway, verify_signature};
use crate::utils::email::EmailService;

/// Prices are stored in whole units; the gateway expects minor units.
const MINOR_UNITS: i64 = 100;

#[derive(sqlx::FromRow)]
struct Recipient {
    first_name: String,
    last_name: String,
    email: String,
}

impl Recipient {
    fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

async fn find_recipient(db: &PgPool, user_id: UserId) -> Result<Recipient, AppError> {
    sqlx::query_as::<_, Recipient>(
        "SELECT first_name, last_name, email FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
}

fn unique_courses(courses: &[CourseId]) -> Vec<CourseId> {
    courses
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub struct PaymentService;

impl PaymentService {
    /// Prices the requested courses and opens a gateway order for them.
    #[instrument(skip(db, gateway, dto))]
    pub async fn capture_payment(
        db: &PgPool,
        gateway: &dyn PaymentGateway,
        currency: &str,
        user_id: UserId,
        dto: CapturePaymentDto,
    ) -> Result<CapturePaymentResponse, AppError> {
        let course_ids = unique_courses(&dto.courses);

        let courses = sqlx::query_as::<_, (CourseId, i64, CourseStatus)>(
            "SELECT id, price, status FROM courses WHERE id = ANY($1)",
        )
        .bind(&course_ids)
        .fetch_all(db)
        .await?;

        if courses.len() != course_ids.len()
            || courses
                .iter()
                .any(|(_, _, status)| *status != CourseStatus::Published)
        {
            return Err(AppError::not_found(anyhow!("Could not find the course")));
        }

        let already_enrolled = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM enrollments WHERE user_id = $1 AND course_id = ANY($2)
             )",
        )
        .bind(user_id)
        .bind(&course_ids)
        .fetch_one(db)
        .await?;

        if already_enrolled {
            return Err(AppError::conflict(anyhow!("Student is already enrolled")));
        }

        let amount = courses
            .iter()
            .try_fold(0i64, |total, (_, price, _)| total.checked_add(*price))
            .and_then(|total| total.checked_mul(MINOR_UNITS))
            .ok_or_else(|| AppError::bad_request(anyhow!("Order total is too large")))?;

        let receipt = format!("rcpt_{}", Uuid::new_v4().simple());
        let order = gateway.create_order(amount, currency, &receipt).await?;

        sqlx::query(
            "INSERT INTO payments (user_id, order_id, amount, currency, course_ids, status)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user_id)
        .bind(&order.id)
        .bind(order.amount)
        .bind(&order.currency)
        .bind(&course_ids)
        .bind(PaymentStatus::Created)
        .execute(db)
        .await?;

        track_payment_captured(currency);
        info!(order_id = %order.id, amount, "Payment order created");

        Ok(CapturePaymentResponse {
            order,
            key_id: gateway.key_id().to_string(),
        })
    }

    /// Checks the checkout signature, then enrolls the caller in every
    /// purchased course in one transaction.
    #[instrument(skip(db, email, key_secret, dto), fields(order_id = %dto.order_id))]
    pub async fn verify_payment(
        db: &PgPool,
        email: &EmailService,
        key_secret: &str,
        user_id: UserId,
        dto: VerifyPaymentDto,
    ) -> Result<VerifyPaymentResponse, AppError> {
        if !verify_signature(key_secret, &dto.order_id, &dto.payment_id, &dto.signature) {
            track_payment_verification(false);
            warn!(order_id = %dto.order_id, "Payment signature mismatch");
            return Err(AppError::bad_request(anyhow!("Payment verification failed")));
        }

        let ordered = sqlx::query_scalar::<_, Vec<CourseId>>(
            "SELECT course_ids FROM payments WHERE order_id = $1 AND user_id = $2",
        )
        .bind(&dto.order_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Payment order not found")))?;

        let course_ids = unique_courses(&dto.courses);
        if course_ids.iter().any(|id| !ordered.contains(id)) {
            track_payment_verification(false);
            return Err(AppError::bad_request(anyhow!(
                "Courses do not match the payment order"
            )));
        }

        let mut tx = db.begin().await?;

        let enrolled = sqlx::query(
            "INSERT INTO enrollments (user_id, course_id)
             SELECT $1, course_id FROM unnest($2::uuid[]) AS course_id
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(&course_ids)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE payments SET status = $3, payment_id = $2, updated_at = NOW()
             WHERE order_id = $1",
        )
        .bind(&dto.order_id)
        .bind(&dto.payment_id)
        .bind(PaymentStatus::Verified)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        track_payment_verification(true);
        track_enrollments(enrolled.rows_affected() as usize);
        info!(%user_id, courses = course_ids.len(), "Payment verified");

        Self::send_enrollment_emails(db, email, user_id, &course_ids).await;

        Ok(VerifyPaymentResponse {
            message: "Payment verified".to_string(),
            enrolled_courses: course_ids,
        })
    }

    /// Enrollment has already committed, so mail failures are only logged.
    async fn send_enrollment_emails(
        db: &PgPool,
        email: &EmailService,
        user_id: UserId,
        course_ids: &[CourseId],
    ) {
        let recipient = match find_recipient(db, user_id).await {
            Ok(recipient) => recipient,
            Err(e) => {
                warn!(error = ?e.error, "Could not load enrollment email recipient");
                return;
            }
        };

        let names = sqlx::query_scalar::<_, String>(
            "SELECT name FROM courses WHERE id = ANY($1) ORDER BY name",
        )
        .bind(course_ids)
        .fetch_all(db)
        .await;

        let names = match names {
            Ok(names) => names,
            Err(e) => {
                warn!(error = ?e, "Could not load course names for enrollment email");
                return;
            }
        };

        for course_name in names {
            if let Err(e) = email
                .send_course_enrollment_email(&recipient.email, &recipient.full_name(), &course_name)
                .await
            {
                warn!(error = ?e.error, course = %course_name, "Enrollment email failed");
            }
        }
    }

    #[instrument(skip(db, email, dto), fields(order_id = %dto.order_id))]
    pub async fn send_payment_success_email(
        db: &PgPool,
        email: &EmailService,
        currency: &str,
        user_id: UserId,
        dto: PaymentSuccessEmailDto,
    ) -> Result<MessageResponse, AppError> {
        let recipient = find_recipient(db, user_id).await?;

        email
            .send_payment_success_email(
                &recipient.email,
                &recipient.full_name(),
                dto.amount,
                currency,
                &dto.order_id,
                &dto.payment_id,
            )
            .await?;

        Ok(MessageResponse::new("Payment success email sent"))
    }
}
