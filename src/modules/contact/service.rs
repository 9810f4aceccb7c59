use sqlx::PgPool;
use tracing::{info, instrument, warn};

use coursehub_core::AppError;
use coursehub_models::contact::{ContactRequest, ContactUsDto};

use crate::utils::email::EmailService;

pub struct ContactService;

impl ContactService {
    /// Stores the message, then acknowledges it by email. A failed
    /// acknowledgement is logged; the message stays recorded.
    #[instrument(skip(db, email, dto), fields(email = %dto.email))]
    pub async fn submit(
        db: &PgPool,
        email: &EmailService,
        dto: ContactUsDto,
    ) -> Result<ContactRequest, AppError> {
        let request = sqlx::query_as::<_, ContactRequest>(
            "INSERT INTO contact_requests (name, email, phone, message)
             VALUES ($1, LOWER($2), $3, $4)
             RETURNING id, name, email, phone, message, created_at",
        )
        .bind(dto.name.trim())
        .bind(dto.email.trim())
        .bind(&dto.phone)
        .bind(&dto.message)
        .fetch_one(db)
        .await?;

        info!(contact_request_id = %request.id, "Contact request received");

        if let Err(e) = email
            .send_contact_confirmation(&request.email, &request.name, &request.message)
            .await
        {
            warn!(error = ?e.error, contact_request_id = %request.id, "Contact confirmation email failed");
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursehub_config::EmailConfig;

    #[sqlx::test(migrations = "./migrations")]
    async fn test_submit_persists_request(pool: PgPool) {
        let mailer = EmailService::new(EmailConfig::disabled());

        let request = ContactService::submit(
            &pool,
            &mailer,
            ContactUsDto {
                name: " Grace Hopper ".to_string(),
                email: "Grace@Example.com".to_string(),
                phone: Some("+1 555 0100".to_string()),
                message: "Do you offer team plans?".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(request.name, "Grace Hopper");
        assert_eq!(request.email, "grace@example.com");

        let stored = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contact_requests")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(stored, 1);
    }
}
