//! Admin account creation. Admins cannot sign up through the API.

use coursehub_core::{AccountType, hash_password};
use coursehub_models::UserId;
use sqlx::PgPool;

pub async fn create_admin(
    db: &PgPool,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> Result<UserId, Box<dyn std::error::Error>> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".into());
    }

    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let user_id = sqlx::query_scalar::<_, UserId>(
        "INSERT INTO users (first_name, last_name, email, password, account_type)
         VALUES ($1, $2, LOWER($3), $4, $5)
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .bind(first_name.trim())
    .bind(last_name.trim())
    .bind(email.trim())
    .bind(&hashed_password)
    .bind(AccountType::Admin)
    .fetch_optional(db)
    .await?;

    user_id.ok_or_else(|| "User with this email already exists".into())
}
