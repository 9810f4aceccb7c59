use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument};

use coursehub_auth::{TokenSubject, create_access_token};
use coursehub_config::JwtConfig;
use coursehub_core::{AppError, hash_password, verify_password};
use coursehub_models::UserId;
use coursehub_models::users::{LoginRequest, LoginResponse, SignupDto, USER_COLUMNS, User};
use coursehub_observability::{track_user_login, track_user_signup};

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn signup(db: &PgPool, dto: SignupDto) -> Result<User, AppError> {
        if !dto.passwords_match() {
            return Err(AppError::bad_request(anyhow!(
                "Password and confirm password do not match"
            )));
        }

        if dto.check_account_type().is_err() {
            return Err(AppError::forbidden(
                "Admin accounts cannot be created through signup",
            ));
        }

        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (first_name, last_name, email, password, account_type, contact_number)
             VALUES ($1, $2, LOWER($3), $4, $5, $6)
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(dto.first_name.trim())
        .bind(dto.last_name.trim())
        .bind(dto.email.trim())
        .bind(&hashed_password)
        .bind(dto.account_type)
        .bind(&dto.contact_number)
        .fetch_one(db)
        .await
        .map_err(|e| {
            AppError::from_unique_violation(e, "User already exists. Please sign in to continue")
        })?;

        track_user_signup(user.account_type.as_str());
        info!(user_id = %user.id, account_type = %user.account_type, "User signed up");

        Ok(user)
    }

    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        #[derive(sqlx::FromRow)]
        struct Credentials {
            id: UserId,
            password: String,
        }

        let credentials = sqlx::query_as::<_, Credentials>(
            "SELECT id, password FROM users WHERE email = LOWER($1)",
        )
        .bind(dto.email.trim())
        .fetch_optional(db)
        .await?;

        let Some(credentials) = credentials else {
            track_user_login(false);
            return Err(AppError::unauthorized("Invalid email or password"));
        };

        if !verify_password(&dto.password, &credentials.password)? {
            track_user_login(false);
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(credentials.id)
        .fetch_one(db)
        .await?;

        let access_token = create_access_token(
            &TokenSubject {
                user_id: user.id.into_inner(),
                email: &user.email,
                account_type: user.account_type,
                is_demo: user.is_demo,
            },
            jwt_config,
        )?;

        track_user_login(true);

        Ok(LoginResponse { access_token, user })
    }
}
