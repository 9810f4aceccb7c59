use std::sync::Arc;

use sqlx::PgPool;

use coursehub_config::{
    CorsConfig, EmailConfig, JwtConfig, PaymentConfig, RateLimitConfig,
};

use crate::modules::payments::gateway::{PaymentGateway, RazorpayGateway};
use crate::utils::email::EmailService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub email_config: EmailConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub payment_config: PaymentConfig,
    pub payment_gateway: Arc<dyn PaymentGateway>,
    pub email_service: EmailService,
}

impl AppState {
    /// Builds the state from environment configuration around an open pool.
    pub fn from_env(db: PgPool) -> anyhow::Result<Self> {
        let payment_config = PaymentConfig::from_env();
        let email_config = EmailConfig::from_env();
        let gateway = RazorpayGateway::new(&payment_config)?;

        Ok(Self {
            db,
            jwt_config: JwtConfig::from_env(),
            email_service: EmailService::new(email_config.clone()),
            email_config,
            cors_config: CorsConfig::from_env(),
            rate_limit_config: RateLimitConfig::from_env(),
            payment_gateway: Arc::new(gateway),
            payment_config,
        })
    }
}
