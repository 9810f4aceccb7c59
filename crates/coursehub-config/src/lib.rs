//! # CourseHub Config
//!
//! Configuration types for the CourseHub API, loaded from environment
//! variables with development defaults:
//!
//! - [`cors`]: allowed browser origins
//! - [`email`]: SMTP settings
//! - [`jwt`]: token signing secret and lifetime
//! - [`payment`]: payment gateway credentials
//! - [`rate_limit`]: request rate limits for auth endpoints
//! - [`server`]: listen ports
//!
//! # Example
//!
//! ```ignore
//! use coursehub_config::{JwtConfig, PaymentConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let payment_config = PaymentConfig::from_env();
//! ```

pub mod cors;
pub mod email;
pub mod jwt;
pub mod payment;
pub mod rate_limit;
pub mod server;

mod env;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use email::EmailConfig;
pub use jwt::JwtConfig;
pub use payment::PaymentConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;
