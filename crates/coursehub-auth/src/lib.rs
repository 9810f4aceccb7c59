//! # CourseHub Auth
//!
//! JWT access tokens for the CourseHub API.
//!
//! - [`claims`]: the [`Claims`] embedded in every access token
//! - [`jwt`]: token creation and verification
//!
//! The token carries everything the route gates need (user id, account type
//! and demo flag), so gate evaluation never touches the database.
//!
//! # Example
//!
//! ```ignore
//! use coursehub_auth::{create_access_token, verify_token, TokenSubject};
//! use coursehub_config::JwtConfig;
//! use coursehub_core::AccountType;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(
//!     &TokenSubject {
//!         user_id,
//!         email: "student@example.com",
//!         account_type: AccountType::Student,
//!         is_demo: false,
//!     },
//!     &config,
//! )?;
//!
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.account_type, AccountType::Student);
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{TokenSubject, create_access_token, verify_token};
