//! # CourseHub Core
//!
//! Core types, errors, and utilities for the CourseHub API.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`account`]: Account types (admin, instructor, student)
//! - [`duration`]: Lecture duration formatting and progress arithmetic
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Page-based pagination for list endpoints
//! - [`password`]: Password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use coursehub_core::{AppError, AccountType, format_duration};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Course not found"));
//! assert_eq!(format_duration(3725), "1h 2m");
//! ```

pub mod account;
pub mod duration;
pub mod errors;
pub mod pagination;
pub mod password;

// Re-export commonly used types at crate root
pub use account::AccountType;
pub use duration::{format_duration, progress_percentage};
pub use errors::AppError;
pub use pagination::{Page, PageMeta, PageParams};
pub use password::{hash_password, verify_password};
