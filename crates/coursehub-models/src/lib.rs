//! # CourseHub Models
//!
//! Database entities and request/response DTOs for the CourseHub API.
//!
//! # Modules
//!
//! - [`ids`]: strongly-typed entity IDs
//! - [`users`]: users, signup/login, profile and dashboard views
//! - [`categories`]: course categories and the category page
//! - [`courses`]: courses, sections and lectures
//! - [`ratings`]: ratings and reviews
//! - [`payments`]: gateway orders and verification
//! - [`contact`]: contact form submissions

pub mod categories;
pub mod contact;
pub mod courses;
pub mod ids;
pub mod payments;
pub mod ratings;
pub mod users;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use ids::{CategoryId, CourseId, RatingId, SectionId, SubSectionId, UserId};

/// Plain acknowledgement body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
