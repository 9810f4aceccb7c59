//! # CourseHub CLI
//!
//! Administrative commands and database seeding for CourseHub development.
//!
//! ## Usage
//!
//! ```ignore
//! use coursehub_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(5, 50).with_demo_accounts("demo-password");
//! seed_all(&pool, config).await?;
//! ```

pub mod admin;
pub mod seeder;
