//! Database seeding for local development.
//!
//! # Module Structure
//!
//! - [`users`] - instructors, students and demo accounts
//! - [`catalog`] - categories, courses, sections and lectures
//! - [`enrollments`] - students enrolled into published courses
//! - [`models`] - seed rows and [`SeedConfig`]
//!
//! # Performance
//!
//! - Parallel data generation using Rayon
//! - Batch inserts with multi-value INSERT statements
//! - Single bcrypt hash reused for all generated users (cost 4)

pub mod catalog;
pub mod enrollments;
pub mod models;
pub mod users;

pub use models::{CatalogShape, SeedConfig};

use bcrypt::hash;
use coursehub_core::AccountType;
use sqlx::PgPool;
use std::time::Instant;

pub const DEFAULT_PASSWORD: &str = "Password@123";

/// Seeds users, the catalog and enrollments.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    println!("🌱 Starting full database seeding...");
    println!(
        "   - Users: {} instructors, {} students",
        config.instructors, config.students
    );
    println!(
        "   - Catalog: {} categories, {} courses, {} lectures",
        config.catalog.categories,
        config.total_courses(),
        config.total_lectures()
    );

    let password_hash = hash_seed_password(DEFAULT_PASSWORD)?;

    let mut instructor_ids =
        users::seed_users(db, config.instructors, AccountType::Instructor, &password_hash).await?;
    let mut student_ids =
        users::seed_users(db, config.students, AccountType::Student, &password_hash).await?;

    if let Some(demo_password) = &config.demo_password {
        let demo_hash = hash_seed_password(demo_password)?;
        let (instructor, student) = users::upsert_demo_accounts(db, &demo_hash).await?;
        instructor_ids.push(instructor);
        student_ids.push(student);
    }

    let catalog = catalog::seed_catalog(db, &instructor_ids, &config.catalog).await?;
    let enrolled = enrollments::seed_enrollments(
        db,
        &student_ids,
        &catalog.published_courses(),
        config.enrollments_per_student,
    )
    .await?;

    println!(
        "\n✅ Seeding complete! Created {} users, {} categories, {} courses, {} lectures, {} enrollments in {:?}",
        instructor_ids.len() + student_ids.len(),
        catalog.category_ids.len(),
        catalog.courses.len(),
        catalog.lectures,
        enrolled,
        start_time.elapsed()
    );
    println!("\n📝 Default password for generated users: {}", DEFAULT_PASSWORD);

    Ok(())
}

/// Creates or resets only the demo accounts.
pub async fn seed_demo_accounts(
    db: &PgPool,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let password_hash = hash_seed_password(password)?;
    users::upsert_demo_accounts(db, &password_hash).await?;
    Ok(())
}

/// Clears all seeded data. Admins and non-seeded rows are kept.
pub async fn clear_all(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing all seeded data...");

    // Courses reference instructors with ON DELETE RESTRICT
    catalog::clear_courses(db).await?;
    users::clear_users(db).await?;
    catalog::clear_categories(db).await?;

    println!("✅ All seeded data cleared in {:?}", start_time.elapsed());
    Ok(())
}

fn hash_seed_password(password: &str) -> Result<String, Box<dyn std::error::Error>> {
    println!("🔐 Hashing password...");
    let start = Instant::now();
    let hash = hash(password, 4).map_err(|e| format!("Failed to hash password: {}", e))?;
    println!("   ✓ Hashed password in {:?}", start.elapsed());
    Ok(hash)
}

/// `($1, $2), ($3, $4), ...` for `rows` rows of `columns` parameters.
pub(crate) fn values_clause(rows: usize, columns: usize) -> String {
    (0..rows)
        .map(|row| {
            let params: Vec<String> = (1..=columns)
                .map(|col| format!("${}", row * columns + col))
                .collect();
            format!("({})", params.join(", "))
        })
        .collect::<Vec<_>>()
        .join(", ")
}
