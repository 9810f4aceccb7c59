//! Catalog seeding: categories, courses, sections and lectures.

use coursehub_models::courses::CourseStatus;
use coursehub_models::{CategoryId, CourseId, SectionId, SubSectionId, UserId};
use fake::Fake;
use fake::faker::company::en::{Buzzword, CatchPhrase};
use fake::faker::lorem::en::{Sentence, Word};
use rand::Rng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;
use uuid::Uuid;

use super::models::{CatalogShape, CategorySeed, CourseSeed, SectionSeed, SubSectionSeed};
use super::values_clause;

/// Seeded categories carry this description prefix so they can be cleared.
pub const SEEDED_CATEGORY_PREFIX: &str = "Seeded category";

const PUBLISHED_RATIO: f64 = 0.8;

pub fn generate_categories(count: usize) -> Vec<CategorySeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let word: String = Word().fake();
            let buzz: String = Buzzword().fake();
            CategorySeed {
                name: format!("{} {} {}", capitalize(&word), capitalize(&buzz), idx + 1),
                description: format!("{}: {}", SEEDED_CATEGORY_PREFIX, Sentence(6..12).fake::<String>()),
            }
        })
        .collect()
}

pub fn generate_courses(
    instructor_ids: &[UserId],
    category_ids: &[CategoryId],
    courses_per_instructor: usize,
) -> Vec<CourseSeed> {
    instructor_ids
        .par_iter()
        .flat_map(|&instructor_id| {
            let mut rng = rand::thread_rng();
            (0..courses_per_instructor)
                .map(|_| {
                    let name: String = CatchPhrase().fake();
                    let tags = (0..rng.gen_range(1..=3))
                        .map(|_| Word().fake::<String>())
                        .collect();
                    let status = if rng.gen_bool(PUBLISHED_RATIO) {
                        CourseStatus::Published
                    } else {
                        CourseStatus::Draft
                    };

                    CourseSeed {
                        name,
                        description: Sentence(10..20).fake(),
                        what_you_will_learn: Sentence(6..12).fake(),
                        price: rng.gen_range(0..=50) * 100,
                        tags,
                        status,
                        instructor_id,
                        category_id: category_ids.choose(&mut rng).copied(),
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub fn generate_sections(course_ids: &[CourseId], per_course: usize) -> Vec<SectionSeed> {
    course_ids
        .par_iter()
        .flat_map(|&course_id| {
            (0..per_course)
                .map(|position| SectionSeed {
                    course_id,
                    name: format!("Part {}: {}", position + 1, Sentence(2..5).fake::<String>()),
                    position: position as i32,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub fn generate_subsections(section_ids: &[SectionId], per_section: usize) -> Vec<SubSectionSeed> {
    section_ids
        .par_iter()
        .flat_map(|&section_id| {
            let mut rng = rand::thread_rng();
            (0..per_section)
                .map(|position| SubSectionSeed {
                    section_id,
                    title: Sentence(3..6).fake(),
                    description: Sentence(8..16).fake(),
                    time_duration: rng.gen_range(60..=1800) as f64,
                    video_url: format!("https://videos.example.com/{}.mp4", Uuid::new_v4().simple()),
                    position: position as i32,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Seeded course ids paired with whether the course is published.
pub struct SeededCatalog {
    pub category_ids: Vec<CategoryId>,
    pub courses: Vec<(CourseId, CourseStatus)>,
    pub lectures: usize,
}

impl SeededCatalog {
    pub fn published_courses(&self) -> Vec<CourseId> {
        self.courses
            .iter()
            .filter(|(_, status)| *status == CourseStatus::Published)
            .map(|(id, _)| *id)
            .collect()
    }
}

pub async fn seed_catalog(
    db: &PgPool,
    instructor_ids: &[UserId],
    shape: &CatalogShape,
) -> Result<SeededCatalog, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!(
        "📚 Seeding {} categories and {} courses...",
        shape.categories,
        instructor_ids.len() * shape.courses_per_instructor
    );

    let categories = generate_categories(shape.categories);
    let mut tx = db.begin().await?;

    let mut category_ids = Vec::with_capacity(categories.len());
    for chunk in categories.chunks(1000) {
        category_ids.extend(insert_categories_chunk(&mut tx, chunk).await?);
    }

    let courses = generate_courses(instructor_ids, &category_ids, shape.courses_per_instructor);
    // 8 params per course
    let mut course_ids = Vec::with_capacity(courses.len());
    for chunk in courses.chunks(500) {
        course_ids.extend(insert_courses_chunk(&mut tx, chunk).await?);
    }

    let sections = generate_sections(&course_ids, shape.sections_per_course);
    let mut section_ids = Vec::with_capacity(sections.len());
    for chunk in sections.chunks(2000) {
        section_ids.extend(insert_sections_chunk(&mut tx, chunk).await?);
    }

    let subsections = generate_subsections(&section_ids, shape.lectures_per_section);
    let mut lectures = 0;
    for chunk in subsections.chunks(1000) {
        lectures += insert_subsections_chunk(&mut tx, chunk).await?.len();
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} courses, {} sections, {} lectures in {:?}",
        course_ids.len(),
        section_ids.len(),
        lectures,
        start_time.elapsed()
    );

    Ok(SeededCatalog {
        category_ids,
        courses: course_ids
            .into_iter()
            .zip(courses.iter().map(|c| c.status))
            .collect(),
        lectures,
    })
}

async fn insert_categories_chunk(
    tx: &mut Transaction<'_, Postgres>,
    categories: &[CategorySeed],
) -> Result<Vec<CategoryId>, Box<dyn std::error::Error>> {
    if categories.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "INSERT INTO categories (name, description) VALUES {} RETURNING id",
        values_clause(categories.len(), 2)
    );

    let mut q = sqlx::query_scalar(&query);
    for category in categories {
        q = q.bind(&category.name).bind(&category.description);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

async fn insert_courses_chunk(
    tx: &mut Transaction<'_, Postgres>,
    courses: &[CourseSeed],
) -> Result<Vec<CourseId>, Box<dyn std::error::Error>> {
    if courses.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "INSERT INTO courses (name, description, what_you_will_learn, price, tags, status, instructor_id, category_id) VALUES {} RETURNING id",
        values_clause(courses.len(), 8)
    );

    let mut q = sqlx::query_scalar(&query);
    for course in courses {
        q = q
            .bind(&course.name)
            .bind(&course.description)
            .bind(&course.what_you_will_learn)
            .bind(course.price)
            .bind(&course.tags)
            .bind(course.status)
            .bind(course.instructor_id)
            .bind(course.category_id);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

async fn insert_sections_chunk(
    tx: &mut Transaction<'_, Postgres>,
    sections: &[SectionSeed],
) -> Result<Vec<SectionId>, Box<dyn std::error::Error>> {
    if sections.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "INSERT INTO sections (course_id, name, position) VALUES {} RETURNING id",
        values_clause(sections.len(), 3)
    );

    let mut q = sqlx::query_scalar(&query);
    for section in sections {
        q = q
            .bind(section.course_id)
            .bind(&section.name)
            .bind(section.position);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

async fn insert_subsections_chunk(
    tx: &mut Transaction<'_, Postgres>,
    subsections: &[SubSectionSeed],
) -> Result<Vec<SubSectionId>, Box<dyn std::error::Error>> {
    if subsections.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "INSERT INTO subsections (section_id, title, description, time_duration, video_url, position) VALUES {} RETURNING id",
        values_clause(subsections.len(), 6)
    );

    let mut q = sqlx::query_scalar(&query);
    for subsection in subsections {
        q = q
            .bind(subsection.section_id)
            .bind(&subsection.title)
            .bind(&subsection.description)
            .bind(subsection.time_duration)
            .bind(&subsection.video_url)
            .bind(subsection.position);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

/// Deletes courses owned by seeded or demo instructors. Sections, lectures,
/// enrollments and ratings cascade.
pub async fn clear_courses(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded courses...");

    let result = sqlx::query(
        "DELETE FROM courses c
         USING users u
         WHERE u.id = c.instructor_id
         AND (u.email LIKE '%@example.com' OR u.is_demo)",
    )
    .execute(db)
    .await?
    .rows_affected();

    println!(
        "   ✓ Deleted {} courses in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}

pub async fn clear_categories(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let result = sqlx::query("DELETE FROM categories WHERE description LIKE $1")
        .bind(format!("{}%", SEEDED_CATEGORY_PREFIX))
        .execute(db)
        .await?
        .rows_affected();

    println!("   ✓ Deleted {} categories", result);
    Ok(result)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
