//! Enrollment seeding. Students are enrolled into random published courses.

use coursehub_models::{CourseId, UserId};
use rand::seq::SliceRandom;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::values_clause;

pub fn generate_enrollments(
    student_ids: &[UserId],
    published: &[CourseId],
    per_student: usize,
) -> Vec<(UserId, CourseId)> {
    student_ids
        .par_iter()
        .flat_map(|&student| {
            let mut rng = rand::thread_rng();
            published
                .choose_multiple(&mut rng, per_student)
                .map(|&course| (student, course))
                .collect::<Vec<_>>()
        })
        .collect()
}

pub async fn seed_enrollments(
    db: &PgPool,
    student_ids: &[UserId],
    published: &[CourseId],
    per_student: usize,
) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!(
        "🎓 Enrolling {} students into up to {} courses each...",
        student_ids.len(),
        per_student
    );

    let enrollments = generate_enrollments(student_ids, published, per_student);

    let mut tx = db.begin().await?;

    const BATCH_SIZE: usize = 5000;
    let mut inserted = 0;
    for chunk in enrollments.chunks(BATCH_SIZE) {
        inserted += insert_enrollments_chunk(&mut tx, chunk).await?;
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} enrollments in {:?}",
        inserted,
        start_time.elapsed()
    );

    Ok(inserted)
}

async fn insert_enrollments_chunk(
    tx: &mut Transaction<'_, Postgres>,
    enrollments: &[(UserId, CourseId)],
) -> Result<u64, Box<dyn std::error::Error>> {
    if enrollments.is_empty() {
        return Ok(0);
    }

    let query = format!(
        "INSERT INTO enrollments (user_id, course_id) VALUES {} ON CONFLICT DO NOTHING",
        values_clause(enrollments.len(), 2)
    );

    let mut q = sqlx::query(&query);
    for (user_id, course_id) in enrollments {
        q = q.bind(*user_id).bind(*course_id);
    }

    Ok(q.execute(&mut **tx).await?.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_enrollments_are_distinct_per_student() {
        let students = vec![UserId::new(), UserId::new(), UserId::new()];
        let courses: Vec<CourseId> = (0..5).map(|_| CourseId::new()).collect();

        let enrollments = generate_enrollments(&students, &courses, 3);
        assert_eq!(enrollments.len(), 9);

        let unique: HashSet<_> = enrollments.iter().collect();
        assert_eq!(unique.len(), 9);
    }

    #[test]
    fn test_enrollments_capped_by_available_courses() {
        let students = vec![UserId::new()];
        let courses = vec![CourseId::new()];
        assert_eq!(generate_enrollments(&students, &courses, 4).len(), 1);
        assert!(generate_enrollments(&students, &[], 4).is_empty());
    }
}
