//! User seeding: instructors, students and demo accounts.

use coursehub_core::AccountType;
use coursehub_models::UserId;
use fake::Fake;
use fake::faker::name::en::*;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::UserSeed;
use super::values_clause;

pub const DEMO_INSTRUCTOR_EMAIL: &str = "demo.instructor@coursehub.dev";
pub const DEMO_STUDENT_EMAIL: &str = "demo.student@coursehub.dev";

pub fn generate_users(
    count: usize,
    account_type: AccountType,
    password_hash: &str,
) -> Vec<UserSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();

            let email = format!(
                "{}.{}+{}{}@example.com",
                first_name.to_lowercase(),
                last_name.to_lowercase(),
                account_type.as_str().to_ascii_lowercase(),
                idx
            );

            UserSeed {
                first_name,
                last_name,
                email,
                password_hash: password_hash.to_string(),
                account_type,
                is_demo: false,
            }
        })
        .collect()
}

pub async fn seed_users(
    db: &PgPool,
    count: usize,
    account_type: AccountType,
    password_hash: &str,
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("👥 Seeding {} {} users...", count, account_type.as_str());

    let users = generate_users(count, account_type, password_hash);
    let ids = insert_users_batch(db, &users).await?;

    println!(
        "   ✓ Inserted {} users in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

pub async fn insert_users_batch(
    db: &PgPool,
    users: &[UserSeed],
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    // 6 params per user
    const BATCH_SIZE: usize = 1000;

    let mut all_ids = Vec::with_capacity(users.len());
    for chunk in users.chunks(BATCH_SIZE) {
        all_ids.extend(insert_users_chunk(&mut tx, chunk).await?);
    }

    tx.commit().await?;
    Ok(all_ids)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "INSERT INTO users (first_name, last_name, email, password, account_type, is_demo) VALUES {} RETURNING id",
        values_clause(users.len(), 6)
    );

    let mut q = sqlx::query_scalar(&query);
    for user in users {
        q = q
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.account_type)
            .bind(user.is_demo);
    }

    let ids: Vec<UserId> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

/// Creates or resets the demo instructor and student. Returns `(instructor, student)`.
pub async fn upsert_demo_accounts(
    db: &PgPool,
    password_hash: &str,
) -> Result<(UserId, UserId), Box<dyn std::error::Error>> {
    println!("🎭 Upserting demo accounts...");

    let instructor = upsert_demo_user(
        db,
        "Demo",
        "Instructor",
        DEMO_INSTRUCTOR_EMAIL,
        AccountType::Instructor,
        password_hash,
    )
    .await?;
    let student = upsert_demo_user(
        db,
        "Demo",
        "Student",
        DEMO_STUDENT_EMAIL,
        AccountType::Student,
        password_hash,
    )
    .await?;

    println!("   ✓ {} / {}", DEMO_INSTRUCTOR_EMAIL, DEMO_STUDENT_EMAIL);
    Ok((instructor, student))
}

async fn upsert_demo_user(
    db: &PgPool,
    first_name: &str,
    last_name: &str,
    email: &str,
    account_type: AccountType,
    password_hash: &str,
) -> Result<UserId, sqlx::Error> {
    sqlx::query_scalar::<_, UserId>(
        "INSERT INTO users (first_name, last_name, email, password, account_type, is_demo)
         VALUES ($1, $2, $3, $4, $5, TRUE)
         ON CONFLICT (email) DO UPDATE
         SET password = EXCLUDED.password, account_type = EXCLUDED.account_type,
             is_demo = TRUE, updated_at = NOW()
         RETURNING id",
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(password_hash)
    .bind(account_type)
    .fetch_one(db)
    .await
}

/// Clears seeded and demo users (admins are kept). Their courses must be gone first.
pub async fn clear_users(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded users...");

    let result = sqlx::query(
        "DELETE FROM users
         WHERE (email LIKE '%@example.com' OR is_demo)
         AND account_type <> $1",
    )
    .bind(AccountType::Admin)
    .execute(db)
    .await?
    .rows_affected();

    println!(
        "   ✓ Deleted {} users in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_users_have_unique_seed_emails() {
        let users = generate_users(20, AccountType::Student, "hash");
        assert_eq!(users.len(), 20);

        let mut emails: Vec<&str> = users.iter().map(|u| u.email.as_str()).collect();
        emails.sort_unstable();
        emails.dedup();
        assert_eq!(emails.len(), 20);
        assert!(users.iter().all(|u| u.email.ends_with("@example.com")));
        assert!(users.iter().all(|u| !u.is_demo));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_demo_accounts_are_idempotent(pool: PgPool) {
        let first = upsert_demo_accounts(&pool, "hash-one").await.unwrap();
        let second = upsert_demo_accounts(&pool, "hash-two").await.unwrap();
        assert_eq!(first, second);

        let demo_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_demo")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(demo_count, 2);

        assert_eq!(clear_users(&pool).await.unwrap(), 2);
    }
}
