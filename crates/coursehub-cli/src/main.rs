use coursehub_cli::admin::create_admin;
use coursehub_cli::seeder::{self, CatalogShape, SeedConfig};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "coursehub-cli")]
#[command(about = "CourseHub CLI - Administrative tools for CourseHub", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an admin account
    CreateAdmin {
        /// First name of the admin
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name of the admin
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake instructors, students, courses and enrollments
    Seed {
        /// Number of instructors to create
        #[arg(short = 'i', long, default_value = "5")]
        instructors: usize,

        /// Number of students to create
        #[arg(short = 's', long, default_value = "50")]
        students: usize,

        /// Number of categories to create
        #[arg(long, default_value = "8")]
        categories: usize,

        /// Number of courses per instructor
        #[arg(long, default_value = "3")]
        courses: usize,

        /// Number of sections per course
        #[arg(long, default_value = "4")]
        sections: usize,

        /// Number of lectures per section
        #[arg(long, default_value = "5")]
        lectures: usize,

        /// Number of published courses each student is enrolled into
        #[arg(long, default_value = "3")]
        enrollments: usize,

        /// Also create demo instructor and student accounts with this password
        #[arg(long, value_name = "PASSWORD")]
        demo_accounts: Option<String>,
    },
    /// Create or reset only the demo accounts
    SeedDemo {
        /// Password for both demo accounts
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Clear all seeded data (keeps admins)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let pool = match connect().await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::CreateAdmin {
            first_name,
            last_name,
            email,
            password,
        } => handle_create_admin(&pool, first_name, last_name, email, password).await,
        Commands::Seed {
            instructors,
            students,
            categories,
            courses,
            sections,
            lectures,
            enrollments,
            demo_accounts,
        } => {
            let mut config = SeedConfig::new(instructors, students)
                .with_catalog(CatalogShape {
                    categories,
                    courses_per_instructor: courses,
                    sections_per_course: sections,
                    lectures_per_section: lectures,
                })
                .with_enrollments(enrollments);
            if let Some(password) = demo_accounts {
                config = config.with_demo_accounts(password);
            }
            seeder::seed_all(&pool, config).await
        }
        Commands::SeedDemo { password } => handle_seed_demo(&pool, password).await,
        Commands::ClearSeed => seeder::clear_all(&pool).await,
    };

    if let Err(e) = result {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    Ok(pool)
}

async fn handle_create_admin(
    pool: &PgPool,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let first_name = match first_name {
        Some(value) => value,
        None => Input::new().with_prompt("First name").interact_text()?,
    };

    let last_name = match last_name {
        Some(value) => value,
        None => Input::new().with_prompt("Last name").interact_text()?,
    };

    let email: String = match email {
        Some(value) => value,
        None => Input::new().with_prompt("Email address").interact_text()?,
    };

    let password = match password {
        Some(value) => value,
        None => prompt_password()?,
    };

    create_admin(pool, &first_name, &last_name, &email, &password).await?;

    println!("\n✅ Admin created successfully!");
    println!("   Email: {}", email.to_lowercase());
    println!("   Name: {} {}", first_name, last_name);

    Ok(())
}

async fn handle_seed_demo(
    pool: &PgPool,
    password: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let password = match password {
        Some(value) => value,
        None => prompt_password()?,
    };

    seeder::seed_demo_accounts(pool, &password).await?;
    println!("✅ Demo accounts ready");
    Ok(())
}

fn prompt_password() -> Result<String, dialoguer::Error> {
    Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords don't match")
        .interact()
}
