//! Subject stats — prints enrollment counts and mark averages per subject.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p campus-school --bin subject-stats -- --database-url postgres://...
//! ```
//!
//! `--database-url` falls back to the `DATABASE_URL` environment variable.

use anyhow::{Context as _, Result};
use clap::Parser;
use sea_orm::{ColumnTrait, Database, EntityTrait, QueryFilter, QueryOrder};

use campus_school_schema::{enrollments, subjects};

#[derive(Parser)]
#[command(about = "Print enrollment counts and mark averages per subject")]
struct Args {
    /// Postgres connection string (defaults to $DATABASE_URL)
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let db = Database::connect(&args.database_url)
        .await
        .context("connect to database")?;

    let all_subjects = subjects::Entity::find()
        .order_by_asc(subjects::Column::Code)
        .all(&db)
        .await
        .context("list subjects")?;

    if all_subjects.is_empty() {
        println!("No subjects.");
        return Ok(());
    }

    println!("{:<5} {:<30} {:>8} {:>8}", "CODE", "NAME", "ENROLLED", "AVG");
    for subject in all_subjects {
        let rows = enrollments::Entity::find()
            .filter(enrollments::Column::SubjectId.eq(subject.id))
            .all(&db)
            .await
            .context("list enrollments")?;

        let enrolled = rows.len();
        let marks: Vec<i16> = rows.iter().filter_map(|e| e.mark).collect();
        let avg = if marks.is_empty() {
            "-".to_owned()
        } else {
            let sum: i64 = marks.iter().map(|&m| i64::from(m)).sum();
            format!("{:.2}", sum as f64 / marks.len() as f64)
        };

        println!(
            "{:<5} {:<30} {:>8} {:>8}",
            subject.code, subject.name, enrolled, avg
        );
    }

    Ok(())
}
