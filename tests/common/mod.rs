//! Shared test infrastructure for the database-backed tests.
//!
//! Tests connect to `TEST_DATABASE_URL` (falling back to `DATABASE_URL`) and
//! run the migrations. Without either variable the database tests are
//! skipped. Every test creates its own organisation, so tests can share one
//! database and run in parallel.

#![allow(dead_code)]

use sqlx::PgPool;

use quizdeck::db;
use quizdeck::models::organisation::{self, Organisation};
use quizdeck::models::presentation::{self, NewPresentation, Presentation};
use quizdeck::models::question::{self, AnswersType, NewQuestion, Question};

pub struct TestDb {
    pool: PgPool,
}

impl TestDb {
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Connect and migrate, or `None` when no test database is configured.
pub async fn setup_test_db() -> Option<TestDb> {
    let _ = dotenvy::dotenv();
    let url = std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()?;

    let pool = db::init_pool(&url, 4).await.expect("Failed to connect to test DB");
    db::run_migrations(&pool).await.expect("Failed to run migrations");
    Some(TestDb { pool })
}

/// Bail out of a test early when no database is available.
macro_rules! require_db {
    () => {
        match common::setup_test_db().await {
            Some(db) => db,
            None => {
                eprintln!("skipping: TEST_DATABASE_URL / DATABASE_URL not set");
                return;
            }
        }
    };
}

pub fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, rand::random::<u64>())
}

pub async fn create_test_org(pool: &PgPool) -> Organisation {
    let slug = unique("org");
    organisation::create(pool, "Test Organisation", Some(slug.as_str()))
        .await
        .expect("Failed to create organisation")
}

pub async fn create_test_presentation(pool: &PgPool, org_id: i64, name: &str) -> Presentation {
    presentation::create(
        pool,
        org_id,
        &NewPresentation {
            name: name.to_string(),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to create presentation")
}

pub async fn create_test_question(pool: &PgPool, org_id: i64, answers_type: AnswersType) -> Question {
    question::create(
        pool,
        Some(org_id),
        &NewQuestion {
            text: "Which of these apply?".to_string(),
            answers_type,
        },
    )
    .await
    .expect("Failed to create question")
}
