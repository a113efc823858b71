use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::validate_name;
use crate::slug::slugify;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Organisation {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

const COLUMNS: &str = "id, name, slug, created_at, modified_at";

/// List all organisations by name.
pub async fn list(pool: &PgPool) -> Result<Vec<Organisation>, AppError> {
    let sql = format!("SELECT {COLUMNS} FROM organisations ORDER BY name, id");
    let rows = sqlx::query_as::<_, Organisation>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Organisation>, AppError> {
    let sql = format!("SELECT {COLUMNS} FROM organisations WHERE slug = $1");
    let row = sqlx::query_as::<_, Organisation>(&sql)
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Create an organisation. The slug is derived from the name unless given.
pub async fn create(pool: &PgPool, name: &str, slug: Option<&str>) -> Result<Organisation, AppError> {
    let name = validate_name("organisation", name)?;

    let slug = match slug.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => slugify(s),
        None => slugify(name),
    };
    if slug.is_empty() {
        return Err(AppError::Validation(format!(
            "cannot derive a slug from {name:?}; supply one explicitly"
        )));
    }

    let sql = format!(
        "INSERT INTO organisations (name, slug) VALUES ($1, $2) RETURNING {COLUMNS}"
    );
    let org = sqlx::query_as::<_, Organisation>(&sql)
        .bind(name)
        .bind(&slug)
        .fetch_one(pool)
        .await?;

    log::info!("Created organisation {} ({})", org.slug, org.id);
    Ok(org)
}
