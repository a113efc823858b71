use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::scope::{self, PRESENTATIONS};
use crate::models::validate_name;
use crate::slug::slugify;
use super::types::*;

const COLUMNS: &str =
    "id, organisation_id, name, slug, position, description, created_at, modified_at";

/// Presentations of an organisation, ordered by position.
pub async fn list_ordered(pool: &PgPool, organisation_id: i64) -> Result<Vec<Presentation>, AppError> {
    let sql = format!(
        "SELECT {COLUMNS} FROM presentations WHERE organisation_id = $1 ORDER BY position, id"
    );
    let rows = sqlx::query_as::<_, Presentation>(&sql)
        .bind(organisation_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Presentation>, AppError> {
    let sql = format!("SELECT {COLUMNS} FROM presentations WHERE id = $1");
    let row = sqlx::query_as::<_, Presentation>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Find a presentation only if it belongs to the given organisation.
pub async fn find_in_organisation(
    pool: &PgPool,
    organisation_id: i64,
    id: i64,
) -> Result<Option<Presentation>, AppError> {
    let sql = format!(
        "SELECT {COLUMNS} FROM presentations WHERE id = $1 AND organisation_id = $2"
    );
    let row = sqlx::query_as::<_, Presentation>(&sql)
        .bind(id)
        .bind(organisation_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Create a presentation at the end of its organisation's list (unless an
/// explicit position is given). The slug falls back to one derived from the name.
pub async fn create(
    pool: &PgPool,
    organisation_id: i64,
    new: &NewPresentation,
) -> Result<Presentation, AppError> {
    let name = validate_name("presentation", &new.name)?;
    let slug = match new.slug.as_deref().map(slugify).filter(|s| !s.is_empty()) {
        Some(s) => s,
        None => {
            let derived = slugify(name);
            if derived.is_empty() { "presentation".to_string() } else { derived }
        }
    };

    let mut tx = pool.begin().await?;
    scope::lock_parent(&mut *tx, PRESENTATIONS, organisation_id).await?;
    let position = scope::assign_position(&mut *tx, PRESENTATIONS, organisation_id, new.position).await?;

    let sql = format!(
        "INSERT INTO presentations (organisation_id, name, slug, position, description) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
    );
    let presentation = sqlx::query_as::<_, Presentation>(&sql)
        .bind(organisation_id)
        .bind(name)
        .bind(&slug)
        .bind(position)
        .bind(&new.description)
        .fetch_one(&mut *tx)
        .await?;
    tx.commit().await?;

    log::info!(
        "Created presentation {} at position {} in organisation {}",
        presentation.id,
        presentation.position,
        organisation_id
    );
    Ok(presentation)
}

/// Update name and description. Slug and position are left alone.
pub async fn update(pool: &PgPool, id: i64, changes: &PresentationUpdate) -> Result<Presentation, AppError> {
    let name = validate_name("presentation", &changes.name)?;
    let sql = format!(
        "UPDATE presentations SET name = $1, description = $2, modified_at = NOW() \
         WHERE id = $3 RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, Presentation>(&sql)
        .bind(name)
        .bind(&changes.description)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound)
}

/// Delete a presentation together with its slides.
///
/// The remaining presentations keep their positions; unlike slides and
/// answers, presentation lists are not re-sequenced after a delete.
pub async fn delete(pool: &PgPool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM presentations WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    log::info!("Deleted presentation {id}");
    Ok(())
}
