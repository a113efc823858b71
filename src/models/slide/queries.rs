use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::scope::{self, SLIDES};
use crate::ordering::{Direction, Reposition};
use super::types::*;

const COLUMNS: &str =
    "id, presentation_id, question_id, image, description, position, created_at, modified_at";

/// Slides of a presentation, ordered by position (ties by id).
pub async fn list_ordered(pool: &PgPool, presentation_id: i64) -> Result<Vec<Slide>, AppError> {
    let sql = format!(
        "SELECT {COLUMNS} FROM slides WHERE presentation_id = $1 ORDER BY position, id"
    );
    let rows = sqlx::query_as::<_, Slide>(&sql)
        .bind(presentation_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Slide>, AppError> {
    let sql = format!("SELECT {COLUMNS} FROM slides WHERE id = $1");
    let row = sqlx::query_as::<_, Slide>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Find a slide only if it belongs to the given presentation.
pub async fn find_in_presentation(
    pool: &PgPool,
    presentation_id: i64,
    id: i64,
) -> Result<Option<Slide>, AppError> {
    let sql = format!("SELECT {COLUMNS} FROM slides WHERE id = $1 AND presentation_id = $2");
    let row = sqlx::query_as::<_, Slide>(&sql)
        .bind(id)
        .bind(presentation_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Closest slide below this one in the same presentation.
pub async fn previous_of(pool: &PgPool, slide: &Slide) -> Result<Option<Slide>, AppError> {
    let sql = format!(
        "SELECT {COLUMNS} FROM slides \
         WHERE presentation_id = $1 AND position < $2 AND id <> $3 \
         ORDER BY position DESC, id DESC LIMIT 1"
    );
    let row = sqlx::query_as::<_, Slide>(&sql)
        .bind(slide.presentation_id)
        .bind(slide.position)
        .bind(slide.id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Closest slide above this one in the same presentation.
pub async fn next_of(pool: &PgPool, slide: &Slide) -> Result<Option<Slide>, AppError> {
    let sql = format!(
        "SELECT {COLUMNS} FROM slides \
         WHERE presentation_id = $1 AND position > $2 AND id <> $3 \
         ORDER BY position ASC, id ASC LIMIT 1"
    );
    let row = sqlx::query_as::<_, Slide>(&sql)
        .bind(slide.presentation_id)
        .bind(slide.position)
        .bind(slide.id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn with_neighbors(pool: &PgPool, slide: Slide) -> Result<SlideWithNeighbors, AppError> {
    let previous = previous_of(pool, &slide).await?;
    let next = next_of(pool, &slide).await?;
    Ok(SlideWithNeighbors { slide, previous, next })
}

/// Create a slide; without an explicit position it is appended to the presentation.
pub async fn create(pool: &PgPool, presentation_id: i64, new: &NewSlide) -> Result<Slide, AppError> {
    let mut tx = pool.begin().await?;
    scope::lock_parent(&mut *tx, SLIDES, presentation_id).await?;
    let position = scope::assign_position(&mut *tx, SLIDES, presentation_id, new.position).await?;

    let sql = format!(
        "INSERT INTO slides (presentation_id, question_id, description, position) \
         VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
    );
    let slide = sqlx::query_as::<_, Slide>(&sql)
        .bind(presentation_id)
        .bind(new.question_id)
        .bind(&new.description)
        .bind(position)
        .fetch_one(&mut *tx)
        .await?;
    tx.commit().await?;

    log::info!(
        "Created slide {} at position {} in presentation {}",
        slide.id,
        slide.position,
        presentation_id
    );
    Ok(slide)
}

pub async fn update(pool: &PgPool, id: i64, changes: &SlideUpdate) -> Result<Slide, AppError> {
    let sql = format!(
        "UPDATE slides SET description = $1, question_id = $2, modified_at = NOW() \
         WHERE id = $3 RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, Slide>(&sql)
        .bind(&changes.description)
        .bind(changes.question_id)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound)
}

/// Point the slide at a stored image (path relative to the media root).
pub async fn set_image(pool: &PgPool, id: i64, image: &str) -> Result<Slide, AppError> {
    let sql = format!(
        "UPDATE slides SET image = $1, modified_at = NOW() WHERE id = $2 RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, Slide>(&sql)
        .bind(image)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound)
}

/// Delete a slide and close the gap it leaves. The delete and the renumbering
/// of the remaining slides commit together.
pub async fn delete(pool: &PgPool, id: i64) -> Result<Vec<Reposition>, AppError> {
    let mut tx = pool.begin().await?;
    let presentation_id = scope::parent_of(&mut *tx, SLIDES, id).await?;
    scope::lock_parent(&mut *tx, SLIDES, presentation_id).await?;

    sqlx::query("DELETE FROM slides WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let plan = scope::resequence(&mut *tx, SLIDES, presentation_id).await?;
    tx.commit().await?;

    log::info!("Deleted slide {id} from presentation {presentation_id}");
    Ok(plan)
}

/// Swap the slide with its neighbour. Returns false if it is already first/last.
pub async fn move_slide(pool: &PgPool, id: i64, direction: Direction) -> Result<bool, AppError> {
    let mut tx = pool.begin().await?;
    let presentation_id = scope::parent_of(&mut *tx, SLIDES, id).await?;
    scope::lock_parent(&mut *tx, SLIDES, presentation_id).await?;
    let moved = scope::move_within(&mut *tx, SLIDES, presentation_id, id, direction).await?;
    tx.commit().await?;
    Ok(moved)
}
