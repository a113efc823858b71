use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::errors::AppError;
use super::types::*;

#[derive(sqlx::FromRow)]
struct Row {
    id: i64,
    organisation_id: Option<i64>,
    text: String,
    answers_type: String,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl TryFrom<Row> for Question {
    type Error = AppError;

    fn try_from(row: Row) -> Result<Self, Self::Error> {
        let answers_type = row.answers_type.parse().map_err(AppError::Validation)?;
        Ok(Question {
            id: row.id,
            organisation_id: row.organisation_id,
            text: row.text,
            answers_type,
            created_at: row.created_at,
            modified_at: row.modified_at,
        })
    }
}

const COLUMNS: &str = "id, organisation_id, text, answers_type, created_at, modified_at";

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Question>, AppError> {
    let sql = format!("SELECT {COLUMNS} FROM questions WHERE id = $1");
    sqlx::query_as::<_, Row>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(Question::try_from)
        .transpose()
}

/// Find a question only if it belongs to the given organisation.
pub async fn find_in_organisation(
    pool: &PgPool,
    organisation_id: i64,
    id: i64,
) -> Result<Option<Question>, AppError> {
    let sql = format!("SELECT {COLUMNS} FROM questions WHERE id = $1 AND organisation_id = $2");
    sqlx::query_as::<_, Row>(&sql)
        .bind(id)
        .bind(organisation_id)
        .fetch_optional(pool)
        .await?
        .map(Question::try_from)
        .transpose()
}

/// Newest-first page of an organisation's questions. `page` is 1-based.
pub async fn list_for_organisation(
    pool: &PgPool,
    organisation_id: i64,
    page: i64,
    per_page: i64,
) -> Result<QuestionPage, AppError> {
    let page = page.max(1);
    let per_page = per_page.clamp(1, 100);

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE organisation_id = $1")
        .bind(organisation_id)
        .fetch_one(pool)
        .await?;

    let sql = format!(
        "SELECT {COLUMNS} FROM questions WHERE organisation_id = $1 \
         ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
    );
    let items = sqlx::query_as::<_, Row>(&sql)
        .bind(organisation_id)
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(Question::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QuestionPage { items, total, page, per_page })
}

pub async fn create(
    pool: &PgPool,
    organisation_id: Option<i64>,
    new: &NewQuestion,
) -> Result<Question, AppError> {
    let text = new.text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("question text is required".into()));
    }
    let sql = format!(
        "INSERT INTO questions (organisation_id, text, answers_type) VALUES ($1, $2, $3) \
         RETURNING {COLUMNS}"
    );
    let question: Question = sqlx::query_as::<_, Row>(&sql)
        .bind(organisation_id)
        .bind(text)
        .bind(new.answers_type.as_str())
        .fetch_one(pool)
        .await?
        .try_into()?;

    log::info!("Created question {} ({})", question.id, question.answers_type);
    Ok(question)
}

pub async fn update(pool: &PgPool, id: i64, changes: &NewQuestion) -> Result<Question, AppError> {
    let text = changes.text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("question text is required".into()));
    }
    let sql = format!(
        "UPDATE questions SET text = $1, answers_type = $2, modified_at = NOW() \
         WHERE id = $3 RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, Row>(&sql)
        .bind(text)
        .bind(changes.answers_type.as_str())
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound)?
        .try_into()
}

/// Delete a question. Its answers and recorded user answers go with it;
/// slides that showed it keep existing without a question.
pub async fn delete(pool: &PgPool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM questions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    log::info!("Deleted question {id}");
    Ok(())
}
