use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::scope::{self, ANSWERS};
use crate::ordering::{Direction, Reposition};
use super::types::*;

const COLUMNS: &str =
    "id, question_id, position, text, is_right, has_comment, created_at, modified_at";

fn validate_text(text: &str) -> Result<&str, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("answer text is required".into()));
    }
    if text.chars().count() > MAX_ANSWER_TEXT {
        return Err(AppError::Validation(format!(
            "answer text must be at most {MAX_ANSWER_TEXT} characters"
        )));
    }
    Ok(text)
}

/// Answers of a question, ordered by position (ties by id).
pub async fn list_ordered(pool: &PgPool, question_id: i64) -> Result<Vec<Answer>, AppError> {
    let sql = format!("SELECT {COLUMNS} FROM answers WHERE question_id = $1 ORDER BY position, id");
    let rows = sqlx::query_as::<_, Answer>(&sql)
        .bind(question_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Answer>, AppError> {
    let sql = format!("SELECT {COLUMNS} FROM answers WHERE id = $1");
    let row = sqlx::query_as::<_, Answer>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_in_question(pool: &PgPool, question_id: i64, id: i64) -> Result<Option<Answer>, AppError> {
    let sql = format!("SELECT {COLUMNS} FROM answers WHERE id = $1 AND question_id = $2");
    let row = sqlx::query_as::<_, Answer>(&sql)
        .bind(id)
        .bind(question_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn previous_of(pool: &PgPool, answer: &Answer) -> Result<Option<Answer>, AppError> {
    let sql = format!(
        "SELECT {COLUMNS} FROM answers \
         WHERE question_id = $1 AND position < $2 AND id <> $3 \
         ORDER BY position DESC, id DESC LIMIT 1"
    );
    let row = sqlx::query_as::<_, Answer>(&sql)
        .bind(answer.question_id)
        .bind(answer.position)
        .bind(answer.id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn next_of(pool: &PgPool, answer: &Answer) -> Result<Option<Answer>, AppError> {
    let sql = format!(
        "SELECT {COLUMNS} FROM answers \
         WHERE question_id = $1 AND position > $2 AND id <> $3 \
         ORDER BY position ASC, id ASC LIMIT 1"
    );
    let row = sqlx::query_as::<_, Answer>(&sql)
        .bind(answer.question_id)
        .bind(answer.position)
        .bind(answer.id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn with_neighbors(pool: &PgPool, answer: Answer) -> Result<AnswerWithNeighbors, AppError> {
    let previous = previous_of(pool, &answer).await?;
    let next = next_of(pool, &answer).await?;
    Ok(AnswerWithNeighbors { answer, previous, next })
}

/// Create an answer; without an explicit position it is appended to the question.
pub async fn create(pool: &PgPool, question_id: i64, new: &NewAnswer) -> Result<Answer, AppError> {
    let text = validate_text(&new.text)?;

    let mut tx = pool.begin().await?;
    scope::lock_parent(&mut *tx, ANSWERS, question_id).await?;
    let position = scope::assign_position(&mut *tx, ANSWERS, question_id, new.position).await?;

    let sql = format!(
        "INSERT INTO answers (question_id, position, text, is_right, has_comment) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
    );
    let answer = sqlx::query_as::<_, Answer>(&sql)
        .bind(question_id)
        .bind(position)
        .bind(text)
        .bind(new.is_right)
        .bind(new.has_comment)
        .fetch_one(&mut *tx)
        .await?;
    tx.commit().await?;

    log::info!(
        "Created answer {} at position {} for question {}",
        answer.id,
        answer.position,
        question_id
    );
    Ok(answer)
}

pub async fn update(pool: &PgPool, id: i64, changes: &AnswerUpdate) -> Result<Answer, AppError> {
    let text = validate_text(&changes.text)?;
    let sql = format!(
        "UPDATE answers SET text = $1, is_right = $2, has_comment = $3, modified_at = NOW() \
         WHERE id = $4 RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, Answer>(&sql)
        .bind(text)
        .bind(changes.is_right)
        .bind(changes.has_comment)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound)
}

/// Delete an answer and renumber the remaining ones in the same transaction.
pub async fn delete(pool: &PgPool, id: i64) -> Result<Vec<Reposition>, AppError> {
    let mut tx = pool.begin().await?;
    let question_id = scope::parent_of(&mut *tx, ANSWERS, id).await?;
    scope::lock_parent(&mut *tx, ANSWERS, question_id).await?;

    sqlx::query("DELETE FROM answers WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let plan = scope::resequence(&mut *tx, ANSWERS, question_id).await?;
    tx.commit().await?;

    log::info!("Deleted answer {id} from question {question_id}");
    Ok(plan)
}

/// Swap the answer with its neighbour. Returns false if it is already first/last.
pub async fn move_answer(pool: &PgPool, id: i64, direction: Direction) -> Result<bool, AppError> {
    let mut tx = pool.begin().await?;
    let question_id = scope::parent_of(&mut *tx, ANSWERS, id).await?;
    scope::lock_parent(&mut *tx, ANSWERS, question_id).await?;
    let moved = scope::move_within(&mut *tx, ANSWERS, question_id, id, direction).await?;
    tx.commit().await?;
    Ok(moved)
}
