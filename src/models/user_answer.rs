use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::answer::{self, Answer};
use crate::models::question::{self, AnswersType};

/// A user's recorded choice of one answer.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserAnswer {
    pub id: i64,
    pub user_id: i64,
    pub answer_id: i64,
    pub comment: Option<String>,
}

/// One answer picked in a submission.
#[derive(Debug, Clone, Deserialize)]
pub struct Selection {
    pub answer_id: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Check a submission against the question it is for and return the
/// `(answer_id, comment)` pairs to store.
///
/// Comments are dropped for answers that don't take one, and blank comments
/// are stored as NULL.
pub fn validate_selections(
    answers_type: AnswersType,
    answers: &[Answer],
    selections: &[Selection],
) -> Result<Vec<(i64, Option<String>)>, AppError> {
    if selections.is_empty() {
        return Err(AppError::Validation("at least one answer must be selected".into()));
    }
    if answers_type == AnswersType::Single && selections.len() > 1 {
        return Err(AppError::Validation(
            "this question accepts a single answer only".into(),
        ));
    }

    let mut rows = Vec::with_capacity(selections.len());
    for selection in selections {
        let answer = answers
            .iter()
            .find(|a| a.id == selection.answer_id)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "answer {} does not belong to this question",
                    selection.answer_id
                ))
            })?;
        if rows.iter().any(|(id, _)| *id == answer.id) {
            return Err(AppError::Validation(format!(
                "answer {} selected more than once",
                answer.id
            )));
        }

        let comment = if answer.has_comment {
            selection
                .comment
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
        } else {
            None
        };
        rows.push((answer.id, comment));
    }
    Ok(rows)
}

/// Record a user's answers to a question; one row per selected answer.
pub async fn submit(
    pool: &PgPool,
    user_id: i64,
    question_id: i64,
    selections: &[Selection],
) -> Result<Vec<UserAnswer>, AppError> {
    let question = question::find_by_id(pool, question_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let answers = answer::list_ordered(pool, question_id).await?;
    let rows = validate_selections(question.answers_type, &answers, selections)?;

    let mut tx = pool.begin().await?;
    let mut saved = Vec::with_capacity(rows.len());
    for (answer_id, comment) in rows {
        let row = sqlx::query_as::<_, UserAnswer>(
            "INSERT INTO user_answers (user_id, answer_id, comment) VALUES ($1, $2, $3) \
             RETURNING id, user_id, answer_id, comment",
        )
        .bind(user_id)
        .bind(answer_id)
        .bind(comment)
        .fetch_one(&mut *tx)
        .await?;
        saved.push(row);
    }
    tx.commit().await?;

    log::info!(
        "Recorded {} answer(s) from user {} for question {}",
        saved.len(),
        user_id,
        question_id
    );
    Ok(saved)
}

/// Everything a user has answered for one question, oldest first.
pub async fn list_for_user(pool: &PgPool, user_id: i64, question_id: i64) -> Result<Vec<UserAnswer>, AppError> {
    let rows = sqlx::query_as::<_, UserAnswer>(
        "SELECT ua.id, ua.user_id, ua.answer_id, ua.comment \
         FROM user_answers ua \
         JOIN answers a ON a.id = ua.answer_id \
         WHERE ua.user_id = $1 AND a.question_id = $2 \
         ORDER BY ua.id",
    )
    .bind(user_id)
    .bind(question_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
