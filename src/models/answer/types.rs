use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ordering::Positioned;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Answer {
    pub id: i64,
    pub question_id: i64,
    pub position: i64,
    pub text: String,
    pub is_right: bool,
    pub has_comment: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Positioned for Answer {
    fn id(&self) -> i64 {
        self.id
    }
    fn position(&self) -> i64 {
        self.position
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAnswer {
    pub text: String,
    #[serde(default)]
    pub is_right: bool,
    #[serde(default)]
    pub has_comment: bool,
    #[serde(default)]
    pub position: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerUpdate {
    pub text: String,
    #[serde(default)]
    pub is_right: bool,
    #[serde(default)]
    pub has_comment: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerWithNeighbors {
    pub answer: Answer,
    pub previous: Option<Answer>,
    pub next: Option<Answer>,
}

/// Longest answer text the answers table accepts.
pub const MAX_ANSWER_TEXT: usize = 64;
