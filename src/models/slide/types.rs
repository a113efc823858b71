use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ordering::Positioned;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Slide {
    pub id: i64,
    pub presentation_id: i64,
    pub question_id: Option<i64>,
    /// Path relative to the media root.
    pub image: Option<String>,
    pub description: String,
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Positioned for Slide {
    fn id(&self) -> i64 {
        self.id
    }
    fn position(&self) -> i64 {
        self.position
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSlide {
    #[serde(default)]
    pub question_id: Option<i64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub position: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlideUpdate {
    #[serde(default)]
    pub question_id: Option<i64>,
    #[serde(default)]
    pub description: String,
}

/// A slide together with its neighbours, as shown on a slide page.
#[derive(Debug, Clone, Serialize)]
pub struct SlideWithNeighbors {
    pub slide: Slide,
    pub previous: Option<Slide>,
    pub next: Option<Slide>,
}
