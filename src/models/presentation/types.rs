use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ordering::Positioned;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Presentation {
    pub id: i64,
    pub organisation_id: i64,
    pub name: String,
    pub slug: String,
    pub position: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Positioned for Presentation {
    fn id(&self) -> i64 {
        self.id
    }
    fn position(&self) -> i64 {
        self.position
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPresentation {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Left empty (or 0) to append at the end of the organisation's list.
    #[serde(default)]
    pub position: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PresentationUpdate {
    pub name: String,
    #[serde(default)]
    pub description: String,
}
