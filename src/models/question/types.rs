use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How many answers a user may pick for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswersType {
    #[default]
    Multi,
    Single,
}

impl AnswersType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswersType::Multi => "multi",
            AnswersType::Single => "single",
        }
    }
}

impl fmt::Display for AnswersType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnswersType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multi" => Ok(AnswersType::Multi),
            "single" => Ok(AnswersType::Single),
            other => Err(format!("unknown answers type {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub id: i64,
    pub organisation_id: Option<i64>,
    pub text: String,
    pub answers_type: AnswersType,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewQuestion {
    pub text: String,
    #[serde(default)]
    pub answers_type: AnswersType,
}

/// One page of an organisation's questions.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionPage {
    pub items: Vec<Question>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_type_round_trips_through_its_column_value() {
        for t in [AnswersType::Multi, AnswersType::Single] {
            assert_eq!(t.as_str().parse::<AnswersType>().unwrap(), t);
        }
        assert!("both".parse::<AnswersType>().is_err());
    }

    #[test]
    fn default_is_multi() {
        assert_eq!(AnswersType::default(), AnswersType::Multi);
        let parsed: NewQuestion = serde_json::from_str(r#"{"text":"Pick one"}"#).unwrap();
        assert_eq!(parsed.answers_type, AnswersType::Multi);
    }
}
