//! Which navigation buttons a page shows, and where they point.
//!
//! Each page kind knows its own affordances; the handler picks the
//! [`ViewKind`] once and serialises the resulting [`NavCapabilities`].

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewKind {
    QuestionList,
    QuestionDetail { question: i64 },
    AnswerNew { question: i64 },
    AnswerDetail { question: i64, answer: i64 },
    PresentationList,
    PresentationDetail { presentation: i64 },
    SlideNew { presentation: i64 },
    SlideDetail { presentation: i64, slide: i64 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavCapabilities {
    pub back: Option<String>,
    pub add: Option<String>,
    pub edit: Option<String>,
    pub delete: Option<String>,
}

impl ViewKind {
    /// Resolve the buttons for this page inside organisation `org`.
    pub fn capabilities(&self, org: &str) -> NavCapabilities {
        let base = format!("/organisations/{org}");
        match *self {
            ViewKind::QuestionList => NavCapabilities {
                add: Some(format!("{base}/questions")),
                ..Default::default()
            },
            ViewKind::QuestionDetail { question } => {
                let q = format!("{base}/questions/{question}");
                NavCapabilities {
                    back: Some(format!("{base}/questions")),
                    add: Some(format!("{q}/answers")),
                    edit: Some(q.clone()),
                    delete: Some(q),
                }
            }
            ViewKind::AnswerNew { question } => NavCapabilities {
                back: Some(format!("{base}/questions/{question}")),
                ..Default::default()
            },
            ViewKind::AnswerDetail { question, answer } => {
                let q = format!("{base}/questions/{question}");
                let a = format!("{q}/answers/{answer}");
                NavCapabilities {
                    back: Some(q),
                    add: None,
                    edit: Some(a.clone()),
                    delete: Some(a),
                }
            }
            ViewKind::PresentationList => NavCapabilities {
                add: Some(format!("{base}/presentations")),
                ..Default::default()
            },
            ViewKind::PresentationDetail { presentation } => {
                let p = format!("{base}/presentations/{presentation}");
                NavCapabilities {
                    back: Some(format!("{base}/presentations")),
                    add: Some(format!("{p}/slides")),
                    edit: Some(p.clone()),
                    delete: Some(p),
                }
            }
            ViewKind::SlideNew { presentation } => NavCapabilities {
                back: Some(format!("{base}/presentations/{presentation}")),
                ..Default::default()
            },
            ViewKind::SlideDetail { presentation, slide } => {
                let p = format!("{base}/presentations/{presentation}");
                let s = format!("{p}/slides/{slide}");
                NavCapabilities {
                    back: Some(p),
                    add: None,
                    edit: Some(s.clone()),
                    delete: Some(s),
                }
            }
        }
    }
}
