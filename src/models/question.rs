// src/models/question.rs

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// One row of `questions LEFT JOIN options`.
/// `option_id`/`option_text` are NULL for a question without options.
#[derive(Debug, Clone, FromRow)]
pub struct QuestionOptionRow {
    pub question_id: i64,
    pub question_text: String,
    pub option_id: Option<i64>,
    pub option_text: Option<String>,
}

/// Option as shown to quiz takers: id and text only.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PublicOption {
    pub id: i64,
    pub option_text: String,
}

/// Question with its options, as returned by `GET /questions`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PublicQuestion {
    pub id: i64,
    pub question_text: String,
    pub options: Vec<PublicOption>,
}

/// Folds flat join rows into nested questions.
///
/// Rows must be ordered by question id; option order within a question is kept.
pub fn group_question_rows(rows: Vec<QuestionOptionRow>) -> Vec<PublicQuestion> {
    let mut questions: Vec<PublicQuestion> = Vec::new();

    for row in rows {
        let option = match (row.option_id, row.option_text) {
            (Some(id), Some(option_text)) => Some(PublicOption { id, option_text }),
            _ => None,
        };

        match questions.last_mut() {
            Some(current) if current.id == row.question_id => current.options.extend(option),
            _ => questions.push(PublicQuestion {
                id: row.question_id,
                question_text: row.question_text,
                options: option.into_iter().collect(),
            }),
        }
    }

    questions
}
