// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub quiz_id: i64,
    pub text: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Represents the 'options' table in the database.
/// `is_correct` is never serialized; the answer key stays server-side.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuestionOption {
    pub id: i64,
    pub question_id: i64,
    pub text: String,
    #[serde(skip)]
    pub is_correct: bool,
}

/// DTO for one option of a new question.
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateOptionRequest {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// DTO for creating a new question with its options.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 1000, message = "Question text is required."))]
    pub text: String,
    #[validate(custom(function = validate_options))]
    pub options: Vec<CreateOptionRequest>,
}

/// The question body may be a single object or an array of objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CreateQuestionBody {
    One(CreateQuestionRequest),
    Many(Vec<CreateQuestionRequest>),
}

impl CreateQuestionBody {
    pub fn into_vec(self) -> Vec<CreateQuestionRequest> {
        match self {
            CreateQuestionBody::One(q) => vec![q],
            CreateQuestionBody::Many(qs) => qs,
        }
    }
}

fn validate_options(options: &[CreateOptionRequest]) -> Result<(), validator::ValidationError> {
    if options.len() < 2 {
        return Err(validator::ValidationError::new("at_least_two_options"));
    }
    if !options.iter().any(|opt| opt.is_correct) {
        return Err(validator::ValidationError::new("no_correct_option"));
    }
    for opt in options {
        if opt.text.is_empty() || opt.text.len() > 500 {
            return Err(validator::ValidationError::new("option_text_length"));
        }
    }
    Ok(())
}

/// DTO for sending a question to quiz takers (options without the answer flag).
#[derive(Debug, Serialize)]
pub struct PublicOption {
    pub id: i64,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct QuestionWithOptions {
    pub id: i64,
    pub text: String,
    pub options: Vec<PublicOption>,
}
