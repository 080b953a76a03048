// src/models/attempt.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'quiz_attempts' table in the database.
/// At most one row per (user, quiz); resubmission overwrites it in place.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub total_questions: i64,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Represents the 'submitted_answers' table in the database.
/// The full answer set of an attempt is replaced wholesale on resubmission.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubmittedAnswer {
    pub id: i64,
    pub attempt_id: i64,
    pub question_id: i64,
    pub option_id: i64,
}

/// One submitted (question, option) pair.
///
/// Both ids are optional at the wire level so that a pair missing either id is
/// rejected with a 400 instead of a deserialization error, matching the
/// per-pair validation in the scorer.
#[derive(Debug, Deserialize)]
pub struct AnswerPair {
    #[serde(alias = "questionId")]
    pub question_id: Option<i64>,
    #[serde(alias = "optionId")]
    pub option_id: Option<i64>,
}

/// DTO for submitting a quiz.
#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    #[serde(default)]
    pub answers: Vec<AnswerPair>,
}
