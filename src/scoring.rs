// src/scoring.rs
//
// Correct-answer resolution and submission scoring. Scoring itself is a pure
// function; only the resolver touches the database.

use std::collections::HashMap;

use sqlx::PgPool;

use crate::{error::AppError, models::attempt::AnswerPair};

/// The authoritative answer key for one quiz: how many questions it has and,
/// for each question, the id of its correct option.
#[derive(Debug, Clone)]
pub struct AnswerKey {
    pub total_questions: i64,
    /// question id -> correct option id.
    pub correct_options: HashMap<i64, i64>,
}

/// A validated (question, option) pair, ready for scoring and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckedAnswer {
    pub question_id: i64,
    pub option_id: i64,
}

/// The outcome of scoring one submission.
#[derive(Debug)]
pub struct ScoredSubmission {
    pub score: i64,
    pub answers: Vec<CheckedAnswer>,
}

/// Loads the answer key for a quiz.
///
/// Fails with `NotFound` when the quiz has no questions. If a question has
/// more than one option flagged correct in storage, the map keeps only one of
/// them (last row wins); scoring is strictly single-answer comparison.
pub async fn resolve_correct_answers(pool: &PgPool, quiz_id: i64) -> Result<AnswerKey, AppError> {
    let question_ids: Vec<i64> =
        sqlx::query_scalar("SELECT id FROM questions WHERE quiz_id = $1")
            .bind(quiz_id)
            .fetch_all(pool)
            .await?;

    if question_ids.is_empty() {
        return Err(AppError::NotFound(
            "No questions found for this quiz".to_string(),
        ));
    }

    let correct_rows: Vec<(i64, i64)> = sqlx::query_as(
        "SELECT question_id, id FROM options WHERE question_id = ANY($1) AND is_correct = TRUE",
    )
    .bind(&question_ids)
    .fetch_all(pool)
    .await?;

    Ok(AnswerKey {
        total_questions: question_ids.len() as i64,
        correct_options: correct_rows.into_iter().collect(),
    })
}

/// Validates a submission and computes its score against the answer key.
///
/// * Rejects an empty answer list and any pair missing either id (400).
/// * Rejects submissions with fewer pairs than the quiz has questions (400).
/// * Awards one point per pair whose option id equals the correct option id
///   for that question; questions absent from the key never match.
///
/// Duplicate pairs for the same question pass the completeness check and are
/// each scored independently; the stored score can then exceed the number of
/// distinct questions answered. Kept as-is from the original system.
pub fn score_submission(
    answers: &[AnswerPair],
    key: &AnswerKey,
) -> Result<ScoredSubmission, AppError> {
    if answers.is_empty() {
        return Err(AppError::BadRequest(
            "Answers are required and should be a non-empty array".to_string(),
        ));
    }

    let mut checked = Vec::with_capacity(answers.len());
    for pair in answers {
        let (Some(question_id), Some(option_id)) = (pair.question_id, pair.option_id) else {
            return Err(AppError::BadRequest(
                "Each answer must have a questionId and an optionId".to_string(),
            ));
        };
        checked.push(CheckedAnswer {
            question_id,
            option_id,
        });
    }

    if (checked.len() as i64) < key.total_questions {
        return Err(AppError::IncompleteSubmission(format!(
            "Quiz has {} questions but only {} answers were submitted",
            key.total_questions,
            checked.len()
        )));
    }

    let score = checked
        .iter()
        .filter(|ans| key.correct_options.get(&ans.question_id) == Some(&ans.option_id))
        .count() as i64;

    Ok(ScoredSubmission {
        score,
        answers: checked,
    })
}
