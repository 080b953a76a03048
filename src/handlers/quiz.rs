// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        attempt::{QuizAttempt, SubmitQuizRequest},
        quiz::{CreateQuizRequest, Quiz},
    },
    scoring::{self, CheckedAnswer},
    utils::jwt::Claims,
};

/// Creates a new quiz owned by the calling admin.
pub async fn create_quiz(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let created_by = claims.user_id()?;

    let quiz: Quiz = sqlx::query_as(
        r#"
        INSERT INTO quizzes (title, created_by)
        VALUES ($1, $2)
        RETURNING id, title, created_by, created_at
        "#,
    )
    .bind(&payload.title)
    .bind(created_by)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create quiz: {:?}", e);
        AppError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Lists all quizzes, newest first.
pub async fn list_quizzes(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let quizzes: Vec<Quiz> = sqlx::query_as(
        "SELECT id, title, created_by, created_at FROM quizzes ORDER BY created_at DESC",
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(quizzes))
}

/// Submits a user's answers for a quiz.
///
/// Resolves the answer key, scores the submission in memory, then stores the
/// attempt and its answer rows in one transaction. Returns the stored attempt.
pub async fn submit_quiz(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<i64>,
    Json(payload): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let key = scoring::resolve_correct_answers(&pool, quiz_id).await?;
    let scored = scoring::score_submission(&payload.answers, &key)?;

    let attempt = record_attempt(
        &pool,
        user_id,
        quiz_id,
        scored.score,
        key.total_questions,
        &scored.answers,
    )
    .await?;

    Ok(Json(attempt))
}

/// Persists one attempt and its answer rows atomically.
///
/// Upserts the attempt keyed by (user_id, quiz_id), wipes any answer rows from
/// a prior submission of the same pair, and bulk-inserts the new ones. Any
/// failure drops the transaction, rolling every step back; a reader never sees
/// answers from two submissions mixed together.
pub async fn record_attempt(
    pool: &PgPool,
    user_id: i64,
    quiz_id: i64,
    score: i64,
    total_questions: i64,
    answers: &[CheckedAnswer],
) -> Result<QuizAttempt, AppError> {
    let mut tx = pool.begin().await?;

    let attempt: QuizAttempt = sqlx::query_as(
        r#"
        INSERT INTO quiz_attempts (user_id, quiz_id, score, total_questions, submitted_at)
        VALUES ($1, $2, $3, $4, NOW())
        ON CONFLICT (user_id, quiz_id) DO UPDATE SET
            score = EXCLUDED.score,
            total_questions = EXCLUDED.total_questions,
            submitted_at = NOW()
        RETURNING id, user_id, quiz_id, score, total_questions, submitted_at
        "#,
    )
    .bind(user_id)
    .bind(quiz_id)
    .bind(score)
    .bind(total_questions)
    .fetch_one(&mut *tx)
    .await?;

    // Clear answers from any prior submission of this (user, quiz) pair.
    sqlx::query("DELETE FROM submitted_answers WHERE attempt_id = $1")
        .bind(attempt.id)
        .execute(&mut *tx)
        .await?;

    if !answers.is_empty() {
        let mut query_builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO submitted_answers (attempt_id, question_id, option_id) ",
        );
        query_builder.push_values(answers, |mut b, ans| {
            b.push_bind(attempt.id)
                .push_bind(ans.question_id)
                .push_bind(ans.option_id);
        });
        query_builder.build().execute(&mut *tx).await?;
    }

    tx.commit().await?;

    Ok(attempt)
}

/// Deletes a quiz and everything that references it.
pub async fn delete_quiz(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let deleted_quiz_id = delete_quiz_cascade(&pool, quiz_id, user_id).await?;

    Ok(Json(json!({
        "deleted_quiz_id": deleted_quiz_id,
        "message": "Quiz and all related data deleted successfully",
    })))
}

/// Removes a quiz and all dependent rows in one transaction.
///
/// The schema carries no ON DELETE CASCADE, so children are deleted before
/// parents: submitted answers, attempts, options, questions, then the quiz.
/// The quiz row is locked with FOR UPDATE for the duration of the transaction;
/// the ownership check runs before any destructive step. Any failure drops the
/// transaction and nothing is removed.
pub async fn delete_quiz_cascade(
    pool: &PgPool,
    quiz_id: i64,
    acting_user_id: i64,
) -> Result<i64, AppError> {
    let mut tx = pool.begin().await?;

    let quiz: Option<(i64,)> =
        sqlx::query_as("SELECT created_by FROM quizzes WHERE id = $1 FOR UPDATE")
            .bind(quiz_id)
            .fetch_optional(&mut *tx)
            .await?;

    let (created_by,) = quiz.ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    if created_by != acting_user_id {
        return Err(AppError::Forbidden(
            "You are not allowed to delete another admin's quiz".to_string(),
        ));
    }

    let attempt_ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM quiz_attempts WHERE quiz_id = $1")
        .bind(quiz_id)
        .fetch_all(&mut *tx)
        .await?;

    // ANY over an empty id list matches nothing, so empty collections no-op.
    sqlx::query("DELETE FROM submitted_answers WHERE attempt_id = ANY($1)")
        .bind(&attempt_ids)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM quiz_attempts WHERE quiz_id = $1")
        .bind(quiz_id)
        .execute(&mut *tx)
        .await?;

    let question_ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM questions WHERE quiz_id = $1")
        .bind(quiz_id)
        .fetch_all(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM options WHERE question_id = ANY($1)")
        .bind(&question_ids)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM questions WHERE quiz_id = $1")
        .bind(quiz_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM quizzes WHERE id = $1")
        .bind(quiz_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(quiz_id)
}
