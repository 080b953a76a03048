// src/handlers/question.rs

use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use sqlx::{PgPool, Postgres, QueryBuilder};
use validator::Validate;

use crate::{
    error::AppError,
    models::question::{
        CreateOptionRequest, CreateQuestionBody, PublicOption, Question, QuestionOption,
        QuestionWithOptions,
    },
    utils::jwt::Claims,
};

/// A question echoed back to the admin after creation.
#[derive(Debug, Serialize)]
pub struct CreatedQuestion {
    pub id: i64,
    pub text: String,
    pub options: Vec<CreateOptionRequest>,
}

/// Adds one question or a batch of questions to a quiz.
///
/// Only the quiz owner may add questions. Every question must carry at least
/// two options with at least one flagged correct; this is the only place that
/// invariant is enforced. All inserts run in one transaction.
pub async fn add_questions(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<i64>,
    Json(body): Json<CreateQuestionBody>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let quiz: Option<(i64,)> = sqlx::query_as("SELECT created_by FROM quizzes WHERE id = $1")
        .bind(quiz_id)
        .fetch_optional(&pool)
        .await?;

    let (created_by,) = quiz.ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    if created_by != user_id {
        return Err(AppError::Forbidden(
            "You are not allowed to modify another admin's quiz".to_string(),
        ));
    }

    let questions = body.into_vec();
    if questions.is_empty() {
        return Err(AppError::BadRequest("Question is required".to_string()));
    }

    for question in &questions {
        if let Err(validation_errors) = question.validate() {
            return Err(AppError::BadRequest(format!(
                "Each question must have text and at least two options, one of them correct: {}",
                validation_errors
            )));
        }
    }

    let mut tx = pool.begin().await?;
    let mut created = Vec::with_capacity(questions.len());

    for question in questions {
        let question_id: i64 =
            sqlx::query_scalar("INSERT INTO questions (quiz_id, text) VALUES ($1, $2) RETURNING id")
                .bind(quiz_id)
                .bind(&question.text)
                .fetch_one(&mut *tx)
                .await?;

        let mut query_builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO options (question_id, text, is_correct) ",
        );
        query_builder.push_values(&question.options, |mut b, opt| {
            b.push_bind(question_id)
                .push_bind(&opt.text)
                .push_bind(opt.is_correct);
        });
        query_builder.build().execute(&mut *tx).await?;

        created.push(CreatedQuestion {
            id: question_id,
            text: question.text,
            options: question.options,
        });
    }

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Lists a quiz's questions with their options, for taking the quiz.
///
/// The `is_correct` flag never leaves the server.
pub async fn list_questions(
    State(pool): State<PgPool>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let questions: Vec<Question> = sqlx::query_as(
        r#"
        SELECT id, quiz_id, text, created_at
        FROM questions
        WHERE quiz_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(quiz_id)
    .fetch_all(&pool)
    .await?;

    if questions.is_empty() {
        return Err(AppError::NotFound(
            "No questions found for this quiz".to_string(),
        ));
    }

    let question_ids: Vec<i64> = questions.iter().map(|q| q.id).collect();

    let options: Vec<QuestionOption> = sqlx::query_as(
        r#"
        SELECT id, question_id, text, is_correct
        FROM options
        WHERE question_id = ANY($1)
        ORDER BY id ASC
        "#,
    )
    .bind(&question_ids)
    .fetch_all(&pool)
    .await?;

    let mut options_by_question: HashMap<i64, Vec<PublicOption>> = HashMap::new();
    for opt in options {
        options_by_question
            .entry(opt.question_id)
            .or_default()
            .push(PublicOption {
                id: opt.id,
                text: opt.text,
            });
    }

    let response: Vec<QuestionWithOptions> = questions
        .into_iter()
        .map(|q| QuestionWithOptions {
            id: q.id,
            text: q.text,
            options: options_by_question.remove(&q.id).unwrap_or_default(),
        })
        .collect();

    Ok(Json(response))
}
