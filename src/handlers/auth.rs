// src/handlers/auth.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{ChangePasswordRequest, LoginRequest, RegisterRequest, User},
    utils::{
        hash::{hash_password, verify_password},
        jwt::{Claims, sign_jwt},
    },
};

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created and the user object (excluding password).
pub async fn register(
    State(pool): State<PgPool>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;

    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (username, email, full_name, password)
        VALUES ($1, $2, $3, $4)
        RETURNING id, username, email, full_name, password, role, created_at
        "#,
    )
    .bind(payload.username.to_lowercase())
    .bind(&payload.email)
    .bind(&payload.full_name)
    .bind(&hashed_password)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        // Postgres error code for unique violation is 23505
        if e.to_string().contains("unique constraint") || e.to_string().contains("23505") {
            AppError::Conflict("Username or email already exists".to_string())
        } else {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Authenticates a user by username or email and returns a JWT token.
pub async fn login(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.username.is_none() && payload.email.is_none() {
        return Err(AppError::BadRequest(
            "Username or email required".to_string(),
        ));
    }
    if payload.password.is_empty() {
        return Err(AppError::BadRequest("Password is required".to_string()));
    }

    let user: Option<User> = sqlx::query_as(
        r#"
        SELECT id, username, email, full_name, password, role, created_at
        FROM users
        WHERE ($1::TEXT IS NOT NULL AND username = $1)
           OR ($2::TEXT IS NOT NULL AND email = $2)
        LIMIT 1
        "#,
    )
    .bind(payload.username.map(|u| u.to_lowercase()))
    .bind(&payload.email)
    .fetch_optional(&pool)
    .await?;

    let user = user.ok_or(AppError::AuthError("User not found".to_string()))?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(AppError::AuthError("Invalid password".to_string()));
    }

    let token = sign_jwt(
        user.id,
        &user.role,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "user": user,
    })))
}

/// Changes the current user's password after verifying the old one.
pub async fn change_password(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.user_id()?;

    let stored_hash: Option<String> = sqlx::query_scalar("SELECT password FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&pool)
        .await?;

    let stored_hash = stored_hash.ok_or(AppError::NotFound("User not found".to_string()))?;

    if !verify_password(&payload.old_password, &stored_hash)? {
        return Err(AppError::AuthError("Old password is incorrect".to_string()));
    }

    let new_hash = hash_password(&payload.new_password)?;

    sqlx::query("UPDATE users SET password = $1 WHERE id = $2")
        .bind(&new_hash)
        .bind(user_id)
        .execute(&pool)
        .await?;

    Ok(Json(json!({ "message": "Password changed successfully" })))
}
