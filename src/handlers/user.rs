// src/handlers/user.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{UpdateProfileRequest, User},
    utils::jwt::Claims,
};

/// Partially updates the calling user's profile (username, email,
/// avatar_url). Bumps updated_at and returns the fresh row.
pub async fn update_profile(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if payload.username.is_none() && payload.email.is_none() && payload.avatar_url.is_none() {
        return Err(AppError::BadRequest("Nothing to update".to_string()));
    }

    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE users SET ");
    let mut separated = builder.separated(", ");

    if let Some(username) = payload.username {
        separated.push("username = ");
        separated.push_bind_unseparated(username);
    }

    if let Some(email) = payload.email {
        separated.push("email = ");
        separated.push_bind_unseparated(email);
    }

    if let Some(avatar_url) = payload.avatar_url {
        separated.push("avatar_url = ");
        separated.push_bind_unseparated(avatar_url);
    }

    separated.push("updated_at = NOW()");

    builder.push(" WHERE id = ");
    builder.push_bind(user_id);

    let result = builder.build().execute(&pool).await.map_err(|e| {
        if e.to_string().contains("unique constraint") || e.to_string().contains("23505") {
            AppError::Conflict("Username or email is already in use".to_string())
        } else {
            tracing::error!("Failed to update profile: {:?}", e);
            AppError::InternalServerError(e.to_string())
        }
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, password, role, avatar_url, created_at, updated_at \
         FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_one(&pool)
    .await?;

    Ok(Json(json!({ "success": true, "user": user })))
}
