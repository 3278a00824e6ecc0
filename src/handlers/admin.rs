// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::{
        question::{CreateQuestionRequest, Question, UpdateQuestionRequest},
        quiz::QuizSummary,
        user::{LoginRequest, User},
    },
    utils::{
        hash::verify_password,
        jwt::{Claims, sign_jwt},
    },
};

/// Authenticates an administrator by email.
///
/// Same Argon2 verification as user login; additionally requires the
/// 'admin' role before a token is signed.
pub async fn admin_login(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, password, role, avatar_url, created_at, updated_at \
         FROM users WHERE email = $1",
    )
    .bind(&payload.email)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Admin login DB error: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let user = user.ok_or(AppError::AuthError("Invalid email or password".to_string()))?;

    let is_valid = verify_password(&payload.password, &user.password)?;

    if !is_valid {
        return Err(AppError::AuthError("Invalid email or password".to_string()));
    }

    if user.role != "admin" {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    let token = sign_jwt(user.id, &user.role, &config.jwt_secret, config.jwt_expiration)?;

    Ok(Json(json!({
        "success": true,
        "token": token,
        "type": "Bearer",
        "user": user,
    })))
}

/// Dashboard statistics for the admin panel.
///
/// quizzesTaken counts distinct (user, quiz_type, difficulty) triples in
/// the attempt history. All four counts are fetched concurrently.
pub async fn get_stats(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let users = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users").fetch_one(&pool);
    let quizzes = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quizzes").fetch_one(&pool);
    let questions =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions").fetch_one(&pool);
    let taken = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(DISTINCT (user_id, quiz_type, difficulty)) FROM user_quiz_results",
    )
    .fetch_one(&pool);

    let (total_users, total_quizzes, total_questions, quizzes_taken) =
        tokio::try_join!(users, quizzes, questions, taken).map_err(|e| {
            tracing::error!("Failed to fetch dashboard stats: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    Ok(Json(json!({
        "totalUsers": total_users,
        "totalQuizzes": total_quizzes,
        "totalQuestions": total_questions,
        "quizzesTaken": quizzes_taken,
    })))
}

/// Lists all users in the system, newest first.
/// Admin only. Password hashes are never serialized.
pub async fn list_users(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let users = sqlx::query_as::<_, User>(
        "SELECT id, username, email, password, role, avatar_url, created_at, updated_at \
         FROM users ORDER BY created_at DESC",
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list users: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(json!({ "success": true, "users": users })))
}

/// Deletes a user by ID.
/// Admin only. Prevents deleting self.
pub async fn delete_user(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let current_user_id = claims.sub.parse::<i64>().unwrap_or(0);
    if id == current_user_id {
        return Err(AppError::BadRequest("Cannot delete yourself".to_string()));
    }

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete user: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(Json(json!({
        "success": true,
        "message": "User deleted successfully",
    })))
}

/// Lists the quiz catalog with per-quiz question counts.
/// Admin only.
pub async fn list_quizzes(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let quizzes = sqlx::query_as::<_, QuizSummary>(
        "SELECT z.id, z.quiz_type, z.difficulty, COUNT(q.id) AS question_count \
         FROM quizzes z \
         LEFT JOIN questions q ON q.quiz_id = z.id \
         GROUP BY z.id, z.quiz_type, z.difficulty \
         ORDER BY z.id",
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list quizzes: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(json!({ "success": true, "quizzes": quizzes })))
}

/// Lists the questions of one quiz, correct answers included.
/// Admin only.
pub async fn list_quiz_questions(
    State(pool): State<PgPool>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM quizzes WHERE id = $1")
        .bind(quiz_id)
        .fetch_optional(&pool)
        .await?;

    if quiz_exists.is_none() {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    let questions = sqlx::query_as::<_, Question>(
        "SELECT q.id, q.quiz_id, z.quiz_type, z.difficulty, q.question, \
         q.option_a, q.option_b, q.option_c, q.option_d, q.correct_answer \
         FROM questions q \
         JOIN quizzes z ON q.quiz_id = z.id \
         WHERE q.quiz_id = $1 \
         ORDER BY q.id",
    )
    .bind(quiz_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(json!({ "success": true, "questions": questions })))
}

/// Creates a new question under a quiz.
/// Admin only.
pub async fn create_question(
    State(pool): State<PgPool>,
    Path(quiz_id): Path<i64>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let quiz_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM quizzes WHERE id = $1")
        .bind(quiz_id)
        .fetch_optional(&pool)
        .await?;

    if quiz_exists.is_none() {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO questions \
         (quiz_id, question, option_a, option_b, option_c, option_d, correct_answer) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING id",
    )
    .bind(quiz_id)
    .bind(&payload.question)
    .bind(&payload.option_a)
    .bind(&payload.option_b)
    .bind(&payload.option_c)
    .bind(&payload.option_d)
    .bind(&payload.correct_answer)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create question: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "id": id })),
    ))
}

/// Updates a question by ID.
/// Admin only.
pub async fn update_question(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if payload.question.is_none()
        && payload.option_a.is_none()
        && payload.option_b.is_none()
        && payload.option_c.is_none()
        && payload.option_d.is_none()
        && payload.correct_answer.is_none()
    {
        return Ok(Json(json!({ "success": true })));
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE questions SET ");
    let mut separated = builder.separated(", ");

    if let Some(question) = payload.question {
        separated.push("question = ");
        separated.push_bind_unseparated(question);
    }

    if let Some(option_a) = payload.option_a {
        separated.push("option_a = ");
        separated.push_bind_unseparated(option_a);
    }

    if let Some(option_b) = payload.option_b {
        separated.push("option_b = ");
        separated.push_bind_unseparated(option_b);
    }

    if let Some(option_c) = payload.option_c {
        separated.push("option_c = ");
        separated.push_bind_unseparated(option_c);
    }

    if let Some(option_d) = payload.option_d {
        separated.push("option_d = ");
        separated.push_bind_unseparated(option_d);
    }

    if let Some(correct_answer) = payload.correct_answer {
        separated.push("correct_answer = ");
        separated.push_bind_unseparated(correct_answer);
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(&pool).await.map_err(|e| {
        tracing::error!("Failed to update question: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(Json(json!({ "success": true })))
}

/// Deletes a quiz question by ID.
/// Admin only.
pub async fn delete_question(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM questions WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete question: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Question deleted successfully",
    })))
}
