// src/handlers/quiz.rs

use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    config::PASSING_SCORE_PERCENTAGE,
    error::AppError,
    models::{
        question::{PublicQuestion, Question},
        quiz::{Difficulty, QuizType},
        result::{AnswerSubmission, GradeSummary, LatestAnswer, SubmitQuizRequest, UserQuizResult},
    },
    utils::jwt::Claims,
};

const QUESTION_QUERY: &str = "SELECT q.id, q.quiz_id, z.quiz_type, z.difficulty, q.question, \
     q.option_a, q.option_b, q.option_c, q.option_d, q.correct_answer \
     FROM questions q \
     JOIN quizzes z ON q.quiz_id = z.id \
     WHERE z.quiz_type = $1 AND z.difficulty = $2 \
     ORDER BY RANDOM()";

/// Helper struct for fetching answer keys from the database.
#[derive(sqlx::FromRow)]
struct AnswerKey {
    id: i64,
    correct_answer: String,
}

/// Grades a submission against the stored answer key.
///
/// The percentage is computed over the submitted answers, not over the
/// quiz's full question set. A submission referencing an unknown question
/// id counts toward the total but can never match.
fn grade(submissions: &[AnswerSubmission], key: &HashMap<i64, String>) -> GradeSummary {
    let total_questions = submissions.len() as i32;
    let mut correct_answers = 0;

    for submission in submissions {
        if let Some(correct) = key.get(&submission.question_id) {
            if submission.selected_answer == *correct {
                correct_answers += 1;
            }
        }
    }

    let score_percentage = if total_questions > 0 {
        ((correct_answers as f64 / total_questions as f64) * 100.0).round() as i32
    } else {
        0
    };

    GradeSummary {
        total_questions,
        correct_answers,
        score_percentage,
        passed: score_percentage >= PASSING_SCORE_PERCENTAGE,
    }
}

/// Query parameters for fetching quiz questions.
#[derive(Debug, Deserialize)]
pub struct QuizQuery {
    #[serde(rename = "type")]
    pub quiz_type: Option<String>,
    pub difficulty: Option<String>,
    /// Optional cap on how many questions to return.
    pub count: Option<i64>,
}

/// Fetches the questions of a quiz in randomized order.
///
/// The correct answers are stripped before transmission so the client
/// cannot discover them. All matching questions are returned unless a
/// positive `count` caps the result.
pub async fn get_questions(
    State(pool): State<PgPool>,
    Query(params): Query<QuizQuery>,
) -> Result<impl IntoResponse, AppError> {
    let quiz_type = params
        .quiz_type
        .as_deref()
        .and_then(QuizType::parse)
        .ok_or_else(|| {
            AppError::BadRequest("Invalid quiz type. Must be: html, css, or javascript".to_string())
        })?;

    let difficulty = params
        .difficulty
        .as_deref()
        .and_then(Difficulty::parse)
        .ok_or_else(|| {
            AppError::BadRequest("Invalid difficulty. Must be: easy, medium, or hard".to_string())
        })?;

    let questions: Vec<Question> = if let Some(count) = params.count.filter(|c| *c > 0) {
        sqlx::query_as::<_, Question>(&format!("{QUESTION_QUERY} LIMIT $3"))
            .bind(quiz_type.as_str())
            .bind(difficulty.as_str())
            .bind(count)
            .fetch_all(&pool)
            .await
    } else {
        sqlx::query_as::<_, Question>(QUESTION_QUERY)
            .bind(quiz_type.as_str())
            .bind(difficulty.as_str())
            .fetch_all(&pool)
            .await
    }
    .map_err(|e| {
        tracing::error!("Failed to fetch quiz questions: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let total_questions = questions.len();
    let questions: Vec<PublicQuestion> = questions.into_iter().map(Into::into).collect();

    Ok(Json(json!({
        "success": true,
        "quiz_type": quiz_type.as_str(),
        "difficulty": difficulty.as_str(),
        "total_questions": total_questions,
        "questions": questions,
    })))
}

/// Submits a quiz attempt, grades it, and persists the outcome.
///
/// * Normalizes selections to uppercase and rejects anything outside A-D.
/// * Fetches the answer key for all submitted ids in one round trip.
/// * Writes the result row and the per-question answer log in ONE
///   transaction, so a failed write never leaves a reported-but-unsaved
///   score. Both share the attempt timestamp.
pub async fn submit_quiz(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let quiz_type = QuizType::parse(&req.quiz_type).ok_or_else(|| {
        AppError::BadRequest("Invalid quiz type. Must be: html, css, or javascript".to_string())
    })?;

    let difficulty = Difficulty::parse(&req.difficulty).ok_or_else(|| {
        AppError::BadRequest("Invalid difficulty. Must be: easy, medium, or hard".to_string())
    })?;

    if req.answers.is_empty() {
        return Err(AppError::BadRequest("No answers submitted".to_string()));
    }

    let mut submissions = Vec::with_capacity(req.answers.len());
    for answer in &req.answers {
        let selected = answer.selected_answer.to_uppercase();
        if !matches!(selected.as_str(), "A" | "B" | "C" | "D") {
            return Err(AppError::BadRequest(
                "Invalid answer. Must be: A, B, C, or D".to_string(),
            ));
        }
        submissions.push(AnswerSubmission {
            question_id: answer.question_id,
            selected_answer: selected,
        });
    }

    // Use QueryBuilder for dynamic IN clause
    let mut query_builder = QueryBuilder::<Postgres>::new(
        "SELECT id, correct_answer FROM questions WHERE id IN (",
    );

    let mut separated = query_builder.separated(",");
    for submission in &submissions {
        separated.push_bind(submission.question_id);
    }
    separated.push_unseparated(")");

    let keys: Vec<AnswerKey> = query_builder
        .build_query_as()
        .fetch_all(&pool)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let key: HashMap<i64, String> = keys.into_iter().map(|k| (k.id, k.correct_answer)).collect();

    let result = grade(&submissions, &key);

    let user_id = claims.sub.parse::<i64>().unwrap_or(0);
    let attempt_at = chrono::Utc::now();

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO user_quiz_results \
         (user_id, quiz_type, difficulty, total_questions, correct_answers, score_percentage, passed, taken_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(user_id)
    .bind(quiz_type.as_str())
    .bind(difficulty.as_str())
    .bind(result.total_questions)
    .bind(result.correct_answers)
    .bind(result.score_percentage)
    .bind(result.passed)
    .bind(attempt_at)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to insert quiz result: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let mut insert_answers = QueryBuilder::<Postgres>::new(
        "INSERT INTO user_quiz_answers \
         (user_id, quiz_type, difficulty, question_id, selected_answer, attempt_at) ",
    );
    insert_answers.push_values(&submissions, |mut row, submission| {
        row.push_bind(user_id)
            .push_bind(quiz_type.as_str())
            .push_bind(difficulty.as_str())
            .push_bind(submission.question_id)
            .push_bind(submission.selected_answer.clone())
            .push_bind(attempt_at);
    });

    insert_answers.build().execute(&mut *tx).await.map_err(|e| {
        tracing::error!("Failed to log attempt answers: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    tx.commit().await?;

    Ok(Json(json!({ "success": true, "result": result })))
}

/// Returns the calling user's attempt history, newest first.
///
/// "Unique quizzes taken" stays a client-side aggregation: group these
/// rows by (quiz_type, difficulty) and keep the most recent per group.
pub async fn get_user_results(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    let results = sqlx::query_as::<_, UserQuizResult>(
        "SELECT id, user_id, quiz_type, difficulty, total_questions, correct_answers, \
         score_percentage, passed, taken_at \
         FROM user_quiz_results \
         WHERE user_id = $1 \
         ORDER BY taken_at DESC",
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch user results: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(json!({ "success": true, "results": results })))
}

/// Query parameters for fetching the latest attempt's answers.
#[derive(Debug, Deserialize)]
pub struct LatestAnswersQuery {
    pub quiz_type: Option<String>,
    pub difficulty: Option<String>,
}

/// Returns the per-question answers of the calling user's latest attempt
/// for a quiz, reconstructed from the answer log via its attempt
/// timestamp. No attempt yet means an empty list, not an error.
pub async fn get_latest_answers(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<LatestAnswersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let quiz_type = params
        .quiz_type
        .as_deref()
        .and_then(QuizType::parse)
        .ok_or_else(|| {
            AppError::BadRequest("Invalid quiz type. Must be: html, css, or javascript".to_string())
        })?;

    let difficulty = params
        .difficulty
        .as_deref()
        .and_then(Difficulty::parse)
        .ok_or_else(|| {
            AppError::BadRequest("Invalid difficulty. Must be: easy, medium, or hard".to_string())
        })?;

    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    let latest: Option<chrono::DateTime<chrono::Utc>> = sqlx::query_scalar(
        "SELECT MAX(attempt_at) FROM user_quiz_answers \
         WHERE user_id = $1 AND quiz_type = $2 AND difficulty = $3",
    )
    .bind(user_id)
    .bind(quiz_type.as_str())
    .bind(difficulty.as_str())
    .fetch_one(&pool)
    .await?;

    let Some(latest) = latest else {
        return Ok(Json(json!({ "success": true, "answers": [] })));
    };

    let answers = sqlx::query_as::<_, LatestAnswer>(
        "SELECT question_id, selected_answer FROM user_quiz_answers \
         WHERE user_id = $1 AND quiz_type = $2 AND difficulty = $3 AND attempt_at = $4 \
         ORDER BY id",
    )
    .bind(user_id)
    .bind(quiz_type.as_str())
    .bind(difficulty.as_str())
    .bind(latest)
    .fetch_all(&pool)
    .await?;

    Ok(Json(json!({ "success": true, "answers": answers })))
}
