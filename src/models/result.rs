// src/models/result.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'user_quiz_results' table: one row per completed
/// attempt, append-only. "Latest" for a (quiz_type, difficulty) pair is
/// the row with the greatest taken_at.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserQuizResult {
    pub id: i64,
    pub user_id: i64,
    pub quiz_type: String,
    pub difficulty: String,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub score_percentage: i32,
    pub passed: bool,
    pub taken_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// One graded attempt, as returned to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GradeSummary {
    pub total_questions: i32,
    pub correct_answers: i32,
    pub score_percentage: i32,
    pub passed: bool,
}

/// A single answer within a submission.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerSubmission {
    pub question_id: i64,
    pub selected_answer: String,
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    pub quiz_type: String,
    pub difficulty: String,
    pub answers: Vec<AnswerSubmission>,
}

/// One remembered answer from the latest attempt, reconstructed from the
/// answer log.
#[derive(Debug, Serialize, FromRow)]
pub struct LatestAnswer {
    pub question_id: i64,
    pub selected_answer: String,
}
