// src/models/quiz.rs

use serde::Serialize;
use sqlx::FromRow;

/// Topic category of a quiz. Stored as lowercase TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizType {
    Html,
    Css,
    Javascript,
}

impl QuizType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "html" => Some(Self::Html),
            "css" => Some(Self::Css),
            "javascript" => Some(Self::Javascript),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Css => "css",
            Self::Javascript => "javascript",
        }
    }
}

/// Difficulty tier within a quiz type. Stored as lowercase TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// A row of the 'quizzes' catalog joined with its question count, for
/// the admin panel. The catalog itself is static, seeded by migration,
/// one row per (quiz_type, difficulty) pair.
#[derive(Debug, Serialize, FromRow)]
pub struct QuizSummary {
    pub id: i64,
    pub quiz_type: String,
    pub difficulty: String,
    pub question_count: i64,
}
