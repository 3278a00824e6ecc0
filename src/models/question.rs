// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the 'questions' table, joined with its quiz's type and
/// difficulty. Carries the correct answer, so it only ever goes to the
/// grading path and the admin surface.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    pub id: i64,
    pub quiz_id: i64,
    pub quiz_type: String,
    pub difficulty: String,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    /// 'A', 'B', 'C' or 'D'.
    pub correct_answer: String,
}

/// DTO for sending a question to quiz takers (correct_answer withheld).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub quiz_id: i64,
    pub quiz_type: String,
    pub difficulty: String,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            quiz_id: q.quiz_id,
            quiz_type: q.quiz_type,
            difficulty: q.difficulty,
            question: q.question,
            option_a: q.option_a,
            option_b: q.option_b,
            option_c: q.option_c,
            option_d: q.option_d,
        }
    }
}

/// DTO for creating a new question.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 1000))]
    pub question: String,
    #[validate(length(min = 1, max = 500))]
    pub option_a: String,
    #[validate(length(min = 1, max = 500))]
    pub option_b: String,
    #[validate(length(min = 1, max = 500))]
    pub option_c: String,
    #[validate(length(min = 1, max = 500))]
    pub option_d: String,
    #[validate(custom(function = validate_answer_letter))]
    pub correct_answer: String,
}

/// DTO for updating a question. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 1000))]
    pub question: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub option_a: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub option_b: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub option_c: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub option_d: Option<String>,
    #[validate(custom(function = validate_answer_letter))]
    pub correct_answer: Option<String>,
}

fn validate_answer_letter(answer: &str) -> Result<(), validator::ValidationError> {
    match answer {
        "A" | "B" | "C" | "D" => Ok(()),
        _ => Err(validator::ValidationError::new("answer_must_be_a_to_d")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_rejects_bad_answer_letter() {
        let req = CreateQuestionRequest {
            question: "Which tag defines a hyperlink?".to_string(),
            option_a: "<a>".to_string(),
            option_b: "<link>".to_string(),
            option_c: "<href>".to_string(),
            option_d: "<url>".to_string(),
            correct_answer: "E".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn public_question_drops_the_answer() {
        let q = Question {
            id: 1,
            quiz_id: 2,
            quiz_type: "html".to_string(),
            difficulty: "easy".to_string(),
            question: "Which tag defines a hyperlink?".to_string(),
            option_a: "<a>".to_string(),
            option_b: "<link>".to_string(),
            option_c: "<href>".to_string(),
            option_d: "<url>".to_string(),
            correct_answer: "A".to_string(),
        };
        let json = serde_json::to_value(PublicQuestion::from(q)).unwrap();
        assert!(json.get("correct_answer").is_none());
        assert_eq!(json["question"], "Which tag defines a hyperlink?");
    }
}
