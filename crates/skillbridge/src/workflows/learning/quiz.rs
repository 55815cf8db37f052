use serde::{Deserialize, Serialize};

use super::domain::QuizSubmission;
use crate::validation::{ValidationError, Validator};

/// Minimum score (0–100) for a quiz attempt to count as passed.
pub const PASS_THRESHOLD: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizGrade {
    pub score: u8,
    pub passed: bool,
}

/// Grade an attempt as a whole-number percentage of correct answers.
pub fn grade(submission: QuizSubmission) -> QuizGrade {
    let score = if submission.total_questions == 0 {
        0
    } else {
        let correct = u64::from(submission.correct_answers.min(submission.total_questions));
        let total = u64::from(submission.total_questions);
        ((correct * 200 + total) / (2 * total)) as u8
    };

    QuizGrade {
        score,
        passed: score >= PASS_THRESHOLD,
    }
}

/// Points owed for an attempt given the best score recorded before it.
///
/// Only the first passing attempt on a quiz earns points.
pub fn points_for_attempt(previous_best: Option<u8>, grade: QuizGrade, pass_points: u32) -> u32 {
    let already_passed = previous_best.is_some_and(|best| best >= PASS_THRESHOLD);
    if grade.passed && !already_passed {
        pass_points
    } else {
        0
    }
}

/// Untrusted attempt payload accepted over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAttemptRequest {
    pub correct_answers: i64,
    pub total_questions: i64,
}

impl TryFrom<QuizAttemptRequest> for QuizSubmission {
    type Error = ValidationError;

    fn try_from(request: QuizAttemptRequest) -> Result<Self, Self::Error> {
        let mut validator = Validator::new();
        let submission = QuizSubmission {
            correct_answers: validator.count("correct_answers", request.correct_answers),
            total_questions: validator.count("total_questions", request.total_questions),
        };
        if submission.total_questions == 0 && request.total_questions >= 0 {
            validator.reject("total_questions", "must be at least 1");
        }
        validator.finish(submission)
    }
}
