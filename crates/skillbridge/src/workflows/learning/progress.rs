use serde::{Deserialize, Serialize};

use super::domain::{CourseOutline, EnrollmentRecord};
use super::quiz::PASS_THRESHOLD;
use crate::validation::{ValidationError, Validator};

/// Completion counts for one learner in one course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CourseProgressInput {
    pub total_lessons: u32,
    pub completed_lessons: u32,
    pub total_quizzes: u32,
    pub passed_quizzes: u32,
}

impl CourseProgressInput {
    /// Derive the counts from a course outline and a learner's stored enrollment.
    ///
    /// Lessons and quizzes recorded on the enrollment but no longer present in
    /// the outline are ignored.
    pub fn from_enrollment(outline: &CourseOutline, enrollment: &EnrollmentRecord) -> Self {
        let completed_lessons = enrollment
            .completed_lessons
            .iter()
            .filter(|lesson| outline.has_lesson(lesson))
            .count();
        let passed_quizzes = enrollment
            .quiz_scores
            .iter()
            .filter(|(quiz, score)| **score >= PASS_THRESHOLD && outline.has_quiz(quiz))
            .count();

        Self {
            total_lessons: saturating_count(outline.total_lessons()),
            completed_lessons: saturating_count(completed_lessons),
            total_quizzes: saturating_count(outline.total_quizzes()),
            passed_quizzes: saturating_count(passed_quizzes),
        }
    }
}

fn saturating_count(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonTally {
    pub completed: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizTally {
    pub passed: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourseProgressResult {
    pub progress_percent: f64,
    pub lessons: LessonTally,
    pub quizzes: QuizTally,
}

impl CourseProgressResult {
    pub fn is_complete(&self) -> bool {
        self.progress_percent >= 100.0
    }
}

/// Percentage of lessons plus passed quizzes out of all lessons and quizzes.
///
/// Rounded to two decimals, half away from zero. Returns `0.00` for an empty
/// course. Values above 100 are passed through when the completed counts
/// exceed the totals.
pub fn compute(input: CourseProgressInput) -> CourseProgressResult {
    let total_items = u64::from(input.total_lessons) + u64::from(input.total_quizzes);
    let completed_items = u64::from(input.completed_lessons) + u64::from(input.passed_quizzes);

    let progress_percent = if total_items == 0 {
        0.0
    } else {
        // hundredths of a percent, rounded half up on integers
        let hundredths = (completed_items * 20_000 + total_items) / (2 * total_items);
        hundredths as f64 / 100.0
    };

    CourseProgressResult {
        progress_percent,
        lessons: LessonTally {
            completed: input.completed_lessons,
            total: input.total_lessons,
        },
        quizzes: QuizTally {
            passed: input.passed_quizzes,
            total: input.total_quizzes,
        },
    }
}

/// Untrusted progress payload accepted at the HTTP and CLI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRequest {
    #[serde(default)]
    pub total_lessons: i64,
    #[serde(default)]
    pub completed_lessons: i64,
    #[serde(default)]
    pub total_quizzes: i64,
    #[serde(default)]
    pub passed_quizzes: i64,
}

impl TryFrom<ProgressRequest> for CourseProgressInput {
    type Error = ValidationError;

    fn try_from(request: ProgressRequest) -> Result<Self, Self::Error> {
        let mut validator = Validator::new();
        let input = CourseProgressInput {
            total_lessons: validator.count("total_lessons", request.total_lessons),
            completed_lessons: validator.count("completed_lessons", request.completed_lessons),
            total_quizzes: validator.count("total_quizzes", request.total_quizzes),
            passed_quizzes: validator.count("passed_quizzes", request.passed_quizzes),
        };
        validator.finish(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(
        total_lessons: u32,
        completed_lessons: u32,
        total_quizzes: u32,
        passed_quizzes: u32,
    ) -> CourseProgressInput {
        CourseProgressInput {
            total_lessons,
            completed_lessons,
            total_quizzes,
            passed_quizzes,
        }
    }

    #[test]
    fn empty_course_reports_zero_regardless_of_completions() {
        assert_eq!(compute(input(0, 0, 0, 0)).progress_percent, 0.0);
        assert_eq!(compute(input(0, 7, 0, 3)).progress_percent, 0.0);
    }

    #[test]
    fn full_completion_is_one_hundred() {
        let result = compute(input(10, 10, 2, 2));
        assert_eq!(result.progress_percent, 100.0);
        assert!(result.is_complete());
        assert_eq!(result.lessons, LessonTally { completed: 10, total: 10 });
        assert_eq!(result.quizzes, QuizTally { passed: 2, total: 2 });
    }

    #[test]
    fn partial_completion_rounds_to_two_decimals() {
        assert_eq!(compute(input(3, 1, 0, 0)).progress_percent, 33.33);
        assert_eq!(compute(input(3, 2, 0, 0)).progress_percent, 66.67);
        assert_eq!(compute(input(6, 1, 0, 0)).progress_percent, 16.67);
    }

    #[test]
    fn exact_half_hundredth_rounds_away_from_zero() {
        // 1/800 is 0.125%, exactly half a hundredth
        assert_eq!(compute(input(8, 1, 0, 0)).progress_percent, 12.5);
        assert_eq!(compute(input(800, 1, 0, 0)).progress_percent, 0.13);
        assert_eq!(compute(input(1600, 1, 0, 0)).progress_percent, 0.06);
    }

    #[test]
    fn quizzes_and_lessons_share_the_denominator() {
        let result = compute(input(4, 2, 4, 1));
        assert_eq!(result.progress_percent, 37.5);
        assert!(!result.is_complete());
    }

    #[test]
    fn progress_never_decreases_as_completions_grow() {
        let mut previous = 0.0;
        for completed in 0..=7 {
            for passed in 0..=3 {
                let current = compute(input(7, completed, 3, passed)).progress_percent;
                let lower =
                    compute(input(7, completed, 3, passed.saturating_sub(1))).progress_percent;
                assert!(current >= lower);
            }
            let current = compute(input(7, completed, 3, 0)).progress_percent;
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn overcounted_completions_pass_through_above_one_hundred() {
        assert_eq!(compute(input(2, 3, 0, 0)).progress_percent, 150.0);
    }

    #[test]
    fn identical_inputs_give_identical_results() {
        let first = compute(input(9, 4, 5, 2));
        let second = compute(input(9, 4, 5, 2));
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).expect("serializes"),
            serde_json::to_string(&second).expect("serializes")
        );
    }

    #[test]
    fn request_conversion_rejects_negative_counts() {
        let request = ProgressRequest {
            total_lessons: 4,
            completed_lessons: -1,
            total_quizzes: 1,
            passed_quizzes: -3,
        };

        let err = CourseProgressInput::try_from(request).expect_err("negative counts rejected");
        assert!(err.reason_for("completed_lessons").is_some());
        assert!(err.reason_for("passed_quizzes").is_some());
        assert!(err.reason_for("total_lessons").is_none());
    }

    #[test]
    fn request_conversion_accepts_valid_counts() {
        let request = ProgressRequest {
            total_lessons: 3,
            completed_lessons: 1,
            total_quizzes: 0,
            passed_quizzes: 0,
        };
        let converted = CourseProgressInput::try_from(request).expect("valid");
        assert_eq!(converted, input(3, 1, 0, 0));
    }
}
