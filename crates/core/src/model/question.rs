use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors that can occur while building a question.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question option cannot be empty")]
    EmptyOption,

    #[error("category cannot be empty")]
    EmptyCategory,

    #[error("correct option {0} is out of range for {OPTION_COUNT} options")]
    CorrectOptionOutOfRange(u32),
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

/// Editorial difficulty rating attached to each catalog question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One multiple-choice question from the catalog.
///
/// Immutable after construction. The correct option is an index into
/// `options`, validated to be in range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: [String; OPTION_COUNT],
    correct_option: u32,
    category: String,
    difficulty: Difficulty,
}

impl Question {
    /// Build a question, validating text, options, category and the
    /// correct-option index.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if any text field is blank or the correct
    /// option does not point at one of the options.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_option: u32,
        category: impl Into<String>,
        difficulty: Difficulty,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.iter().any(|option| option.trim().is_empty()) {
            return Err(QuestionError::EmptyOption);
        }
        let category = category.into();
        if category.trim().is_empty() {
            return Err(QuestionError::EmptyCategory);
        }
        if correct_option as usize >= OPTION_COUNT {
            return Err(QuestionError::CorrectOptionOutOfRange(correct_option));
        }

        Ok(Self {
            id,
            text,
            options,
            correct_option,
            category,
            difficulty,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_option(&self) -> u32 {
        self.correct_option
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Whether the given answer slot matches this question's correct option.
    ///
    /// An unanswered slot is never correct.
    #[must_use]
    pub fn is_correct(&self, answer: Option<u32>) -> bool {
        answer == Some(self.correct_option)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options(values: [&str; OPTION_COUNT]) -> [String; OPTION_COUNT] {
        values.map(str::to_owned)
    }

    #[test]
    fn builds_a_valid_question() {
        let question = Question::new(
            QuestionId::new(1),
            "Which planet is known as the Red Planet?",
            options(["Venus", "Mars", "Jupiter", "Saturn"]),
            1,
            "Science",
            Difficulty::Easy,
        )
        .unwrap();

        assert_eq!(question.id(), QuestionId::new(1));
        assert_eq!(question.options().len(), OPTION_COUNT);
        assert_eq!(question.correct_option(), 1);
        assert_eq!(question.category(), "Science");
        assert_eq!(question.difficulty(), Difficulty::Easy);
    }

    #[test]
    fn rejects_blank_text() {
        let err = Question::new(
            QuestionId::new(1),
            "   ",
            options(["a", "b", "c", "d"]),
            0,
            "Science",
            Difficulty::Easy,
        )
        .unwrap_err();
        assert!(matches!(err, QuestionError::EmptyText));
    }

    #[test]
    fn rejects_out_of_range_correct_option() {
        let err = Question::new(
            QuestionId::new(1),
            "Q",
            options(["a", "b", "c", "d"]),
            4,
            "Science",
            Difficulty::Easy,
        )
        .unwrap_err();
        assert!(matches!(err, QuestionError::CorrectOptionOutOfRange(4)));
    }

    #[test]
    fn grading_treats_unanswered_as_wrong() {
        let question = Question::new(
            QuestionId::new(1),
            "Q",
            options(["a", "b", "c", "d"]),
            2,
            "Science",
            Difficulty::Medium,
        )
        .unwrap();

        assert!(question.is_correct(Some(2)));
        assert!(!question.is_correct(Some(1)));
        assert!(!question.is_correct(None));
    }
}
