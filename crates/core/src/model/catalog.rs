use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::{Difficulty, OPTION_COUNT, Question, QuestionError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog cannot be empty")]
    Empty,

    #[error("duplicate question id {0} in catalog")]
    DuplicateId(QuestionId),
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// The fixed set of questions an exam session draws from.
///
/// Validated once at construction: non-empty and free of duplicate ids.
/// Sessions take a shuffled copy; the catalog itself never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    questions: Vec<Question>,
}

impl Catalog {
    /// Build a catalog from a list of questions.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Empty` for an empty list and
    /// `CatalogError::DuplicateId` when two questions share an id.
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(CatalogError::DuplicateId(question.id()));
            }
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The built-in ten-question general-aptitude set the product ships with.
    ///
    /// # Panics
    ///
    /// Panics only if the built-in definitions are internally inconsistent,
    /// which the tests below rule out.
    #[must_use]
    pub fn builtin() -> Self {
        let entries: [(u64, &str, [&str; OPTION_COUNT], u32, &str, Difficulty); 10] = [
            (
                1,
                "What is the capital of India?",
                ["Mumbai", "New Delhi", "Kolkata", "Chennai"],
                1,
                "General Knowledge",
                Difficulty::Easy,
            ),
            (
                2,
                "Which planet is known as the Red Planet?",
                ["Venus", "Mars", "Jupiter", "Saturn"],
                1,
                "Science",
                Difficulty::Easy,
            ),
            (
                3,
                "What is 15% of 200?",
                ["25", "30", "35", "40"],
                1,
                "Mathematics",
                Difficulty::Medium,
            ),
            (
                4,
                "Who wrote the book 'Discovery of India'?",
                [
                    "Mahatma Gandhi",
                    "Jawaharlal Nehru",
                    "Rabindranath Tagore",
                    "Dr. APJ Abdul Kalam",
                ],
                1,
                "History",
                Difficulty::Medium,
            ),
            (
                5,
                "If A = 1, B = 2, C = 3, then what is the value of CAB?",
                ["321", "312", "123", "132"],
                1,
                "Reasoning",
                Difficulty::Easy,
            ),
            (
                6,
                "Which of the following is a renewable source of energy?",
                ["Coal", "Solar", "Natural Gas", "Oil"],
                1,
                "Science",
                Difficulty::Easy,
            ),
            (
                7,
                "The first railway line in India was opened between which two cities?",
                [
                    "Mumbai to Thane",
                    "Mumbai to Pune",
                    "Delhi to Agra",
                    "Kolkata to Darjeeling",
                ],
                0,
                "History",
                Difficulty::Hard,
            ),
            (
                8,
                "What is 25% of 80?",
                ["15", "20", "25", "30"],
                1,
                "Mathematics",
                Difficulty::Easy,
            ),
            (
                9,
                "Which state in India has the longest coastline?",
                ["Tamil Nadu", "Gujarat", "Maharashtra", "Andhra Pradesh"],
                1,
                "Geography",
                Difficulty::Medium,
            ),
            (
                10,
                "Complete the series: 2, 4, 8, 16, ?",
                ["24", "28", "32", "36"],
                2,
                "Reasoning",
                Difficulty::Medium,
            ),
        ];

        let questions = entries
            .into_iter()
            .map(|(id, text, options, correct, category, difficulty)| {
                Question::new(
                    QuestionId::new(id),
                    text,
                    options.map(str::to_owned),
                    correct,
                    category,
                    difficulty,
                )
            })
            .collect::<Result<Vec<_>, QuestionError>>()
            .expect("built-in catalog should be valid");

        Self::new(questions).expect("built-in catalog should be valid")
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
