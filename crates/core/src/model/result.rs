use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::ids::{ResultId, UserId};
use crate::model::question::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamResultError {
    #[error("expected {expected} answer slots, got {actual}")]
    AnswerCountMismatch { expected: usize, actual: usize },

    #[error("stored score {stored} does not match recomputed score {computed}")]
    ScoreMismatch { stored: u32, computed: u32 },

    #[error("category totals ({sum}) do not match question count ({total})")]
    BreakdownMismatch { total: u32, sum: u32 },
}

/// Per-category correct/total tally.
///
/// Computed per result at submit time and merged across history for
/// analytics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTally {
    pub correct: u32,
    pub total: u32,
}

impl CategoryTally {
    pub(crate) fn record(&mut self, correct: bool) {
        self.total = self.total.saturating_add(1);
        if correct {
            self.correct = self.correct.saturating_add(1);
        }
    }

    pub(crate) fn merge(&mut self, other: CategoryTally) {
        self.correct = self.correct.saturating_add(other.correct);
        self.total = self.total.saturating_add(other.total);
    }

    /// Fraction correct expressed as a percentage; zero for an empty tally.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.correct) / f64::from(self.total) * 100.0
    }
}

/// The scored, immutable outcome of one submitted exam session.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamResult {
    id: ResultId,
    user_id: UserId,
    score: u32,
    total_questions: u32,
    answers: Vec<Option<u32>>,
    correct_answers: Vec<u32>,
    time_taken_seconds: u32,
    created_at: DateTime<Utc>,
    category_breakdown: BTreeMap<String, CategoryTally>,
}

impl ExamResult {
    /// Score a finished answer sheet against its question set.
    ///
    /// The answer slice must have one slot per question (`None` for
    /// unanswered). Score and category breakdown are derived here; the
    /// questions themselves are not retained.
    ///
    /// # Errors
    ///
    /// Returns `ExamResultError::AnswerCountMismatch` if the answer sheet
    /// and question set differ in length.
    pub fn from_answers(
        id: ResultId,
        user_id: UserId,
        questions: &[Question],
        answers: &[Option<u32>],
        time_taken_seconds: u32,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ExamResultError> {
        if questions.len() != answers.len() {
            return Err(ExamResultError::AnswerCountMismatch {
                expected: questions.len(),
                actual: answers.len(),
            });
        }

        let mut score = 0_u32;
        let mut category_breakdown: BTreeMap<String, CategoryTally> = BTreeMap::new();
        for (question, answer) in questions.iter().zip(answers) {
            let correct = question.is_correct(*answer);
            if correct {
                score = score.saturating_add(1);
            }
            category_breakdown
                .entry(question.category().to_owned())
                .or_default()
                .record(correct);
        }

        let total_questions =
            u32::try_from(questions.len()).unwrap_or(u32::MAX);
        let correct_answers = questions.iter().map(Question::correct_option).collect();

        Ok(Self {
            id,
            user_id,
            score,
            total_questions,
            answers: answers.to_vec(),
            correct_answers,
            time_taken_seconds,
            created_at,
            category_breakdown,
        })
    }

    /// Rehydrate a result from persisted storage, re-checking internal
    /// consistency.
    ///
    /// # Errors
    ///
    /// Returns `ExamResultError::AnswerCountMismatch` if either snapshot
    /// disagrees with `total_questions`,
    /// `ExamResultError::ScoreMismatch` if the stored score cannot be
    /// reproduced from the snapshots, and
    /// `ExamResultError::BreakdownMismatch` if category totals do not sum to
    /// the question count.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: ResultId,
        user_id: UserId,
        score: u32,
        total_questions: u32,
        answers: Vec<Option<u32>>,
        correct_answers: Vec<u32>,
        time_taken_seconds: u32,
        created_at: DateTime<Utc>,
        category_breakdown: BTreeMap<String, CategoryTally>,
    ) -> Result<Self, ExamResultError> {
        let expected = total_questions as usize;
        if answers.len() != expected || correct_answers.len() != expected {
            return Err(ExamResultError::AnswerCountMismatch {
                expected,
                actual: answers.len().max(correct_answers.len()),
            });
        }

        let computed = answers
            .iter()
            .zip(&correct_answers)
            .filter(|(answer, correct)| **answer == Some(**correct))
            .count();
        let computed = u32::try_from(computed).unwrap_or(u32::MAX);
        if computed != score {
            return Err(ExamResultError::ScoreMismatch {
                stored: score,
                computed,
            });
        }

        let sum: u32 = category_breakdown
            .values()
            .fold(0, |acc, tally| acc.saturating_add(tally.total));
        if sum != total_questions {
            return Err(ExamResultError::BreakdownMismatch {
                total: total_questions,
                sum,
            });
        }

        Ok(Self {
            id,
            user_id,
            score,
            total_questions,
            answers,
            correct_answers,
            time_taken_seconds,
            created_at,
            category_breakdown,
        })
    }

    #[must_use]
    pub fn id(&self) -> ResultId {
        self.id
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<u32>] {
        &self.answers
    }

    #[must_use]
    pub fn correct_answers(&self) -> &[u32] {
        &self.correct_answers
    }

    #[must_use]
    pub fn time_taken_seconds(&self) -> u32 {
        self.time_taken_seconds
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn category_breakdown(&self) -> &BTreeMap<String, CategoryTally> {
        &self.category_breakdown
    }

    /// Overall percentage correct for this single result.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        f64::from(self.score) / f64::from(self.total_questions) * 100.0
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
