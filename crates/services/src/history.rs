use chrono::{DateTime, Utc};
use std::sync::Arc;

use exam_core::model::{ExamResult, HistoryOverview, ResultId};
use storage::repository::HistoryRepository;

use crate::error::HistoryError;

/// Presentation-agnostic list item for one past attempt.
///
/// No pre-formatted strings and no color thresholds; the UI formats
/// timestamps and picks bands as it sees fit.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptListItem {
    pub id: ResultId,
    pub created_at: DateTime<Utc>,
    pub score: u32,
    pub total_questions: u32,
    pub time_taken_seconds: u32,
    pub percentage: f64,
}

impl AttemptListItem {
    #[must_use]
    pub fn from_result(result: &ExamResult) -> Self {
        Self {
            id: result.id(),
            created_at: result.created_at(),
            score: result.score(),
            total_questions: result.total_questions(),
            time_taken_seconds: result.time_taken_seconds(),
            percentage: result.percentage(),
        }
    }
}

/// Facade over the persisted result history for analytics views.
///
/// Hides the repository from the presentation layer; owns no UI
/// formatting.
#[derive(Clone)]
pub struct HistoryService {
    history: Arc<dyn HistoryRepository>,
}

impl HistoryService {
    #[must_use]
    pub fn new(history: Arc<dyn HistoryRepository>) -> Self {
        Self { history }
    }

    /// Load every past result, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Storage` on repository failures.
    pub async fn load_history(&self) -> Result<Vec<ExamResult>, HistoryError> {
        Ok(self.history.load_all().await?)
    }

    /// The most recent attempts, newest first, at most `limit` of them.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Storage` on repository failures.
    pub async fn recent_attempts(&self, limit: usize) -> Result<Vec<AttemptListItem>, HistoryError> {
        let results = self.history.load_all().await?;
        Ok(results
            .iter()
            .rev()
            .take(limit)
            .map(AttemptListItem::from_result)
            .collect())
    }

    /// Aggregate statistics over the whole history.
    ///
    /// `None` means no attempt has ever been recorded; callers show an
    /// empty state instead of zeros.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Storage` on repository failures.
    pub async fn overview(&self) -> Result<Option<HistoryOverview>, HistoryError> {
        let results = self.history.load_all().await?;
        Ok(HistoryOverview::from_results(&results))
    }
}
