use std::collections::BTreeMap;

use crate::model::result::{CategoryTally, ExamResult};

/// Aggregate statistics over the full result history.
///
/// Presentation-agnostic: no formatted strings, no thresholds. Chart
/// rendering and color bands belong to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryOverview {
    pub total_tests: u32,
    pub average_score: f64,
    /// Total correct over total possible across all results, as a
    /// percentage. Not an average of per-result percentages.
    pub average_percentage: f64,
    pub average_time_seconds: f64,
    pub categories: BTreeMap<String, CategoryTally>,
}

impl HistoryOverview {
    /// Fold the whole history into one overview.
    ///
    /// Returns `None` for an empty history so callers render an explicit
    /// empty state instead of dividing by zero.
    #[must_use]
    pub fn from_results(results: &[ExamResult]) -> Option<Self> {
        if results.is_empty() {
            return None;
        }

        let total_tests = u32::try_from(results.len()).unwrap_or(u32::MAX);
        let mut total_correct = 0_u64;
        let mut total_possible = 0_u64;
        let mut total_time = 0_u64;
        let mut categories: BTreeMap<String, CategoryTally> = BTreeMap::new();

        for result in results {
            total_correct += u64::from(result.score());
            total_possible += u64::from(result.total_questions());
            total_time += u64::from(result.time_taken_seconds());
            for (category, tally) in result.category_breakdown() {
                categories.entry(category.clone()).or_default().merge(*tally);
            }
        }

        let tests = results.len() as f64;
        let average_percentage = if total_possible == 0 {
            0.0
        } else {
            total_correct as f64 / total_possible as f64 * 100.0
        };

        Some(Self {
            total_tests,
            average_score: total_correct as f64 / tests,
            average_percentage,
            average_time_seconds: total_time as f64 / tests,
            categories,
        })
    }
}
