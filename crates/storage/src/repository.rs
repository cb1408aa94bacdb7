use async_trait::async_trait;
use chrono::{DateTime, Utc};
use exam_core::model::{CategoryTally, ExamResult, ExamResultError, ResultId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for one exam result.
///
/// This mirrors the domain `ExamResult` so the storage layer can
/// serialize/deserialize without leaking its concerns into the domain.
/// `created_at` is written as an ISO-8601 string; older blobs carried
/// epoch seconds, and both are accepted on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: Uuid,
    pub user_id: String,
    pub score: u32,
    pub total_questions: u32,
    pub answers: Vec<Option<u32>>,
    pub correct_answers: Vec<u32>,
    pub time_taken_seconds: u32,
    #[serde(deserialize_with = "flexible_timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    pub category_breakdown: BTreeMap<String, CategoryTally>,
}

impl ResultRecord {
    #[must_use]
    pub fn from_result(result: &ExamResult) -> Self {
        Self {
            id: result.id().value(),
            user_id: result.user_id().as_str().to_owned(),
            score: result.score(),
            total_questions: result.total_questions(),
            answers: result.answers().to_vec(),
            correct_answers: result.correct_answers().to_vec(),
            time_taken_seconds: result.time_taken_seconds(),
            created_at: result.created_at(),
            category_breakdown: result.category_breakdown().clone(),
        }
    }

    /// Convert the record back into a domain `ExamResult`.
    ///
    /// # Errors
    ///
    /// Returns `ExamResultError` if the stored score, snapshots, or
    /// category totals fail consistency checks.
    pub fn into_result(self) -> Result<ExamResult, ExamResultError> {
        ExamResult::from_persisted(
            ResultId::new(self.id),
            UserId::new(self.user_id),
            self.score,
            self.total_questions,
            self.answers,
            self.correct_answers,
            self.time_taken_seconds,
            self.created_at,
            self.category_breakdown,
        )
    }
}

/// Turn raw records into domain results, dropping any record that fails
/// validation. A damaged entry costs only itself, never the whole history.
pub(crate) fn records_into_results(records: Vec<ResultRecord>) -> Vec<ExamResult> {
    let mut results = Vec::with_capacity(records.len());
    for record in records {
        let id = record.id;
        match record.into_result() {
            Ok(result) => results.push(result),
            Err(err) => {
                tracing::warn!(result_id = %id, error = %err, "skipping invalid stored result");
            }
        }
    }
    results
}

/// Repository contract for the append-only result history.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Append one result to the persisted history.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the updated history cannot be written.
    async fn append(&self, result: &ExamResult) -> Result<(), StorageError>;

    /// Load the full history in insertion order.
    ///
    /// An unwritten store yields an empty list, never an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only for genuine I/O failures.
    async fn load_all(&self) -> Result<Vec<ExamResult>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    records: Arc<Mutex<Vec<ResultRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl HistoryRepository for InMemoryRepository {
    async fn append(&self, result: &ExamResult) -> Result<(), StorageError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        guard.push(ResultRecord::from_result(result));
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<ExamResult>, StorageError> {
        let guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(records_into_results(guard.clone()))
    }
}

/// Aggregates the history repository behind a trait object for easy
/// backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub history: Arc<dyn HistoryRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            history: Arc::new(InMemoryRepository::new()),
        }
    }
}

mod flexible_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, de};

    /// Accept either an ISO-8601 string or an epoch-seconds number.
    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            EpochSeconds(i64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text
                .parse::<DateTime<Utc>>()
                .map_err(|err| de::Error::custom(format!("invalid timestamp {text:?}: {err}"))),
            Raw::EpochSeconds(seconds) => DateTime::<Utc>::from_timestamp(seconds, 0)
                .ok_or_else(|| de::Error::custom(format!("epoch timestamp {seconds} out of range"))),
        }
    }
}
