use async_trait::async_trait;
use exam_core::model::ExamResult;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::fs;

use crate::repository::{
    HistoryRepository, ResultRecord, Storage, StorageError, records_into_results,
};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JsonInitError {
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result history persisted as a single JSON array in one file.
///
/// Every append is a read-modify-write of the whole collection. Writes go
/// to a sibling temp file first and are renamed into place, so a failed
/// write leaves the previous history intact. Missing or unparseable
/// content is treated as an empty history, never as an error.
#[derive(Clone)]
pub struct JsonHistoryRepository {
    path: PathBuf,
}

impl JsonHistoryRepository {
    /// Open (or prepare to create) the history file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `JsonInitError` if the parent directory cannot be created.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, JsonInitError> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        Ok(Self { path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_records(&self) -> Result<Vec<ResultRecord>, StorageError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StorageError::Io(err.to_string())),
        };

        match serde_json::from_slice(&bytes) {
            Ok(records) => Ok(records),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "stored history is unparseable, treating as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    async fn write_records(&self, records: &[ResultRecord]) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(records)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        let mut tmp_name = OsString::from(self.path.as_os_str());
        tmp_name.push(".tmp");
        let tmp = PathBuf::from(tmp_name);

        fs::write(&tmp, &bytes)
            .await
            .map_err(|err| StorageError::Io(err.to_string()))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|err| StorageError::Io(err.to_string()))
    }
}

#[async_trait]
impl HistoryRepository for JsonHistoryRepository {
    async fn append(&self, result: &ExamResult) -> Result<(), StorageError> {
        let mut records = self.read_records().await?;
        records.push(ResultRecord::from_result(result));
        self.write_records(&records).await?;
        tracing::debug!(
            result_id = %result.id(),
            count = records.len(),
            "appended result to history"
        );
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<ExamResult>, StorageError> {
        let records = self.read_records().await?;
        Ok(records_into_results(records))
    }
}

impl Storage {
    /// Build a `Storage` backed by a JSON history file.
    ///
    /// # Errors
    ///
    /// Returns `JsonInitError` if the file's parent directory cannot be
    /// created.
    pub async fn json_file(path: impl Into<PathBuf>) -> Result<Self, JsonInitError> {
        let repo = JsonHistoryRepository::open(path).await?;
        Ok(Self {
            history: Arc::new(repo),
        })
    }
}
