//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::{ExamResultError, OPTION_COUNT};
use storage::json::JsonInitError;
use storage::repository::StorageError;

/// Errors emitted by session operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no active exam session")]
    NotActive,

    #[error("exam duration must be at least one minute")]
    InvalidDuration,

    #[error("option {option} is out of range for a {OPTION_COUNT}-option question")]
    InvalidOption { option: u32 },

    #[error(transparent)]
    Result(#[from] ExamResultError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the history facade.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HistoryError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the identity gate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthError {
    #[error("a user named {0:?} already exists")]
    DuplicateUser(String),

    #[error("unknown user")]
    UnknownUser,

    #[error("wrong password")]
    InvalidCredentials,
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Json(#[from] JsonInitError),
}
