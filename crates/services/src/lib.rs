#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth;
pub mod error;
pub mod history;
pub mod sessions;

pub use exam_core::Clock;

pub use app_services::{AppConfig, AppServices};
pub use auth::{AuthService, UserProfile};
pub use error::{AppServicesError, AuthError, HistoryError, SessionError};
pub use history::{AttemptListItem, HistoryService};
pub use sessions::{CountdownStatus, ExamController, ExamProgress, ExamSession};
