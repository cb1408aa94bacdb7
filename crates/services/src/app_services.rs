use std::path::PathBuf;
use std::sync::Arc;

use exam_core::model::Catalog;
use storage::repository::Storage;

use crate::Clock;
use crate::auth::AuthService;
use crate::error::AppServicesError;
use crate::history::HistoryService;
use crate::sessions::ExamController;

/// Exam length offered when the caller does not pick one.
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

/// App-level configuration for the bootstrap.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Where the JSON result history lives.
    pub history_path: PathBuf,
    /// Duration preselected on the start screen.
    pub default_duration_minutes: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            history_path: PathBuf::from("exam_history.json"),
            default_duration_minutes: DEFAULT_DURATION_MINUTES,
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn new(history_path: impl Into<PathBuf>) -> Self {
        Self {
            history_path: history_path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_default_duration(mut self, minutes: u32) -> Self {
        self.default_duration_minutes = minutes;
        self
    }
}

/// Assembles the app-facing services around one storage backend.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<Catalog>,
    controller: Arc<ExamController>,
    history: Arc<HistoryService>,
    auth: Arc<AuthService>,
    default_duration_minutes: u32,
}

impl AppServices {
    /// Build services backed by the JSON history file named in `config`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_json(config: AppConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::json_file(config.history_path).await?;
        Ok(Self::assemble(
            storage,
            clock,
            config.default_duration_minutes,
        ))
    }

    /// Build services over in-memory storage, for tests and prototyping.
    #[must_use]
    pub fn new_in_memory(clock: Clock) -> Self {
        Self::assemble(Storage::in_memory(), clock, DEFAULT_DURATION_MINUTES)
    }

    fn assemble(storage: Storage, clock: Clock, default_duration_minutes: u32) -> Self {
        let catalog = Arc::new(Catalog::builtin());
        let auth = Arc::new(AuthService::new());
        let controller = Arc::new(ExamController::new(
            clock,
            Arc::clone(&catalog),
            Arc::clone(&storage.history),
            Arc::clone(&auth),
        ));
        let history = Arc::new(HistoryService::new(Arc::clone(&storage.history)));

        Self {
            catalog,
            controller,
            history,
            auth,
            default_duration_minutes,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn controller(&self) -> Arc<ExamController> {
        Arc::clone(&self.controller)
    }

    #[must_use]
    pub fn history(&self) -> Arc<HistoryService> {
        Arc::clone(&self.history)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn default_duration_minutes(&self) -> u32 {
        self.default_duration_minutes
    }
}
