use async_trait::async_trait;
use exam_core::model::ExamResult;
use exam_core::time::fixed_clock;
use services::{AppServices, SessionError};
use std::sync::Arc;
use storage::repository::{HistoryRepository, StorageError};

#[tokio::test]
async fn full_exam_flow_persists_and_aggregates() {
    let app = AppServices::new_in_memory(fixed_clock());
    let controller = app.controller();

    app.auth().register("asha", "Asha", "pw").unwrap();

    let progress = controller
        .start_test(app.default_duration_minutes())
        .await
        .unwrap();
    assert_eq!(progress.total, 10);
    assert_eq!(progress.remaining_seconds, 30 * 60);

    // Answer every other question correctly, walking forward as a user would.
    for index in 0..progress.total {
        if index % 2 == 0 {
            let correct = controller.current_question().await.unwrap().correct_option();
            controller.answer_current(correct).await.unwrap();
        }
        controller.next_question().await.unwrap();
    }

    let result = controller.submit_test().await.unwrap();
    assert_eq!(result.score(), 5);
    assert_eq!(result.user_id().as_str(), "asha");
    assert!(!controller.is_active().await);

    let overview = app.history().overview().await.unwrap().expect("one attempt");
    assert_eq!(overview.total_tests, 1);
    assert!((overview.average_score - 5.0).abs() < f64::EPSILON);
    assert!((overview.average_percentage - 50.0).abs() < f64::EPSILON);

    let recent = app.history().recent_attempts(5).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, result.id());
}

#[tokio::test]
async fn analytics_before_any_attempt_is_an_explicit_empty_state() {
    let app = AppServices::new_in_memory(fixed_clock());

    assert!(app.history().load_history().await.unwrap().is_empty());
    assert_eq!(app.history().overview().await.unwrap(), None);
}

#[tokio::test]
async fn unsigned_results_fall_back_to_the_placeholder_identity() {
    let app = AppServices::new_in_memory(fixed_clock());
    let controller = app.controller();

    controller.start_test(5).await.unwrap();
    let result = controller.submit_test().await.unwrap();
    assert_eq!(result.user_id().as_str(), "current-user");
}

struct FailingRepository;

#[async_trait]
impl HistoryRepository for FailingRepository {
    async fn append(&self, _result: &ExamResult) -> Result<(), StorageError> {
        Err(StorageError::Io("disk full".to_owned()))
    }

    async fn load_all(&self) -> Result<Vec<ExamResult>, StorageError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn failed_persistence_surfaces_and_still_ends_the_session() {
    let controller = services::ExamController::new(
        fixed_clock(),
        Arc::new(exam_core::model::Catalog::builtin()),
        Arc::new(FailingRepository),
        Arc::new(services::AuthService::new()),
    );

    controller.start_test(5).await.unwrap();
    let err = controller.submit_test().await.unwrap_err();
    assert!(matches!(err, SessionError::Storage(_)));
    assert!(!controller.is_active().await);
}
