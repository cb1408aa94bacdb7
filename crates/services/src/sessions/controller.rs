use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::Mutex;

use exam_core::Clock;
use exam_core::model::{Catalog, ExamResult, Question, UserId};
use storage::repository::HistoryRepository;

use super::countdown::CountdownHandle;
use super::progress::ExamProgress;
use super::service::ExamSession;
use crate::auth::AuthService;
use crate::error::SessionError;

pub(super) type SharedSession = Arc<Mutex<Option<ExamSession>>>;
pub(super) type CompletedSlot = Arc<Mutex<Option<ExamResult>>>;

/// Score a session, stamp it with the signed-in user, and persist it.
pub(super) async fn finalize_session(
    clock: Clock,
    history: &dyn HistoryRepository,
    auth: &AuthService,
    session: ExamSession,
) -> Result<ExamResult, SessionError> {
    let user_id = auth
        .current_user()
        .map(|profile| profile.user_id().clone())
        .unwrap_or_else(UserId::placeholder);
    let result = session.into_result(user_id, clock.now())?;
    history.append(&result).await?;
    Ok(result)
}

/// Owns the single active exam session and its countdown.
///
/// Idle is the absence of a session; there is no paused state. Starting a
/// new exam replaces whatever was active, and leaving the Active state by
/// any route (submit, abandon, drop) cancels the countdown first.
pub struct ExamController {
    clock: Clock,
    catalog: Arc<Catalog>,
    history: Arc<dyn HistoryRepository>,
    auth: Arc<AuthService>,
    session: SharedSession,
    completed: CompletedSlot,
    countdown: StdMutex<Option<CountdownHandle>>,
}

impl ExamController {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: Arc<Catalog>,
        history: Arc<dyn HistoryRepository>,
        auth: Arc<AuthService>,
    ) -> Self {
        Self {
            clock,
            catalog,
            history,
            auth,
            session: Arc::new(Mutex::new(None)),
            completed: Arc::new(Mutex::new(None)),
            countdown: StdMutex::new(None),
        }
    }

    /// Start a new exam, replacing any session already in flight.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidDuration` for a zero duration.
    pub async fn start_test(&self, duration_minutes: u32) -> Result<ExamProgress, SessionError> {
        let session = ExamSession::start(&self.catalog, duration_minutes, self.clock.now())?;
        let progress = session.progress();

        self.stop_countdown();
        *self.session.lock().await = Some(session);
        *self.completed.lock().await = None;

        let handle = CountdownHandle::spawn(
            self.clock,
            Arc::clone(&self.session),
            Arc::clone(&self.completed),
            Arc::clone(&self.history),
            Arc::clone(&self.auth),
        );
        self.store_countdown(Some(handle));

        tracing::info!(duration_minutes, "exam session started");
        Ok(progress)
    }

    /// Record an answer for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotActive` when idle and
    /// `SessionError::InvalidOption` for an out-of-range option.
    pub async fn answer_current(&self, option: u32) -> Result<(), SessionError> {
        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or(SessionError::NotActive)?;
        session.answer_current(option)
    }

    /// Move to the next question; a no-op at the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotActive` when idle.
    pub async fn next_question(&self) -> Result<(), SessionError> {
        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or(SessionError::NotActive)?;
        session.next_question();
        Ok(())
    }

    /// Move to the previous question; a no-op at the first one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotActive` when idle.
    pub async fn previous_question(&self) -> Result<(), SessionError> {
        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or(SessionError::NotActive)?;
        session.previous_question();
        Ok(())
    }

    /// The question at the current position.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotActive` when idle.
    pub async fn current_question(&self) -> Result<Question, SessionError> {
        let guard = self.session.lock().await;
        let session = guard.as_ref().ok_or(SessionError::NotActive)?;
        Ok(session.current_question().clone())
    }

    /// Progress snapshot for the active session, `None` when idle.
    pub async fn progress(&self) -> Option<ExamProgress> {
        self.session.lock().await.as_ref().map(ExamSession::progress)
    }

    pub async fn is_active(&self) -> bool {
        self.session.lock().await.is_some()
    }

    /// Score the active session, persist the result, and go idle.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotActive` when idle, or
    /// `SessionError::Storage` when the history write fails; in that case
    /// the attempt is not persisted and the session is still cleared.
    pub async fn submit_test(&self) -> Result<ExamResult, SessionError> {
        self.stop_countdown();
        let session = self
            .session
            .lock()
            .await
            .take()
            .ok_or(SessionError::NotActive)?;
        let result =
            finalize_session(self.clock, self.history.as_ref(), self.auth.as_ref(), session)
                .await?;
        tracing::info!(score = result.score(), total = result.total_questions(), "exam submitted");
        Ok(result)
    }

    /// Abandon the active session without scoring or persisting anything.
    ///
    /// Idempotent: calling this while idle does nothing, so teardown paths
    /// can always run it.
    pub async fn end_test(&self) {
        self.stop_countdown();
        if self.session.lock().await.take().is_some() {
            tracing::info!("exam session abandoned");
        }
    }

    /// The result of an auto-submitted session, if one finished since the
    /// last call. Manual submissions return their result directly instead.
    pub async fn take_completed(&self) -> Option<ExamResult> {
        self.completed.lock().await.take()
    }

    fn stop_countdown(&self) {
        if let Some(handle) = self.store_countdown(None) {
            handle.stop();
        }
    }

    fn store_countdown(&self, handle: Option<CountdownHandle>) -> Option<CountdownHandle> {
        let mut guard = self
            .countdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, handle)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::time::fixed_clock;
    use std::time::Duration;
    use storage::repository::InMemoryRepository;

    fn build_controller(history: Arc<dyn HistoryRepository>) -> ExamController {
        ExamController::new(
            fixed_clock(),
            Arc::new(Catalog::builtin()),
            history,
            Arc::new(AuthService::new()),
        )
    }

    #[tokio::test]
    async fn operations_while_idle_are_faults() {
        let controller = build_controller(Arc::new(InMemoryRepository::new()));

        assert!(matches!(
            controller.answer_current(0).await.unwrap_err(),
            SessionError::NotActive
        ));
        assert!(matches!(
            controller.next_question().await.unwrap_err(),
            SessionError::NotActive
        ));
        assert!(matches!(
            controller.previous_question().await.unwrap_err(),
            SessionError::NotActive
        ));
        assert!(matches!(
            controller.submit_test().await.unwrap_err(),
            SessionError::NotActive
        ));
        assert_eq!(controller.progress().await, None);
    }

    #[tokio::test]
    async fn start_answer_submit_persists_one_result() {
        let repo = Arc::new(InMemoryRepository::new());
        let controller = build_controller(repo.clone());

        let progress = controller.start_test(30).await.unwrap();
        assert_eq!(progress.remaining_seconds, 30 * 60);
        assert_eq!(progress.answered, 0);

        let correct = controller.current_question().await.unwrap().correct_option();
        controller.answer_current(correct).await.unwrap();

        let result = controller.submit_test().await.unwrap();
        assert_eq!(result.score(), 1);
        assert!(!controller.is_active().await);

        let history = repo.load_all().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id(), result.id());
    }

    #[tokio::test]
    async fn submitting_twice_is_a_fault() {
        let controller = build_controller(Arc::new(InMemoryRepository::new()));
        controller.start_test(30).await.unwrap();
        controller.submit_test().await.unwrap();

        assert!(matches!(
            controller.submit_test().await.unwrap_err(),
            SessionError::NotActive
        ));
    }

    #[tokio::test]
    async fn restarting_replaces_the_active_session() {
        let controller = build_controller(Arc::new(InMemoryRepository::new()));
        controller.start_test(30).await.unwrap();
        controller.answer_current(1).await.unwrap();

        let progress = controller.start_test(10).await.unwrap();
        assert_eq!(progress.answered, 0);
        assert_eq!(progress.remaining_seconds, 10 * 60);
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_expiry_auto_submits_exactly_once() {
        let repo = Arc::new(InMemoryRepository::new());
        let controller = build_controller(repo.clone());

        controller.start_test(1).await.unwrap();

        // Paused time fast-forwards through the 60 countdown ticks.
        tokio::time::sleep(Duration::from_secs(90)).await;

        assert!(!controller.is_active().await);
        let completed = controller.take_completed().await.expect("auto-submitted");
        assert_eq!(completed.time_taken_seconds(), 60);
        assert_eq!(controller.take_completed().await, None);

        let history = repo.load_all().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id(), completed.id());
    }

    #[tokio::test(start_paused = true)]
    async fn abandoning_cancels_the_countdown() {
        let repo = Arc::new(InMemoryRepository::new());
        let controller = build_controller(repo.clone());

        controller.start_test(1).await.unwrap();
        controller.end_test().await;

        tokio::time::sleep(Duration::from_secs(180)).await;

        assert!(!controller.is_active().await);
        assert_eq!(controller.take_completed().await, None);
        assert!(repo.load_all().await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn manual_submit_wins_over_a_cancelled_countdown() {
        let repo = Arc::new(InMemoryRepository::new());
        let controller = build_controller(repo.clone());

        controller.start_test(1).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10_500)).await;
        let result = controller.submit_test().await.unwrap();
        assert_eq!(result.time_taken_seconds(), 10);

        // No second submission arrives after expiry would have hit.
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(controller.take_completed().await, None);
        assert_eq!(repo.load_all().await.unwrap().len(), 1);
    }
}
