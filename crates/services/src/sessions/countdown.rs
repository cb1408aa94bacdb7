use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use exam_core::Clock;
use storage::repository::HistoryRepository;

use super::controller::{CompletedSlot, SharedSession, finalize_session};
use super::service::CountdownStatus;
use crate::auth::AuthService;

/// Owns the 1 Hz tick task for the active session.
///
/// The task ends on its own once the session expires or disappears;
/// `stop` and `Drop` abort it, so no tick can reach a stale session after
/// the owner moves on.
pub(super) struct CountdownHandle {
    task: JoinHandle<()>,
}

impl CountdownHandle {
    pub(super) fn spawn(
        clock: Clock,
        session: SharedSession,
        completed: CompletedSlot,
        history: Arc<dyn HistoryRepository>,
        auth: Arc<AuthService>,
    ) -> Self {
        let task = tokio::spawn(async move {
            let mut ticker = time::interval(Duration::from_secs(1));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // An interval's first tick completes immediately; skip it so the
            // session only loses a second per elapsed second.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let mut guard = session.lock().await;
                let Some(active) = guard.as_mut() else {
                    break;
                };
                if active.tick() == CountdownStatus::Expired {
                    let Some(expired) = guard.take() else {
                        break;
                    };
                    match finalize_session(clock, history.as_ref(), auth.as_ref(), expired).await
                    {
                        Ok(result) => {
                            tracing::info!(
                                score = result.score(),
                                "time expired, exam auto-submitted"
                            );
                            *completed.lock().await = Some(result);
                        }
                        Err(err) => {
                            tracing::error!(
                                error = %err,
                                "failed to persist auto-submitted exam"
                            );
                        }
                    }
                    break;
                }
            }
        });

        Self { task }
    }

    pub(super) fn stop(self) {
        self.task.abort();
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
