use chrono::{DateTime, Utc};
use rand::rng;
use rand::seq::SliceRandom;
use std::fmt;

use exam_core::model::{
    Catalog, ExamResult, ExamResultError, OPTION_COUNT, Question, ResultId, UserId,
};

use crate::error::SessionError;
use super::progress::ExamProgress;

//
// ─── COUNTDOWN STATUS ──────────────────────────────────────────────────────────
//

/// Outcome of one countdown tick.
///
/// `Expired` obliges the owner to submit the session; ticking never
/// submits on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStatus {
    Running(u32),
    Expired,
}

//
// ─── EXAM SESSION ──────────────────────────────────────────────────────────────
//

/// One in-progress exam attempt, from start to submit or abandon.
///
/// Holds a shuffled copy of the catalog, one answer slot per question
/// (`None` until answered), and the countdown state. The nominal duration
/// is kept on the session so elapsed time at submit is measured against
/// what was actually requested, whatever that was.
pub struct ExamSession {
    questions: Vec<Question>,
    current: usize,
    answers: Vec<Option<u32>>,
    remaining_seconds: u32,
    nominal_seconds: u32,
    started_at: DateTime<Utc>,
}

impl ExamSession {
    /// Start a session over a shuffled copy of the catalog.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidDuration` when `duration_minutes` is
    /// zero.
    pub fn start(
        catalog: &Catalog,
        duration_minutes: u32,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if duration_minutes == 0 {
            return Err(SessionError::InvalidDuration);
        }

        let mut questions = catalog.questions().to_vec();
        questions.as_mut_slice().shuffle(&mut rng());

        let answers = vec![None; questions.len()];
        let nominal_seconds = duration_minutes.saturating_mul(60);

        Ok(Self {
            questions,
            current: 0,
            answers,
            remaining_seconds: nominal_seconds,
            nominal_seconds,
            started_at,
        })
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The question at the current position.
    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<u32>] {
        &self.answers
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    #[must_use]
    pub fn nominal_seconds(&self) -> u32 {
        self.nominal_seconds
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining_seconds == 0
    }

    /// Number of questions that have an answer recorded.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|slot| slot.is_some()).count()
    }

    /// Seconds elapsed against the nominal duration.
    #[must_use]
    pub fn time_taken_seconds(&self) -> u32 {
        self.nominal_seconds - self.remaining_seconds
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> ExamProgress {
        ExamProgress {
            total: self.questions.len(),
            answered: self.answered_count(),
            current: self.current,
            remaining_seconds: self.remaining_seconds,
            is_expired: self.is_expired(),
        }
    }

    /// Record an answer for the current question. Re-answering overwrites.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOption` when `option` does not name one
    /// of the question's options. That is caller misuse, not user input to
    /// tolerate.
    pub fn answer_current(&mut self, option: u32) -> Result<(), SessionError> {
        if option as usize >= OPTION_COUNT {
            return Err(SessionError::InvalidOption { option });
        }
        self.answers[self.current] = Some(option);
        Ok(())
    }

    /// Move to the next question; silently stays put at the last one.
    pub fn next_question(&mut self) {
        if self.current + 1 < self.questions.len() {
            self.current += 1;
        }
    }

    /// Move to the previous question; silently stays put at the first one.
    pub fn previous_question(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Count down one second.
    ///
    /// Decrements while time remains; at zero the status flips to
    /// `Expired` and stays there.
    pub fn tick(&mut self) -> CountdownStatus {
        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
        }
        if self.remaining_seconds == 0 {
            CountdownStatus::Expired
        } else {
            CountdownStatus::Running(self.remaining_seconds)
        }
    }

    /// Score the session into an immutable result, consuming it.
    ///
    /// Consuming the session is what ends it: after this there is nothing
    /// left to tick, answer, or submit twice.
    ///
    /// # Errors
    ///
    /// Propagates `ExamResultError` from result construction.
    pub fn into_result(
        self,
        user_id: UserId,
        completed_at: DateTime<Utc>,
    ) -> Result<ExamResult, ExamResultError> {
        let time_taken = self.time_taken_seconds();
        ExamResult::from_answers(
            ResultId::generate(),
            user_id,
            &self.questions,
            &self.answers,
            time_taken,
            completed_at,
        )
    }
}

impl fmt::Debug for ExamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamSession")
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answered", &self.answered_count())
            .field("remaining_seconds", &self.remaining_seconds)
            .field("nominal_seconds", &self.nominal_seconds)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
