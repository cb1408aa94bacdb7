use chrono::{DateTime, Utc};

/// Time source for session timestamps and countdown math.
///
/// The services layer never calls `Utc::now()` directly; it asks the clock
/// it was built with. Production wiring uses the system clock, tests pin
/// one instant so started/completed timestamps and elapsed-time assertions
/// are reproducible.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    pinned_at: Option<DateTime<Utc>>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}

impl Clock {
    /// A clock that follows the system time.
    #[must_use]
    pub fn system() -> Self {
        Self { pinned_at: None }
    }

    /// A clock pinned at `at`; every `now()` call reports that instant.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self {
            pinned_at: Some(at),
        }
    }

    /// Current time as this clock sees it.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.pinned_at.unwrap_or_else(Utc::now)
    }
}

/// Epoch seconds for 2025-01-01T00:00:00Z, the instant test clocks pin.
pub const FIXED_TEST_TIMESTAMP: i64 = 1_735_689_600;

/// Deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Cannot panic in practice: [`FIXED_TEST_TIMESTAMP`] is a valid epoch
/// second.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// A `Clock` pinned at [`fixed_now`].
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
