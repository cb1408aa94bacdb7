use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

//
// ─── QUESTION ID ───────────────────────────────────────────────────────────────
//

/// Catalog-scoped question identifier.
///
/// Stable across sessions: shuffling reorders questions, it never renumbers
/// them. Uniqueness within a catalog is enforced by `Catalog::new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuestionId(u64);

impl QuestionId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── RESULT ID ─────────────────────────────────────────────────────────────────
//

/// Identifier of a persisted exam result.
///
/// Random UUIDs rather than creation timestamps, so two submissions in the
/// same instant cannot collide in the history file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultId(Uuid);

impl ResultId {
    /// Wraps a UUID read back from storage.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Mints the identifier for a freshly scored result.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ResultId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Uuid>().map(ResultId::new)
    }
}

//
// ─── USER ID ───────────────────────────────────────────────────────────────────
//

/// Identifier a result is stamped with, naming the user who took the exam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(String);

impl UserId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Stand-in identity used when nobody is signed in.
    #[must_use]
    pub fn placeholder() -> Self {
        Self("current-user".to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
