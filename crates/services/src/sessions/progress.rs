/// Aggregated view of exam progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamProgress {
    pub total: usize,
    pub answered: usize,
    pub current: usize,
    pub remaining_seconds: u32,
    pub is_expired: bool,
}
