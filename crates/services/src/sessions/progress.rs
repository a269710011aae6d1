/// Aggregated view of session progress, useful for a status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    /// Question currently shown, if any.
    pub current: Option<usize>,
    pub is_complete: bool,
}
