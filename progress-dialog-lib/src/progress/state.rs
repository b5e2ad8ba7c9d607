/// A snapshot of the progress of one session.
///
/// The controller owns the authoritative copy; the presenter only ever sees
/// clones delivered through the mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressState {
    /// Units of work completed so far.
    pub stage: u64,

    /// Total units of work expected. Fixed for the lifetime of a session.
    pub max_stages: u64,

    /// Human-readable label for the current activity.
    pub description: String,
}

impl ProgressState {
    /// Create the initial state of a session, with `stage` at zero and the
    /// description carrying a `(0/max_stages)` suffix.
    #[must_use]
    pub fn new(max_stages: u64, description: &str) -> Self {
        Self {
            stage: 0,
            max_stages,
            description: with_stage_suffix(description, 0, max_stages),
        }
    }

    /// Advance by one stage and relabel.
    pub(crate) fn advance(&mut self, description: &str) {
        self.stage = self.stage.saturating_add(1);
        self.description = with_stage_suffix(description, self.stage, self.max_stages);
    }
}

/// Append the `(stage/max_stages)` suffix to a description.
#[must_use]
pub fn with_stage_suffix(text: &str, stage: u64, max_stages: u64) -> String {
    format!("{text} ({stage}/{max_stages})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_starts_at_zero() {
        let state = ProgressState::new(5, "Working");
        assert_eq!(state.stage, 0);
        assert_eq!(state.max_stages, 5);
        assert_eq!(state.description, "Working (0/5)");
    }

    #[test]
    fn test_advance_increments_and_relabels() {
        let mut state = ProgressState::new(3, "Start");
        state.advance("Step A");
        assert_eq!(state.stage, 1);
        assert_eq!(state.description, "Step A (1/3)");

        state.advance("Step B");
        assert_eq!(state.stage, 2);
        assert_eq!(state.description, "Step B (2/3)");
        assert_eq!(state.max_stages, 3);
    }

    #[test]
    fn test_advance_past_max_keeps_counting() {
        let mut state = ProgressState::new(1, "Start");
        state.advance("a");
        state.advance("b");
        assert_eq!(state.description, "b (2/1)");
    }

    #[test]
    fn test_suffix_with_empty_text() {
        assert_eq!(with_stage_suffix("", 0, 0), " (0/0)");
    }
}
