//! Spec lifecycle state machine.
//!
//! draft -> review -> published -> active -> satisfied, with deprecation
//! allowed from any published-or-later state. Deprecated is terminal.

use crate::models::SpecState;

/// States reachable from `from` in one transition.
#[must_use]
pub fn allowed_transitions(from: SpecState) -> Vec<SpecState> {
    use SpecState::*;
    match from {
        Draft => vec![Review],
        Review => vec![Draft, Published],
        Published => vec![Active, Deprecated],
        Active => vec![Satisfied, Deprecated],
        Satisfied => vec![Deprecated],
        Deprecated => vec![],
    }
}

/// True when `from -> to` is a legal lifecycle transition.
#[must_use]
pub fn can_transition(from: SpecState, to: SpecState) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}

impl SpecState {
    /// True for the states the compiler accepts.
    #[inline]
    #[must_use]
    pub fn is_compilable(self) -> bool {
        matches!(self, SpecState::Published | SpecState::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_can_only_enter_review() {
        assert!(can_transition(SpecState::Draft, SpecState::Review));
        assert!(!can_transition(SpecState::Draft, SpecState::Published));
        assert!(!can_transition(SpecState::Draft, SpecState::Active));
    }

    #[test]
    fn review_can_bounce_back_to_draft() {
        assert!(can_transition(SpecState::Review, SpecState::Draft));
        assert!(can_transition(SpecState::Review, SpecState::Published));
    }

    #[test]
    fn deprecated_is_terminal() {
        assert!(allowed_transitions(SpecState::Deprecated).is_empty());
    }

    #[test]
    fn only_published_and_active_compile() {
        assert!(SpecState::Published.is_compilable());
        assert!(SpecState::Active.is_compilable());
        assert!(!SpecState::Draft.is_compilable());
        assert!(!SpecState::Satisfied.is_compilable());
    }

    #[test]
    fn satisfied_can_only_deprecate() {
        assert_eq!(allowed_transitions(SpecState::Satisfied), vec![SpecState::Deprecated]);
    }
}
