use super::state::SessionState;

pub(super) enum Step {
    Moved(SessionState),
    Stayed,
}

pub(super) fn go_back(state: &SessionState) -> Step {
    match state.history.back() {
        Some(history) => Step::Moved(SessionState {
            history,
            has_submitted: false,
            last_verdict: None,
            ..state.clone()
        }),
        None => Step::Stayed,
    }
}

///Callers must check `has_submitted` first.
pub(super) fn go_next(state: &SessionState) -> Step {
    debug_assert!(state.has_submitted, "Advancing without a submission");

    let current = state.current();
    match state.unanswered().find(|id| *id != current) {
        Some(id) => Step::Moved(SessionState {
            history: state.history.visit(id),
            has_submitted: false,
            last_verdict: None,
            ..state.clone()
        }),
        None => Step::Stayed,
    }
}

///Position in the visited sequence, not the number of answered cards.
pub(super) fn progress(state: &SessionState, total: usize) -> (usize, usize) {
    (state.history.cursor() + 1, total)
}
