use super::state::TuiState;

/// Commit finished fetches and keep the selection consistent with the
/// re-derived list. Called once per frame.
pub fn process_state(state: &mut TuiState) {
    if state.app.poll() {
        state.clamp_selection();
    }
}
