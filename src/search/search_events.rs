//! Key handling for the search session
//!
//! Translates key presses into search state transitions. The host calls
//! these before handing the key to the text input; a `true` / `Some` return
//! means the key was consumed.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::committer::SubmitOutcome;
use super::search_state::SearchState;
use crate::navigation::Navigator;

/// Handle list navigation keys
///
/// Down/Up and Esc only mean something while the list is on screen; with
/// the list hidden they fall through to the host.
pub fn handle_navigation_key<N: Navigator>(key: KeyEvent, state: &mut SearchState<N>) -> bool {
    if !state.is_visible() {
        return false;
    }

    match key.code {
        KeyCode::Down => {
            state.move_down();
            true
        }
        KeyCode::Up => {
            state.move_up();
            true
        }
        KeyCode::Esc => state.escape(),
        _ => false,
    }
}

/// Handle commit keys
///
/// Enter commits the highlighted suggestion or the raw text.
/// Ctrl+R resolves the raw text for review.
pub fn handle_commit_key<N: Navigator>(
    key: KeyEvent,
    state: &mut SearchState<N>,
) -> Option<SubmitOutcome> {
    match key.code {
        KeyCode::Enter if key.modifiers.is_empty() => Some(state.submit()),
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(state.submit_for_review())
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "search_events_tests.rs"]
mod search_events_tests;
