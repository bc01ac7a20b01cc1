//! List visibility policy

use super::suggestion_list::{ListState, SuggestionList};

/// Decides whether the suggestion list is on screen
///
/// Visible only while the input has focus and the list is populated.
#[derive(Debug, Clone, Copy)]
pub struct DismissalController {
    focused: bool,
}

impl DismissalController {
    pub fn new(focused: bool) -> Self {
        Self { focused }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_visible(&self, list: &SuggestionList) -> bool {
        self.focused && list.state() == ListState::Populated && !list.is_empty()
    }

    /// Input regained focus; a dismissed batch comes back
    pub fn on_focus(&mut self, list: &mut SuggestionList) -> bool {
        self.focused = true;
        list.reveal()
    }

    pub fn on_blur(&mut self) {
        self.focused = false;
    }

    /// Pointer interaction outside the input and the list
    pub fn on_outside_interaction(&mut self, list: &mut SuggestionList) -> bool {
        self.focused = false;
        list.dismiss()
    }

    pub fn on_escape(&mut self, list: &mut SuggestionList) -> bool {
        list.dismiss()
    }

    /// Typing only happens in a focused input
    pub fn on_typing(&mut self) {
        self.focused = true;
    }
}
