//! Suggestion list model
//!
//! Holds the active batch, the highlighted index and the list's
//! visibility state.

use crate::lookup::Suggestion;

/// Where the list is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListState {
    /// No batch; hidden
    #[default]
    Empty,
    /// Non-empty batch on screen
    Populated,
    /// Batch kept but hidden until focus returns
    Dismissed,
}

/// Active suggestion batch with keyboard selection
///
/// The cursor is either None or a valid index into the batch, and is always
/// None outside `Populated`.
#[derive(Debug, Clone, Default)]
pub struct SuggestionList {
    suggestions: Vec<Suggestion>,
    /// Highlighted suggestion index (None = no selection)
    cursor: Option<usize>,
    state: ListState,
}

impl SuggestionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ListState {
        self.state
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn len(&self) -> usize {
        self.suggestions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn get(&self, index: usize) -> Option<&Suggestion> {
        self.suggestions.get(index)
    }

    /// The highlighted suggestion, if any
    pub fn selected(&self) -> Option<&Suggestion> {
        self.cursor.and_then(|i| self.suggestions.get(i))
    }

    /// Install a new batch
    ///
    /// A non-empty batch shows the list with no selection; an empty one
    /// empties it.
    pub fn replace(&mut self, batch: Vec<Suggestion>) {
        if batch.is_empty() {
            self.clear();
            return;
        }
        self.suggestions = batch;
        self.cursor = None;
        self.state = ListState::Populated;
    }

    /// Drop the batch and hide
    pub fn clear(&mut self) {
        self.suggestions.clear();
        self.cursor = None;
        self.state = ListState::Empty;
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    /// Move the highlight down one row, stopping at the last row
    ///
    /// From no selection, lands on the first row.
    pub fn move_down(&mut self) -> bool {
        if self.state != ListState::Populated {
            return false;
        }
        let last = self.suggestions.len() - 1;
        self.cursor = Some(match self.cursor {
            Some(current) => (current + 1).min(last),
            None => 0,
        });
        true
    }

    /// Move the highlight up one row, stopping at the first row
    ///
    /// From no selection, lands on the first row.
    pub fn move_up(&mut self) -> bool {
        if self.state != ListState::Populated {
            return false;
        }
        self.cursor = Some(match self.cursor {
            Some(current) => current.saturating_sub(1),
            None => 0,
        });
        true
    }

    /// Hide the list but keep the batch
    pub fn dismiss(&mut self) -> bool {
        if self.state != ListState::Populated {
            return false;
        }
        self.state = ListState::Dismissed;
        self.cursor = None;
        true
    }

    /// Show a dismissed batch again without refetching
    pub fn reveal(&mut self) -> bool {
        if self.state != ListState::Dismissed || self.suggestions.is_empty() {
            return false;
        }
        self.state = ListState::Populated;
        true
    }
}

#[cfg(test)]
#[path = "suggestion_list_tests.rs"]
mod suggestion_list_tests;
