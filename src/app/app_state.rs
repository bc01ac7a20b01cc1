use ratatui::{
    style::{Color, Style},
    widgets::{Block, Borders},
};
use tui_textarea::TextArea;

use crate::config::SearchConfig;
use crate::layout::LayoutRegions;
use crate::navigation::{Destination, PendingNavigation};
use crate::search::SearchState;

/// Upper bound on dropdown rows, whatever the config asks for
pub const MAX_VISIBLE_SUGGESTIONS_LIMIT: usize = 64;

/// Where keyboard focus is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    InputField,
    /// Anywhere but the input (after Tab or a click elsewhere)
    Outside,
}

/// Application state
pub struct App {
    pub textarea: TextArea<'static>,
    pub search: SearchState<PendingNavigation>,
    pub focus: Focus,
    pub max_visible_suggestions: usize,
    pub layout_regions: LayoutRegions,
    pub should_quit: bool,
}

impl App {
    pub fn new(search: SearchState<PendingNavigation>, config: &SearchConfig) -> Self {
        let mut textarea = TextArea::default();

        textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Address ")
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        textarea.set_placeholder_text("Start typing an address, e.g. 350 5th Ave");

        // Remove default underline from cursor line
        textarea.set_cursor_line_style(Style::default());

        Self {
            textarea,
            search,
            focus: Focus::InputField,
            max_visible_suggestions: config
                .max_visible_suggestions
                .clamp(1, MAX_VISIBLE_SUGGESTIONS_LIMIT),
            layout_regions: LayoutRegions::new(),
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit || self.destination().is_some()
    }

    /// The building page the session committed to, if any
    pub fn destination(&self) -> Option<&Destination> {
        self.search.navigator().destination()
    }

    /// Current input text
    pub fn query(&self) -> &str {
        self.textarea
            .lines()
            .first()
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[cfg(test)]
#[path = "app_state_tests.rs"]
mod app_state_tests;
