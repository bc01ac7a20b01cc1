use std::time::Instant;

use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use super::app_state::{App, Focus};
use crate::layout::{Region, region_at};
use crate::search::search_events::{handle_commit_key, handle_navigation_key};

impl App {
    /// Handle one terminal event observed at `now`
    pub fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            // Check that it's a key press event to avoid duplicates
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(key, now),
            Event::Mouse(mouse) => self.handle_mouse_event(mouse),
            _ => {}
        }
    }

    /// Fire due lookups and apply whatever the worker has delivered
    pub fn tick(&mut self, now: Instant) {
        self.search.tick(now);
        self.search.poll_responses();
    }

    fn handle_key_event(&mut self, key: KeyEvent, now: Instant) {
        if self.handle_global_keys(key) {
            return;
        }

        match self.focus {
            Focus::InputField => self.handle_input_field_key(key, now),
            Focus::Outside => self.handle_outside_key(key, now),
        }
    }

    /// Keys that work regardless of focus
    fn handle_global_keys(&mut self, key: KeyEvent) -> bool {
        // Ctrl+C: Exit application
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return true;
        }

        if key.code == KeyCode::Tab || key.code == KeyCode::BackTab {
            match self.focus {
                Focus::InputField => self.blur_input(),
                Focus::Outside => self.focus_input(),
            }
            return true;
        }

        false
    }

    fn handle_input_field_key(&mut self, key: KeyEvent, now: Instant) {
        if handle_navigation_key(key, &mut self.search) {
            return;
        }

        if handle_commit_key(key, &mut self.search).is_some() {
            return;
        }

        // Esc with nothing left to dismiss
        if key.code == KeyCode::Esc {
            self.should_quit = true;
            return;
        }

        // The input is read-only until the resolution answers
        if inserts_newline(key) || self.search.is_submitting() {
            return;
        }

        if self.textarea.input(key) {
            let query = self.query().to_string();
            if self.search.set_query(&query, now) {
                self.search.dismiss_message();
            }
        }
    }

    fn handle_outside_key(&mut self, key: KeyEvent, now: Instant) {
        if key.code == KeyCode::Esc {
            self.should_quit = true;
            return;
        }

        // Typing goes to the input
        self.focus_input();
        self.handle_input_field_key(key, now);
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }

        match region_at(&self.layout_regions, mouse.column, mouse.row) {
            Some(Region::Suggestion(index)) => {
                self.search.select(index);
            }
            Some(Region::Dropdown) => {}
            Some(Region::InputField) => self.focus_input(),
            None => {
                self.focus = Focus::Outside;
                self.search.outside_interaction();
            }
        }
    }

    fn focus_input(&mut self) {
        self.focus = Focus::InputField;
        self.search.focus();
    }

    fn blur_input(&mut self) {
        self.focus = Focus::Outside;
        self.search.blur();
    }
}

/// Keys the textarea would turn into a line break
fn inserts_newline(key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Enter => true,
        KeyCode::Char('m') | KeyCode::Char('j') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

#[cfg(test)]
#[path = "app_events_tests.rs"]
mod app_events_tests;
