use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::app_state::{App, Focus};
use crate::layout::ROWS_PER_SUGGESTION;
use crate::lookup::Suggestion;
use crate::widgets::popup;

const POPUP_BORDER_HEIGHT: u16 = 2;
const POPUP_BORDER_WIDTH: u16 = 2;
const POPUP_OFFSET_X: u16 = 0;
/// Marker or indent in front of each dropdown line
const ITEM_PREFIX_WIDTH: u16 = 2;
const HINTS: &str = "Enter: open  ↑↓: choose  Esc: close  Ctrl+R: review  Ctrl+C: quit";

impl App {
    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let layout = Layout::vertical([
            Constraint::Length(1), // Title
            Constraint::Length(3), // Address input
            Constraint::Min(0),    // Dropdown space
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

        let title_area = layout[0];
        let input_area = layout[1];
        let status_area = layout[3];
        let dropdown_bounds = Rect {
            height: status_area.y.saturating_sub(frame.area().y),
            ..frame.area()
        };

        self.layout_regions.clear();
        self.layout_regions.input_field = Some(input_area);

        render_title(frame, title_area);
        self.render_input_field(frame, input_area);
        self.render_status_line(frame, status_area);

        // Dropdown goes last so it draws over everything under the input
        if self.search.is_visible() {
            self.render_dropdown(frame, input_area, dropdown_bounds);
        }
    }

    fn render_input_field(&mut self, frame: &mut Frame, area: Rect) {
        let border_color = if self.focus == Focus::InputField {
            Color::Cyan
        } else {
            Color::DarkGray
        };

        let title = if self.search.is_submitting() {
            " Address (resolving…) "
        } else {
            " Address "
        };

        self.textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(border_color)),
        );

        frame.render_widget(&self.textarea, area);
    }

    fn render_dropdown(&mut self, frame: &mut Frame, input_area: Rect, bounds: Rect) {
        let suggestions = self.search.suggestions();
        let max_visible = self.max_visible_suggestions;

        // Scroll so the highlighted row stays on screen
        let offset = self
            .search
            .cursor()
            .map_or(0, |cursor| (cursor + 1).saturating_sub(max_visible));
        let visible: Vec<&Suggestion> = suggestions.iter().skip(offset).take(max_visible).collect();

        let popup_height = u16::try_from(visible.len())
            .unwrap_or(u16::MAX)
            .saturating_mul(ROWS_PER_SUGGESTION)
            .saturating_add(POPUP_BORDER_HEIGHT);
        let popup_area = popup::popup_below_anchor(
            input_area,
            bounds,
            input_area.width,
            popup_height,
            POPUP_OFFSET_X,
        );
        if popup_area.height <= POPUP_BORDER_HEIGHT {
            return;
        }

        let fitting_rows = usize::from((popup_area.height - POPUP_BORDER_HEIGHT) / ROWS_PER_SUGGESTION);
        let cursor = self.search.cursor();
        let text_width =
            usize::from(popup_area.width.saturating_sub(POPUP_BORDER_WIDTH + ITEM_PREFIX_WIDTH));

        let items: Vec<ListItem> = visible
            .iter()
            .take(fitting_rows)
            .enumerate()
            .map(|(i, suggestion)| {
                suggestion_item(suggestion, cursor == Some(offset + i), text_width)
            })
            .collect();
        let drawn = items.len();

        let title = format!(" {} matches ", suggestions.len());
        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Cyan)),
        );

        popup::clear_area(frame, popup_area);
        frame.render_widget(list, popup_area);

        self.layout_regions.dropdown = Some(popup_area);
        self.layout_regions.dropdown_offset = offset;
        self.layout_regions.dropdown_rows = drawn;
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(message) = self.search.message() {
            Line::from(Span::styled(
                message.to_string(),
                Style::default().fg(Color::Red),
            ))
        } else if self.search.is_submitting() {
            Line::from(Span::styled(
                "Resolving address…",
                Style::default().fg(Color::Yellow),
            ))
        } else if self.search.is_fetching() {
            Line::from(Span::styled(
                "Searching…",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(Span::styled(HINTS, Style::default().fg(Color::DarkGray)))
        };

        frame.render_widget(Paragraph::new(line), area);
    }
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            "bblsearch",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " · find a building by address",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

/// Two-line dropdown entry: address, then neighborhood / borough / zip
fn suggestion_item(suggestion: &Suggestion, highlighted: bool, text_width: usize) -> ListItem<'static> {
    let (marker, address_style, detail_style) = if highlighted {
        (
            "► ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        )
    } else {
        (
            "  ",
            Style::default().fg(Color::White),
            Style::default().fg(Color::DarkGray),
        )
    };

    ListItem::new(vec![
        Line::from(Span::styled(
            format!(
                "{}{}",
                marker,
                truncate_to_width(&suggestion.display_address, text_width)
            ),
            address_style,
        )),
        Line::from(Span::styled(
            format!("  {}", truncate_to_width(&suggestion.detail_line(), text_width)),
            detail_style,
        )),
    ])
}

/// Cut `text` to `max_width` display columns, marking the cut with '…'
fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut truncated = String::new();
    for c in text.chars() {
        let width = c.width().unwrap_or(0);
        if used + width > budget {
            break;
        }
        used += width;
        truncated.push(c);
    }
    truncated.push('…');
    truncated
}

#[cfg(test)]
#[path = "app_render_tests.rs"]
mod app_render_tests;
