//! Layout module for tracking UI component regions
//!
//! Tracks where the input and the suggestion dropdown were last drawn so
//! mouse clicks can be routed. Anything that is neither counts as an
//! outside interaction.

use ratatui::layout::{Position, Rect};

/// Rows each suggestion occupies in the dropdown
pub const ROWS_PER_SUGGESTION: u16 = 2;

/// Component at a screen position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    InputField,
    /// Suggestion at this index of the batch
    Suggestion(usize),
    /// Dropdown border or padding
    Dropdown,
}

/// Screen areas recorded during the last render
#[derive(Debug, Clone, Default)]
pub struct LayoutRegions {
    pub input_field: Option<Rect>,
    pub dropdown: Option<Rect>,
    /// Batch index of the first suggestion drawn in the dropdown
    pub dropdown_offset: usize,
    /// Number of suggestions drawn in the dropdown
    pub dropdown_rows: usize,
}

impl LayoutRegions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Which component, if any, is at (`column`, `row`)
pub fn region_at(regions: &LayoutRegions, column: u16, row: u16) -> Option<Region> {
    let position = Position::new(column, row);

    if let Some(dropdown) = regions.dropdown.filter(|area| area.contains(position)) {
        return Some(dropdown_region(regions, dropdown, row));
    }

    match regions.input_field {
        Some(input) if input.contains(position) => Some(Region::InputField),
        _ => None,
    }
}

fn dropdown_region(regions: &LayoutRegions, dropdown: Rect, row: u16) -> Region {
    // One border row on top
    let inner_top = dropdown.y + 1;
    if row < inner_top {
        return Region::Dropdown;
    }

    let slot = usize::from((row - inner_top) / ROWS_PER_SUGGESTION);
    if slot < regions.dropdown_rows {
        Region::Suggestion(regions.dropdown_offset + slot)
    } else {
        Region::Dropdown
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod layout_tests;
