//! UI state management for the interactive grid

use crate::core::types::CellPos;
use std::collections::VecDeque;

/// Maximum log entries to keep
const MAX_LOG_ENTRIES: usize = 50;

/// Interactive UI state
#[derive(Debug, Default)]
pub struct GameUI {
    /// Cell whose perspective is currently shown
    pub selected_cell: Option<CellPos>,
    /// Keyboard cursor
    pub cursor: CellPos,
    /// Text of the most recent selection
    pub report: Option<String>,
    /// Selection log, oldest first
    pub log: VecDeque<LogEntry>,
    /// Whether to show the help overlay
    pub show_help: bool,
    /// Number of selections made, used to number log entries
    pub selections: u64,
}

/// An entry in the selection log
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub seq: u64,
    pub message: String,
    pub category: LogCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    Perspective,
    Notice,
    Error,
}

impl GameUI {
    pub fn new() -> Self {
        Self {
            selected_cell: None,
            cursor: CellPos::new(0, 0),
            report: None,
            log: VecDeque::with_capacity(MAX_LOG_ENTRIES),
            show_help: false,
            selections: 0,
        }
    }

    /// Add an entry to the log
    pub fn log(&mut self, message: String, category: LogCategory) {
        if self.log.len() >= MAX_LOG_ENTRIES {
            self.log.pop_front();
        }
        self.log.push_back(LogEntry {
            seq: self.selections,
            message,
            category,
        });
    }

    /// Record the outcome of a selection
    pub fn show_report(&mut self, pos: Option<CellPos>, report: String, category: LogCategory) {
        self.selections += 1;
        self.selected_cell = pos;
        if let Some(pos) = pos {
            self.cursor = pos;
        }
        let headline = report.lines().next().unwrap_or_default().to_string();
        self.log(headline, category);
        self.report = Some(report);
    }

    /// Clear selection
    pub fn deselect(&mut self) {
        self.selected_cell = None;
        self.report = None;
    }

    /// Move the keyboard cursor, clamped to a `size`×`size` grid
    pub fn move_cursor(&mut self, d_row: isize, d_col: isize, size: usize) {
        let max = size.saturating_sub(1);
        self.cursor.row = self.cursor.row.saturating_add_signed(d_row).min(max);
        self.cursor.col = self.cursor.col.saturating_add_signed(d_col).min(max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_is_capped() {
        let mut ui = GameUI::new();
        for i in 0..(MAX_LOG_ENTRIES + 10) {
            ui.log(format!("entry {}", i), LogCategory::Notice);
        }
        assert_eq!(ui.log.len(), MAX_LOG_ENTRIES);
        assert_eq!(ui.log.front().unwrap().message, "entry 10");
    }

    #[test]
    fn test_show_report_selects_and_logs_headline() {
        let mut ui = GameUI::new();
        ui.show_report(
            Some(CellPos::new(2, 3)),
            "Agent at (2, 3): Red\n  Personality: academic".into(),
            LogCategory::Perspective,
        );
        assert_eq!(ui.selected_cell, Some(CellPos::new(2, 3)));
        assert_eq!(ui.cursor, CellPos::new(2, 3));
        assert_eq!(ui.log.back().unwrap().message, "Agent at (2, 3): Red");
        assert_eq!(ui.log.back().unwrap().seq, 1);

        ui.deselect();
        assert!(ui.selected_cell.is_none());
        assert!(ui.report.is_none());
    }

    #[test]
    fn test_default_matches_new() {
        let ui = GameUI::default();
        assert_eq!(ui.cursor, GameUI::new().cursor);
        assert!(ui.selected_cell.is_none());
        assert!(ui.log.is_empty());
    }

    #[test]
    fn test_cursor_clamps() {
        let mut ui = GameUI::new();
        ui.move_cursor(-1, -1, 5);
        assert_eq!(ui.cursor, CellPos::new(0, 0));
        ui.move_cursor(10, 2, 5);
        assert_eq!(ui.cursor, CellPos::new(4, 2));
    }
}
