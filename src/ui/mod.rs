//! UI module - interactive terminal view of the grid

pub mod state;
pub mod terminal;

pub use state::{GameUI, LogCategory, LogEntry};
pub use terminal::{AppAction, TerminalApp};
