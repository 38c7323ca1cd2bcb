//! Color definitions for occupants and visual states

use crate::core::types::Cell;
use ratatui::style::Color as TermColor;

/// RGBA color (0.0 to 1.0 per channel)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Darken color by a factor (0.0 = black, 1.0 = unchanged)
    pub fn darken(&self, factor: f32) -> Self {
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
            a: self.a,
        }
    }

    /// 24-bit terminal color; alpha is dropped
    pub fn to_terminal(self) -> TermColor {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        TermColor::Rgb(channel(self.r), channel(self.g), channel(self.b))
    }
}

/// Background color for the grid view
pub const BACKGROUND: Color = Color::new(0.1, 0.1, 0.12, 1.0);

/// Highlight for the keyboard cursor and the selected cell
pub const SELECTION: Color = Color::new(1.0, 0.85, 0.2, 1.0);

/// Base color for a cell, on a cool-warm scale
pub fn cell_color(cell: Cell) -> Color {
    match cell {
        Cell::Empty => Color::new(0.87, 0.86, 0.86, 1.0), // Neutral gray
        Cell::Red => Color::new(0.71, 0.02, 0.15, 1.0),   // Warm red
        Cell::Blue => Color::new(0.23, 0.30, 0.75, 1.0),  // Cool blue
    }
}

/// Dim agents that are unhappy with their neighborhood
pub fn satisfaction_tint(base: Color, satisfied: bool) -> Color {
    if satisfied {
        base
    } else {
        base.darken(0.55)
    }
}
