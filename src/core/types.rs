//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Grid coordinate, addressed as (row, column); defaults to the origin
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Parses `"ROW,COL"` (whitespace around either number is ignored)
impl FromStr for CellPos {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = s
            .split_once(',')
            .ok_or_else(|| format!("expected ROW,COL but got '{}'", s))?;
        let row = row
            .trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid row '{}': {}", row.trim(), e))?;
        let col = col
            .trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid column '{}': {}", col.trim(), e))?;
        Ok(Self::new(row, col))
    }
}

/// Occupancy state of one grid cell
///
/// `Red` and `Blue` are the two occupant types of the segregation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Red,
    Blue,
}

impl Cell {
    #[inline]
    pub fn is_occupied(self) -> bool {
        !matches!(self, Cell::Empty)
    }

    /// Display name of the occupant type, `None` for empty cells
    pub fn color_name(self) -> Option<&'static str> {
        match self {
            Cell::Empty => None,
            Cell::Red => Some("Red"),
            Cell::Blue => Some("Blue"),
        }
    }

    /// Single-character form used by ASCII layouts
    pub fn glyph(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Red => 'R',
            Cell::Blue => 'B',
        }
    }

    pub fn from_glyph(ch: char) -> Option<Self> {
        match ch {
            '.' => Some(Cell::Empty),
            'R' | 'r' => Some(Cell::Red),
            'B' | 'b' => Some(Cell::Blue),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pos_is_origin() {
        assert_eq!(CellPos::default(), CellPos::new(0, 0));
    }

    #[test]
    fn test_cell_pos_parse() {
        assert_eq!("3,4".parse::<CellPos>().unwrap(), CellPos::new(3, 4));
        assert_eq!(" 10 , 0 ".parse::<CellPos>().unwrap(), CellPos::new(10, 0));
        assert!("3".parse::<CellPos>().is_err());
        assert!("-1,2".parse::<CellPos>().is_err());
        assert!("a,b".parse::<CellPos>().is_err());
    }

    #[test]
    fn test_cell_pos_display() {
        assert_eq!(CellPos::new(2, 7).to_string(), "(2, 7)");
    }

    #[test]
    fn test_glyphs() {
        for cell in [Cell::Empty, Cell::Red, Cell::Blue] {
            assert_eq!(Cell::from_glyph(cell.glyph()), Some(cell));
        }
        assert_eq!(Cell::from_glyph('x'), None);
        assert!(!Cell::Empty.is_occupied());
        assert_eq!(Cell::Blue.color_name(), Some("Blue"));
    }
}
