//! Camera for the terminal grid view
//!
//! Maps between terminal cells (mouse coordinates) and grid cells. Each grid
//! cell is drawn `cell_width` terminal columns wide and one row tall. When
//! the grid is larger than the view, the camera scrolls.

use crate::core::types::CellPos;
use ratatui::layout::Rect;

/// Terminal columns per grid cell when there is room; square-ish cells
pub const PREFERRED_CELL_WIDTH: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Camera {
    /// Screen area the grid is drawn into
    pub viewport: Rect,
    /// Terminal columns per grid cell
    pub cell_width: u16,
    /// Grid cell drawn at the viewport's top-left corner
    pub offset: CellPos,
    /// Grid width/height in cells
    pub grid_size: usize,
}

impl Camera {
    pub fn new(grid_size: usize) -> Self {
        Self {
            viewport: Rect::default(),
            cell_width: PREFERRED_CELL_WIDTH,
            offset: CellPos::new(0, 0),
            grid_size,
        }
    }

    /// Adopt a new viewport, keeping the offset valid
    pub fn resize(&mut self, viewport: Rect) {
        self.viewport = viewport;
        let wide_enough =
            usize::from(viewport.width) >= self.grid_size * usize::from(PREFERRED_CELL_WIDTH);
        self.cell_width = if wide_enough { PREFERRED_CELL_WIDTH } else { 1 };
        self.clamp_offset();
    }

    pub fn visible_cols(&self) -> usize {
        let fit = usize::from(self.viewport.width / self.cell_width);
        fit.min(self.grid_size.saturating_sub(self.offset.col))
    }

    pub fn visible_rows(&self) -> usize {
        usize::from(self.viewport.height).min(self.grid_size.saturating_sub(self.offset.row))
    }

    /// Grid cell under a terminal position, `None` off the drawn grid
    pub fn screen_to_cell(&self, column: u16, row: u16) -> Option<CellPos> {
        if column < self.viewport.x || row < self.viewport.y {
            return None;
        }
        let dx = usize::from((column - self.viewport.x) / self.cell_width);
        let dy = usize::from(row - self.viewport.y);
        if dx >= self.visible_cols() || dy >= self.visible_rows() {
            return None;
        }
        Some(CellPos::new(self.offset.row + dy, self.offset.col + dx))
    }

    /// Top-left terminal position of a grid cell, `None` if not visible
    pub fn cell_to_screen(&self, pos: CellPos) -> Option<(u16, u16)> {
        if pos.row < self.offset.row || pos.col < self.offset.col {
            return None;
        }
        let dy = pos.row - self.offset.row;
        let dx = pos.col - self.offset.col;
        if dx >= self.visible_cols() || dy >= self.visible_rows() {
            return None;
        }
        let x = self.viewport.x + dx as u16 * self.cell_width;
        let y = self.viewport.y + dy as u16;
        Some((x, y))
    }

    /// Scroll just enough to make `pos` visible
    pub fn follow(&mut self, pos: CellPos) {
        let cols = usize::from(self.viewport.width / self.cell_width).max(1);
        let rows = usize::from(self.viewport.height).max(1);

        if pos.col < self.offset.col {
            self.offset.col = pos.col;
        } else if pos.col >= self.offset.col + cols {
            self.offset.col = pos.col + 1 - cols;
        }
        if pos.row < self.offset.row {
            self.offset.row = pos.row;
        } else if pos.row >= self.offset.row + rows {
            self.offset.row = pos.row + 1 - rows;
        }
        self.clamp_offset();
    }

    fn clamp_offset(&mut self) {
        let cols = usize::from(self.viewport.width / self.cell_width);
        let rows = usize::from(self.viewport.height);
        self.offset.col = self.offset.col.min(self.grid_size.saturating_sub(cols));
        self.offset.row = self.offset.row.min(self.grid_size.saturating_sub(rows));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_when_grid_fits() {
        let mut camera = Camera::new(5);
        camera.resize(Rect::new(3, 2, 20, 10));
        assert_eq!(camera.cell_width, 2);

        for row in 0..5 {
            for col in 0..5 {
                let pos = CellPos::new(row, col);
                let (x, y) = camera.cell_to_screen(pos).unwrap();
                assert_eq!(camera.screen_to_cell(x, y), Some(pos));
                // Second column of a double-width cell maps to the same cell
                assert_eq!(camera.screen_to_cell(x + 1, y), Some(pos));
            }
        }
    }

    #[test]
    fn test_outside_positions() {
        let mut camera = Camera::new(5);
        camera.resize(Rect::new(3, 2, 20, 10));
        assert_eq!(camera.screen_to_cell(2, 2), None);
        assert_eq!(camera.screen_to_cell(3, 1), None);
        // Right of the last column (3 + 5 * 2 = 13)
        assert_eq!(camera.screen_to_cell(13, 2), None);
        // Below the last row
        assert_eq!(camera.screen_to_cell(3, 7), None);
    }

    #[test]
    fn test_narrow_view_uses_single_width_and_scrolls() {
        let mut camera = Camera::new(30);
        camera.resize(Rect::new(0, 0, 20, 10));
        assert_eq!(camera.cell_width, 1);
        assert_eq!(camera.visible_cols(), 20);

        camera.follow(CellPos::new(25, 29));
        assert_eq!(camera.offset, CellPos::new(16, 10));
        assert_eq!(camera.screen_to_cell(19, 9), Some(CellPos::new(25, 29)));
        assert_eq!(camera.cell_to_screen(CellPos::new(0, 0)), None);

        camera.follow(CellPos::new(0, 0));
        assert_eq!(camera.offset, CellPos::new(0, 0));
    }
}
