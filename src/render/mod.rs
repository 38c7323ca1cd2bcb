//! Grid rendering support
//!
//! Provides visual representation of simulation state.
//! This module is READ-ONLY - it never modifies simulation state.

pub mod camera;
pub mod colors;

use crate::core::types::{Cell, CellPos};
use crate::simulation::world::SchellingGrid;

pub use camera::Camera;

/// Lightweight snapshot of a cell for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCell {
    pub pos: CellPos,
    pub cell: Cell,
    /// Always true for empty cells
    pub satisfied: bool,
}

/// Collects every cell of the grid into a reusable buffer, row by row.
/// The grid never changes, so callers usually do this once.
pub fn collect_render_cells(grid: &SchellingGrid, buffer: &mut Vec<RenderCell>) {
    buffer.clear();
    buffer.reserve(grid.size() * grid.size());

    for (pos, &cell) in grid.cells().iter() {
        let satisfied = !cell.is_occupied() || grid.is_satisfied(pos).unwrap_or(true);
        buffer.push(RenderCell {
            pos,
            cell,
            satisfied,
        });
    }
}
