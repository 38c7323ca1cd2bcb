//! Initial population placement
//!
//! The grid is filled once: an exact number of empty cells, the rest split
//! between Red and Blue, scattered by a seeded shuffle. Each agent then
//! draws its personality.

use crate::core::error::{Result, SchellingError};
use crate::core::types::{Cell, CellPos};
use crate::entity::personality::{PersonalityId, PersonalityTable};
use crate::spatial::Grid;
use rand::seq::SliceRandom;
use rand::Rng;

/// How many cells of each kind a grid gets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationLayout {
    pub empty: usize,
    pub red: usize,
    pub blue: usize,
}

impl PopulationLayout {
    /// Counts for a `size`×`size` grid
    ///
    /// Empty cells are `round(empty_ratio * size²)`, rounding half away from
    /// zero. Red takes the extra agent when the remainder is odd. `None` if
    /// `size²` overflows.
    pub fn for_grid(size: usize, empty_ratio: f64) -> Option<Self> {
        let total = size.checked_mul(size)?;
        let empty = ((empty_ratio.clamp(0.0, 1.0) * total as f64).round() as usize).min(total);
        let occupied = total - empty;
        let blue = occupied / 2;
        Some(Self {
            empty,
            red: occupied - blue,
            blue,
        })
    }

    pub fn total(&self) -> usize {
        self.empty + self.red + self.blue
    }

    pub fn occupied(&self) -> usize {
        self.red + self.blue
    }
}

/// Build a shuffled `size`×`size` occupancy grid
pub fn populate_cells<R: Rng + ?Sized>(
    size: usize,
    empty_ratio: f64,
    rng: &mut R,
) -> Result<Grid<Cell>> {
    let layout = PopulationLayout::for_grid(size, empty_ratio).ok_or_else(|| {
        SchellingError::InvalidConfig(format!("grid_size {} is too large", size))
    })?;

    let mut cells = Vec::with_capacity(layout.total());
    cells.extend(std::iter::repeat(Cell::Empty).take(layout.empty));
    cells.extend(std::iter::repeat(Cell::Red).take(layout.red));
    cells.extend(std::iter::repeat(Cell::Blue).take(layout.blue));
    cells.shuffle(rng);

    tracing::debug!(
        size,
        empty = layout.empty,
        red = layout.red,
        blue = layout.blue,
        "Populated grid"
    );

    let mut grid = Grid::new(size, size);
    for (i, cell) in cells.into_iter().enumerate() {
        grid.set(CellPos::new(i / size, i % size), cell);
    }
    Ok(grid)
}

/// Give every occupied cell a random personality; empty cells get `None`
pub fn assign_personalities<R: Rng + ?Sized>(
    cells: &Grid<Cell>,
    table: &PersonalityTable,
    rng: &mut R,
) -> Grid<Option<PersonalityId>> {
    let mut profiles = Grid::new(cells.rows, cells.cols);
    for (pos, cell) in cells.iter() {
        if cell.is_occupied() {
            profiles.set(pos, Some(table.choose(rng)));
        }
    }
    profiles
}
