//! Gather agent context for perspective prompts
//!
//! An `AgentView` is a self-contained snapshot of one agent: everything the
//! prompt and the displayed report need, so neither has to touch the grid.

use crate::core::error::{Result, SchellingError};
use crate::core::types::{Cell, CellPos};
use crate::simulation::satisfaction::Neighborhood;
use crate::simulation::world::SchellingGrid;

/// Snapshot of one agent for prompt construction
#[derive(Debug, Clone, PartialEq)]
pub struct AgentView {
    pub pos: CellPos,
    /// Occupant type; never `Cell::Empty`
    pub cell: Cell,
    pub personality: String,
    pub threshold: f64,
    pub neighborhood: Neighborhood,
    pub satisfied: bool,
}

impl AgentView {
    /// Build a view of the agent at `pos`
    ///
    /// Fails with `EmptyCell` or `OutOfBounds` when there is no agent there.
    pub fn from_grid(grid: &SchellingGrid, pos: CellPos) -> Result<Self> {
        let cell = grid.cell(pos)?;
        if !cell.is_occupied() {
            return Err(SchellingError::EmptyCell(pos));
        }
        let threshold = grid.threshold_for(pos)?;
        let neighborhood = grid.neighborhood(pos)?;
        Ok(Self {
            pos,
            cell,
            personality: grid.personality_for(pos)?.to_string(),
            threshold,
            neighborhood,
            satisfied: neighborhood.satisfies(threshold),
        })
    }

    pub fn color_name(&self) -> &'static str {
        self.cell.color_name().unwrap_or("Unknown")
    }
}
