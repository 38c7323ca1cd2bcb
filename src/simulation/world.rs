//! The Schelling grid: occupancy, agent profiles, satisfaction queries
//!
//! A `SchellingGrid` is built once and never mutated. Every query is a pure
//! function of the initial layout.

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SchellingError};
use crate::core::types::{Cell, CellPos};
use crate::entity::personality::{PersonalityId, PersonalityTable, ThresholdPolicy};
use crate::simulation::population::{assign_personalities, populate_cells};
use crate::simulation::satisfaction::{Neighborhood, SatisfactionSummary};
use crate::spatial::Grid;
use rand::Rng;

/// Cell counts by kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Census {
    pub empty: usize,
    pub red: usize,
    pub blue: usize,
}

/// Read-only segregation model state
#[derive(Debug, Clone)]
pub struct SchellingGrid {
    cells: Grid<Cell>,
    profiles: Grid<Option<PersonalityId>>,
    personalities: PersonalityTable,
    policy: ThresholdPolicy,
}

impl SchellingGrid {
    /// Validate `config` and build a randomly populated grid
    pub fn generate<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let personalities = config.personality_table()?;
        let cells = populate_cells(config.grid_size, config.empty_ratio, rng)?;
        let grid = Self::from_cells(cells, personalities, config.threshold_policy(), rng)?;

        let census = grid.census();
        tracing::info!(
            size = config.grid_size,
            empty = census.empty,
            red = census.red,
            blue = census.blue,
            dynamic_thresholds = config.dynamic_thresholds,
            "Grid initialized"
        );
        Ok(grid)
    }

    /// Build a grid over a fixed occupancy layout
    ///
    /// Personalities are still drawn from `rng`.
    pub fn from_cells<R: Rng + ?Sized>(
        cells: Grid<Cell>,
        personalities: PersonalityTable,
        policy: ThresholdPolicy,
        rng: &mut R,
    ) -> Result<Self> {
        if cells.rows == 0 || cells.rows != cells.cols {
            return Err(SchellingError::InvalidConfig(format!(
                "grid must be square and non-empty, got {}x{}",
                cells.rows, cells.cols
            )));
        }
        let profiles = assign_personalities(&cells, &personalities, rng);
        Ok(Self {
            cells,
            profiles,
            personalities,
            policy,
        })
    }

    /// Parse an ASCII layout (`.` empty, `R` red, `B` blue), one row per line
    ///
    /// Blank lines and surrounding whitespace are ignored.
    pub fn parse_layout(layout: &str) -> Result<Grid<Cell>> {
        let rows: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let size = rows.len();
        let mut data = Vec::with_capacity(layout.len());

        for (r, row) in rows.iter().enumerate() {
            let before = data.len();
            for ch in row.chars() {
                let cell = Cell::from_glyph(ch).ok_or_else(|| {
                    SchellingError::InvalidConfig(format!(
                        "unexpected character '{}' in layout row {}",
                        ch, r
                    ))
                })?;
                data.push(cell);
            }
            if data.len() - before != size {
                return Err(SchellingError::InvalidConfig(format!(
                    "layout row {} has {} cells, expected {}",
                    r,
                    data.len() - before,
                    size
                )));
            }
        }

        Grid::from_vec(size, size, data)
            .ok_or_else(|| SchellingError::InvalidConfig("layout is not square".into()))
    }

    pub fn size(&self) -> usize {
        self.cells.rows
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        self.cells.contains(pos)
    }

    pub fn policy(&self) -> ThresholdPolicy {
        self.policy
    }

    pub fn personalities(&self) -> &PersonalityTable {
        &self.personalities
    }

    pub fn cells(&self) -> &Grid<Cell> {
        &self.cells
    }

    pub fn cell(&self, pos: CellPos) -> Result<Cell> {
        self.cells
            .get(pos)
            .copied()
            .ok_or(SchellingError::OutOfBounds(pos))
    }

    /// Occupant at `pos`, failing for empty cells
    fn occupant(&self, pos: CellPos) -> Result<Cell> {
        match self.cell(pos)? {
            Cell::Empty => Err(SchellingError::EmptyCell(pos)),
            cell => Ok(cell),
        }
    }

    pub fn personality_id_for(&self, pos: CellPos) -> Result<PersonalityId> {
        self.occupant(pos)?;
        self.profiles
            .get(pos)
            .copied()
            .flatten()
            .ok_or(SchellingError::EmptyCell(pos))
    }

    /// Personality label assigned to the agent at `pos`
    pub fn personality_for(&self, pos: CellPos) -> Result<&str> {
        let id = self.personality_id_for(pos)?;
        self.personalities
            .label(id)
            .ok_or(SchellingError::EmptyCell(pos))
    }

    /// Tolerance threshold of the agent at `pos`
    pub fn threshold_for(&self, pos: CellPos) -> Result<f64> {
        let id = self.personality_id_for(pos)?;
        Ok(self.policy.resolve(&self.personalities, id))
    }

    /// Neighbor census around `pos`; valid for empty cells too
    pub fn neighborhood(&self, pos: CellPos) -> Result<Neighborhood> {
        if !self.contains(pos) {
            return Err(SchellingError::OutOfBounds(pos));
        }
        Ok(Neighborhood::survey(&self.cells, pos))
    }

    /// Whether the agent at `pos` is content with its neighborhood
    pub fn is_satisfied(&self, pos: CellPos) -> Result<bool> {
        let threshold = self.threshold_for(pos)?;
        Ok(self.neighborhood(pos)?.satisfies(threshold))
    }

    /// Positions of all agents, row by row
    pub fn agents(&self) -> impl Iterator<Item = (CellPos, Cell)> + '_ {
        self.cells
            .iter()
            .filter(|(_, c)| c.is_occupied())
            .map(|(p, c)| (p, *c))
    }

    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for cell in self.cells.values() {
            match cell {
                Cell::Empty => census.empty += 1,
                Cell::Red => census.red += 1,
                Cell::Blue => census.blue += 1,
            }
        }
        census
    }

    pub fn satisfaction_summary(&self) -> SatisfactionSummary {
        let mut summary = SatisfactionSummary::default();
        for (pos, cell) in self.agents() {
            let satisfied = self.is_satisfied(pos).unwrap_or(true);
            summary.record(cell, satisfied);
        }
        summary
    }

    /// One line per row, one glyph per cell
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.size() * (self.size() + 1));
        for (pos, cell) in self.cells.iter() {
            out.push(cell.glyph());
            if pos.col + 1 == self.cells.cols {
                out.push('\n');
            }
        }
        out
    }
}
