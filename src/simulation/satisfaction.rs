//! Neighborhood satisfaction
//!
//! An agent is satisfied when the share of same-type agents among its
//! occupied neighbors reaches its tolerance threshold. Empty neighbors do
//! not count toward either side of the fraction.

use crate::core::types::{Cell, CellPos};
use crate::spatial::Grid;

/// Census of the occupied cells around one position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Neighborhood {
    /// Occupied neighbors (at most 8)
    pub occupied: u8,
    /// Occupied neighbors of the same type as the center cell
    pub same: u8,
}

impl Neighborhood {
    /// Count the neighbors of `pos`
    ///
    /// For an empty or out-of-bounds center, `same` is always 0.
    pub fn survey(cells: &Grid<Cell>, pos: CellPos) -> Self {
        let center = cells.get(pos).copied().unwrap_or_default();
        let mut census = Self::default();
        for neighbor in cells.neighbors(pos) {
            let Some(&cell) = cells.get(neighbor) else {
                continue;
            };
            if cell.is_occupied() {
                census.occupied += 1;
                if center.is_occupied() && cell == center {
                    census.same += 1;
                }
            }
        }
        census
    }

    pub fn different(&self) -> u8 {
        self.occupied - self.same
    }

    /// Same-type share of occupied neighbors; 0.0 with no occupied neighbors
    pub fn fraction_same(&self) -> f64 {
        if self.occupied == 0 {
            0.0
        } else {
            f64::from(self.same) / f64::from(self.occupied)
        }
    }

    /// Whether an agent with this neighborhood meets `threshold`
    ///
    /// An agent with no occupied neighbors is satisfied regardless of its
    /// threshold.
    pub fn satisfies(&self, threshold: f64) -> bool {
        self.occupied == 0 || self.fraction_same() >= threshold
    }
}

/// Satisfied/unsatisfied agent counts per occupant type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SatisfactionSummary {
    pub red_satisfied: usize,
    pub red_unsatisfied: usize,
    pub blue_satisfied: usize,
    pub blue_unsatisfied: usize,
}

impl SatisfactionSummary {
    pub fn record(&mut self, cell: Cell, satisfied: bool) {
        match (cell, satisfied) {
            (Cell::Red, true) => self.red_satisfied += 1,
            (Cell::Red, false) => self.red_unsatisfied += 1,
            (Cell::Blue, true) => self.blue_satisfied += 1,
            (Cell::Blue, false) => self.blue_unsatisfied += 1,
            (Cell::Empty, _) => {}
        }
    }

    pub fn satisfied(&self) -> usize {
        self.red_satisfied + self.blue_satisfied
    }

    pub fn unsatisfied(&self) -> usize {
        self.red_unsatisfied + self.blue_unsatisfied
    }

    pub fn agents(&self) -> usize {
        self.satisfied() + self.unsatisfied()
    }

    /// Fraction of agents satisfied; 1.0 for a grid with no agents
    pub fn satisfied_ratio(&self) -> f64 {
        match self.agents() {
            0 => 1.0,
            n => self.satisfied() as f64 / n as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(rows: &[&str]) -> Grid<Cell> {
        let cols = rows[0].len();
        let data = rows
            .iter()
            .flat_map(|r| r.chars().map(|c| Cell::from_glyph(c).unwrap()))
            .collect();
        Grid::from_vec(rows.len(), cols, data).unwrap()
    }

    #[test]
    fn test_survey_counts_same_and_occupied() {
        let cells = grid_from(&["RB.", "RRB", "..R"]);
        let census = Neighborhood::survey(&cells, CellPos::new(1, 1));
        assert_eq!(census.occupied, 5);
        assert_eq!(census.same, 3);
        assert_eq!(census.different(), 2);
        assert!((census.fraction_same() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_corner_only_sees_three_cells() {
        let cells = grid_from(&["BR", "RR"]);
        let census = Neighborhood::survey(&cells, CellPos::new(0, 0));
        assert_eq!(census.occupied, 3);
        assert_eq!(census.same, 0);
        assert!(!census.satisfies(0.1));
        assert!(census.satisfies(0.0));
    }

    #[test]
    fn test_isolated_agent_is_satisfied() {
        let cells = grid_from(&["...", ".B.", "..."]);
        let census = Neighborhood::survey(&cells, CellPos::new(1, 1));
        assert_eq!(census, Neighborhood::default());
        assert_eq!(census.fraction_same(), 0.0);
        assert!(census.satisfies(1.0));
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let census = Neighborhood {
            occupied: 4,
            same: 1,
        };
        assert!(census.satisfies(0.25));
        assert!(!census.satisfies(0.26));
    }

    #[test]
    fn test_summary_totals() {
        let mut summary = SatisfactionSummary::default();
        summary.record(Cell::Red, true);
        summary.record(Cell::Red, false);
        summary.record(Cell::Blue, true);
        summary.record(Cell::Empty, false);
        assert_eq!(summary.agents(), 3);
        assert_eq!(summary.unsatisfied(), 1);
        assert!((summary.satisfied_ratio() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(SatisfactionSummary::default().satisfied_ratio(), 1.0);
    }
}
