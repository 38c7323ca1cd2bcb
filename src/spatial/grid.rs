//! Generic square-cell grid for per-cell data

use crate::core::types::CellPos;

/// Offsets of the eight cells around a center (Moore neighborhood)
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Generic 2D grid stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T: Clone + Default> {
    pub rows: usize,
    pub cols: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::default(); rows * cols],
        }
    }

    /// Wrap existing row-major data; `None` if the length doesn't match
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Option<Self> {
        (rows.checked_mul(cols) == Some(data.len())).then_some(Self { rows, cols, data })
    }

    #[inline]
    pub fn contains(&self, pos: CellPos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    #[inline]
    pub fn get(&self, pos: CellPos) -> Option<&T> {
        if self.contains(pos) {
            Some(&self.data[pos.row * self.cols + pos.col])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, pos: CellPos) -> Option<&mut T> {
        if self.contains(pos) {
            Some(&mut self.data[pos.row * self.cols + pos.col])
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, pos: CellPos, value: T) {
        if let Some(slot) = self.get_mut(pos) {
            *slot = value;
        }
    }

    /// In-bounds positions adjacent to `pos`, diagonals included
    ///
    /// Yields 8 positions for interior cells, 5 on an edge, 3 in a corner.
    /// There is no wraparound.
    pub fn neighbors(&self, pos: CellPos) -> impl Iterator<Item = CellPos> + '_ {
        NEIGHBOR_OFFSETS.iter().filter_map(move |&(dr, dc)| {
            let row = pos.row.checked_add_signed(dr)?;
            let col = pos.col.checked_add_signed(dc)?;
            let neighbor = CellPos::new(row, col);
            self.contains(neighbor).then_some(neighbor)
        })
    }

    /// All cells with their positions, row by row
    pub fn iter(&self) -> impl Iterator<Item = (CellPos, &T)> + '_ {
        let cols = self.cols;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| (CellPos::new(i / cols, i % cols), v))
    }

    pub fn values(&self) -> &[T] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_bounds() {
        let mut grid: Grid<u8> = Grid::new(3, 4);
        grid.set(CellPos::new(2, 3), 9);
        assert_eq!(grid.get(CellPos::new(2, 3)), Some(&9));
        assert_eq!(grid.get(CellPos::new(3, 0)), None);
        assert_eq!(grid.get(CellPos::new(0, 4)), None);
        // Out-of-bounds writes are ignored
        grid.set(CellPos::new(5, 5), 1);
        assert_eq!(grid.values().iter().filter(|v| **v != 0).count(), 1);
    }

    #[test]
    fn test_neighbor_counts_by_position() {
        let grid: Grid<u8> = Grid::new(5, 5);
        assert_eq!(grid.neighbors(CellPos::new(0, 0)).count(), 3);
        assert_eq!(grid.neighbors(CellPos::new(4, 4)).count(), 3);
        assert_eq!(grid.neighbors(CellPos::new(0, 2)).count(), 5);
        assert_eq!(grid.neighbors(CellPos::new(2, 4)).count(), 5);
        assert_eq!(grid.neighbors(CellPos::new(2, 2)).count(), 8);
    }

    #[test]
    fn test_single_cell_has_no_neighbors() {
        let grid: Grid<u8> = Grid::new(1, 1);
        assert_eq!(grid.neighbors(CellPos::new(0, 0)).count(), 0);
    }

    #[test]
    fn test_from_vec_and_iter_order() {
        assert!(Grid::from_vec(2, 2, vec![1u8, 2, 3]).is_none());
        let grid = Grid::from_vec(2, 3, vec![0u8, 1, 2, 3, 4, 5]).unwrap();
        let positions: Vec<_> = grid.iter().map(|(p, v)| (p, *v)).collect();
        assert_eq!(positions[4], (CellPos::new(1, 1), 4));
        assert_eq!(grid.get(CellPos::new(1, 2)), Some(&5));
    }
}
