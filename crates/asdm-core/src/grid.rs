/// Fixed-size 2D lattice of worker cells.
///
/// Dimensions are immutable after construction; the cell→worker mapping is
/// a bijection by row-major index. The grid is not toroidal: labor markets
/// have edges, and the contagion rule treats border cells as having fewer
/// neighbors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total cell count (one worker per cell).
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major index of a cell.
    pub fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        row * self.cols + col
    }

    /// Inverse of [`Grid::index`].
    pub fn position(&self, index: usize) -> (usize, usize) {
        debug_assert!(index < self.len());
        (index / self.cols, index % self.cols)
    }

    /// Von Neumann neighborhood (up/down/left/right), clipped at the border.
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let (row, col) = self.position(index);
        let rows = self.rows;
        let cols = self.cols;
        let up = (row > 0).then(|| self.index(row - 1, col));
        let down = (row + 1 < rows).then(|| self.index(row + 1, col));
        let left = (col > 0).then(|| self.index(row, col - 1));
        let right = (col + 1 < cols).then(|| self.index(row, col + 1));
        [up, down, left, right].into_iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_position_round_trip() {
        let grid = Grid::new(4, 7);
        for i in 0..grid.len() {
            let (r, c) = grid.position(i);
            assert_eq!(grid.index(r, c), i);
        }
    }

    #[test]
    fn neighbor_counts_match_cell_location() {
        let grid = Grid::new(3, 3);
        // corner, edge, interior
        assert_eq!(grid.neighbors(grid.index(0, 0)).count(), 2);
        assert_eq!(grid.neighbors(grid.index(0, 1)).count(), 3);
        assert_eq!(grid.neighbors(grid.index(1, 1)).count(), 4);
    }

    #[test]
    fn neighbors_do_not_wrap_across_borders() {
        let grid = Grid::new(2, 5);
        let corner = grid.index(0, 0);
        let far_corner = grid.index(1, 4);
        assert!(grid.neighbors(corner).all(|n| n != far_corner));
    }

    #[test]
    fn single_row_grid_has_linear_neighbors() {
        let grid = Grid::new(1, 4);
        let middle: Vec<usize> = grid.neighbors(1).collect();
        assert_eq!(middle, vec![0, 2]);
    }
}
