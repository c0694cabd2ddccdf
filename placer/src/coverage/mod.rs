pub mod geometry;

use wifiplan_common::geom::coord::Coord;
use wifiplan_common::layout::grid::Grid;

/// Per-cell router count with a running total of cells whose count is
/// non-zero.
#[derive(Clone, Debug)]
pub struct CoverageMap {
    width: u32,
    counts: Vec<u32>,
    covered: usize,
}

impl CoverageMap {
    pub fn new(grid: &Grid) -> Self {
        Self {
            width: grid.width(),
            counts: vec![0; grid.len()],
            covered: 0,
        }
    }

    #[inline(always)]
    fn idx(&self, c: Coord) -> usize {
        c.row as usize * self.width as usize + c.col as usize
    }

    #[inline]
    pub fn count(&self, c: Coord) -> u32 {
        self.counts[self.idx(c)]
    }

    #[inline]
    pub fn is_covered(&self, c: Coord) -> bool {
        self.count(c) > 0
    }

    pub fn covered(&self) -> usize {
        self.covered
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Adds one router's worth of coverage; returns how many cells went from
    /// uncovered to covered.
    pub fn add_cells(&mut self, cells: &[Coord]) -> usize {
        let mut gained = 0;
        for &c in cells {
            let i = self.idx(c);
            if self.counts[i] == 0 {
                gained += 1;
            }
            self.counts[i] += 1;
        }
        self.covered += gained;
        gained
    }

    /// Inverse of `add_cells`; returns how many cells dropped to zero.
    pub fn remove_cells(&mut self, cells: &[Coord]) -> usize {
        let mut lost = 0;
        for &c in cells {
            let i = self.idx(c);
            debug_assert!(self.counts[i] > 0, "coverage underflow at {}", c);
            self.counts[i] -= 1;
            if self.counts[i] == 0 {
                lost += 1;
            }
        }
        self.covered -= lost;
        lost
    }

    pub fn zeros_in(&self, cells: &[Coord]) -> usize {
        cells.iter().filter(|&&c| self.count(c) == 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_remove_restores_counts() {
        let grid = Grid::from_rows(&["...", "..."]).unwrap();
        let mut map = CoverageMap::new(&grid);
        let a = [Coord::new(0, 0), Coord::new(0, 1)];
        let b = [Coord::new(0, 1), Coord::new(1, 1)];

        assert_eq!(map.add_cells(&a), 2);
        assert_eq!(map.add_cells(&b), 1);
        assert_eq!(map.covered(), 3);
        assert_eq!(map.count(Coord::new(0, 1)), 2);

        assert_eq!(map.remove_cells(&a), 1);
        assert_eq!(map.covered(), 2);
        assert_eq!(map.remove_cells(&b), 2);
        assert!(map.counts().iter().all(|&n| n == 0));
    }
}
