use super::coord::Coord;

/// Inclusive, axis-aligned block of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRect {
    pub min: Coord,
    pub max: Coord,
}

impl CellRect {
    pub fn new(min: Coord, max: Coord) -> Self {
        Self { min, max }
    }

    /// Smallest rectangle containing both corners, in any order.
    pub fn spanning(a: Coord, b: Coord) -> Self {
        Self {
            min: Coord::new(a.row.min(b.row), a.col.min(b.col)),
            max: Coord::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Square of Chebyshev radius `radius` around `center`, clipped to a
    /// `height` x `width` grid. `center` must be inside the grid.
    pub fn around(center: Coord, radius: u32, height: u32, width: u32) -> Self {
        Self {
            min: Coord::new(
                center.row.saturating_sub(radius),
                center.col.saturating_sub(radius),
            ),
            max: Coord::new(
                center.row.saturating_add(radius).min(height - 1),
                center.col.saturating_add(radius).min(width - 1),
            ),
        }
    }

    pub fn height(&self) -> u32 {
        self.max.row - self.min.row + 1
    }
    pub fn width(&self) -> u32 {
        self.max.col - self.min.col + 1
    }
    pub fn area(&self) -> usize {
        self.height() as usize * self.width() as usize
    }

    pub fn contains(&self, c: Coord) -> bool {
        c.row >= self.min.row && c.row <= self.max.row && c.col >= self.min.col && c.col <= self.max.col
    }

    /// Row-major walk over every cell.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + use<> {
        let (min, max) = (self.min, self.max);
        (min.row..=max.row).flat_map(move |row| (min.col..=max.col).map(move |col| Coord::new(row, col)))
    }
}
