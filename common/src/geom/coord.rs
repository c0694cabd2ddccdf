/// Grid position. `row` grows downwards, `col` grows to the right.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: u32,
    pub col: u32,
}

impl Coord {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    #[inline(always)]
    pub fn chebyshev(self, other: Coord) -> u32 {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }

    /// Shifted position, or `None` if it would leave the non-negative quadrant.
    /// Upper bounds are the grid's business.
    #[inline]
    pub fn offset(self, d_row: i32, d_col: i32) -> Option<Coord> {
        Some(Coord {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
