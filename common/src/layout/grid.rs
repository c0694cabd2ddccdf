use crate::error::LayoutError;
use crate::geom::coord::Coord;
use crate::geom::rect::CellRect;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    Wall,
    Void,
    Target,
}

impl CellKind {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '#' => Some(CellKind::Wall),
            '-' => Some(CellKind::Void),
            '.' => Some(CellKind::Target),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            CellKind::Wall => '#',
            CellKind::Void => '-',
            CellKind::Target => '.',
        }
    }
}

/// Immutable building layout.
///
/// Besides the cell kinds the grid keeps a summed-area table of wall cells, so
/// "is there any wall inside this rectangle" is a constant-time question. The
/// coverage model asks it once per candidate cell.
#[derive(Clone, Debug)]
pub struct Grid {
    height: u32,
    width: u32,
    cells: Vec<CellKind>,
    // (height + 1) x (width + 1), first row and column are zero.
    wall_prefix: Vec<u32>,
    target_count: usize,
}

impl Grid {
    pub fn new(height: u32, width: u32, cells: Vec<CellKind>) -> Result<Self, LayoutError> {
        if height == 0 || width == 0 {
            return Err(LayoutError::Empty);
        }
        let expected = height as usize * width as usize;
        if cells.len() != expected {
            return Err(LayoutError::CellCount {
                expected,
                found: cells.len(),
            });
        }

        let stride = width as usize + 1;
        let mut wall_prefix = vec![0u32; (height as usize + 1) * stride];
        for r in 0..height as usize {
            let mut row_walls = 0;
            for c in 0..width as usize {
                if cells[r * width as usize + c] == CellKind::Wall {
                    row_walls += 1;
                }
                wall_prefix[(r + 1) * stride + c + 1] = wall_prefix[r * stride + c + 1] + row_walls;
            }
        }

        let target_count = cells.iter().filter(|&&k| k == CellKind::Target).count();

        Ok(Self {
            height,
            width,
            cells,
            wall_prefix,
            target_count,
        })
    }

    /// Builds a grid from text rows using the `.`/`#`/`-` symbols.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, LayoutError> {
        let Some(first) = rows.first() else {
            return Err(LayoutError::Empty);
        };
        let width = first.as_ref().chars().count() as u32;
        let mut cells = Vec::with_capacity(rows.len() * width as usize);

        for (r, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count() as u32;
            if found != width {
                return Err(LayoutError::RaggedRow {
                    row: r as u32,
                    expected: width,
                    found,
                });
            }
            for (c, symbol) in line.chars().enumerate() {
                let kind = CellKind::from_symbol(symbol).ok_or(LayoutError::UnknownSymbol {
                    row: r as u32,
                    col: c as u32,
                    symbol,
                })?;
                cells.push(kind);
            }
        }

        Self::new(rows.len() as u32, width, cells)
    }

    pub fn height(&self) -> u32 {
        self.height
    }
    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn len(&self) -> usize {
        self.cells.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn target_count(&self) -> usize {
        self.target_count
    }

    pub fn bounds(&self) -> CellRect {
        CellRect::new(Coord::new(0, 0), Coord::new(self.height - 1, self.width - 1))
    }

    #[inline(always)]
    pub fn contains(&self, c: Coord) -> bool {
        c.row < self.height && c.col < self.width
    }

    /// Dense index of an in-bounds coordinate.
    #[inline(always)]
    pub fn index(&self, c: Coord) -> usize {
        c.row as usize * self.width as usize + c.col as usize
    }

    #[inline(always)]
    pub fn coord(&self, idx: usize) -> Coord {
        Coord::new((idx / self.width as usize) as u32, (idx % self.width as usize) as u32)
    }

    /// Kind of an in-bounds cell. Panics outside the grid.
    #[inline(always)]
    pub fn kind(&self, c: Coord) -> CellKind {
        assert!(self.contains(c), "cell {c} outside {}x{} grid", self.height, self.width);
        self.cells[self.index(c)]
    }

    pub fn get(&self, c: Coord) -> Option<CellKind> {
        self.contains(c).then(|| self.cells[self.index(c)])
    }

    #[inline(always)]
    pub fn is_target(&self, c: Coord) -> bool {
        self.get(c) == Some(CellKind::Target)
    }

    /// Target cells in row-major order.
    pub fn targets(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, k)| **k == CellKind::Target)
            .map(|(i, _)| self.coord(i))
    }

    /// Number of wall cells inside `rect`, which must lie inside the grid.
    #[inline]
    pub fn walls_in(&self, rect: &CellRect) -> u32 {
        let stride = self.width as usize + 1;
        let top = rect.min.row as usize;
        let left = rect.min.col as usize;
        let bottom = rect.max.row as usize + 1;
        let right = rect.max.col as usize + 1;
        let p = &self.wall_prefix;
        (p[bottom * stride + right] + p[top * stride + left])
            - (p[top * stride + right] + p[bottom * stride + left])
    }

    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|k| k.symbol()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Grid {
        Grid::from_rows(&["..#.", ".-#.", "...."]).unwrap()
    }

    #[test]
    fn parses_symbols_and_counts_targets() {
        let g = sample();
        assert_eq!((g.height(), g.width()), (3, 4));
        assert_eq!(g.kind(Coord::new(0, 2)), CellKind::Wall);
        assert_eq!(g.kind(Coord::new(1, 1)), CellKind::Void);
        assert_eq!(g.target_count(), 9);
        assert_eq!(g.rows().collect::<Vec<_>>(), vec!["..#.", ".-#.", "...."]);
    }

    #[test]
    fn rejects_malformed_rows() {
        assert_eq!(
            Grid::from_rows(&["..", "."]).unwrap_err(),
            LayoutError::RaggedRow { row: 1, expected: 2, found: 1 }
        );
        assert!(matches!(
            Grid::from_rows(&[".x"]),
            Err(LayoutError::UnknownSymbol { row: 0, col: 1, symbol: 'x' })
        ));
        assert_eq!(Grid::from_rows::<&str>(&[]).unwrap_err(), LayoutError::Empty);
    }

    #[test]
    fn wall_rectangle_queries_match_a_scan() {
        let g = sample();
        for a in g.bounds().cells() {
            for b in g.bounds().cells() {
                let rect = CellRect::spanning(a, b);
                let scanned = rect.cells().filter(|&c| g.kind(c) == CellKind::Wall).count();
                assert_eq!(g.walls_in(&rect) as usize, scanned, "rect {rect:?}");
            }
        }
    }

    #[test]
    fn out_of_bounds_cells_are_not_targets() {
        let g = sample();
        assert!(!g.is_target(Coord::new(3, 0)));
        assert_eq!(g.get(Coord::new(0, 4)), None);
    }
}
