use super::grid::Grid;
use super::indices::RouterId;
use crate::error::PlacementError;
use crate::geom::coord::Coord;
use std::collections::HashSet;

/// Ordered, duplicate-free router positions, all on target cells.
///
/// Every mutating method validates against the grid first and leaves the set
/// untouched when the position is rejected.
#[derive(Clone, Debug, Default)]
pub struct RouterSet {
    positions: Vec<Coord>,
    occupied: HashSet<Coord>,
}

impl RouterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_coords<I>(grid: &Grid, coords: I) -> Result<Self, PlacementError>
    where
        I: IntoIterator<Item = Coord>,
    {
        let mut set = Self::new();
        for c in coords {
            set.insert(grid, c)?;
        }
        Ok(set)
    }

    /// Why `c` cannot hold a new router, if anything.
    pub fn check_position(&self, grid: &Grid, c: Coord) -> Result<(), PlacementError> {
        let kind = grid.get(c).ok_or(PlacementError::OutOfBounds {
            coord: c,
            height: grid.height(),
            width: grid.width(),
        })?;
        if kind != super::grid::CellKind::Target {
            return Err(PlacementError::NotTarget { coord: c, kind });
        }
        if self.occupied.contains(&c) {
            return Err(PlacementError::Duplicate(c));
        }
        Ok(())
    }

    pub fn insert(&mut self, grid: &Grid, c: Coord) -> Result<RouterId, PlacementError> {
        self.check_position(grid, c)?;
        self.occupied.insert(c);
        self.positions.push(c);
        Ok(RouterId::new(self.positions.len() - 1))
    }

    /// Removes a router, shifting later ids down by one. Panics on a bad id.
    pub fn remove(&mut self, id: RouterId) -> Coord {
        let c = self.positions.remove(id.index());
        self.occupied.remove(&c);
        c
    }

    /// Moves router `id` to `to`; returns its previous position.
    pub fn relocate(&mut self, grid: &Grid, id: RouterId, to: Coord) -> Result<Coord, PlacementError> {
        let from = self.get(id);
        self.check_position(grid, to)?;
        self.occupied.remove(&from);
        self.occupied.insert(to);
        self.positions[id.index()] = to;
        Ok(from)
    }

    /// Position of router `id`. Panics on a bad id.
    #[inline]
    pub fn get(&self, id: RouterId) -> Coord {
        self.positions[id.index()]
    }

    pub fn position_of(&self, c: Coord) -> Option<RouterId> {
        if !self.occupied.contains(&c) {
            return None;
        }
        self.positions.iter().position(|&p| p == c).map(RouterId::new)
    }

    pub fn contains(&self, c: Coord) -> bool {
        self.occupied.contains(&c)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = RouterId> + use<> {
        (0..self.positions.len()).map(RouterId::new)
    }

    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.positions.iter().copied()
    }

    pub fn as_slice(&self) -> &[Coord] {
        &self.positions
    }

    /// Positions in row-major order, independent of insertion order.
    pub fn sorted(&self) -> Vec<Coord> {
        let mut v = self.positions.clone();
        v.sort_unstable();
        v
    }
}

impl PartialEq for RouterSet {
    fn eq(&self, other: &Self) -> bool {
        self.positions == other.positions
    }
}

impl Eq for RouterSet {}
