use super::{BackboneGrid, EdgeSlot};
use wifiplan_common::geom::coord::Coord;

// Every node owns the edges that leave it towards larger rows/columns:
// east, south, south-east and south-west. Together they cover the orthogonal
// lattice and both diagonal families.
const EAST: usize = 0;
const SOUTH: usize = 1;
const SOUTH_EAST: usize = 2;
const SOUTH_WEST: usize = 3;
const SLOTS_PER_NODE: usize = 4;

const FORWARD: [(i32, i32); SLOTS_PER_NODE] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Dense lattice with a "used" flag per edge. An unused edge costs
/// `unit_cost`, a used one is free.
pub struct Lattice {
    width: u32,
    height: u32,
    unit_cost: u64,
    used: Vec<bool>,
    touched: Vec<EdgeSlot>,
}

impl Lattice {
    pub fn new(height: u32, width: u32, unit_cost: u64) -> Self {
        let size = (width as usize) * (height as usize) * SLOTS_PER_NODE;

        if size > 200_000_000 {
            log::warn!(
                "Allocating large Lattice: {} edge slots. Ensure sufficient RAM.",
                size
            );
        }

        Self {
            width,
            height,
            unit_cost,
            used: vec![false; size],
            touched: Vec::new(),
        }
    }

    pub fn unit_cost(&self) -> u64 {
        self.unit_cost
    }

    #[inline(always)]
    pub fn node_index(&self, c: Coord) -> usize {
        (c.row as usize) * (self.width as usize) + (c.col as usize)
    }

    #[inline(always)]
    pub fn node_coord(&self, idx: usize) -> Coord {
        Coord::new(
            (idx / self.width as usize) as u32,
            (idx % self.width as usize) as u32,
        )
    }

    #[inline(always)]
    fn in_bounds(&self, c: Coord) -> bool {
        c.row < self.height && c.col < self.width
    }

    #[inline(always)]
    fn slot(&self, owner: Coord, dir: usize) -> EdgeSlot {
        self.node_index(owner) * SLOTS_PER_NODE + dir
    }

    fn endpoints(&self, slot: EdgeSlot) -> (Coord, Coord) {
        let owner = self.node_coord(slot / SLOTS_PER_NODE);
        let (dr, dc) = FORWARD[slot % SLOTS_PER_NODE];
        // Slots are only handed out for edges whose far end is in bounds.
        let far = owner.offset(dr, dc).unwrap_or(owner);
        (owner, far)
    }
}

impl BackboneGrid for Lattice {
    fn width(&self) -> u32 {
        self.width
    }
    fn height(&self) -> u32 {
        self.height
    }

    fn neighbors(&self, c: Coord) -> ([(Coord, EdgeSlot); 8], usize) {
        let mut out = [(Coord::default(), 0); 8];
        let mut n = 0;
        let mut push = |target: Option<Coord>, owner: Option<Coord>, dir: usize| {
            if let (Some(t), Some(o)) = (target, owner) {
                if self.in_bounds(t) {
                    out[n] = (t, self.slot(o, dir));
                    n += 1;
                }
            }
        };

        // Orthogonal first, then diagonals.
        push(c.offset(-1, 0), c.offset(-1, 0), SOUTH);
        push(c.offset(1, 0), Some(c), SOUTH);
        push(c.offset(0, -1), c.offset(0, -1), EAST);
        push(c.offset(0, 1), Some(c), EAST);
        push(c.offset(-1, -1), c.offset(-1, -1), SOUTH_EAST);
        push(c.offset(-1, 1), c.offset(-1, 1), SOUTH_WEST);
        push(c.offset(1, -1), Some(c), SOUTH_WEST);
        push(c.offset(1, 1), Some(c), SOUTH_EAST);

        (out, n)
    }

    fn edge_between(&self, a: Coord, b: Coord) -> Option<EdgeSlot> {
        if !self.in_bounds(a) || !self.in_bounds(b) || a.chebyshev(b) != 1 {
            return None;
        }
        let (owner, other) = if a < b { (a, b) } else { (b, a) };
        let dr = other.row as i32 - owner.row as i32;
        let dc = other.col as i32 - owner.col as i32;
        FORWARD
            .iter()
            .position(|&d| d == (dr, dc))
            .map(|dir| self.slot(owner, dir))
    }

    #[inline(always)]
    fn edge_cost(&self, slot: EdgeSlot) -> u64 {
        if self.used[slot] { 0 } else { self.unit_cost }
    }

    fn mark_used(&mut self, slot: EdgeSlot) {
        if !self.used[slot] {
            self.used[slot] = true;
            self.touched.push(slot);
        }
    }

    fn is_used(&self, slot: EdgeSlot) -> bool {
        self.used[slot]
    }

    fn used_edges(&self) -> Vec<(Coord, Coord)> {
        self.touched.iter().map(|&s| self.endpoints(s)).collect()
    }

    fn reset(&mut self) {
        for &s in &self.touched {
            self.used[s] = false;
        }
        self.touched.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_and_interior_degrees() {
        let lattice = Lattice::new(3, 3, 1);
        assert_eq!(lattice.neighbors(Coord::new(0, 0)).1, 3);
        assert_eq!(lattice.neighbors(Coord::new(0, 1)).1, 5);
        assert_eq!(lattice.neighbors(Coord::new(1, 1)).1, 8);
    }

    #[test]
    fn neighbour_slots_agree_with_edge_lookup() {
        let lattice = Lattice::new(4, 5, 1);
        for r in 0..4 {
            for c in 0..5 {
                let here = Coord::new(r, c);
                let (ns, n) = lattice.neighbors(here);
                for &(other, slot) in &ns[..n] {
                    assert_eq!(lattice.edge_between(here, other), Some(slot));
                    assert_eq!(lattice.edge_between(other, here), Some(slot));
                    let (a, b) = lattice.endpoints(slot);
                    assert!((a == here && b == other) || (a == other && b == here));
                }
            }
        }
        assert_eq!(lattice.edge_between(Coord::new(0, 0), Coord::new(0, 2)), None);
    }

    #[test]
    fn used_edges_are_free_until_reset() {
        let mut lattice = Lattice::new(2, 2, 7);
        let slot = lattice.edge_between(Coord::new(0, 1), Coord::new(1, 0)).unwrap();
        assert_eq!(lattice.edge_cost(slot), 7);
        lattice.mark_used(slot);
        lattice.mark_used(slot);
        assert_eq!(lattice.edge_cost(slot), 0);
        assert_eq!(lattice.used_edges(), vec![(Coord::new(0, 1), Coord::new(1, 0))]);
        lattice.reset();
        assert!(!lattice.is_used(slot));
        assert!(lattice.used_edges().is_empty());
    }
}
