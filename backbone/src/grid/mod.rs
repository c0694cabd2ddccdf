pub mod lattice;

pub use lattice::Lattice;

use wifiplan_common::geom::coord::Coord;

/// Identifier of one undirected lattice edge.
pub type EdgeSlot = usize;

/// Weighted, undirected grid graph the backbone is routed on.
pub trait BackboneGrid: Sync + Send {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Neighbours of `c` with the edge that leads to each, in a fixed order.
    fn neighbors(&self, c: Coord) -> ([(Coord, EdgeSlot); 8], usize);
    fn edge_between(&self, a: Coord, b: Coord) -> Option<EdgeSlot>;

    fn edge_cost(&self, slot: EdgeSlot) -> u64;
    fn mark_used(&mut self, slot: EdgeSlot);
    fn is_used(&self, slot: EdgeSlot) -> bool;

    /// Endpoints of every used edge, in the order they were first used.
    fn used_edges(&self) -> Vec<(Coord, Coord)>;
    fn reset(&mut self);
}
