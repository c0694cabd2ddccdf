pub mod coord;
pub mod rect;
pub mod rtree;
