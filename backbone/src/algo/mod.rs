pub mod astar;
pub mod mst;
