pub mod engine;
pub mod moves;
pub mod priority;

pub use engine::LocalSearch;
pub use moves::{Action, Move, Policy};
pub use priority::CoverageQueue;
