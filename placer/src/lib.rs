//! Router placement: coverage model, incremental local search, fitness, and
//! the search drivers built on them.

pub mod coverage;
pub mod fitness;
pub mod search;
pub mod solver;

pub use coverage::CoverageMap;
pub use fitness::{Fitness, FitnessEvaluator};
pub use search::{Action, CoverageQueue, LocalSearch, Move, Policy};
pub use solver::build_optimizer;
pub use solver::traits::{Optimizer, Outcome};
