use crate::fitness::Fitness;
use rand::rngs::StdRng;
use wifiplan_common::layout::instance::Instance;
use wifiplan_common::layout::routers::RouterSet;

/// Result of one driver run.
#[derive(Clone, Debug)]
pub struct Outcome {
    pub routers: RouterSet,
    pub fitness: Fitness,
    pub iterations: usize,
}

impl Outcome {
    /// Keeps whichever of `self` and `other` ranks higher.
    pub fn keep_best(self, other: Outcome) -> Outcome {
        if other.fitness.beats(&self.fitness) { other } else { self }
    }
}

/// A router placement search strategy.
pub trait Optimizer {
    fn name(&self) -> &'static str;

    /// Runs the search to completion. All randomness comes from `rng`.
    fn optimize(&mut self, instance: &Instance, rng: &mut StdRng) -> Outcome;
}
