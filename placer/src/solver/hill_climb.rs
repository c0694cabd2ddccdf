use super::traits::{Optimizer, Outcome};
use crate::fitness::FitnessEvaluator;
use crate::search::{LocalSearch, Policy};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use wifiplan_common::geom::coord::Coord;
use wifiplan_common::layout::instance::Instance;
use wifiplan_common::layout::routers::RouterSet;
use wifiplan_common::util::config::HillClimbConfig;
use wifiplan_common::util::generator::random_placement;

pub struct HillClimbParams {
    pub policy: Policy,
    pub restarts: usize,
    pub max_iterations: usize,
    /// Failed router additions tolerated in a row before a restart ends.
    pub patience: usize,
    /// Candidates `try_add_router` may reject in a row.
    pub add_patience: usize,
    pub initial_routers: Option<usize>,
}

impl HillClimbParams {
    pub fn from_config(cfg: &HillClimbConfig, initial_routers: Option<usize>) -> anyhow::Result<Self> {
        Ok(Self {
            policy: cfg.policy.parse()?,
            restarts: cfg.restarts.max(1),
            max_iterations: cfg.max_iterations,
            patience: cfg.patience.max(1),
            add_patience: cfg.add_patience.max(1),
            initial_routers,
        })
    }
}

/// Random-restart hill climbing on unit router moves.
///
/// Each restart climbs with `LocalSearch::step` until no move improves
/// coverage, then tries to grow the placement by one router. An addition is
/// kept only if the full fitness, backbone included, improves within budget.
pub struct HillClimber {
    params: HillClimbParams,
}

impl HillClimber {
    pub fn new(params: HillClimbParams) -> Self {
        Self { params }
    }
}

impl Optimizer for HillClimber {
    fn name(&self) -> &'static str {
        "hill_climb"
    }

    fn optimize(&mut self, instance: &Instance, rng: &mut StdRng) -> Outcome {
        let grid = &instance.grid;
        let count = self
            .params
            .initial_routers
            .unwrap_or_else(|| instance.default_router_count());
        let mut evaluator = FitnessEvaluator::new(instance);
        let mut candidates: Vec<Coord> = grid.targets().collect();
        let mut best: Option<Outcome> = None;
        let mut iterations = 0;

        log::info!(
            "Hill climbing: {} restarts, {} routers, policy {}",
            self.params.restarts,
            count,
            self.params.policy
        );

        for restart in 0..self.params.restarts {
            let start = random_placement(grid, count, rng);
            let mut engine = LocalSearch::new(grid, instance.router_range, start);
            let mut failed_adds = 0;
            let mut steps = 0;

            while steps < self.params.max_iterations && !engine.is_fully_covered() {
                steps += 1;
                if engine.step(self.params.policy).is_some() {
                    continue;
                }

                let current = evaluator.evaluate_with_coverage(engine.routers().as_slice(), engine.covered());
                candidates.shuffle(rng);
                let mut trial = engine.clone();
                if trial.try_add_router(&candidates, self.params.add_patience).is_some() {
                    let grown = evaluator.evaluate_with_coverage(trial.routers().as_slice(), trial.covered());
                    if grown.improves_on(&current) {
                        engine = trial;
                        failed_adds = 0;
                        continue;
                    }
                }

                failed_adds += 1;
                if failed_adds >= self.params.patience {
                    break;
                }
            }
            iterations += steps;

            let fitness = evaluator.evaluate_with_coverage(engine.routers().as_slice(), engine.covered());
            log::info!(
                "Restart {}: {} steps, {} routers, covered {}/{}, score {}{}",
                restart,
                steps,
                fitness.routers,
                fitness.covered,
                grid.target_count(),
                fitness.score,
                if fitness.over_budget { " (over budget)" } else { "" }
            );

            let done = engine.is_fully_covered() && !fitness.over_budget;
            let outcome = Outcome {
                routers: engine.into_routers(),
                fitness,
                iterations: 0,
            };
            best = Some(match best {
                Some(b) => b.keep_best(outcome),
                None => outcome,
            });
            if done {
                log::info!("Full coverage within budget. Stopping early.");
                break;
            }
        }

        let mut best = best.unwrap_or_else(|| Outcome {
            routers: RouterSet::new(),
            fitness: evaluator.evaluate(&[]),
            iterations: 0,
        });
        best.iterations = iterations;
        best
    }
}
