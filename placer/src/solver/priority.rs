use super::traits::{Optimizer, Outcome};
use crate::fitness::{Fitness, FitnessEvaluator};
use crate::search::{CoverageQueue, LocalSearch};
use rand::rngs::StdRng;
use wifiplan_common::geom::coord::Coord;
use wifiplan_common::geom::rtree::SpatialIndex;
use wifiplan_common::layout::instance::Instance;
use wifiplan_common::util::config::PriorityConfig;
use wifiplan_common::util::generator::random_placement;

#[derive(Clone, Debug)]
pub struct PriorityParams {
    /// Minimum number of steps; the search keeps going while over budget.
    pub iterations: usize,
    /// Steps between full fitness evaluations and queue reshuffles.
    pub evaluation_delay: usize,
    pub initial_routers: Option<usize>,
}

impl PriorityParams {
    pub fn from_config(cfg: &PriorityConfig, initial_routers: Option<usize>) -> Self {
        Self {
            iterations: cfg.iterations,
            evaluation_delay: cfg.evaluation_delay.max(1),
            initial_routers,
        }
    }
}

/// Coverage-guided add/remove search.
///
/// A `CoverageQueue` mirrors how many routers see each target cell. While the
/// placement fits the budget a router goes on the least covered free cell;
/// once over budget the router nearest to the most covered cell is removed.
pub struct PrioritySearch {
    params: PriorityParams,
}

struct State<'a> {
    engine: LocalSearch<'a>,
    queue: CoverageQueue,
    index: SpatialIndex,
}

impl State<'_> {
    fn mirror(&mut self, c: Coord, delta: i64) {
        for cell in self.engine.visible_cells(c) {
            self.queue.adjust(cell, delta);
        }
    }

    /// Places a router on the least covered free cell, if any is left.
    fn add(&mut self) -> bool {
        for _ in 0..self.queue.len() {
            let entry = self.queue.pop_lowest();
            if self.engine.routers().contains(entry.coord) {
                continue;
            }
            if self.engine.add_router(entry.coord).is_ok() {
                self.mirror(entry.coord, 1);
                self.index.insert(entry.coord);
                return true;
            }
        }
        false
    }

    /// Full evaluation; also reshuffles and re-sorts the queue.
    fn rescore(&mut self, evaluator: &mut FitnessEvaluator<'_>, rng: &mut StdRng) -> Fitness {
        self.queue.shuffle(rng);
        self.queue.force_reorder();
        evaluator.evaluate_with_coverage(self.engine.routers().as_slice(), self.engine.covered())
    }

    /// Drops the router closest to the most covered cell.
    fn remove(&mut self) -> bool {
        let hot = self.queue.pop_highest();
        let Some(victim) = self.index.nearest(hot.coord) else {
            return false;
        };
        let Some(id) = self.engine.routers().position_of(victim) else {
            return false;
        };
        self.engine.remove_router(id);
        self.index.remove(victim);
        self.mirror(victim, -1);
        true
    }
}

impl PrioritySearch {
    pub fn new(params: PriorityParams) -> Self {
        Self { params }
    }
}

impl Optimizer for PrioritySearch {
    fn name(&self) -> &'static str {
        "priority"
    }

    fn optimize(&mut self, instance: &Instance, rng: &mut StdRng) -> Outcome {
        let p = &self.params;
        let grid = &instance.grid;
        let count = p.initial_routers.unwrap_or_else(|| instance.default_router_count());
        let mut evaluator = FitnessEvaluator::new(instance);

        let start = random_placement(grid, count, rng);
        let index = SpatialIndex::bulk_load(start.as_slice());
        let mut state = State {
            engine: LocalSearch::new(grid, instance.router_range, start),
            queue: CoverageQueue::new(),
            index,
        };
        for c in grid.targets() {
            state.queue.add(c);
        }
        let routers: Vec<Coord> = state.engine.routers().iter().collect();
        for c in routers {
            state.mirror(c, 1);
        }

        let mut fitness = state.rescore(&mut evaluator, rng);
        let mut best = Outcome {
            routers: state.engine.routers().clone(),
            fitness,
            iterations: 0,
        };

        log::info!(
            "Priority search: {} iterations, evaluation every {}, {} initial routers",
            p.iterations,
            p.evaluation_delay,
            count
        );

        let mut remaining = p.iterations;
        let mut step = 1usize;
        while (remaining > 0 || fitness.over_budget) && !state.queue.is_empty() {
            if !fitness.over_budget && state.engine.is_fully_covered() {
                log::info!("Full coverage within budget after {} steps.", step - 1);
                break;
            }

            let moved = if fitness.over_budget { state.remove() } else { state.add() };
            if !moved {
                log::warn!("Priority search stalled at step {}.", step);
                break;
            }

            if step % p.evaluation_delay == 0 || fitness.over_budget {
                fitness = state.rescore(&mut evaluator, rng);
                log::debug!(
                    "Step {}: score {} routers {} covered {}{}",
                    step,
                    fitness.score,
                    fitness.routers,
                    fitness.covered,
                    if fitness.over_budget { " (over budget)" } else { "" }
                );
                if fitness.beats(&best.fitness) {
                    best.routers = state.engine.routers().clone();
                    best.fitness = fitness;
                }
            }

            step += 1;
            remaining = remaining.saturating_sub(1);
        }

        let last = evaluator.evaluate_with_coverage(state.engine.routers().as_slice(), state.engine.covered());
        if last.beats(&best.fitness) {
            best.routers = state.engine.into_routers();
            best.fitness = last;
        }
        best.iterations = step - 1;
        best
    }
}
