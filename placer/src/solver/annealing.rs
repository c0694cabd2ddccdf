use super::traits::{Optimizer, Outcome};
use crate::fitness::{Fitness, FitnessEvaluator};
use crate::search::{Action, LocalSearch};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use wifiplan_common::geom::coord::Coord;
use wifiplan_common::layout::indices::RouterId;
use wifiplan_common::layout::instance::Instance;
use wifiplan_common::util::config::AnnealingConfig;
use wifiplan_common::util::generator::random_placement;

#[derive(Clone, Debug)]
pub struct AnnealingParams {
    pub iterations: usize,
    pub initial_temperature: f64,
    /// Multiplier applied to the temperature after every iteration.
    pub cooling_rate: f64,
    pub min_temperature: f64,
    /// Scales the fitness delta inside the acceptance exponent.
    pub sigma: f64,
    pub initial_routers: Option<usize>,
}

impl AnnealingParams {
    pub fn from_config(cfg: &AnnealingConfig, initial_routers: Option<usize>) -> Self {
        Self {
            iterations: cfg.iterations,
            initial_temperature: cfg.initial_temperature,
            cooling_rate: cfg.cooling_rate.clamp(0.0, 1.0),
            min_temperature: cfg.min_temperature.max(0.0),
            sigma: cfg.sigma,
            initial_routers,
        }
    }
}

/// Metropolis acceptance. Non-negative deltas always pass without touching
/// the rng; otherwise accept with probability `exp(sigma * delta / T)`.
pub fn accept<R: Rng + ?Sized>(delta: f64, temperature: f64, sigma: f64, rng: &mut R) -> bool {
    if delta >= 0.0 {
        return true;
    }
    if temperature <= 0.0 {
        return false;
    }
    let p = (sigma * delta / temperature).exp();
    rng.gen_range(0.0..1.0) < p
}

/// How to revert a neighbour move.
#[derive(Clone, Copy, Debug)]
enum Undo {
    Added(RouterId),
    Removed(Coord),
    Moved(RouterId, Action),
}

#[derive(Clone, Copy, Debug)]
enum Neighbour {
    SmartAdd,
    Remove,
    Move,
}

const NEIGHBOURS: [Neighbour; 3] = [Neighbour::SmartAdd, Neighbour::Remove, Neighbour::Move];

/// Simulated annealing over add / remove / move neighbours.
///
/// The current placement lives in a `LocalSearch` engine so coverage is
/// updated incrementally; only the backbone is rebuilt per candidate.
pub struct Annealer {
    params: AnnealingParams,
}

impl Annealer {
    pub fn new(params: AnnealingParams) -> Self {
        Self { params }
    }

    fn smart_add(engine: &mut LocalSearch<'_>, rng: &mut StdRng) -> Option<Undo> {
        let grid = engine.grid();
        let uncovered: Vec<Coord> = grid
            .targets()
            .filter(|&c| !engine.coverage().is_covered(c))
            .collect();
        let &c = uncovered.choose(rng)?;
        let (id, _) = engine.add_router(c).ok()?;
        Some(Undo::Added(id))
    }

    fn remove(engine: &mut LocalSearch<'_>, rng: &mut StdRng) -> Option<Undo> {
        if engine.routers().is_empty() {
            return None;
        }
        let id = RouterId::new(rng.gen_range(0..engine.routers().len()));
        let (c, _) = engine.remove_router(id);
        Some(Undo::Removed(c))
    }

    fn shift(engine: &mut LocalSearch<'_>, rng: &mut StdRng) -> Option<Undo> {
        if engine.routers().is_empty() {
            return None;
        }
        let id = RouterId::new(rng.gen_range(0..engine.routers().len()));
        let &action = Action::ALL.choose(rng)?;
        engine.apply_move(id, action).ok()?;
        Some(Undo::Moved(id, action))
    }

    /// Applies one random neighbour move. Falls back to the other kinds when
    /// the drawn one is impossible.
    fn neighbour(engine: &mut LocalSearch<'_>, rng: &mut StdRng) -> Option<Undo> {
        let start = rng.gen_range(0..NEIGHBOURS.len());
        (0..NEIGHBOURS.len()).find_map(|k| match NEIGHBOURS[(start + k) % NEIGHBOURS.len()] {
            Neighbour::SmartAdd => Self::smart_add(engine, rng),
            Neighbour::Remove => Self::remove(engine, rng),
            Neighbour::Move => Self::shift(engine, rng),
        })
    }

    fn undo(engine: &mut LocalSearch<'_>, undo: Undo) {
        match undo {
            Undo::Added(id) => {
                engine.remove_router(id);
            }
            Undo::Removed(c) => {
                let restored = engine.add_router(c);
                debug_assert!(restored.is_ok(), "removed cell {c} was taken before undo");
            }
            Undo::Moved(id, action) => {
                let restored = engine.apply_move(id, action.opposite());
                debug_assert!(restored.is_ok(), "router {id:?} cannot step back {action:?}");
            }
        }
    }
}

impl Optimizer for Annealer {
    fn name(&self) -> &'static str {
        "annealing"
    }

    fn optimize(&mut self, instance: &Instance, rng: &mut StdRng) -> Outcome {
        let p = &self.params;
        let count = p.initial_routers.unwrap_or_else(|| instance.default_router_count());
        let mut evaluator = FitnessEvaluator::new(instance);
        let start = random_placement(&instance.grid, count, rng);
        let mut engine = LocalSearch::new(&instance.grid, instance.router_range, start);

        let mut current: Fitness = evaluator.evaluate_with_coverage(engine.routers().as_slice(), engine.covered());
        let mut best = Outcome {
            routers: engine.routers().clone(),
            fitness: current,
            iterations: 0,
        };
        let mut temperature = p.initial_temperature;
        let mut accepted_worse = 0usize;

        log::info!(
            "Annealing: {} iterations, T0 {:.1}, cooling {}, {} initial routers",
            p.iterations,
            p.initial_temperature,
            p.cooling_rate,
            count
        );

        for i in 0..p.iterations {
            if let Some(undo) = Self::neighbour(&mut engine, rng) {
                let candidate = evaluator.evaluate_with_coverage(engine.routers().as_slice(), engine.covered());
                let delta = (candidate.score - current.score) as f64;

                if accept(delta, temperature, p.sigma, rng) {
                    if delta < 0.0 {
                        accepted_worse += 1;
                    }
                    current = candidate;
                    if current.beats(&best.fitness) {
                        best.routers = engine.routers().clone();
                        best.fitness = current;
                    }
                } else {
                    Self::undo(&mut engine, undo);
                }
            }

            if i % 500 == 0 {
                log::debug!(
                    "Iter {}: T={:.3} score={} routers={} covered={}",
                    i,
                    temperature,
                    current.score,
                    current.routers,
                    current.covered
                );
            }
            temperature = (temperature * p.cooling_rate).max(p.min_temperature);
        }

        log::info!(
            "Annealing done: best score {} ({} routers), {} worse moves accepted",
            best.fitness.score,
            best.fitness.routers,
            accepted_worse
        );
        best.iterations = p.iterations;
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use wifiplan_common::layout::grid::Grid;

    #[test]
    fn improvements_always_pass() {
        let mut rng = StdRng::seed_from_u64(0);
        for t in [0.0, 1.0, 100.0] {
            assert!(accept(5.0, t, 1.0, &mut rng));
            assert!(accept(0.0, t, 1.0, &mut rng));
        }
        assert!(!accept(-1.0, 0.0, 1.0, &mut rng));
    }

    #[test]
    fn hot_accepts_more_than_cold() {
        let mut rng = StdRng::seed_from_u64(42);
        let trials = 2000;
        let hot = (0..trials).filter(|_| accept(-10.0, 100.0, 1.0, &mut rng)).count();
        let cold = (0..trials).filter(|_| accept(-10.0, 1.0, 1.0, &mut rng)).count();
        assert!(hot > trials * 8 / 10);
        assert!(cold < trials / 100);
    }

    #[test]
    fn best_is_never_worse_than_the_start() {
        let grid = Grid::from_rows(&vec![".".repeat(15); 8]).unwrap();
        let instance = Instance::new(grid, 2, 30, 1, 300, Coord::new(0, 0)).unwrap();
        let params = AnnealingParams {
            iterations: 400,
            initial_temperature: 2000.0,
            cooling_rate: 0.99,
            min_temperature: 0.01,
            sigma: 1.0,
            initial_routers: Some(2),
        };

        let mut rng = StdRng::seed_from_u64(17);
        let start = random_placement(&instance.grid, 2, &mut StdRng::seed_from_u64(17));
        let start_fitness = FitnessEvaluator::new(&instance).evaluate(start.as_slice());

        let outcome = Annealer::new(params).optimize(&instance, &mut rng);
        assert!(!start_fitness.beats(&outcome.fitness));
        assert_eq!(outcome.iterations, 400);

        let rescored = FitnessEvaluator::new(&instance).evaluate(outcome.routers.as_slice());
        assert_eq!(rescored, outcome.fitness);
    }

    #[test]
    fn undo_restores_the_engine() {
        let grid = Grid::from_rows(&vec![".".repeat(9); 9]).unwrap();
        let instance = Instance::new(grid, 1, 1, 1, 100, Coord::new(0, 0)).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let start = random_placement(&instance.grid, 3, &mut rng);
        let mut engine = LocalSearch::new(&instance.grid, 1, start);

        for _ in 0..50 {
            let covered = engine.covered();
            let before = engine.routers().sorted();
            let undo = Annealer::neighbour(&mut engine, &mut rng).unwrap();
            Annealer::undo(&mut engine, undo);
            assert_eq!(engine.routers().sorted(), before);
            assert_eq!(engine.covered(), covered);
        }
    }
}
