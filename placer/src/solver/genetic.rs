use super::pool::evaluate_population;
use super::traits::{Optimizer, Outcome};
use crate::fitness::Fitness;
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use wifiplan_common::geom::coord::Coord;
use wifiplan_common::layout::grid::Grid;
use wifiplan_common::layout::instance::Instance;
use wifiplan_common::layout::routers::RouterSet;
use wifiplan_common::util::config::GeneticConfig;
use wifiplan_common::util::generator::random_placement;

#[derive(Clone, Debug)]
pub struct GeneticParams {
    pub population_size: usize,
    pub generations: usize,
    pub mutation_probability: f64,
    pub tournament_size: usize,
    /// Score each generation on the rayon pool.
    pub parallel: bool,
    pub initial_routers: Option<usize>,
}

impl GeneticParams {
    pub fn from_config(cfg: &GeneticConfig, initial_routers: Option<usize>) -> Self {
        Self {
            population_size: cfg.population_size.max(2),
            generations: cfg.generations,
            mutation_probability: cfg.mutation_probability.clamp(0.0, 1.0),
            tournament_size: cfg.tournament_size.max(1),
            parallel: cfg.parallel,
            initial_routers,
        }
    }
}

/// Index of the best of `size` individuals drawn with replacement.
fn tournament(fitness: &[Fitness], size: usize, rng: &mut StdRng) -> usize {
    let mut winner = rng.gen_range(0..fitness.len());
    for _ in 1..size {
        let challenger = rng.gen_range(0..fitness.len());
        if fitness[challenger].beats(&fitness[winner]) {
            winner = challenger;
        }
    }
    winner
}

fn fittest(fitness: &[Fitness]) -> usize {
    (1..fitness.len()).fold(0, |best, i| if fitness[i].beats(&fitness[best]) { i } else { best })
}

/// Child takes `left`'s routers west of a random column and `right`'s from
/// that column on.
pub fn crossover(grid: &Grid, left: &RouterSet, right: &RouterSet, rng: &mut StdRng) -> RouterSet {
    let split = rng.gen_range(0..grid.width());
    let mut child = RouterSet::new();
    let west = left.iter().filter(|c| c.col < split);
    let east = right.iter().filter(|c| c.col >= split);
    for c in west.chain(east) {
        let inserted = child.insert(grid, c);
        debug_assert!(inserted.is_ok(), "{c} inherited twice");
    }
    child
}

/// Toggles one random target cell in every row that has any.
pub fn mutate(grid: &Grid, rows: &[Vec<Coord>], routers: &mut RouterSet, rng: &mut StdRng) {
    for row in rows {
        let Some(&c) = row.choose(rng) else {
            continue;
        };
        match routers.position_of(c) {
            Some(id) => {
                routers.remove(id);
            }
            None => {
                let inserted = routers.insert(grid, c);
                debug_assert!(inserted.is_ok(), "{c} is a free target cell");
            }
        }
    }
}

/// Generational genetic algorithm with tournament selection and elitism.
pub struct GeneticSearch {
    params: GeneticParams,
}

impl GeneticSearch {
    pub fn new(params: GeneticParams) -> Self {
        Self { params }
    }
}

impl Optimizer for GeneticSearch {
    fn name(&self) -> &'static str {
        "genetic"
    }

    fn optimize(&mut self, instance: &Instance, rng: &mut StdRng) -> Outcome {
        let p = &self.params;
        let grid = &instance.grid;
        let count = p.initial_routers.unwrap_or_else(|| instance.default_router_count());

        let mut rows: Vec<Vec<Coord>> = vec![Vec::new(); grid.height() as usize];
        for c in grid.targets() {
            rows[c.row as usize].push(c);
        }

        let mut population: Vec<RouterSet> = (0..p.population_size)
            .map(|_| random_placement(grid, count, rng))
            .collect();
        let mut fitness = evaluate_population(instance, &population, p.parallel);

        log::info!(
            "Genetic search: population {}, {} generations, {} initial routers{}",
            p.population_size,
            p.generations,
            count,
            if p.parallel { ", parallel" } else { "" }
        );

        for generation in 0..p.generations {
            let elite = fittest(&fitness);
            let mut next = Vec::with_capacity(population.len());
            next.push(population[elite].clone());

            while next.len() < population.len() {
                let a = tournament(&fitness, p.tournament_size, rng);
                let b = tournament(&fitness, p.tournament_size, rng);
                let mut child = crossover(grid, &population[a], &population[b], rng);
                if rng.gen_bool(p.mutation_probability) {
                    mutate(grid, &rows, &mut child, rng);
                }
                next.push(child);
            }

            population = next;
            fitness = evaluate_population(instance, &population, p.parallel);

            if generation % 10 == 0 {
                let best = &fitness[fittest(&fitness)];
                log::info!(
                    "Generation {}: best score {} ({} routers, covered {})",
                    generation,
                    best.score,
                    best.routers,
                    best.covered
                );
            }
        }

        let winner = fittest(&fitness);
        Outcome {
            routers: population.swap_remove(winner),
            fitness: fitness[winner],
            iterations: p.generations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn open(h: usize, w: usize) -> Grid {
        Grid::from_rows(&vec![".".repeat(w); h]).unwrap()
    }

    #[test]
    fn crossover_splits_by_column() {
        let grid = open(4, 8);
        let left = RouterSet::from_coords(&grid, [Coord::new(0, 0), Coord::new(1, 7)]).unwrap();
        let right = RouterSet::from_coords(&grid, [Coord::new(2, 0), Coord::new(3, 7)]).unwrap();
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..20 {
            let child = crossover(&grid, &left, &right, &mut rng);
            // Column 7 is always east of the split; column 0 comes from one parent.
            assert!(child.contains(Coord::new(3, 7)));
            assert!(!child.contains(Coord::new(1, 7)));
            assert!(child.contains(Coord::new(0, 0)) ^ child.contains(Coord::new(2, 0)));
        }
    }

    #[test]
    fn crossover_keeps_every_inherited_router() {
        let grid = open(6, 6);
        let mut rng = StdRng::seed_from_u64(11);
        let left = random_placement(&grid, 8, &mut rng);
        let right = random_placement(&grid, 8, &mut rng);

        for _ in 0..30 {
            let child = crossover(&grid, &left, &right, &mut rng).sorted();
            let matches_a_split = (0..grid.width()).any(|split| {
                let mut expected: Vec<Coord> = left
                    .iter()
                    .filter(|c| c.col < split)
                    .chain(right.iter().filter(|c| c.col >= split))
                    .collect();
                expected.sort();
                expected == child
            });
            assert!(matches_a_split);
        }
    }

    #[test]
    fn mutation_touches_one_cell_per_row() {
        let grid = Grid::from_rows(&["..#", "###", "-.."]).unwrap();
        let mut rows: Vec<Vec<Coord>> = vec![Vec::new(); 3];
        for c in grid.targets() {
            rows[c.row as usize].push(c);
        }
        let mut routers = RouterSet::new();
        mutate(&grid, &rows, &mut routers, &mut StdRng::seed_from_u64(8));
        assert_eq!(routers.len(), 2);
        assert!(routers.iter().all(|c| grid.is_target(c)));
    }

    #[test]
    fn elitism_keeps_the_best_score() {
        let grid = open(8, 12);
        let instance = Instance::new(grid, 2, 40, 1, 400, Coord::new(0, 0)).unwrap();
        let params = GeneticParams {
            population_size: 8,
            generations: 1,
            mutation_probability: 0.5,
            tournament_size: 2,
            parallel: false,
            initial_routers: Some(2),
        };

        let mut rng = StdRng::seed_from_u64(21);
        let initial: Vec<RouterSet> = (0..8)
            .map(|_| random_placement(&instance.grid, 2, &mut rng))
            .collect();
        let initial_fitness = evaluate_population(&instance, &initial, false);
        let start_best = initial_fitness[fittest(&initial_fitness)];

        let outcome = GeneticSearch::new(params).optimize(&instance, &mut StdRng::seed_from_u64(21));
        assert!(!start_best.beats(&outcome.fitness));
    }

    #[test]
    fn tournament_of_everyone_finds_the_fittest() {
        let grid = open(3, 3);
        let instance = Instance::new(grid, 1, 1, 1, 100, Coord::new(0, 0)).unwrap();
        let fitness: Vec<Fitness> = [1, 7, 3]
            .iter()
            .map(|&covered| Fitness::from_parts(&instance, covered, 1, 0))
            .collect();
        assert_eq!(fittest(&fitness), 1);
        let mut rng = StdRng::seed_from_u64(0);
        let picks: Vec<usize> = (0..50).map(|_| tournament(&fitness, 60, &mut rng)).collect();
        assert!(picks.iter().all(|&i| i == 1));
    }
}
