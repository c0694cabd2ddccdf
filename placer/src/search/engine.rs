use super::moves::{Action, Move, Policy};
use crate::coverage::CoverageMap;
use crate::coverage::geometry::{footprint, footprint_area, visible_footprint};
use wifiplan_common::error::PlacementError;
use wifiplan_common::geom::coord::Coord;
use wifiplan_common::layout::grid::Grid;
use wifiplan_common::layout::indices::RouterId;
use wifiplan_common::layout::routers::RouterSet;

/// Incremental coverage bookkeeping for unit-step local search.
///
/// The engine owns a `RouterSet` and a `CoverageMap` kept in lockstep with it,
/// so scoring a move only touches the two footprints involved instead of the
/// whole grid. After an applied move the engine remembers the router that
/// moved and probes it first on the next step; a failed probe forgets it.
///
/// Not thread-safe; parallel explorers each clone their own engine.
#[derive(Clone, Debug)]
pub struct LocalSearch<'a> {
    grid: &'a Grid,
    radius: u32,
    routers: RouterSet,
    coverage: CoverageMap,
    cached: Option<RouterId>,
}

impl<'a> LocalSearch<'a> {
    pub fn new(grid: &'a Grid, radius: u32, routers: RouterSet) -> Self {
        let mut coverage = CoverageMap::new(grid);
        for c in routers.iter() {
            let cells = visible_footprint(grid, c, &footprint(grid, c, radius));
            coverage.add_cells(&cells);
        }
        Self {
            grid,
            radius,
            routers,
            coverage,
            cached: None,
        }
    }

    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn routers(&self) -> &RouterSet {
        &self.routers
    }

    pub fn into_routers(self) -> RouterSet {
        self.routers
    }

    pub fn coverage(&self) -> &CoverageMap {
        &self.coverage
    }

    /// Number of cells currently covered by at least one router.
    pub fn covered(&self) -> usize {
        self.coverage.covered()
    }

    pub fn is_fully_covered(&self) -> bool {
        self.coverage.covered() == self.grid.target_count()
    }

    pub fn cached(&self) -> Option<RouterId> {
        self.cached
    }

    pub fn clear_cache(&mut self) {
        self.cached = None;
    }

    /// Cells a router placed at `c` would cover.
    pub fn visible_cells(&self, c: Coord) -> Vec<Coord> {
        visible_footprint(self.grid, c, &footprint(self.grid, c, self.radius))
    }

    /// Where `action` would take router `id`, if that cell may hold it.
    pub fn destination(&self, id: RouterId, action: Action) -> Result<Coord, PlacementError> {
        let from = self.routers.get(id);
        let to = action.apply(from).ok_or(PlacementError::OffGrid { from })?;
        self.routers.check_position(self.grid, to)?;
        Ok(to)
    }

    /// Coverage change of moving router `id` one step, or `None` when the
    /// destination cannot hold a router. Leaves the state as it found it.
    pub fn evaluate_move(&mut self, id: RouterId, action: Action) -> Option<i64> {
        let to = self.destination(id, action).ok()?;
        let from = self.routers.get(id);

        let old = self.visible_cells(from);
        let new = self.visible_cells(to);

        let decreased = self.coverage.remove_cells(&old);
        let increase = self.coverage.zeros_in(&new);
        self.coverage.add_cells(&old);

        Some(increase as i64 - decreased as i64)
    }

    /// Moves router `id` for real and returns the coverage change.
    pub fn apply_move(&mut self, id: RouterId, action: Action) -> Result<i64, PlacementError> {
        let to = self.destination(id, action)?;
        let from = self.routers.relocate(self.grid, id, to)?;

        let lost = self.coverage.remove_cells(&self.visible_cells(from));
        let gained = self.coverage.add_cells(&self.visible_cells(to));
        self.cached = Some(id);

        Ok(gained as i64 - lost as i64)
    }

    fn scan_router(&mut self, id: RouterId, policy: Policy) -> Option<Move> {
        let mut best: Option<Move> = None;
        for action in Action::ALL {
            let Some(delta) = self.evaluate_move(id, action) else {
                continue;
            };
            if delta <= 0 {
                continue;
            }
            if policy == Policy::Greedy {
                return Some(Move { router: id, action, delta });
            }
            if best.is_none_or(|b| delta > b.delta) {
                best = Some(Move { router: id, action, delta });
            }
        }
        best
    }

    fn scan(&mut self, policy: Policy) -> Option<Move> {
        let mut best: Option<Move> = None;
        for id in self.routers.ids() {
            let Some(found) = self.scan_router(id, policy) else {
                continue;
            };
            if policy == Policy::Greedy {
                return Some(found);
            }
            if best.is_none_or(|b| found.delta > b.delta) {
                best = Some(found);
            }
        }
        best
    }

    /// First improving move, routers in order and actions in probe order.
    pub fn greedy_step(&mut self) -> Option<Move> {
        self.scan(Policy::Greedy)
    }

    /// Strictly largest improving move over every router and action.
    pub fn best_step(&mut self) -> Option<Move> {
        self.scan(Policy::Best)
    }

    /// Probes the last moved router first, then falls back to a full scan.
    pub fn cached_step(&mut self, policy: Policy) -> Option<Move> {
        if let Some(id) = self.cached {
            if let Some(found) = self.scan_router(id, policy) {
                return Some(found);
            }
            self.cached = None;
        }
        self.scan(policy)
    }

    /// Finds and applies one improving move.
    pub fn step(&mut self, policy: Policy) -> Option<Move> {
        let found = self.cached_step(policy)?;
        let delta = self.apply_move(found.router, found.action).ok()?;
        debug_assert_eq!(delta, found.delta);
        Some(found)
    }

    /// Places a router on `c`; returns its id and the number of newly covered
    /// cells.
    pub fn add_router(&mut self, c: Coord) -> Result<(RouterId, usize), PlacementError> {
        let id = self.routers.insert(self.grid, c)?;
        let gained = self.coverage.add_cells(&self.visible_cells(c));
        Ok((id, gained))
    }

    /// Removes router `id`; returns its position and the number of cells that
    /// lost their last router. Later ids shift down, so the move cache is
    /// dropped. Panics on a bad id.
    pub fn remove_router(&mut self, id: RouterId) -> (Coord, usize) {
        let c = self.routers.remove(id);
        let lost = self.coverage.remove_cells(&self.visible_cells(c));
        self.cached = None;
        (c, lost)
    }

    /// Tries currently uncovered cells from `candidates` as a new router
    /// site, keeping the one that covers the most new cells. Gives up after
    /// `patience` candidates in a row fail to beat the best so far, or stops
    /// early at a perfect footprint. The winner is applied.
    pub fn try_add_router(&mut self, candidates: &[Coord], patience: usize) -> Option<(RouterId, usize)> {
        let perfect = footprint_area(self.radius);
        let mut best: Option<(Coord, usize)> = None;
        let mut stale = 0;

        for &c in candidates {
            if self.coverage.is_covered(c) || self.routers.check_position(self.grid, c).is_err() {
                continue;
            }
            let gain = self.coverage.zeros_in(&self.visible_cells(c));
            if best.is_none_or(|(_, g)| gain > g) {
                best = Some((c, gain));
                stale = 0;
                if gain >= perfect {
                    break;
                }
            } else {
                stale += 1;
                if stale >= patience {
                    break;
                }
            }
        }

        let (c, _) = best?;
        self.add_router(c).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::geometry::coverage_count;

    fn open(h: usize, w: usize) -> Grid {
        Grid::from_rows(&vec![".".repeat(w); h]).unwrap()
    }

    #[test]
    fn evaluate_leaves_state_untouched() {
        let grid = open(8, 8);
        let routers = RouterSet::from_coords(&grid, [Coord::new(0, 0), Coord::new(4, 4)]).unwrap();
        let mut engine = LocalSearch::new(&grid, 1, routers);
        let before = engine.coverage().counts().to_vec();

        assert_eq!(engine.evaluate_move(RouterId::new(0), Action::Down), Some(2));
        assert_eq!(engine.evaluate_move(RouterId::new(0), Action::Up), None);
        assert_eq!(engine.coverage().counts(), &before[..]);
        assert_eq!(engine.cached(), None);
    }

    #[test]
    fn occupied_or_blocked_destinations_are_excluded() {
        let grid = Grid::from_rows(&["..#", "...", "-.."]).unwrap();
        let routers = RouterSet::from_coords(&grid, [Coord::new(0, 1), Coord::new(1, 1)]).unwrap();
        let mut engine = LocalSearch::new(&grid, 1, routers);

        assert_eq!(engine.evaluate_move(RouterId::new(0), Action::Right), None);
        assert_eq!(engine.evaluate_move(RouterId::new(0), Action::Down), None);
        assert!(matches!(
            engine.apply_move(RouterId::new(1), Action::Up),
            Err(PlacementError::Duplicate(_))
        ));
        assert_eq!(engine.routers().get(RouterId::new(1)), Coord::new(1, 1));
    }

    #[test]
    fn apply_matches_evaluate_and_tracks_from_scratch_count() {
        let grid = open(10, 10);
        let routers = RouterSet::from_coords(&grid, [Coord::new(0, 0), Coord::new(1, 1)]).unwrap();
        let mut engine = LocalSearch::new(&grid, 2, routers);

        let predicted = engine.evaluate_move(RouterId::new(1), Action::Right).unwrap();
        let realized = engine.apply_move(RouterId::new(1), Action::Right).unwrap();
        assert_eq!(predicted, realized);
        assert_eq!(engine.cached(), Some(RouterId::new(1)));
        assert_eq!(
            engine.covered(),
            coverage_count(engine.routers().as_slice(), &grid, 2)
        );
    }

    #[test]
    fn greedy_and_best_disagree_when_later_moves_are_better() {
        let grid = open(7, 7);
        // Router 1 sits right under router 0 on the top edge.
        let routers = RouterSet::from_coords(&grid, [Coord::new(0, 3), Coord::new(1, 3)]).unwrap();
        let mut engine = LocalSearch::new(&grid, 1, routers);

        let greedy = engine.greedy_step().unwrap();
        assert_eq!(greedy.router, RouterId::new(0));
        assert_eq!(greedy.action, Action::Left);
        assert_eq!(greedy.delta, 2);

        let best = engine.best_step().unwrap();
        assert_eq!(best.router, RouterId::new(1));
        assert_eq!(best.action, Action::Down);
        assert_eq!(best.delta, 3);
    }

    #[test]
    fn greedy_takes_left_before_vertical_moves() {
        let grid = open(9, 9);
        let routers = RouterSet::from_coords(&grid, [Coord::new(4, 4), Coord::new(4, 5)]).unwrap();
        let mut engine = LocalSearch::new(&grid, 1, routers);

        assert_eq!(engine.evaluate_move(RouterId::new(0), Action::Up), Some(2));
        assert_eq!(engine.evaluate_move(RouterId::new(0), Action::Down), Some(2));

        let greedy = engine.greedy_step().unwrap();
        assert_eq!(greedy.router, RouterId::new(0));
        assert_eq!(greedy.action, Action::Left);
        assert_eq!(greedy.delta, 3);
    }

    #[test]
    fn cached_router_is_probed_before_earlier_routers() {
        let grid = open(11, 11);
        let routers = RouterSet::from_coords(&grid, [Coord::new(4, 4), Coord::new(4, 5)]).unwrap();
        let mut engine = LocalSearch::new(&grid, 1, routers);
        assert_eq!(engine.apply_move(RouterId::new(1), Action::Right).unwrap(), 3);
        assert_eq!(engine.cached(), Some(RouterId::new(1)));

        // Router 0 still improves by moving left, so a plain scan picks it.
        let scanned = engine.greedy_step().unwrap();
        assert_eq!(scanned.router, RouterId::new(0));
        assert_eq!(scanned.action, Action::Left);

        let cached = engine.cached_step(Policy::Greedy).unwrap();
        assert_eq!(cached.router, RouterId::new(1));
        assert_eq!(cached.action, Action::Right);
        assert_eq!(cached.delta, 3);
        assert_eq!(engine.cached(), Some(RouterId::new(1)));
    }

    #[test]
    fn stuck_cached_router_is_forgotten_and_the_scan_takes_over() {
        let grid = open(11, 11);
        let routers = RouterSet::from_coords(
            &grid,
            [Coord::new(4, 4), Coord::new(4, 5), Coord::new(8, 8)],
        )
        .unwrap();
        let mut engine = LocalSearch::new(&grid, 1, routers);
        // A neutral move on the lone router caches it.
        assert_eq!(engine.apply_move(RouterId::new(2), Action::Down).unwrap(), 0);
        assert_eq!(engine.cached(), Some(RouterId::new(2)));

        let found = engine.cached_step(Policy::Greedy).unwrap();
        assert_eq!(engine.cached(), None);
        assert_eq!(found.router, RouterId::new(0));
        assert_eq!(found.action, Action::Left);
        assert_eq!(found.delta, 3);
    }

    #[test]
    fn step_climbs_until_no_improvement() {
        let grid = open(9, 9);
        let routers = RouterSet::from_coords(&grid, [Coord::new(4, 4), Coord::new(4, 5)]).unwrap();
        let mut engine = LocalSearch::new(&grid, 1, routers);

        let mut steps = 0;
        while engine.step(Policy::Best).is_some() {
            steps += 1;
            assert!(steps < 100);
        }
        assert_eq!(engine.covered(), 18);
        assert_eq!(engine.cached(), None);
    }

    #[test]
    fn try_add_prefers_the_biggest_gain() {
        let grid = open(9, 9);
        let routers = RouterSet::from_coords(&grid, [Coord::new(0, 0)]).unwrap();
        let mut engine = LocalSearch::new(&grid, 1, routers);

        let candidates = [Coord::new(0, 1), Coord::new(0, 3), Coord::new(4, 4), Coord::new(8, 8)];
        let (id, gain) = engine.try_add_router(&candidates, 10).unwrap();
        assert_eq!(engine.routers().get(id), Coord::new(4, 4));
        assert_eq!(gain, 9);
        assert_eq!(engine.covered(), 13);
    }

    #[test]
    fn try_add_with_nothing_uncovered_does_nothing() {
        let grid = open(3, 3);
        let routers = RouterSet::from_coords(&grid, [Coord::new(1, 1)]).unwrap();
        let mut engine = LocalSearch::new(&grid, 1, routers);
        let targets: Vec<Coord> = grid.targets().collect();
        assert!(engine.try_add_router(&targets, 5).is_none());
        assert_eq!(engine.routers().len(), 1);
    }

    #[test]
    fn remove_router_drops_exclusive_cells() {
        let grid = open(5, 5);
        let routers = RouterSet::from_coords(&grid, [Coord::new(1, 1), Coord::new(1, 2)]).unwrap();
        let mut engine = LocalSearch::new(&grid, 1, routers);
        assert_eq!(engine.covered(), 12);

        let (c, lost) = engine.remove_router(RouterId::new(0));
        assert_eq!(c, Coord::new(1, 1));
        assert_eq!(lost, 3);
        assert_eq!(engine.covered(), 9);
    }
}
