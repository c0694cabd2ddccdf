use crate::geom::coord::Coord;
use crate::layout::grid::{CellKind, Grid};
use crate::layout::instance::Instance;
use crate::layout::routers::RouterSet;
use rand::Rng;
use rand::seq::SliceRandom;

/// `count` distinct routers on random target cells. Asking for more routers
/// than there are targets fills every target.
pub fn random_placement<R: Rng + ?Sized>(grid: &Grid, count: usize, rng: &mut R) -> RouterSet {
    let targets: Vec<Coord> = grid.targets().collect();
    if count > targets.len() {
        log::warn!(
            "Requested {} routers but only {} target cells exist. Filling every target.",
            count,
            targets.len()
        );
    }

    let mut set = RouterSet::new();
    for &c in targets.choose_multiple(rng, count.min(targets.len())) {
        // Distinct target cells never fail validation.
        let _ = set.insert(grid, c);
    }
    set
}

pub struct BuildingParams {
    pub height: u32,
    pub width: u32,
    pub router_range: u32,
    /// Number of straight interior wall segments.
    pub walls: usize,
    /// Fraction of columns on the right edge that are outside the building.
    pub void_fraction: f64,
    pub router_cost: i64,
    pub backbone_cost: i64,
    pub budget: i64,
}

/// Random benchmark building: a target floor crossed by straight walls, with
/// a void strip on the right and the backbone entry in the top-left room.
pub fn generate_random_instance<R: Rng + ?Sized>(params: &BuildingParams, rng: &mut R) -> Instance {
    let height = params.height.max(1);
    let width = params.width.max(2);
    let void_cols = ((width as f64 * params.void_fraction.clamp(0.0, 0.9)) as u32).min(width - 1);
    let floor_w = width - void_cols;

    let mut cells = vec![CellKind::Target; height as usize * width as usize];
    let idx = |r: u32, c: u32| r as usize * width as usize + c as usize;

    for r in 0..height {
        for c in floor_w..width {
            cells[idx(r, c)] = CellKind::Void;
        }
    }

    for _ in 0..params.walls {
        let horizontal = rng.gen_bool(0.5);
        if horizontal {
            let r = rng.gen_range(0..height);
            let start = rng.gen_range(0..floor_w);
            let len = rng.gen_range(1..=floor_w - start);
            for c in start..start + len {
                cells[idx(r, c)] = CellKind::Wall;
            }
        } else {
            let c = rng.gen_range(0..floor_w);
            let start = rng.gen_range(0..height);
            let len = rng.gen_range(1..=height - start);
            for r in start..start + len {
                cells[idx(r, c)] = CellKind::Wall;
            }
        }
    }

    let origin = Coord::new(0, 0);
    cells[idx(origin.row, origin.col)] = CellKind::Target;

    log::info!(
        "Generated building {}x{} ({} wall segments, {} void columns)",
        height,
        width,
        params.walls,
        void_cols
    );

    let grid = match Grid::new(height, width, cells) {
        Ok(g) => g,
        Err(e) => unreachable!("generator produced a malformed grid: {e}"),
    };
    Instance {
        grid,
        router_range: params.router_range,
        router_cost: params.router_cost,
        backbone_cost: params.backbone_cost,
        budget: params.budget,
        backbone_origin: origin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn params() -> BuildingParams {
        BuildingParams {
            height: 12,
            width: 20,
            router_range: 2,
            walls: 6,
            void_fraction: 0.2,
            router_cost: 100,
            backbone_cost: 1,
            budget: 1_000,
        }
    }

    #[test]
    fn placement_only_uses_distinct_targets() {
        let mut rng = StdRng::seed_from_u64(7);
        let inst = generate_random_instance(&params(), &mut rng);
        let set = random_placement(&inst.grid, 15, &mut rng);
        assert_eq!(set.len(), 15);
        assert!(set.iter().all(|c| inst.grid.is_target(c)));
        let mut sorted = set.sorted();
        sorted.dedup();
        assert_eq!(sorted.len(), 15);
    }

    #[test]
    fn oversized_request_fills_every_target() {
        let grid = Grid::from_rows(&[".#.", "-.."]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let set = random_placement(&grid, 77, &mut rng);
        assert_eq!(set.len(), grid.target_count());
        assert!(random_placement(&grid, 0, &mut rng).is_empty());
    }

    #[test]
    fn generated_building_keeps_origin_and_void_strip() {
        let mut rng = StdRng::seed_from_u64(3);
        let inst = generate_random_instance(&params(), &mut rng);
        assert!(inst.grid.is_target(inst.backbone_origin));
        for r in 0..inst.grid.height() {
            assert_eq!(inst.grid.kind(Coord::new(r, 19)), CellKind::Void);
        }
    }
}
