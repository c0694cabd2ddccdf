use crate::geom::coord::Coord;
use crate::layout::grid::CellKind;
use crate::layout::instance::Instance;
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

/// Verifies that every router sits on its own in-bounds target cell and that
/// the placement fits the budget once the backbone is known.
pub fn run_placement_check(
    instance: &Instance,
    routers: &[Coord],
    backbone_len: usize,
) -> Result<(), String> {
    log::info!("Starting Placement Verification...");
    let valid = AtomicBool::new(true);
    let grid = &instance.grid;

    routers.par_iter().enumerate().for_each(|(i, &c)| match grid.get(c) {
        None => {
            log::error!("FAIL: Router {} at {} is out of bounds.", i, c);
            valid.store(false, Ordering::Relaxed);
        }
        Some(CellKind::Target) => {}
        Some(kind) => {
            log::error!("FAIL: Router {} at {} sits on a {:?} cell.", i, c, kind);
            valid.store(false, Ordering::Relaxed);
        }
    });

    let mut seen = HashSet::with_capacity(routers.len());
    for &c in routers {
        if !seen.insert(c) {
            log::error!("FAIL: Two routers share cell {}.", c);
            valid.store(false, Ordering::Relaxed);
        }
    }

    let cost = instance.total_cost(routers.len(), backbone_len);
    if cost > instance.budget {
        log::warn!(
            "Placement costs {} which exceeds the budget of {}.",
            cost,
            instance.budget
        );
    }

    if valid.load(Ordering::Relaxed) {
        log::info!("\x1b[32mPASS\x1b[0m: Placement is valid.");
        Ok(())
    } else {
        Err("Placement verification failed.".to_string())
    }
}
