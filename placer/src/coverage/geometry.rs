use wifiplan_common::geom::coord::Coord;
use wifiplan_common::geom::rect::CellRect;
use wifiplan_common::layout::grid::{CellKind, Grid};

/// Raw reach of a router: the Chebyshev square of `radius`, clipped to the grid.
#[inline]
pub fn footprint(grid: &Grid, router: Coord, radius: u32) -> CellRect {
    CellRect::around(router, radius, grid.height(), grid.width())
}

/// Cells an unobstructed router covers away from the edges.
#[inline]
pub fn footprint_area(radius: u32) -> usize {
    let side = 2 * radius as usize + 1;
    side * side
}

/// Cells of `raw` the router at `router` actually lights up.
///
/// A cell is visible when the bounding rectangle spanned by it and the router
/// holds no wall at all. Wall cells sit inside their own rectangle, so they are
/// never visible; void cells are dropped outright.
pub fn visible_footprint(grid: &Grid, router: Coord, raw: &CellRect) -> Vec<Coord> {
    raw.cells()
        .filter(|&c| is_visible(grid, router, c))
        .collect()
}

#[inline]
pub fn is_visible(grid: &Grid, router: Coord, c: Coord) -> bool {
    grid.kind(c) != CellKind::Void && grid.walls_in(&CellRect::spanning(router, c)) == 0
}

/// `true` for every cell some router covers.
pub fn covered_mask(routers: &[Coord], grid: &Grid, radius: u32) -> Vec<bool> {
    let mut mask = vec![false; grid.len()];
    for &router in routers {
        let raw = footprint(grid, router, radius);
        for c in raw.cells() {
            if is_visible(grid, router, c) {
                mask[grid.index(c)] = true;
            }
        }
    }
    mask
}

/// Size of the union of all visible footprints.
pub fn coverage_count(routers: &[Coord], grid: &Grid, radius: u32) -> usize {
    covered_mask(routers, grid, radius).iter().filter(|&&b| b).count()
}

/// Target cells no router reaches, row-major.
pub fn uncovered_targets(routers: &[Coord], grid: &Grid, radius: u32) -> Vec<Coord> {
    let mask = covered_mask(routers, grid, radius);
    grid.targets().filter(|&c| !mask[grid.index(c)]).collect()
}
