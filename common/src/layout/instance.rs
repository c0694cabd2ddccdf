use super::grid::Grid;
use crate::error::LayoutError;
use crate::geom::coord::Coord;

/// One placement problem: the building plus the cost model. Read-only for
/// the whole run.
#[derive(Clone, Debug)]
pub struct Instance {
    pub grid: Grid,
    pub router_range: u32,
    pub router_cost: i64,
    pub backbone_cost: i64,
    pub budget: i64,
    pub backbone_origin: Coord,
}

impl Instance {
    pub fn new(
        grid: Grid,
        router_range: u32,
        router_cost: i64,
        backbone_cost: i64,
        budget: i64,
        backbone_origin: Coord,
    ) -> Result<Self, LayoutError> {
        if !grid.contains(backbone_origin) {
            return Err(LayoutError::OriginOutOfBounds {
                origin: backbone_origin,
                height: grid.height(),
                width: grid.width(),
            });
        }
        Ok(Self {
            grid,
            router_range,
            router_cost,
            backbone_cost,
            budget,
            backbone_origin,
        })
    }

    /// Starting router count used by random initialisation: enough
    /// `range x range` squares to tile the target area, plus one.
    pub fn default_router_count(&self) -> usize {
        let r = self.router_range.max(1) as usize;
        (self.grid.target_count() / (r * r) + 1).min(self.grid.target_count())
    }

    pub fn total_cost(&self, routers: usize, backbone_len: usize) -> i64 {
        routers as i64 * self.router_cost + backbone_len as i64 * self.backbone_cost
    }

    pub fn is_within_budget(&self, routers: usize, backbone_len: usize) -> bool {
        self.total_cost(routers, backbone_len) <= self.budget
    }
}
