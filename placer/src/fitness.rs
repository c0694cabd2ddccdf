use crate::coverage::geometry::coverage_count;
use wifiplan_backbone::{Backbone, BackboneBuilder};
use wifiplan_common::geom::coord::Coord;
use wifiplan_common::layout::instance::Instance;

/// Points per covered cell. Large enough that coverage always dominates the
/// leftover budget term.
pub const COVERAGE_WEIGHT: i64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fitness {
    pub score: i64,
    pub covered: usize,
    pub routers: usize,
    pub backbone_len: usize,
    pub cost: i64,
    pub over_budget: bool,
}

impl Fitness {
    pub fn from_parts(instance: &Instance, covered: usize, routers: usize, backbone_len: usize) -> Self {
        let cost = instance.total_cost(routers, backbone_len);
        Self {
            score: COVERAGE_WEIGHT * covered as i64 + (instance.budget - cost),
            covered,
            routers,
            backbone_len,
            cost,
            over_budget: !instance.is_within_budget(routers, backbone_len),
        }
    }

    /// Strictly better score and still within budget.
    pub fn improves_on(&self, other: &Fitness) -> bool {
        !self.over_budget && self.score > other.score
    }

    /// Ranking used to keep the best solution seen: anything within budget
    /// beats anything over it, then higher score wins.
    pub fn beats(&self, other: &Fitness) -> bool {
        match (self.over_budget, other.over_budget) {
            (false, true) => true,
            (true, false) => false,
            _ => self.score > other.score,
        }
    }
}

/// Scores router sets. Owns a backbone builder so repeated evaluations reuse
/// its buffers; create one per thread.
pub struct FitnessEvaluator<'a> {
    instance: &'a Instance,
    builder: BackboneBuilder,
}

impl<'a> FitnessEvaluator<'a> {
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            builder: BackboneBuilder::for_instance(instance),
        }
    }

    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    pub fn backbone(&mut self, routers: &[Coord]) -> Backbone {
        self.builder.build(self.instance.backbone_origin, routers)
    }

    pub fn evaluate(&mut self, routers: &[Coord]) -> Fitness {
        let covered = coverage_count(routers, &self.instance.grid, self.instance.router_range);
        self.evaluate_with_coverage(routers, covered)
    }

    /// Same as `evaluate` for callers that already track the covered count.
    pub fn evaluate_with_coverage(&mut self, routers: &[Coord], covered: usize) -> Fitness {
        let backbone_len = self.backbone(routers).len();
        Fitness::from_parts(self.instance, covered, routers.len(), backbone_len)
    }
}
