//! Backbone network: connects every router to the backbone origin with an
//! approximate Steiner tree over an 8-connected lattice of grid cells.

pub mod algo;
pub mod check;
pub mod grid;
pub mod steiner;
pub mod tree;

pub use steiner::BackboneBuilder;
pub use tree::Backbone;

use wifiplan_common::layout::instance::Instance;
use wifiplan_common::geom::coord::Coord;

/// One-shot build for callers that do not keep a builder around.
pub fn build(instance: &Instance, routers: &[Coord]) -> Backbone {
    BackboneBuilder::for_instance(instance).build(instance.backbone_origin, routers)
}

pub fn backbone_length(instance: &Instance, routers: &[Coord]) -> usize {
    build(instance, routers).len()
}
