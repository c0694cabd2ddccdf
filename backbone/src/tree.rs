use std::collections::{BTreeSet, HashMap};
use wifiplan_common::geom::coord::Coord;

/// Pruned backbone: a tree of unit-length cable segments rooted at the origin.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Backbone {
    origin: Coord,
    edges: Vec<(Coord, Coord)>,
}

impl Backbone {
    pub fn new(origin: Coord, edges: Vec<(Coord, Coord)>) -> Self {
        Self { origin, edges }
    }

    pub fn origin(&self) -> Coord {
        self.origin
    }

    pub fn edges(&self) -> &[(Coord, Coord)] {
        &self.edges
    }

    /// Number of cable segments; multiplies the backbone unit cost.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn cost(&self, unit_cost: i64) -> i64 {
        self.edges.len() as i64 * unit_cost
    }

    /// Cells the cable passes through, row-major. Empty for an empty backbone.
    pub fn nodes(&self) -> BTreeSet<Coord> {
        self.edges.iter().flat_map(|&(a, b)| [a, b]).collect()
    }

    pub fn degrees(&self) -> HashMap<Coord, usize> {
        let mut degrees = HashMap::new();
        for &(a, b) in &self.edges {
            *degrees.entry(a).or_insert(0) += 1;
            *degrees.entry(b).or_insert(0) += 1;
        }
        degrees
    }
}
