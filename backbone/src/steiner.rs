use crate::algo::astar::AStar;
use crate::algo::mst::{Subgraph, spanning_tree};
use crate::grid::{BackboneGrid, Lattice};
use crate::tree::Backbone;
use std::collections::{HashMap, HashSet, VecDeque};
use wifiplan_common::geom::coord::Coord;
use wifiplan_common::layout::instance::Instance;

/// Approximate Steiner tree builder.
///
/// Routers are joined to the origin one at a time with A*; every edge a path
/// uses becomes free for later paths, so they merge into a shared trunk. The
/// used edges are then reduced to a spanning tree and dangling non-terminal
/// branches are cut off.
///
/// The builder keeps its lattice and search buffers between calls, so one
/// instance per thread is enough for any number of evaluations.
pub struct BackboneBuilder {
    lattice: Lattice,
    solver: AStar,
}

impl BackboneBuilder {
    pub fn new(height: u32, width: u32, unit_cost: u64) -> Self {
        Self {
            lattice: Lattice::new(height, width, unit_cost),
            solver: AStar::new(),
        }
    }

    pub fn for_instance(instance: &Instance) -> Self {
        Self::new(
            instance.grid.height(),
            instance.grid.width(),
            instance.backbone_cost.max(1) as u64,
        )
    }

    pub fn build(&mut self, origin: Coord, routers: &[Coord]) -> Backbone {
        self.lattice.reset();

        let mut ordered: Vec<Coord> = routers.to_vec();
        ordered.sort_unstable();
        ordered.dedup();

        for &router in &ordered {
            if router == origin {
                continue;
            }
            match self.solver.find_path(&self.lattice, origin, router) {
                Some(route) => {
                    for slot in route.edges {
                        self.lattice.mark_used(slot);
                    }
                }
                None => log::warn!("No backbone path from {} to router {}", origin, router),
            }
        }

        let used = self.lattice.used_edges();
        if used.is_empty() {
            return Backbone::new(origin, Vec::new());
        }

        // Compact ids for every node touched by a used edge.
        let mut ids: HashMap<Coord, u32> = HashMap::with_capacity(used.len() + 1);
        let mut coords: Vec<Coord> = Vec::with_capacity(used.len() + 1);
        let mut id_of = |c: Coord| -> u32 {
            *ids.entry(c).or_insert_with(|| {
                coords.push(c);
                (coords.len() - 1) as u32
            })
        };
        let root = id_of(origin);
        let pairs: Vec<(u32, u32)> = used.iter().map(|&(a, b)| (id_of(a), id_of(b))).collect();

        let mut graph = Subgraph::with_nodes(coords.len());
        for &(a, b) in &pairs {
            graph.add_edge(a, b, 0);
        }

        let tree = spanning_tree(&graph, root);
        let terminals: HashSet<Coord> = ordered.iter().copied().chain([origin]).collect();
        let kept = prune_dangling(&coords, &tree, &terminals);

        log::debug!(
            "Backbone: {} routers, {} used edges, {} tree edges, {} after pruning",
            ordered.len(),
            used.len(),
            tree.len(),
            kept.len()
        );

        Backbone::new(origin, kept)
    }
}

/// Repeatedly strips degree-1 nodes that are not terminals.
fn prune_dangling(
    coords: &[Coord],
    tree: &[(u32, u32)],
    terminals: &HashSet<Coord>,
) -> Vec<(Coord, Coord)> {
    let n = coords.len();
    let mut adjacency: Vec<Vec<u32>> = vec![Vec::new(); n];
    for &(a, b) in tree {
        adjacency[a as usize].push(b);
        adjacency[b as usize].push(a);
    }
    let mut degree: Vec<usize> = adjacency.iter().map(Vec::len).collect();
    let mut removed = vec![false; n];

    let is_leaf = |v: usize, degree: &[usize]| degree[v] == 1 && !terminals.contains(&coords[v]);
    let mut queue: VecDeque<usize> = (0..n).filter(|&v| is_leaf(v, &degree)).collect();

    while let Some(v) = queue.pop_front() {
        if removed[v] || !is_leaf(v, &degree) {
            continue;
        }
        removed[v] = true;
        degree[v] = 0;
        for &u in &adjacency[v] {
            let u = u as usize;
            if removed[u] {
                continue;
            }
            degree[u] -= 1;
            if is_leaf(u, &degree) {
                queue.push_back(u);
            }
        }
    }

    tree.iter()
        .filter(|&&(a, b)| !removed[a as usize] && !removed[b as usize])
        .map(|&(a, b)| (coords[a as usize], coords[b as usize]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn router_on_origin_needs_no_cable() {
        let mut builder = BackboneBuilder::new(5, 5, 1);
        let backbone = builder.build(Coord::new(2, 2), &[Coord::new(2, 2)]);
        assert!(backbone.is_empty());
        assert_eq!(backbone.len(), 0);
    }

    #[test]
    fn collinear_routers_share_the_trunk() {
        let mut builder = BackboneBuilder::new(6, 6, 1);
        let backbone = builder.build(Coord::new(0, 0), &[Coord::new(4, 4), Coord::new(2, 2)]);
        assert_eq!(backbone.len(), 4);
    }

    #[test]
    fn single_router_costs_its_chebyshev_distance() {
        let mut builder = BackboneBuilder::new(10, 12, 3);
        let origin = Coord::new(9, 0);
        let router = Coord::new(2, 5);
        let backbone = builder.build(origin, &[router]);
        assert_eq!(backbone.len(), origin.chebyshev(router) as usize);
        assert_eq!(backbone.cost(3), 21);
    }

    #[test]
    fn pruning_drops_stubs_but_keeps_terminals() {
        // 0 - 1 - 2 - 3 with a stub 1 - 4; terminals 0 and 3.
        let coords: Vec<Coord> = (0..5).map(|c| Coord::new(0, c)).collect();
        let tree = vec![(0, 1), (1, 2), (2, 3), (1, 4)];
        let terminals: HashSet<Coord> = [coords[0], coords[3]].into_iter().collect();
        let kept = prune_dangling(&coords, &tree, &terminals);
        assert_eq!(kept.len(), 3);
        assert!(!kept.iter().any(|&(a, b)| a == coords[4] || b == coords[4]));

        // A chain of non-terminals hanging off a terminal disappears entirely.
        let tree = vec![(0, 1), (1, 2), (2, 4)];
        let terminals: HashSet<Coord> = [coords[0]].into_iter().collect();
        assert!(prune_dangling(&coords, &tree, &terminals).is_empty());
    }

    #[test]
    fn rebuilding_starts_from_a_clean_lattice() {
        let mut builder = BackboneBuilder::new(8, 8, 1);
        let far = builder.build(Coord::new(0, 0), &[Coord::new(7, 7), Coord::new(0, 7)]);
        let near = builder.build(Coord::new(0, 0), &[Coord::new(1, 1)]);
        assert!(far.len() >= 7);
        assert_eq!(near.len(), 1);
    }
}
