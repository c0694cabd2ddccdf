use crate::tree::Backbone;
use std::collections::{HashMap, HashSet, VecDeque};
use wifiplan_common::geom::coord::Coord;

/// Checks that the backbone is a tree rooted at its origin which reaches
/// every terminal and has no dangling non-terminal leaves.
pub fn verify_tree(backbone: &Backbone, terminals: &[Coord]) -> Result<(), String> {
    log::info!("Verifying backbone ({} edges)...", backbone.len());
    let origin = backbone.origin();

    if backbone.is_empty() {
        if let Some(t) = terminals.iter().find(|&&t| t != origin) {
            return Err(format!("Empty backbone cannot reach terminal {}", t));
        }
        log::info!("Backbone check: \x1b[32mPASS\x1b[0m (empty)");
        return Ok(());
    }

    let mut adjacency: HashMap<Coord, Vec<Coord>> = HashMap::new();
    let mut seen_edges: HashSet<(Coord, Coord)> = HashSet::new();
    for &(a, b) in backbone.edges() {
        if a == b {
            return Err(format!("Self-loop at {}", a));
        }
        if a.chebyshev(b) != 1 {
            return Err(format!("Edge {} - {} is not a unit segment", a, b));
        }
        let key = if a < b { (a, b) } else { (b, a) };
        if !seen_edges.insert(key) {
            return Err(format!("Duplicate edge {} - {}", a, b));
        }
        adjacency.entry(a).or_default().push(b);
        adjacency.entry(b).or_default().push(a);
    }

    if !adjacency.contains_key(&origin) {
        return Err(format!("Origin {} is not on the backbone", origin));
    }

    // Connected with |E| = |V| - 1 means no cycles.
    let mut visited: HashSet<Coord> = HashSet::with_capacity(adjacency.len());
    let mut queue = VecDeque::from([origin]);
    visited.insert(origin);
    while let Some(c) = queue.pop_front() {
        for &n in &adjacency[&c] {
            if visited.insert(n) {
                queue.push_back(n);
            }
        }
    }
    if visited.len() != adjacency.len() {
        return Err(format!(
            "Backbone is disconnected: {} of {} nodes reachable from origin",
            visited.len(),
            adjacency.len()
        ));
    }
    if backbone.len() != adjacency.len() - 1 {
        return Err(format!(
            "Backbone has a cycle: {} edges over {} nodes",
            backbone.len(),
            adjacency.len()
        ));
    }

    let terminal_set: HashSet<Coord> = terminals.iter().copied().chain([origin]).collect();
    for t in &terminal_set {
        if !adjacency.contains_key(t) {
            return Err(format!("Terminal {} is not connected", t));
        }
    }
    for (c, degree) in backbone.degrees() {
        if degree == 1 && !terminal_set.contains(&c) {
            return Err(format!("Dangling leaf {} is not a terminal", c));
        }
    }

    log::info!("Backbone check: \x1b[32mPASS\x1b[0m");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(row: u32, col: u32) -> Coord {
        Coord::new(row, col)
    }

    #[test]
    fn accepts_a_simple_path() {
        let bb = Backbone::new(c(0, 0), vec![(c(0, 0), c(1, 1)), (c(1, 1), c(2, 2))]);
        assert!(verify_tree(&bb, &[c(2, 2)]).is_ok());
    }

    #[test]
    fn empty_backbone_only_serves_the_origin() {
        let bb = Backbone::new(c(3, 3), Vec::new());
        assert!(verify_tree(&bb, &[c(3, 3)]).is_ok());
        assert!(verify_tree(&bb, &[c(3, 4)]).is_err());
    }

    #[test]
    fn rejects_cycles_and_gaps() {
        let cycle = Backbone::new(
            c(0, 0),
            vec![(c(0, 0), c(0, 1)), (c(0, 1), c(1, 1)), (c(1, 1), c(0, 0))],
        );
        assert!(verify_tree(&cycle, &[c(1, 1)]).unwrap_err().contains("cycle"));

        let split = Backbone::new(c(0, 0), vec![(c(0, 0), c(0, 1)), (c(3, 3), c(3, 4))]);
        assert!(verify_tree(&split, &[c(0, 1), c(3, 4)]).is_err());
    }

    #[test]
    fn rejects_dangling_leaves() {
        let bb = Backbone::new(c(0, 0), vec![(c(0, 0), c(0, 1)), (c(0, 1), c(0, 2))]);
        assert!(verify_tree(&bb, &[c(0, 1)]).unwrap_err().contains("Dangling"));
    }
}
