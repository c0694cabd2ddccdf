use priority_queue::PriorityQueue;
use std::cmp::Reverse;

/// Compact undirected graph over node ids `0..n`.
#[derive(Clone, Debug, Default)]
pub struct Subgraph {
    adjacency: Vec<Vec<(u32, u64)>>,
}

impl Subgraph {
    pub fn with_nodes(n: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); n],
        }
    }

    pub fn add_edge(&mut self, a: u32, b: u32, weight: u64) {
        self.adjacency[a as usize].push((b, weight));
        self.adjacency[b as usize].push((a, weight));
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn degree(&self, v: u32) -> usize {
        self.adjacency[v as usize].len()
    }
}

/// Prim's minimum spanning tree of the component containing `root`, as
/// `(parent, child)` edges in the order children were attached.
pub fn spanning_tree(graph: &Subgraph, root: u32) -> Vec<(u32, u32)> {
    let n = graph.node_count();
    if (root as usize) >= n {
        return Vec::new();
    }

    let mut in_tree = vec![false; n];
    let mut best_parent = vec![u32::MAX; n];
    let mut queue: PriorityQueue<u32, Reverse<u64>> = PriorityQueue::new();
    let mut tree = Vec::with_capacity(n.saturating_sub(1));

    queue.push(root, Reverse(0));
    while let Some((v, _)) = queue.pop() {
        in_tree[v as usize] = true;
        let parent = best_parent[v as usize];
        if parent != u32::MAX {
            tree.push((parent, v));
        }

        for &(u, weight) in &graph.adjacency[v as usize] {
            if in_tree[u as usize] {
                continue;
            }
            let improves = match queue.get_priority(&u) {
                Some(&Reverse(current)) => weight < current,
                None => true,
            };
            if improves {
                best_parent[u as usize] = v;
                queue.push(u, Reverse(weight));
            }
        }
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breaks_cycles_with_the_heaviest_edge() {
        // 0-1 (1), 1-2 (1), 0-2 (5), 2-3 (2)
        let mut g = Subgraph::with_nodes(4);
        g.add_edge(0, 1, 1);
        g.add_edge(1, 2, 1);
        g.add_edge(0, 2, 5);
        g.add_edge(2, 3, 2);

        let tree = spanning_tree(&g, 0);
        assert_eq!(tree.len(), 3);
        assert!(!tree.contains(&(0, 2)));
        assert!(tree.contains(&(1, 2)));
    }

    #[test]
    fn only_spans_the_root_component() {
        let mut g = Subgraph::with_nodes(5);
        g.add_edge(0, 1, 0);
        g.add_edge(3, 4, 0);
        let tree = spanning_tree(&g, 0);
        assert_eq!(tree, vec![(0, 1)]);
        assert!(spanning_tree(&g, 9).is_empty());
    }
}
