use crate::grid::{BackboneGrid, EdgeSlot};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use wifiplan_common::geom::coord::Coord;

#[derive(Copy, Clone, Eq, PartialEq)]
struct State {
    f_score: u64,
    g_score: u64,
    index: u32,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| self.g_score.cmp(&other.g_score))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A path found by [`AStar::find_path`]: visited cells from start to end and
/// the lattice edges between them.
#[derive(Clone, Debug, Default)]
pub struct Route {
    pub cells: Vec<Coord>,
    pub edges: Vec<EdgeSlot>,
    pub cost: u64,
}

/// A* over a [`BackboneGrid`] with the Chebyshev distance as heuristic.
///
/// Search buffers are sized to the grid and reused between calls; a visit tag
/// makes resetting them O(1).
#[derive(Clone)]
pub struct AStar {
    parents: Vec<u32>,
    parent_edge: Vec<EdgeSlot>,
    g_score: Vec<u64>,
    visited_tag: Vec<u32>,
    current_tag: u32,
}

impl AStar {
    pub fn new() -> Self {
        Self {
            parents: Vec::new(),
            parent_edge: Vec::new(),
            g_score: Vec::new(),
            visited_tag: Vec::new(),
            current_tag: 1,
        }
    }

    fn ensure_capacity(&mut self, size: usize) {
        if size > self.parents.len() {
            self.parents.resize(size, u32::MAX);
            self.parent_edge.resize(size, 0);
            self.g_score.resize(size, u64::MAX);
            self.visited_tag.resize(size, 0);
        }
    }

    fn reset_window(&mut self) {
        self.current_tag = self.current_tag.wrapping_add(1);
        if self.current_tag == 0 {
            self.visited_tag.fill(0);
            self.current_tag = 1;
        }
    }

    /// Cheapest-looking path from `start` to `end`. Once some edges cost zero
    /// the heuristic may overestimate, so the result is an approximation.
    pub fn find_path<G: BackboneGrid + ?Sized>(
        &mut self,
        grid: &G,
        start: Coord,
        end: Coord,
    ) -> Option<Route> {
        let width = grid.width() as usize;
        let in_bounds = |c: Coord| c.row < grid.height() && c.col < grid.width();
        if !in_bounds(start) || !in_bounds(end) {
            return None;
        }

        self.ensure_capacity(width * grid.height() as usize);
        self.reset_window();

        let index = |c: Coord| c.row as usize * width + c.col as usize;
        let coord = |i: usize| Coord::new((i / width) as u32, (i % width) as u32);

        let mut heap = BinaryHeap::new();
        let start_idx = index(start);
        self.g_score[start_idx] = 0;
        self.visited_tag[start_idx] = self.current_tag;
        self.parents[start_idx] = u32::MAX;
        heap.push(State {
            f_score: heuristic(start, end),
            g_score: 0,
            index: start_idx as u32,
        });

        while let Some(State { g_score, index: idx, .. }) = heap.pop() {
            let curr = idx as usize;
            if g_score > self.g_score[curr] {
                continue;
            }
            let position = coord(curr);
            if position == end {
                return Some(self.reconstruct_path(curr, coord));
            }

            let (neighbors, n_count) = grid.neighbors(position);
            for &(neighbor, slot) in &neighbors[..n_count] {
                let tentative_g = g_score + grid.edge_cost(slot);
                let next = index(neighbor);

                if self.visited_tag[next] != self.current_tag || tentative_g < self.g_score[next] {
                    self.parents[next] = curr as u32;
                    self.parent_edge[next] = slot;
                    self.g_score[next] = tentative_g;
                    self.visited_tag[next] = self.current_tag;
                    heap.push(State {
                        f_score: tentative_g + heuristic(neighbor, end),
                        g_score: tentative_g,
                        index: next as u32,
                    });
                }
            }
        }
        None
    }

    fn reconstruct_path(&self, end: usize, coord: impl Fn(usize) -> Coord) -> Route {
        let mut cells = Vec::new();
        let mut edges = Vec::new();
        let mut curr = end;
        loop {
            cells.push(coord(curr));
            let parent = self.parents[curr];
            if parent == u32::MAX {
                break;
            }
            edges.push(self.parent_edge[curr]);
            curr = parent as usize;
        }
        cells.reverse();
        edges.reverse();
        Route {
            cells,
            edges,
            cost: self.g_score[end],
        }
    }
}

impl Default for AStar {
    fn default() -> Self {
        Self::new()
    }
}

#[inline(always)]
fn heuristic(a: Coord, end: Coord) -> u64 {
    a.chebyshev(end) as u64
}
