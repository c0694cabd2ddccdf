use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use wifiplan_common::geom::coord::Coord;
use wifiplan_common::layout::indices::EntryId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    pub coord: Coord,
    pub level: i64,
}

/// Loosely ordered coverage levels of target cells.
///
/// Entries live in an arena; `order` is a view sorted by level, highest
/// first, that is only refreshed on demand. `adjust` is O(1) and lets the view
/// go stale. Extraction walks two cursors inward from the ends of the view
/// without removing anything: `pop_highest` from the front, `pop_lowest` from
/// the back.
///
/// The view is rebuilt before an extraction once at least half as many edits
/// as there are entries have piled up since the last sort, or when the cursors
/// have met. The edit counter starts saturated, so a fresh queue always sorts
/// on first use.
#[derive(Clone, Debug)]
pub struct CoverageQueue {
    entries: Vec<Entry>,
    order: Vec<EntryId>,
    index: HashMap<Coord, EntryId>,
    high: usize,
    low: usize,
    edits: usize,
}

impl Default for CoverageQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CoverageQueue {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            order: Vec::new(),
            index: HashMap::new(),
            high: 0,
            low: 0,
            edits: usize::MAX,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registers `coord` at level 0. Re-adding a known cell is a no-op.
    pub fn add(&mut self, coord: Coord) -> EntryId {
        if let Some(&id) = self.index.get(&coord) {
            return id;
        }
        let id = EntryId::new(self.entries.len());
        self.entries.push(Entry { coord, level: 0 });
        self.order.push(id);
        self.index.insert(coord, id);
        self.edits = usize::MAX;
        id
    }

    pub fn level(&self, coord: Coord) -> Option<i64> {
        self.index.get(&coord).map(|id| self.entries[id.index()].level)
    }

    /// Shifts the level of `coord` without touching the order. Returns
    /// `false` for cells that were never added.
    pub fn adjust(&mut self, coord: Coord, delta: i64) -> bool {
        let Some(&id) = self.index.get(&coord) else {
            return false;
        };
        self.entries[id.index()].level += delta;
        self.edits = self.edits.saturating_add(1);
        true
    }

    fn is_stale(&self) -> bool {
        self.edits.saturating_mul(2) >= self.entries.len() || self.high >= self.low
    }

    /// Stable sort by level, highest first, and reset both cursors.
    pub fn force_reorder(&mut self) {
        let entries = &self.entries;
        self.order
            .sort_by(|a, b| entries[b.index()].level.cmp(&entries[a.index()].level));
        self.high = 0;
        self.low = self.order.len();
        self.edits = 0;
    }

    /// Randomises the view so the next sort breaks ties differently.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.order.shuffle(rng);
        self.edits = usize::MAX;
    }

    /// Approximately the most covered cell. Panics on an empty queue.
    pub fn pop_highest(&mut self) -> Entry {
        assert!(!self.entries.is_empty(), "pop_highest on an empty coverage queue");
        if self.is_stale() {
            self.force_reorder();
        }
        let id = self.order[self.high];
        self.high += 1;
        self.entries[id.index()]
    }

    /// Approximately the least covered cell. Panics on an empty queue.
    pub fn pop_lowest(&mut self) -> Entry {
        assert!(!self.entries.is_empty(), "pop_lowest on an empty coverage queue");
        if self.is_stale() {
            self.force_reorder();
        }
        self.low -= 1;
        let id = self.order[self.low];
        self.entries[id.index()]
    }
}
