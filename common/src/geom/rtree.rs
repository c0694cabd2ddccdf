use super::coord::Coord;
use rstar::RTree;
use rstar::primitives::GeomWithData;

type IndexedPoint = GeomWithData<[i64; 2], Coord>;

/// Nearest-router lookups over a changing set of router positions.
pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
}

fn entry(c: Coord) -> IndexedPoint {
    GeomWithData::new([c.row as i64, c.col as i64], c)
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    pub fn bulk_load(coords: &[Coord]) -> Self {
        Self {
            tree: RTree::bulk_load(coords.iter().map(|&c| entry(c)).collect()),
        }
    }

    pub fn insert(&mut self, c: Coord) {
        self.tree.insert(entry(c));
    }

    pub fn remove(&mut self, c: Coord) -> bool {
        self.tree.remove(&entry(c)).is_some()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Closest indexed position to `c` (Euclidean).
    pub fn nearest(&self, c: Coord) -> Option<Coord> {
        self.tree
            .nearest_neighbor(&[c.row as i64, c.col as i64])
            .map(|item| item.data)
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_follows_removals() {
        let mut index = SpatialIndex::bulk_load(&[Coord::new(0, 0), Coord::new(5, 5)]);
        assert_eq!(index.nearest(Coord::new(1, 1)), Some(Coord::new(0, 0)));
        assert!(index.remove(Coord::new(0, 0)));
        assert_eq!(index.nearest(Coord::new(1, 1)), Some(Coord::new(5, 5)));
        assert!(!index.remove(Coord::new(0, 0)));
        assert_eq!(index.len(), 1);
    }
}
