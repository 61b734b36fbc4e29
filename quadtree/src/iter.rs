use crate::layout::FinalizedTree;
use crate::region::{Item, Region, ITEM_SIZE};

/// One inner node on the descent path.
struct Frame {
    child_offsets: [u64; 4],
    sub_regions: [Region; 4],
    next_child: u8,
    /// Set once this node's own region is already known to lie entirely
    /// inside the query region, so descendants skip per-item checks.
    within_parent: bool,
}

struct LeafCursor<'a> {
    bytes: &'a [u8],
    n: u64,
    pos: u64,
    within_parent: bool,
}

/// Yields every item in a [`FinalizedTree`] whose coordinates fall
/// within a query [`Region`], inclusive of its boundary.
pub struct QueryIter<'a> {
    tree: &'a FinalizedTree,
    query: Region,
    stack: Vec<Frame>,
    leaf: Option<LeafCursor<'a>>,
}

impl<'a> QueryIter<'a> {
    pub(crate) fn new(tree: &'a FinalizedTree, query: Region) -> Self {
        let root_region = tree.region();
        let root_frame = Frame {
            child_offsets: tree.read_inner(FinalizedTree::ROOT_OFFSET),
            sub_regions: root_region.sub_regions(),
            next_child: 0,
            within_parent: false,
        };

        let mut it = QueryIter {
            tree,
            query,
            stack: vec![root_frame],
            leaf: None,
        };
        it.descend();
        it
    }

    fn descend(&mut self) {
        loop {
            let Some(frame) = self.stack.last_mut() else {
                self.leaf = None;
                return;
            };

            if frame.next_child >= 4 {
                self.stack.pop();
                if let Some(parent) = self.stack.last_mut() {
                    parent.next_child += 1;
                }
                continue;
            }

            let idx = frame.next_child as usize;
            let child_offset = frame.child_offsets[idx];
            let child_region = frame.sub_regions[idx];

            if child_offset == 0 || !child_region.overlaps(&self.query) {
                frame.next_child += 1;
                continue;
            }

            let child_within = frame.within_parent || self.query.contains(&child_region);

            if self.tree.offset_is_inner(child_offset) {
                let child_offsets = self.tree.read_inner(child_offset);
                let sub_regions = child_region.sub_regions();
                // `frame.next_child` deliberately stays put: it only
                // advances once this child's whole subtree is popped,
                // so backtracking resumes scanning from here.
                self.stack.push(Frame {
                    child_offsets,
                    sub_regions,
                    next_child: 0,
                    within_parent: child_within,
                });
            } else {
                let (n, bytes) = self.tree.read_leaf(child_offset);
                self.leaf = Some(LeafCursor {
                    bytes,
                    n,
                    pos: 0,
                    within_parent: child_within,
                });
                return;
            }
        }
    }
}

impl<'a> Iterator for QueryIter<'a> {
    type Item = Item;

    fn next(&mut self) -> Option<Item> {
        loop {
            let leaf = self.leaf.as_mut()?;

            while leaf.pos < leaf.n {
                let index = leaf.pos as usize;
                leaf.pos += 1;

                let start = index * ITEM_SIZE;
                let item = Item::from_le_bytes(&leaf.bytes[start..start + ITEM_SIZE]);

                if leaf.within_parent || self.query.contains_point(item.coords) {
                    return Some(item);
                }
            }

            // This leaf is exhausted: resume scanning its parent's
            // remaining children from the next slot.
            if let Some(top) = self.stack.last_mut() {
                top.next_child += 1;
            }
            self.leaf = None;
            self.descend();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Builder;

    fn build_grid(bucket_size: usize) -> FinalizedTree {
        let mut b = Builder::create(Region::new([0.0, 0.0], [10.0, 10.0]), bucket_size).unwrap();
        for i in 0..100u64 {
            let x = (i % 10) as f64;
            let y = (i / 10) as f64;
            b.insert(Item::new(i, x, y));
        }
        b.finalize(None).unwrap()
    }

    #[test]
    pub fn empty_tree_yields_nothing() {
        let b = Builder::create(Region::new([0.0, 0.0], [10.0, 10.0]), 4).unwrap();
        let finalized = b.finalize(None).unwrap();
        let found: Vec<_> = QueryIter::new(&finalized, finalized.region()).collect();
        assert!(found.is_empty());
    }

    #[test]
    pub fn single_point_two_regions() {
        let mut b = Builder::create(Region::new([0.0, 0.0], [10.0, 10.0]), 4).unwrap();
        b.insert(Item::new(42, 3.0, 3.0));
        let finalized = b.finalize(None).unwrap();

        let hit = QueryIter::new(&finalized, Region::new([0.0, 0.0], [5.0, 5.0]));
        assert_eq!(hit.map(|i| i.value).collect::<Vec<_>>(), vec![42]);

        let miss = QueryIter::new(&finalized, Region::new([6.0, 6.0], [9.0, 9.0]));
        assert_eq!(miss.count(), 0);
    }

    #[test]
    pub fn full_region_query_returns_everything() {
        let finalized = build_grid(4);
        let found: Vec<_> = QueryIter::new(&finalized, finalized.region()).collect();
        assert_eq!(found.len(), 100);
    }

    #[test]
    pub fn sub_region_query_matches_brute_force() {
        let finalized = build_grid(4);
        let query = Region::new([2.0, 2.0], [6.0, 6.0]);

        let mut expected: Vec<u64> = (0..100u64)
            .filter(|&i| {
                let x = (i % 10) as f64;
                let y = (i / 10) as f64;
                query.contains_point([x, y])
            })
            .collect();
        expected.sort_unstable();

        let mut got: Vec<u64> = QueryIter::new(&finalized, query).map(|i| i.value).collect();
        got.sort_unstable();

        assert_eq!(got, expected);
    }

    #[test]
    pub fn whole_tree_query_takes_within_parent_fast_path() {
        // With the query set to the tree's own bounding region, every
        // node's sub-region is trivially contained in it, so every item
        // returned should have gone through the `within_parent` branch.
        // We can't observe the flag directly, but we can check the
        // result matches a query region strictly larger than the tree's
        // own bounds (which still can only ever set `within_parent`,
        // never rely on `contains_point` rejecting anything at the
        // edges) returns the same set.
        let finalized = build_grid(2);
        let exact: Vec<u64> = {
            let mut v: Vec<_> = QueryIter::new(&finalized, finalized.region()).map(|i| i.value).collect();
            v.sort_unstable();
            v
        };
        let looser: Vec<u64> = {
            let mut v: Vec<_> = QueryIter::new(&finalized, Region::new([-1.0, -1.0], [11.0, 11.0]))
                .map(|i| i.value)
                .collect();
            v.sort_unstable();
            v
        };
        assert_eq!(exact, looser);
    }
}
