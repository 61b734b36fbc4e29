use debug_logs::debug_print;

use crate::error::{QuadtreeError, Result};
use crate::node::{BuilderNode, NodeId};
use crate::region::{all_coincident, Item, Region};

/// The root is always an inner node, even when empty.
pub struct Builder {
    pub(crate) arena: Vec<BuilderNode>,
    pub(crate) root: NodeId,
    pub(crate) region: Region,
    pub(crate) bucket_size: usize,
    pub(crate) size: u64,
    pub(crate) maxdepth: u32,
    pub(crate) ninners: u64,
    pub(crate) nleafs: u64,
}

impl Builder {
    pub fn create(region: Region, bucket_size: usize) -> Result<Builder> {
        if !region.is_sane() {
            return Err(QuadtreeError::InvalidRegion);
        }
        if bucket_size == 0 {
            return Err(QuadtreeError::InvalidBucketSize);
        }

        Ok(Builder {
            arena: vec![BuilderNode::Inner([None; 4])],
            root: NodeId(0),
            region,
            bucket_size,
            size: 0,
            maxdepth: 0,
            ninners: 1,
            nleafs: 0,
        })
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn len(&self) -> u64 {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// `item` must lie within the builder's region; violating that is
    /// undefined behavior in release builds.
    pub fn insert(&mut self, item: Item) {
        debug_assert!(
            self.region.contains_point(item.coords),
            "insert: item {:?} is outside the builder's region {:?}",
            item,
            self.region
        );

        self.size += 1;
        self.insert_from(self.root, self.region, 0, item);
    }

    /// Re-insertion after a split starts at the leaf's own depth, so the
    /// recursion sees the correct midpoints.
    fn insert_from(&mut self, mut node_id: NodeId, mut region: Region, mut depth: u32, item: Item) {
        loop {
            match &self.arena[node_id.0 as usize] {
                BuilderNode::Inner(children) => {
                    let (quadrant, sub_region) = region.classify(item.coords);
                    let idx = quadrant.index();

                    let child_id = match children[idx] {
                        Some(id) => id,
                        None => self.new_leaf(),
                    };

                    if let BuilderNode::Inner(children) = &mut self.arena[node_id.0 as usize] {
                        children[idx] = Some(child_id);
                    }

                    node_id = child_id;
                    region = sub_region;
                    depth += 1;
                    if depth > self.maxdepth {
                        self.maxdepth = depth;
                    }
                }
                BuilderNode::Leaf { items, capacity } => {
                    if items.len() >= *capacity {
                        if all_coincident(items) {
                            self.double_leaf_capacity(node_id);
                        } else {
                            self.split_leaf(node_id, region, depth);
                            continue;
                        }
                    }

                    if let BuilderNode::Leaf { items, .. } = &mut self.arena[node_id.0 as usize] {
                        items.push(item);
                    }
                    return;
                }
            }
        }
    }

    fn new_leaf(&mut self) -> NodeId {
        let id = NodeId(self.arena.len() as u32);
        self.arena.push(BuilderNode::Leaf {
            items: Vec::new(),
            capacity: self.bucket_size,
        });
        self.nleafs += 1;
        id
    }

    fn double_leaf_capacity(&mut self, node_id: NodeId) {
        if let BuilderNode::Leaf { capacity, .. } = &mut self.arena[node_id.0 as usize] {
            *capacity *= 2;
            debug_print!(format!("bucket of coincident items grown to capacity {}", capacity));
        }
    }

    fn split_leaf(&mut self, node_id: NodeId, region: Region, depth: u32) {
        let old = std::mem::replace(&mut self.arena[node_id.0 as usize], BuilderNode::Inner([None; 4]));
        let items = match old {
            BuilderNode::Leaf { items, .. } => items,
            BuilderNode::Inner(_) => unreachable!("split_leaf called on an inner node"),
        };

        self.ninners += 1;
        self.nleafs -= 1;

        debug_print!(format!("splitting leaf of {} items at depth {}", items.len(), depth));

        for item in items {
            self.insert_from(node_id, region, depth, item);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::node::BuilderNode;

    fn region_10() -> Region {
        Region::new([0.0, 0.0], [10.0, 10.0])
    }

    #[test]
    pub fn empty_builder_has_one_inner_root_no_leaves() {
        let b = Builder::create(region_10(), 4).unwrap();
        assert_eq!(b.ninners, 1);
        assert_eq!(b.nleafs, 0);
        assert_eq!(b.len(), 0);
    }

    #[test]
    pub fn rejects_degenerate_region() {
        let bad = Region { ne: [0.0, 0.0], sw: [10.0, 10.0] };
        assert!(matches!(Builder::create(bad, 4), Err(QuadtreeError::InvalidRegion)));
    }

    #[test]
    pub fn rejects_zero_bucket_size() {
        assert!(matches!(
            Builder::create(region_10(), 0),
            Err(QuadtreeError::InvalidBucketSize)
        ));
    }

    #[test]
    pub fn single_insert_creates_one_leaf_at_depth_one() {
        let mut b = Builder::create(region_10(), 4).unwrap();
        b.insert(Item::new(7, 3.0, 4.0));
        assert_eq!(b.ninners, 1);
        assert_eq!(b.nleafs, 1);
        assert_eq!(b.maxdepth, 1);
        assert_eq!(b.len(), 1);
    }

    #[test]
    pub fn coincident_points_grow_one_bucket_forever() {
        let mut b = Builder::create(region_10(), 1).unwrap();
        for i in 0..50 {
            b.insert(Item::new(i, 5.0, 5.0));
        }
        assert_eq!(b.ninners, 1);
        assert_eq!(b.nleafs, 1);
        assert_eq!(b.maxdepth, 1);
        assert_eq!(b.len(), 50);

        match &b.arena[1] {
            BuilderNode::Leaf { items, .. } => assert_eq!(items.len(), 50),
            BuilderNode::Inner(_) => panic!("expected a single oversized leaf"),
        }
    }

    #[test]
    pub fn overflow_with_distinct_points_splits_into_inner() {
        let mut b = Builder::create(region_10(), 2).unwrap();
        b.insert(Item::new(1, 1.0, 1.0));
        b.insert(Item::new(2, 9.0, 9.0));
        b.insert(Item::new(3, 1.0, 9.0));

        assert_eq!(b.ninners, 1);
        assert_eq!(b.nleafs, 3);
        assert_eq!(b.len(), 3);
    }
}
