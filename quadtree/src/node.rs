use crate::region::Item;

/// An index into a [`crate::builder::Builder`]'s node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(pub(crate) u32);

pub(crate) enum BuilderNode {
    /// Four child slots, indexed by `Quadrant::index()`.
    Inner([Option<NodeId>; 4]),
    /// A bucket of items. `capacity` starts at the tree's `bucket_size`
    /// and only grows, by doubling, when the bucket holds nothing but
    /// coincident points.
    Leaf { items: Vec<Item>, capacity: usize },
}
