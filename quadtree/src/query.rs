use crate::iter::QueryIter;
use crate::layout::FinalizedTree;
use crate::region::{Item, Region, ITEM_SIZE};

const INITIAL_CAPACITY: usize = 32;

/// `max_n == 0` means unlimited.
pub fn query_array(tree: &FinalizedTree, region: Region, max_n: usize) -> Vec<Item> {
    let mut out = Vec::with_capacity(INITIAL_CAPACITY.min(max_n.max(1)));
    for item in QueryIter::new(tree, region) {
        out.push(item);
        if max_n != 0 && out.len() >= max_n {
            break;
        }
    }
    out
}

/// Like [`query_array`], but batches a whole leaf's items in one go
/// when its region is already known to lie entirely within the query.
pub fn query_array_fast(tree: &FinalizedTree, region: Region, max_n: usize) -> Vec<Item> {
    let mut out = Vec::with_capacity(INITIAL_CAPACITY.min(max_n.max(1)));
    let root_region = tree.region();
    collect_fast(tree, FinalizedTree::ROOT_OFFSET, root_region, &region, false, max_n, &mut out);
    out
}

fn collect_fast(
    tree: &FinalizedTree,
    offset: u64,
    node_region: Region,
    query: &Region,
    within_parent: bool,
    max_n: usize,
    out: &mut Vec<Item>,
) {
    if max_n != 0 && out.len() >= max_n {
        return;
    }

    if tree.offset_is_inner(offset) {
        let children = tree.read_inner(offset);
        let sub_regions = node_region.sub_regions();
        for (child_offset, child_region) in children.into_iter().zip(sub_regions) {
            if max_n != 0 && out.len() >= max_n {
                return;
            }
            if child_offset == 0 || !child_region.overlaps(query) {
                continue;
            }
            let child_within = within_parent || query.contains(&child_region);
            collect_fast(tree, child_offset, child_region, query, child_within, max_n, out);
        }
        return;
    }

    let (n, bytes) = tree.read_leaf(offset);
    if within_parent {
        let take = if max_n == 0 {
            n as usize
        } else {
            (n as usize).min(max_n - out.len())
        };
        out.extend((0..take).map(|i| Item::from_le_bytes(&bytes[i * ITEM_SIZE..(i + 1) * ITEM_SIZE])));
    } else {
        for i in 0..n as usize {
            if max_n != 0 && out.len() >= max_n {
                return;
            }
            let item = Item::from_le_bytes(&bytes[i * ITEM_SIZE..(i + 1) * ITEM_SIZE]);
            if query.contains_point(item.coords) {
                out.push(item);
            }
        }
    }
}
