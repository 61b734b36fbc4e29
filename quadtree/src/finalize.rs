use std::path::Path;

use debug_logs::debug_print;

use crate::builder::Builder;
use crate::codec::dump;
use crate::error::Result;
use crate::layout::{FinalizedTree, HEADER_SIZE, INNER_SIZE, LEAF_HEADER_SIZE};
use crate::node::{BuilderNode, NodeId};
use crate::region::ITEM_SIZE;

impl Builder {
    pub fn finalize(self, path: Option<&Path>) -> Result<FinalizedTree> {
        let inners_bytes = self.ninners as usize * INNER_SIZE;
        let leaves_bytes = self.nleafs as usize * LEAF_HEADER_SIZE + self.size as usize * ITEM_SIZE;
        let total = HEADER_SIZE + inners_bytes + leaves_bytes;

        debug_print!(format!(
            "finalizing {} items into {} bytes ({} inners, {} leaves)",
            self.size, total, self.ninners, self.nleafs
        ));

        let mut buf = vec![0u8; total];
        write_header(&mut buf, &self);

        let mut cursor_inner = 0u64;
        let mut cursor_leaf = 0u64;
        write_node_into(&mut buf, &self.arena, self.root, &mut cursor_inner, &mut cursor_leaf, self.ninners);

        debug_assert_eq!(cursor_inner, self.ninners);
        debug_assert_eq!(cursor_leaf, leaves_bytes as u64);

        if let Some(path) = path {
            dump(&buf, path)?;
        }

        Ok(FinalizedTree::from_buf(buf.into_boxed_slice()))
    }
}

fn write_header(buf: &mut [u8], builder: &Builder) {
    buf[0..32].copy_from_slice(&builder.region.to_le_bytes());
    buf[32..40].copy_from_slice(&builder.size.to_le_bytes());
    buf[40..44].copy_from_slice(&builder.maxdepth.to_le_bytes());
    buf[44..52].copy_from_slice(&builder.ninners.to_le_bytes());
    buf[52..60].copy_from_slice(&builder.nleafs.to_le_bytes());
    // buf[60..64] left as zero padding.
}

// the byte offset `node_id` will occupy once written, computed before
// the child is actually laid out
fn peek_offset(arena: &[BuilderNode], node_id: NodeId, next_inner_index: u64, next_leaf_pos: u64, ninners: u64) -> u64 {
    match &arena[node_id.0 as usize] {
        BuilderNode::Inner(_) => next_inner_index * INNER_SIZE as u64,
        BuilderNode::Leaf { .. } => ninners * INNER_SIZE as u64 + next_leaf_pos,
    }
}

fn write_node_into(
    buf: &mut [u8],
    arena: &[BuilderNode],
    node_id: NodeId,
    cursor_inner: &mut u64,
    cursor_leaf: &mut u64,
    ninners: u64,
) {
    match &arena[node_id.0 as usize] {
        BuilderNode::Inner(children) => {
            let my_index = *cursor_inner;
            *cursor_inner += 1;
            let my_offset = my_index * INNER_SIZE as u64;
            let my_base = HEADER_SIZE + my_offset as usize;

            let mut quadrant_offsets = [0u64; 4];
            for (i, child) in children.iter().enumerate() {
                quadrant_offsets[i] = match child {
                    None => 0,
                    Some(child_id) => {
                        let offset = peek_offset(arena, *child_id, *cursor_inner, *cursor_leaf, ninners);
                        write_node_into(buf, arena, *child_id, cursor_inner, cursor_leaf, ninners);
                        offset
                    }
                };
            }

            for (i, offset) in quadrant_offsets.iter().enumerate() {
                let start = my_base + i * 8;
                buf[start..start + 8].copy_from_slice(&offset.to_le_bytes());
            }
        }
        BuilderNode::Leaf { items, .. } => {
            let my_offset = ninners * INNER_SIZE as u64 + *cursor_leaf;
            let my_base = HEADER_SIZE + my_offset as usize;

            buf[my_base..my_base + 8].copy_from_slice(&(items.len() as u64).to_le_bytes());
            for (j, item) in items.iter().enumerate() {
                let start = my_base + LEAF_HEADER_SIZE + j * ITEM_SIZE;
                buf[start..start + ITEM_SIZE].copy_from_slice(&item.to_le_bytes());
            }

            *cursor_leaf += LEAF_HEADER_SIZE as u64 + items.len() as u64 * ITEM_SIZE as u64;
        }
    }
}
