use super::strings::StringTable;
use super::trie::{Block, Layout, Trie, ROOT};
use crate::error::{PslError, Result, TableField};
use crate::table::{
    Artifacts, ChildBlock, LeafEntry, NodeEntry, LEAF_SIZE, MAX_FIRST_CHILD, MAX_NUM_CHILDREN,
    NODE_SIZE,
};

/// Encode a laid-out trie into the three table blobs.
///
/// Leaf blocks are addressed after the whole node table, so they are only
/// resolved here, once the node count is final.
pub(crate) fn serialize(trie: &Trie, strings: StringTable, layout: &Layout) -> Result<Artifacts> {
    let node_count = layout.nodes.len();
    let resolve = |block: Option<Block>| -> Result<ChildBlock> {
        let (first, count) = match block {
            None => return Ok(ChildBlock::default()),
            Some(Block::Nodes { start, count }) => (start, count),
            Some(Block::Leaves { start, count }) => (node_count + start, count),
        };
        PslError::check_width(TableField::FirstChildOffset, first, MAX_FIRST_CHILD)?;
        PslError::check_width(TableField::NumChildren, count, MAX_NUM_CHILDREN)?;
        Ok(ChildBlock::new(first as u16, count as u16))
    };

    let mut nodes = Vec::with_capacity(node_count * NODE_SIZE);
    for &id in &layout.nodes {
        let block = resolve(layout.block(id))?;
        let entry = NodeEntry::new(
            trie.offset(id, &strings)?,
            block.first as usize,
            block.count as usize,
            trie.nodes[id].terminal,
        )?;
        nodes.extend_from_slice(&entry.encode());
    }

    let mut leaves = Vec::with_capacity(layout.leaves.len() * LEAF_SIZE);
    for &id in &layout.leaves {
        let entry = LeafEntry::new(trie.offset(id, &strings)?)?;
        leaves.extend_from_slice(&entry.encode());
    }

    let root = resolve(layout.block(ROOT))?;
    Ok(Artifacts::from_built(
        strings.into_bytes(),
        nodes,
        leaves,
        root,
        trie.rule_count,
    ))
}
