//! Read-only view over the serialized suffix trie.
//!
//! The trie ships as three flat byte blobs plus the bounds of the root's
//! children block:
//!
//! - string table: null-terminated labels, shared by suffix
//! - node table: 5-byte [`NodeEntry`] records for nodes in mixed sibling groups
//! - leaf table: 2-byte [`LeafEntry`] records for sibling groups with no children
//!
//! A child block whose `first` index is at or beyond the node count lives
//! in the leaf table at `first - node_count`.

mod artifacts;
mod node;

pub use artifacts::{ArtifactStats, Artifacts, Manifest, FORMAT_VERSION};
pub use node::{
    LeafEntry, NodeEntry, LEAF_SIZE, MAX_FIRST_CHILD, MAX_NUM_CHILDREN, MAX_STRING_OFFSET,
    NODE_SIZE,
};

use serde::{Deserialize, Serialize};

use crate::error::{PslError, Result};

/// Location of a contiguous block of sibling entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChildBlock {
    /// Node Table index, or node count + Leaf Table index
    pub first: u16,
    /// Number of siblings in the block
    pub count: u16,
}

impl ChildBlock {
    pub fn new(first: u16, count: u16) -> Self {
        Self { first, count }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// An entry found in a child block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child {
    Node(NodeEntry),
    Leaf(LeafEntry),
}

impl Child {
    pub fn string_offset(&self) -> usize {
        match self {
            Child::Node(node) => node.string_offset as usize,
            Child::Leaf(leaf) => leaf.string_offset as usize,
        }
    }

    /// Leaf entries are terminal by construction.
    pub fn is_terminal(&self) -> bool {
        match self {
            Child::Node(node) => node.is_terminal,
            Child::Leaf(_) => true,
        }
    }

    pub fn children(&self) -> ChildBlock {
        match self {
            Child::Node(node) => ChildBlock::new(node.first_child, node.num_children),
            Child::Leaf(_) => ChildBlock::default(),
        }
    }
}

/// Borrowed, validated view over the three trie tables.
///
/// Cheap to copy and safe to share between threads: it only holds
/// shared references to immutable bytes.
#[derive(Debug, Clone, Copy)]
pub struct SuffixTable<'a> {
    strings: &'a [u8],
    nodes: &'a [u8],
    leaves: &'a [u8],
    root: ChildBlock,
}

impl<'a> SuffixTable<'a> {
    /// Wrap raw tables, validating every offset once so lookups cannot
    /// index out of bounds.
    pub fn new(
        strings: &'a [u8],
        nodes: &'a [u8],
        leaves: &'a [u8],
        root: ChildBlock,
    ) -> Result<Self> {
        let table = Self::from_parts_unchecked(strings, nodes, leaves, root);
        table.validate()?;
        Ok(table)
    }

    pub(crate) const fn from_parts_unchecked(
        strings: &'a [u8],
        nodes: &'a [u8],
        leaves: &'a [u8],
        root: ChildBlock,
    ) -> Self {
        Self {
            strings,
            nodes,
            leaves,
            root,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.nodes.len() % NODE_SIZE != 0 {
            return Err(PslError::InvalidArtifact(format!(
                "node table length {} is not a multiple of {}",
                self.nodes.len(),
                NODE_SIZE
            )));
        }
        if self.leaves.len() % LEAF_SIZE != 0 {
            return Err(PslError::InvalidArtifact(format!(
                "leaf table length {} is not a multiple of {}",
                self.leaves.len(),
                LEAF_SIZE
            )));
        }
        if self.strings.last().is_some_and(|&b| b != 0) {
            return Err(PslError::InvalidArtifact(
                "string table is not null-terminated".to_string(),
            ));
        }

        self.validate_block(self.root, "root")?;
        for i in 0..self.node_count() {
            let node = self.node(i);
            self.validate_string(node.string_offset as usize)?;
            let block = ChildBlock::new(node.first_child, node.num_children);
            self.validate_block(block, "node")?;
        }
        for i in 0..self.leaf_count() {
            self.validate_string(self.leaf(i).string_offset as usize)?;
        }
        Ok(())
    }

    fn validate_string(&self, offset: usize) -> Result<()> {
        if offset >= self.strings.len() {
            return Err(PslError::InvalidArtifact(format!(
                "string offset {} outside table of {} bytes",
                offset,
                self.strings.len()
            )));
        }
        Ok(())
    }

    fn validate_block(&self, block: ChildBlock, owner: &str) -> Result<()> {
        if block.is_empty() {
            return Ok(());
        }
        let first = block.first as usize;
        let end = first + block.count as usize;
        let node_count = self.node_count();
        let in_range = if first < node_count {
            end <= node_count
        } else {
            end - node_count <= self.leaf_count()
        };
        if !in_range {
            return Err(PslError::InvalidArtifact(format!(
                "{} child block {}..{} out of range ({} nodes, {} leaves)",
                owner,
                first,
                end,
                node_count,
                self.leaf_count()
            )));
        }
        Ok(())
    }

    /// Bounds of the root's children block
    pub fn root(&self) -> ChildBlock {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len() / NODE_SIZE
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len() / LEAF_SIZE
    }

    pub fn strings(&self) -> &'a [u8] {
        self.strings
    }

    pub(crate) fn node(&self, idx: usize) -> NodeEntry {
        let start = idx * NODE_SIZE;
        let mut bytes = [0u8; NODE_SIZE];
        bytes.copy_from_slice(&self.nodes[start..start + NODE_SIZE]);
        NodeEntry::decode(&bytes)
    }

    pub(crate) fn leaf(&self, idx: usize) -> LeafEntry {
        let start = idx * LEAF_SIZE;
        LeafEntry::decode(&[self.leaves[start], self.leaves[start + 1]])
    }

    /// The `i`-th entry of a child block, if the block holds one at `i`
    /// inside these tables.
    pub fn child(&self, block: ChildBlock, i: usize) -> Option<Child> {
        if i >= block.count as usize {
            return None;
        }
        let idx = block.first as usize + i;
        if idx < self.node_count() || idx - self.node_count() < self.leaf_count() {
            Some(self.entry(idx))
        } else {
            None
        }
    }

    /// Entries of a child block, in stored order, stopping at the first one
    /// outside these tables.
    pub fn children(&self, block: ChildBlock) -> impl Iterator<Item = Child> + '_ {
        (0..block.count as usize).map_while(move |i| self.child(block, i))
    }

    /// Bytes of the string starting at `offset`, up to its terminator.
    pub fn string_at(&self, offset: usize) -> Option<&'a [u8]> {
        if offset >= self.strings.len() {
            return None;
        }
        Some(self.part(offset))
    }

    /// Entry at a combined node/leaf index known to be in range.
    pub(crate) fn entry(&self, idx: usize) -> Child {
        let node_count = self.node_count();
        if idx < node_count {
            Child::Node(self.node(idx))
        } else {
            Child::Leaf(self.leaf(idx - node_count))
        }
    }

    /// String at an offset known to be in range.
    pub(crate) fn part(&self, offset: usize) -> &'a [u8] {
        let tail = &self.strings[offset..];
        let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
        &tail[..end]
    }
}
