//! Fixed-width records of the Node Table and Leaf Table.
//!
//! A node is 40 bits stored little-endian in 5 bytes:
//!
//! ```text
//! bit 0           15             28            39
//!     | string off | first child  | num children | terminal |
//!     |   15 bits  |   13 bits    |   11 bits    |  1 bit   |
//! ```
//!
//! A leaf is a 15-bit string offset stored little-endian in 2 bytes.

use crate::error::{PslError, Result, TableField};

/// Bytes per Node Table entry
pub const NODE_SIZE: usize = 5;
/// Bytes per Leaf Table entry
pub const LEAF_SIZE: usize = 2;

const STRING_OFFSET_BITS: u32 = 15;
const FIRST_CHILD_BITS: u32 = 13;
const NUM_CHILDREN_BITS: u32 = 11;

const FIRST_CHILD_SHIFT: u32 = STRING_OFFSET_BITS;
const NUM_CHILDREN_SHIFT: u32 = FIRST_CHILD_SHIFT + FIRST_CHILD_BITS;
const TERMINAL_SHIFT: u32 = NUM_CHILDREN_SHIFT + NUM_CHILDREN_BITS;

pub const MAX_STRING_OFFSET: usize = (1 << STRING_OFFSET_BITS) - 1;
pub const MAX_FIRST_CHILD: usize = (1 << FIRST_CHILD_BITS) - 1;
pub const MAX_NUM_CHILDREN: usize = (1 << NUM_CHILDREN_BITS) - 1;

/// A decoded Node Table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeEntry {
    pub string_offset: u16,
    pub first_child: u16,
    pub num_children: u16,
    pub is_terminal: bool,
}

impl NodeEntry {
    /// Create an entry, failing if any field exceeds its bit width.
    pub fn new(
        string_offset: usize,
        first_child: usize,
        num_children: usize,
        is_terminal: bool,
    ) -> Result<Self> {
        PslError::check_width(TableField::StringOffset, string_offset, MAX_STRING_OFFSET)?;
        PslError::check_width(TableField::FirstChildOffset, first_child, MAX_FIRST_CHILD)?;
        PslError::check_width(TableField::NumChildren, num_children, MAX_NUM_CHILDREN)?;
        Ok(Self {
            string_offset: string_offset as u16,
            first_child: first_child as u16,
            num_children: num_children as u16,
            is_terminal,
        })
    }

    pub fn encode(&self) -> [u8; NODE_SIZE] {
        let packed = u64::from(self.string_offset)
            | u64::from(self.first_child) << FIRST_CHILD_SHIFT
            | u64::from(self.num_children) << NUM_CHILDREN_SHIFT
            | u64::from(self.is_terminal) << TERMINAL_SHIFT;
        let bytes = packed.to_le_bytes();
        let mut out = [0u8; NODE_SIZE];
        out.copy_from_slice(&bytes[..NODE_SIZE]);
        out
    }

    pub fn decode(bytes: &[u8; NODE_SIZE]) -> Self {
        let mut buf = [0u8; 8];
        buf[..NODE_SIZE].copy_from_slice(bytes);
        let packed = u64::from_le_bytes(buf);
        Self {
            string_offset: field(packed, 0, STRING_OFFSET_BITS),
            first_child: field(packed, FIRST_CHILD_SHIFT, FIRST_CHILD_BITS),
            num_children: field(packed, NUM_CHILDREN_SHIFT, NUM_CHILDREN_BITS),
            is_terminal: (packed >> TERMINAL_SHIFT) & 1 == 1,
        }
    }
}

#[inline]
fn field(packed: u64, shift: u32, bits: u32) -> u16 {
    ((packed >> shift) & ((1u64 << bits) - 1)) as u16
}

/// A decoded Leaf Table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafEntry {
    pub string_offset: u16,
}

impl LeafEntry {
    pub fn new(string_offset: usize) -> Result<Self> {
        PslError::check_width(TableField::StringOffset, string_offset, MAX_STRING_OFFSET)?;
        Ok(Self {
            string_offset: string_offset as u16,
        })
    }

    pub fn encode(&self) -> [u8; LEAF_SIZE] {
        self.string_offset.to_le_bytes()
    }

    pub fn decode(bytes: &[u8; LEAF_SIZE]) -> Self {
        Self {
            string_offset: u16::from_le_bytes(*bytes) & MAX_STRING_OFFSET as u16,
        }
    }
}
