//! Embedded default rule list.
//!
//! `build.rs` compiles `data/public_suffix_list.dat` into trie tables, which
//! are included here as constants. Looking up against them neither parses
//! nor builds anything at run time.

use crate::error::Result;
use crate::table::{ChildBlock, SuffixTable};
use crate::types::SuffixLength;

/// Rule text the embedded tables were compiled from
pub const DEFAULT_LIST: &str = include_str!("../data/public_suffix_list.dat");

const STRINGS: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/strings.bin"));
const NODES: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/nodes.bin"));
const LEAVES: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/leaves.bin"));
const ROOT: ChildBlock = include!(concat!(env!("OUT_DIR"), "/default_root.rs"));

// Generated by build.rs; checked by `test_embedded_tables_are_valid`.
static DEFAULT_TABLE: SuffixTable<'static> =
    SuffixTable::from_parts_unchecked(STRINGS, NODES, LEAVES, ROOT);

/// Lookup view over the embedded list
pub fn default_table() -> SuffixTable<'static> {
    DEFAULT_TABLE
}

/// Public suffix length of `hostname` under the embedded list.
pub fn public_suffix_length(hostname: &str) -> Result<SuffixLength> {
    DEFAULT_TABLE.public_suffix_length(hostname)
}

/// Public suffix of `hostname` under the embedded list.
pub fn public_suffix(hostname: &str) -> Result<&str> {
    DEFAULT_TABLE.public_suffix(hostname)
}

/// Registry-controlled domain of `hostname` under the embedded list.
pub fn registry_controlled_domain(hostname: &str) -> Result<&str> {
    DEFAULT_TABLE.registry_controlled_domain(hostname)
}
