//! String table with suffix sharing.
//!
//! Parts are accepted longest first. A part whose bytes already end some
//! accepted string is not stored again; it resolves to the offset inside
//! that string, where the shared null terminator also ends it. Accepted
//! strings are laid out in acceptance order, so equal input gives an
//! identical blob.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::error::{PslError, Result, TableField};
use crate::table::MAX_STRING_OFFSET;

/// Packed, null-terminated hostname parts and the offset of each part
#[derive(Debug, Clone, Default)]
pub struct StringTable {
    bytes: Vec<u8>,
    offsets: HashMap<String, usize>,
}

impl StringTable {
    /// Build the table from every part used by the trie.
    pub fn build<'a, I>(parts: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = parts.into_iter().collect();
        if distinct.contains("") {
            return Err(PslError::BuildInconsistency("empty hostname part".to_string()));
        }

        let mut candidates: Vec<&str> = distinct.into_iter().collect();
        candidates.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let mut bytes = Vec::new();
        let mut offsets = HashMap::with_capacity(candidates.len());
        // Every suffix of an accepted string -> offset where it starts
        let mut suffixes: HashMap<&[u8], usize> = HashMap::new();
        let mut accepted = 0usize;

        for part in candidates {
            let offset = match suffixes.get(part.as_bytes()) {
                Some(&offset) => offset,
                None => {
                    let offset = bytes.len();
                    bytes.extend_from_slice(part.as_bytes());
                    bytes.push(0);
                    for i in 0..part.len() {
                        suffixes.entry(&part.as_bytes()[i..]).or_insert(offset + i);
                    }
                    accepted += 1;
                    offset
                }
            };
            PslError::check_width(TableField::StringOffset, offset, MAX_STRING_OFFSET)?;
            offsets.insert(part.to_string(), offset);
        }

        debug!(
            parts = offsets.len(),
            stored = accepted,
            shared = offsets.len() - accepted,
            bytes = bytes.len(),
            "built string table"
        );

        Ok(Self { bytes, offsets })
    }

    /// Offset of `part`, if it was part of the input.
    pub fn offset(&self, part: &str) -> Option<usize> {
        self.offsets.get(part).copied()
    }

    /// Bytes from `offset` up to the next terminator.
    pub fn resolve(&self, offset: usize) -> &[u8] {
        let tail = &self.bytes[offset..];
        let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
        &tail[..end]
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
