use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ChildBlock, SuffixTable, LEAF_SIZE, NODE_SIZE};
use crate::error::{PslError, Result};

/// Version of the on-disk artifact layout
pub const FORMAT_VERSION: u32 = 1;

const STRINGS_FILE: &str = "strings.bin";
const NODES_FILE: &str = "nodes.bin";
const LEAVES_FILE: &str = "leaves.bin";
const MANIFEST_FILE: &str = "manifest.json";

/// Sizes of a finished artifact set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactStats {
    pub rule_count: usize,
    pub node_count: usize,
    pub leaf_count: usize,
    pub string_bytes: usize,
}

/// Sidecar describing the three blobs written by [`Artifacts::write_to_dir`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u32,
    pub root: ChildBlock,
    #[serde(flatten)]
    pub stats: ArtifactStats,
}

/// Owned serialized trie: string table, node table, leaf table and root block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    strings: Vec<u8>,
    nodes: Vec<u8>,
    leaves: Vec<u8>,
    root: ChildBlock,
    rule_count: usize,
}

impl Artifacts {
    /// Assemble artifacts from raw blobs, validating them.
    pub fn from_parts(
        strings: Vec<u8>,
        nodes: Vec<u8>,
        leaves: Vec<u8>,
        root: ChildBlock,
        rule_count: usize,
    ) -> Result<Self> {
        SuffixTable::new(&strings, &nodes, &leaves, root)?;
        Ok(Self::from_built(strings, nodes, leaves, root, rule_count))
    }

    /// Assemble artifacts the serializer has produced.
    pub(crate) fn from_built(
        strings: Vec<u8>,
        nodes: Vec<u8>,
        leaves: Vec<u8>,
        root: ChildBlock,
        rule_count: usize,
    ) -> Self {
        Self {
            strings,
            nodes,
            leaves,
            root,
            rule_count,
        }
    }

    /// Lookup view over these artifacts
    pub fn table(&self) -> SuffixTable<'_> {
        SuffixTable::from_parts_unchecked(&self.strings, &self.nodes, &self.leaves, self.root)
    }

    pub fn strings(&self) -> &[u8] {
        &self.strings
    }

    pub fn nodes(&self) -> &[u8] {
        &self.nodes
    }

    pub fn leaves(&self) -> &[u8] {
        &self.leaves
    }

    pub fn root(&self) -> ChildBlock {
        self.root
    }

    pub fn stats(&self) -> ArtifactStats {
        ArtifactStats {
            rule_count: self.rule_count,
            node_count: self.nodes.len() / NODE_SIZE,
            leaf_count: self.leaves.len() / LEAF_SIZE,
            string_bytes: self.strings.len(),
        }
    }

    pub fn manifest(&self) -> Manifest {
        Manifest {
            version: FORMAT_VERSION,
            root: self.root,
            stats: self.stats(),
        }
    }

    /// Write the three blobs and `manifest.json` into `dir`, creating it if needed.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        fs::write(dir.join(STRINGS_FILE), &self.strings)?;
        fs::write(dir.join(NODES_FILE), &self.nodes)?;
        fs::write(dir.join(LEAVES_FILE), &self.leaves)?;
        let manifest = serde_json::to_string_pretty(&self.manifest())?;
        fs::write(dir.join(MANIFEST_FILE), manifest)?;
        tracing::debug!(dir = %dir.display(), "wrote suffix table artifacts");
        Ok(())
    }

    /// Read artifacts written by [`Artifacts::write_to_dir`].
    pub fn read_from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let manifest: Manifest = serde_json::from_slice(&fs::read(dir.join(MANIFEST_FILE))?)?;
        if manifest.version != FORMAT_VERSION {
            return Err(PslError::InvalidArtifact(format!(
                "unsupported format version {} (expected {})",
                manifest.version, FORMAT_VERSION
            )));
        }

        let strings = fs::read(dir.join(STRINGS_FILE))?;
        let nodes = fs::read(dir.join(NODES_FILE))?;
        let leaves = fs::read(dir.join(LEAVES_FILE))?;
        let artifacts = Self::from_parts(
            strings,
            nodes,
            leaves,
            manifest.root,
            manifest.stats.rule_count,
        )?;

        if artifacts.stats() != manifest.stats {
            return Err(PslError::InvalidArtifact(format!(
                "blob sizes {:?} do not match manifest {:?}",
                artifacts.stats(),
                manifest.stats
            )));
        }
        Ok(artifacts)
    }
}
