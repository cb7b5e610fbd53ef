//! Offline builder: rules → string table → trie → serialized tables.
//!
//! ## Example
//!
//! ```
//! use psl_trie_r::builder::build;
//! use psl_trie_r::parse_rules;
//!
//! let rules = parse_rules("jp\nkawasaki.jp\n!city.kawasaki.jp\n").unwrap();
//! let artifacts = build(&rules).unwrap();
//!
//! let table = artifacts.table();
//! assert_eq!(table.public_suffix("foo.city.kawasaki.jp").unwrap(), "kawasaki.jp");
//! ```

mod serialize;
mod strings;
mod trie;

pub use strings::StringTable;

use tracing::info;

use crate::error::Result;
use crate::table::Artifacts;
use crate::types::{Rule, Section};

/// Options for [`build_with`]
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Keep rules from the private section of the list
    pub include_private: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            include_private: true,
        }
    }
}

/// Build artifacts from every rule.
pub fn build(rules: &[Rule]) -> Result<Artifacts> {
    build_with(rules, &BuildOptions::default())
}

/// Build artifacts from the rules selected by `options`.
///
/// Fails without producing anything if a rule is malformed, two rules
/// conflict, or any table field overflows its bit width.
pub fn build_with(rules: &[Rule], options: &BuildOptions) -> Result<Artifacts> {
    let selected = rules
        .iter()
        .filter(|r| options.include_private || r.section == Section::Icann);

    let trie = trie::Trie::build(selected)?;
    let strings = StringTable::build(trie.parts())?;
    let layout = trie.layout(&strings)?;
    let artifacts = serialize::serialize(&trie, strings, &layout)?;

    let stats = artifacts.stats();
    info!(
        rules = stats.rule_count,
        nodes = stats.node_count,
        leaves = stats.leaf_count,
        string_bytes = stats.string_bytes,
        "built public suffix table"
    );
    Ok(artifacts)
}
