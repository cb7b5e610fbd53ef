//! PSL Trie - compact, allocation-free public suffix lookup
//!
//! This library determines the public suffix (e.g. `co.uk`) and the
//! registry-controlled domain (e.g. `example.co.uk`) of a hostname using a
//! bit-packed binary trie:
//! - String table with suffix sharing between labels
//! - 5-byte node entries (15/13/11/1-bit fields) for mixed sibling groups
//! - 2-byte leaf entries for sibling groups without children
//! - Binary search per level, no heap allocation, no locks at lookup time
//!
//! The offline builder (`builder` feature, on by default) turns a rule list
//! into three byte blobs; the lookup path only ever reads those blobs. The
//! embedded list in [`list`] is compiled into such blobs by `build.rs`.
//!
//! # Example
//!
//! ```rust
//! use psl_trie_r::{build, parse_rules};
//!
//! let rules_text = "
//! // ===BEGIN ICANN DOMAINS===
//! com
//! uk
//! co.uk
//! jp
//! kawasaki.jp
//! !city.kawasaki.jp
//! *.ye
//! ";
//!
//! // Parse and build once, offline
//! let rules = parse_rules(rules_text).unwrap();
//! let artifacts = build(&rules).unwrap();
//!
//! // Look up at runtime
//! let table = artifacts.table();
//! assert_eq!(table.public_suffix("www.example.co.uk").unwrap(), "co.uk");
//! assert_eq!(
//!     table.registry_controlled_domain("foo.city.kawasaki.jp").unwrap(),
//!     "city.kawasaki.jp"
//! );
//! assert_eq!(table.public_suffix("w3.wildcard.ye").unwrap(), "wildcard.ye");
//! ```
//!
//! # Rule Syntax
//!
//! | Rule | Meaning |
//! |------|---------|
//! | `co.uk` | `co.uk` is a public suffix |
//! | `*.ck` | every label directly under `ck` is a public suffix |
//! | `!www.ck` | exception: `www.ck` is registrable, so the suffix is `ck` |
//!
//! # Shipping tables
//!
//! [`Artifacts::write_to_dir`] writes `strings.bin`, `nodes.bin`,
//! `leaves.bin` and `manifest.json`. [`SuffixTable::new`] accepts the raw
//! blobs from anywhere, including `include_bytes!` statics.

#[cfg(feature = "builder")]
pub mod builder;
pub mod error;
pub mod list;
mod lookup;
#[cfg(feature = "builder")]
pub mod parser;
pub mod table;
pub mod types;

// Re-export commonly used items
#[cfg(feature = "builder")]
pub use builder::{build, build_with, BuildOptions};
pub use error::{InputErrorKind, PslError, Result, TableField};
pub use list::{default_table, public_suffix, public_suffix_length, registry_controlled_domain};
#[cfg(feature = "builder")]
pub use parser::{parse_rules, parse_rules_from_file, parse_rules_with, ParseOptions};
pub use table::{ArtifactStats, Artifacts, ChildBlock, SuffixTable};
pub use types::{LongestMatch, Rule, Section, SuffixLength};

#[cfg(all(test, feature = "builder"))]
mod tests {
    use super::*;

    #[test]
    fn test_full_workflow() {
        let rules_text = r#"
// Generic
com

// Multi-level
uk
co.uk

// Exception under a terminal parent
jp
kawasaki.jp
!city.kawasaki.jp

// Wildcard
*.ye
"#;

        // Parse rules
        let rules = parse_rules(rules_text).unwrap();
        assert_eq!(rules.len(), 7);

        // Build tables
        let artifacts = build(&rules).unwrap();
        assert_eq!(artifacts.stats().rule_count, 7);
        let table = artifacts.table();

        // Plain TLD
        let m = table.longest_match(&["www", "example", "com"]).unwrap();
        assert_eq!(m.matched_labels, 1);
        assert!(m.known);

        // Exception shortens the match by one label
        let m = table
            .longest_match(&["foo", "city", "kawasaki", "jp"])
            .unwrap();
        assert_eq!(m.matched_labels, 2);
        assert!(m.is_exception);

        // Wildcard matches any label under ye
        let m = table.longest_match(&["w3", "wildcard", "ye"]).unwrap();
        assert_eq!(m.matched_labels, 2);

        // Hostname API
        let len = table.public_suffix_length("www.example.co.uk").unwrap();
        assert_eq!(len.len, "co.uk".len());
        assert!(len.known);
        assert_eq!(
            table.registry_controlled_domain("www.example.co.uk").unwrap(),
            "example.co.uk"
        );
    }
}
