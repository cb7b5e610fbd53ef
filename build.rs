//! Compiles the embedded rule list into trie tables so the crate ships them
//! as constants.
#![allow(dead_code, unused_imports)]

#[path = "src/builder/mod.rs"]
mod builder;
#[path = "src/error.rs"]
mod error;
#[path = "src/parser.rs"]
mod parser;
#[path = "src/table/mod.rs"]
mod table;
#[path = "src/types.rs"]
mod types;

use std::env;
use std::fs;
use std::path::PathBuf;

const RULE_LIST: &str = "data/public_suffix_list.dat";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    for path in [
        RULE_LIST,
        "src/builder",
        "src/table",
        "src/error.rs",
        "src/parser.rs",
        "src/types.rs",
    ] {
        println!("cargo:rerun-if-changed={}", path);
    }

    let rules = parser::parse_rules(&fs::read_to_string(RULE_LIST)?)?;
    let artifacts = builder::build(&rules)?;

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    artifacts.write_to_dir(&out_dir)?;
    let root = artifacts.root();
    fs::write(
        out_dir.join("default_root.rs"),
        format!("ChildBlock {{ first: {}, count: {} }}\n", root.first, root.count),
    )?;
    Ok(())
}
