//! Label trie construction and table layout.
//!
//! Nodes live in an arena indexed by `usize`; index 0 is the virtual root,
//! which is never serialized. Layout runs one breadth-first pass that gives
//! every child block its final position, either in the node table or, when
//! no sibling has children, in the leaf table.

use std::collections::{BTreeMap, HashMap, VecDeque};

use tracing::{debug, warn};

use super::strings::StringTable;
use crate::error::{PslError, Result, TableField};
use crate::table::MAX_NUM_CHILDREN;
use crate::types::{Rule, WILDCARD_LABEL};

pub(crate) const ROOT: usize = 0;

#[derive(Debug, Clone, Default)]
pub(crate) struct TrieNode {
    /// Stored string: label, `*`, or `!label`
    pub part: String,
    pub children: BTreeMap<String, usize>,
    pub terminal: bool,
}

impl TrieNode {
    fn new(part: String) -> Self {
        Self {
            part,
            ..Self::default()
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Where a node's children ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Block {
    Nodes { start: usize, count: usize },
    Leaves { start: usize, count: usize },
}

/// Table positions assigned by [`Trie::layout`]
#[derive(Debug, Clone, Default)]
pub(crate) struct Layout {
    /// Arena ids in node table order
    pub nodes: Vec<usize>,
    /// Arena ids in leaf table order
    pub leaves: Vec<usize>,
    /// Children block of each arena id that has children
    pub blocks: HashMap<usize, Block>,
}

impl Layout {
    pub fn block(&self, id: usize) -> Option<Block> {
        self.blocks.get(&id).copied()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Trie {
    pub nodes: Vec<TrieNode>,
    pub rule_count: usize,
}

impl Trie {
    /// Insert every rule, rejecting malformed or conflicting ones.
    pub fn build<'r, I>(rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'r Rule>,
    {
        let mut trie = Self {
            nodes: vec![TrieNode::default()],
            rule_count: 0,
        };
        // label path -> exception flag, to spot conflicts and duplicates
        let mut seen: HashMap<&[String], bool> = HashMap::new();

        for rule in rules {
            check_rule(rule)?;
            match seen.get(rule.labels.as_slice()) {
                Some(&exception) if exception == rule.exception => {
                    warn!(rule = %rule, "dropping duplicate rule");
                    continue;
                }
                Some(_) => {
                    return Err(PslError::BuildInconsistency(format!(
                        "{} conflicts with an earlier rule for the same labels",
                        rule
                    )));
                }
                None => {}
            }
            seen.insert(rule.labels.as_slice(), rule.exception);
            trie.insert(rule);
            trie.rule_count += 1;
        }

        if trie.rule_count == 0 {
            return Err(PslError::BuildInconsistency("rule set is empty".to_string()));
        }
        debug!(
            rules = trie.rule_count,
            nodes = trie.nodes.len() - 1,
            "built label trie"
        );
        Ok(trie)
    }

    fn insert(&mut self, rule: &Rule) {
        let mut current = ROOT;
        for depth in 0..rule.len() {
            let part = rule.stored_part(depth);
            current = match self.nodes[current].children.get(&part) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::new(part.clone()));
                    self.nodes[current].children.insert(part, child);
                    child
                }
            };
        }
        self.nodes[current].terminal = true;
    }

    /// Every stored part, excluding the root.
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        self.nodes[1..].iter().map(|n| n.part.as_str())
    }

    /// Children of `id` ordered by their resolved string bytes.
    pub fn sorted_children(&self, id: usize, strings: &StringTable) -> Result<Vec<usize>> {
        let mut children = Vec::with_capacity(self.nodes[id].children.len());
        for &child in self.nodes[id].children.values() {
            let offset = self.offset(child, strings)?;
            children.push((strings.resolve(offset), child));
        }
        children.sort_by(|a, b| a.0.cmp(b.0));
        Ok(children.into_iter().map(|(_, child)| child).collect())
    }

    pub fn offset(&self, id: usize, strings: &StringTable) -> Result<usize> {
        let part = &self.nodes[id].part;
        strings.offset(part).ok_or_else(|| {
            PslError::BuildInconsistency(format!("part {:?} missing from string table", part))
        })
    }

    /// Assign table positions level by level.
    ///
    /// A sibling group goes to the leaf table only when none of its members
    /// has children; everything else goes to the node table.
    pub fn layout(&self, strings: &StringTable) -> Result<Layout> {
        let mut layout = Layout::default();
        let mut queue = VecDeque::from([ROOT]);

        while let Some(id) = queue.pop_front() {
            let children = self.sorted_children(id, strings)?;
            if children.is_empty() {
                continue;
            }
            PslError::check_width(TableField::NumChildren, children.len(), MAX_NUM_CHILDREN)?;

            let count = children.len();
            let block = if children.iter().all(|&c| self.nodes[c].is_leaf()) {
                let start = layout.leaves.len();
                layout.leaves.extend(children);
                Block::Leaves { start, count }
            } else {
                let start = layout.nodes.len();
                layout.nodes.extend_from_slice(&children);
                queue.extend(children);
                Block::Nodes { start, count }
            };
            layout.blocks.insert(id, block);
        }

        debug!(
            node_table = layout.nodes.len(),
            leaf_table = layout.leaves.len(),
            "partitioned trie"
        );
        Ok(layout)
    }
}

fn check_rule(rule: &Rule) -> Result<()> {
    let inconsistent = |message: &str| {
        Err(PslError::BuildInconsistency(format!("{}: {}", rule, message)))
    };

    if rule.is_empty() {
        return inconsistent("rule has no labels");
    }
    if rule.labels.iter().any(|l| l.is_empty()) {
        return inconsistent("rule has an empty label");
    }
    let last = rule.len() - 1;
    if rule.labels[..last].iter().any(|l| l == WILDCARD_LABEL) {
        return inconsistent("wildcard is only allowed as the leading label");
    }
    if rule.wildcard != (rule.labels[last] == WILDCARD_LABEL) {
        return inconsistent("wildcard flag does not match the leading label");
    }
    if rule.exception {
        if rule.len() < 2 {
            return inconsistent("exception must have at least two labels");
        }
        if rule.wildcard {
            return inconsistent("exception cannot target a wildcard");
        }
    }
    Ok(())
}
