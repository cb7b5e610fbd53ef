//! Lookup engine over a [`SuffixTable`].
//!
//! Labels are consumed from the top level down. At each level the current
//! child block is binary searched, in this order of precedence:
//!
//! 1. an exception child (`!label`), which ends the walk one label short
//! 2. an exact child
//! 3. the wildcard child (`*`)
//!
//! An exact child is followed even when a wildcard sibling exists; the
//! wildcard then only marks the current level as matched.
//!
//! The deepest terminal node reached fixes the public suffix. When no
//! explicit rule terminates, the default `*` rule makes the top label alone
//! the public suffix.
//!
//! The walk allocates nothing and takes no locks.

use std::cmp::Ordering;

use crate::error::{InputErrorKind, PslError, Result};
use crate::table::{Child, ChildBlock, SuffixTable};
use crate::types::{LongestMatch, SuffixLength, EXCEPTION_MARKER, WILDCARD_LABEL};

/// Outcome of the default `*` rule
const DEFAULT_MATCH: LongestMatch = LongestMatch {
    matched_labels: 1,
    is_exception: false,
    known: false,
};

impl<'a> SuffixTable<'a> {
    /// Find the prevailing rule for `labels`, given most specific first
    /// (`["www", "example", "com"]`).
    pub fn longest_match<S: AsRef<str>>(&self, labels: &[S]) -> Result<LongestMatch> {
        if labels.is_empty() {
            return Err(PslError::invalid_input(InputErrorKind::Empty, "no labels to match"));
        }
        for label in labels {
            validate_label(label.as_ref())?;
        }
        Ok(self.walk(labels.iter().rev().map(|l| l.as_ref().as_bytes())))
    }

    /// Length in bytes of the public suffix of `hostname`.
    pub fn public_suffix_length(&self, hostname: &str) -> Result<SuffixLength> {
        let matched = self.match_hostname(hostname)?;
        let start = label_start(hostname, matched.matched_labels);
        Ok(SuffixLength {
            len: hostname.len() - start,
            known: matched.known,
        })
    }

    /// The public suffix of `hostname`, e.g. `co.uk` for `www.example.co.uk`.
    pub fn public_suffix<'h>(&self, hostname: &'h str) -> Result<&'h str> {
        let matched = self.match_hostname(hostname)?;
        Ok(&hostname[label_start(hostname, matched.matched_labels)..])
    }

    /// The public suffix plus one label, or the whole hostname when it has
    /// no label beyond its suffix.
    pub fn registry_controlled_domain<'h>(&self, hostname: &'h str) -> Result<&'h str> {
        let matched = self.match_hostname(hostname)?;
        Ok(&hostname[label_start(hostname, matched.matched_labels + 1)..])
    }

    fn match_hostname(&self, hostname: &str) -> Result<LongestMatch> {
        validate_hostname(hostname)?;
        Ok(self.walk(hostname.rsplit('.').map(str::as_bytes)))
    }

    /// Walk the trie with labels ordered top level first.
    fn walk<'l, I>(&self, labels: I) -> LongestMatch
    where
        I: Iterator<Item = &'l [u8]>,
    {
        let mut block = self.root();
        let mut depth = 0;
        let mut matched = 0;

        for label in labels {
            if block.is_empty() {
                break;
            }

            if depth > 0 && self.find(block, Some(EXCEPTION_MARKER), label).is_some() {
                return LongestMatch {
                    matched_labels: depth,
                    is_exception: true,
                    known: true,
                };
            }

            let wildcard = || self.find(block, None, WILDCARD_LABEL.as_bytes());
            let (child, covered) = match self.find(block, None, label) {
                // The exact child decides the path; a wildcard sibling still
                // makes this level a public suffix.
                Some(child) => (child, !child.is_terminal() && wildcard().is_some()),
                None => match wildcard() {
                    Some(child) => (child, false),
                    None => break,
                },
            };

            depth += 1;
            if covered || child.is_terminal() {
                matched = depth;
            }
            block = child.children();
        }

        if matched == 0 {
            return DEFAULT_MATCH;
        }
        LongestMatch {
            matched_labels: matched,
            is_exception: false,
            known: true,
        }
    }

    /// Binary search a child block for `marker` followed by `label`.
    fn find(&self, block: ChildBlock, marker: Option<u8>, label: &[u8]) -> Option<Child> {
        let mut lo = 0;
        let mut hi = block.count as usize;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let child = self.entry(block.first as usize + mid);
            let stored = self.part(child.string_offset());
            match compare_part(stored, marker, label) {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return Some(child),
            }
        }
        None
    }
}

/// Order a stored part against `marker ++ label`, bytewise, as the builder sorts.
#[inline]
fn compare_part(stored: &[u8], marker: Option<u8>, label: &[u8]) -> Ordering {
    stored
        .iter()
        .copied()
        .cmp(marker.into_iter().chain(label.iter().copied()))
}

/// Byte index where the last `labels` labels of `hostname` begin.
fn label_start(hostname: &str, labels: usize) -> usize {
    if labels == 0 {
        return hostname.len();
    }
    hostname
        .rmatch_indices('.')
        .nth(labels - 1)
        .map(|(dot, _)| dot + 1)
        .unwrap_or(0)
}

fn validate_hostname(hostname: &str) -> Result<()> {
    if hostname.is_empty() {
        return Err(PslError::invalid_input(InputErrorKind::Empty, "empty hostname"));
    }
    for label in hostname.split('.') {
        validate_label(label)?;
    }
    Ok(())
}

fn validate_label(label: &str) -> Result<()> {
    if label.is_empty() {
        return Err(PslError::invalid_input(
            InputErrorKind::EmptyLabel,
            "hostname contains an empty label",
        ));
    }
    if !label.is_ascii() {
        return Err(PslError::invalid_input(
            InputErrorKind::NonAscii,
            format!("non-ASCII label: {}", label),
        ));
    }
    if label.as_bytes().contains(&0) {
        return Err(PslError::invalid_input(
            InputErrorKind::ReservedByte,
            "label contains a NUL byte",
        ));
    }
    if label.contains('.') {
        return Err(PslError::invalid_input(
            InputErrorKind::ReservedByte,
            format!("label contains '.': {}", label),
        ));
    }
    if label.as_bytes()[0] == EXCEPTION_MARKER {
        return Err(PslError::invalid_input(
            InputErrorKind::ReservedByte,
            format!("label starts with '!': {}", label),
        ));
    }
    Ok(())
}
