use std::fmt;

/// Label standing for "any single label" in a wildcard rule.
pub const WILDCARD_LABEL: &str = "*";

/// Prefix byte marking the final label of an exception rule in the string table.
pub const EXCEPTION_MARKER: u8 = b'!';

/// Section of the rule list a rule was declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    /// Domains delegated by ICANN
    #[default]
    Icann,
    /// Domains submitted by their private owners
    Private,
}

/// A single public suffix rule.
///
/// Labels are stored top-level first, so `city.kawasaki.jp` is
/// `["jp", "kawasaki", "city"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    pub labels: Vec<String>,
    /// Rule was written with a leading `!`
    pub exception: bool,
    /// Most specific label is `*`
    pub wildcard: bool,
    pub section: Section,
}

impl Rule {
    /// Create a rule from labels in written order (most specific first).
    pub fn new<S: AsRef<str>>(written: &[S], exception: bool, section: Section) -> Self {
        let labels: Vec<String> = written
            .iter()
            .rev()
            .map(|l| l.as_ref().to_string())
            .collect();
        let wildcard = labels.last().map(|l| l == WILDCARD_LABEL).unwrap_or(false);
        Self {
            labels,
            exception,
            wildcard,
            section,
        }
    }

    /// Create an ICANN rule from its textual form, e.g. `"*.ck"` or `"!www.ck"`.
    ///
    /// No validation is done here; use the parser for untrusted input.
    pub fn from_text(text: &str) -> Self {
        let (exception, body) = match text.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let written: Vec<&str> = body.split('.').collect();
        Self::new(&written, exception, Section::Icann)
    }

    /// Number of labels in the rule
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The string stored in the trie for the label at `depth`.
    ///
    /// The last label of an exception rule carries the `!` marker.
    pub fn stored_part(&self, depth: usize) -> String {
        let label = &self.labels[depth];
        if self.exception && depth + 1 == self.labels.len() {
            let mut part = String::with_capacity(label.len() + 1);
            part.push(EXCEPTION_MARKER as char);
            part.push_str(label);
            part
        } else {
            label.clone()
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exception {
            f.write_str("!")?;
        }
        for (i, label) in self.labels.iter().rev().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(label)?;
        }
        Ok(())
    }
}

/// Result of walking the trie for a label sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongestMatch {
    /// Number of labels (from the top) forming the public suffix
    pub matched_labels: usize,
    /// The prevailing rule was an exception
    pub is_exception: bool,
    /// An explicit rule matched; `false` means the default `*` rule applied
    pub known: bool,
}

/// Public suffix length of a hostname
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuffixLength {
    /// Length of the public suffix in bytes
    pub len: usize,
    /// An explicit rule matched; `false` means the default `*` rule applied
    pub known: bool,
}
