use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{PslError, Result};
use crate::types::{Rule, Section, WILDCARD_LABEL};

/// Regex pattern for a single rule label (after lowercasing)
static LABEL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9_](?:[a-z0-9_-]*[a-z0-9_])?$")
        .expect("LABEL_PATTERN: hardcoded regex is invalid")
});

const BEGIN_PRIVATE: &str = "===BEGIN PRIVATE DOMAINS===";
const END_PRIVATE: &str = "===END PRIVATE DOMAINS===";

/// Options for [`parse_rules_with`]
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Keep rules from the private section of the list
    pub include_private: bool,
    /// Skip rules with non-ASCII (unencoded IDN) labels instead of failing
    pub skip_non_ascii: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            include_private: true,
            skip_non_ascii: true,
        }
    }
}

/// Parse rules in public suffix list format.
///
/// One rule per line; `//` starts a comment line. A leading `!` marks an
/// exception and a leading `*` label a wildcard.
pub fn parse_rules(text: &str) -> Result<Vec<Rule>> {
    parse_rules_with(text, &ParseOptions::default())
}

/// Parse rules, honoring `options`.
pub fn parse_rules_with(text: &str, options: &ParseOptions) -> Result<Vec<Rule>> {
    let mut rules = Vec::new();
    let mut section = Section::Icann;
    let mut skipped = 0usize;

    for (line_num, line) in text.lines().enumerate() {
        let line_num = line_num + 1; // 1-based line numbers
        let line = line.trim();

        if let Some(comment) = line.strip_prefix("//") {
            let comment = comment.trim();
            if comment.starts_with(BEGIN_PRIVATE) {
                section = Section::Private;
            } else if comment.starts_with(END_PRIVATE) {
                section = Section::Icann;
            }
            continue;
        }

        // The rule is the first whitespace-delimited token
        let token = match line.split_whitespace().next() {
            Some(token) => token,
            None => continue,
        };

        if !token.is_ascii() {
            if options.skip_non_ascii {
                skipped += 1;
                continue;
            }
            return Err(PslError::ParseErrorAtLine {
                line: line_num,
                message: format!("non-ASCII rule: {}", token),
            });
        }

        if section == Section::Private && !options.include_private {
            continue;
        }

        rules.push(parse_single_rule(token, section, line_num)?);
    }

    debug!(
        rules = rules.len(),
        skipped_non_ascii = skipped,
        "parsed public suffix rules"
    );
    Ok(rules)
}

/// Parse rules from a file.
pub fn parse_rules_from_file(path: impl AsRef<Path>) -> Result<Vec<Rule>> {
    let text = fs::read_to_string(path.as_ref())?;
    parse_rules(&text)
}

/// Parse a single rule token
fn parse_single_rule(token: &str, section: Section, line_num: usize) -> Result<Rule> {
    let error = |message: String| PslError::ParseErrorAtLine {
        line: line_num,
        message,
    };

    let lowered = token.to_ascii_lowercase();
    let (exception, body) = match lowered.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, lowered.as_str()),
    };

    let labels: Vec<&str> = body.split('.').collect();
    for (i, label) in labels.iter().enumerate() {
        if *label == WILDCARD_LABEL {
            if i != 0 {
                return Err(error(format!("wildcard must be the leading label: {}", token)));
            }
            if exception {
                return Err(error(format!("exception cannot be a wildcard: {}", token)));
            }
            continue;
        }
        if !LABEL_PATTERN.is_match(label) {
            return Err(error(format!("invalid label {:?} in rule {}", label, token)));
        }
    }
    if exception && labels.len() < 2 {
        return Err(error(format!(
            "exception needs at least two labels: {}",
            token
        )));
    }

    Ok(Rule::new(&labels, exception, section))
}
