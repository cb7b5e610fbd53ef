use thiserror::Error;

/// Classifies rejected lookup input for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputErrorKind {
    /// Hostname or label list is empty
    Empty,
    /// Hostname contains bytes outside ASCII
    NonAscii,
    /// Hostname contains an empty label (leading, trailing or doubled dot)
    EmptyLabel,
    /// A NUL byte, a label starting with `!`, or a `.` inside a single label
    /// passed to `longest_match`
    ReservedByte,
}

/// Fixed-width fields of a serialized node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableField {
    /// 15-bit offset into the string table
    StringOffset,
    /// 13-bit index of a node's first child
    FirstChildOffset,
    /// 11-bit child count
    NumChildren,
}

impl std::fmt::Display for TableField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TableField::StringOffset => "string_table_offset",
            TableField::FirstChildOffset => "first_child_offset",
            TableField::NumChildren => "num_children",
        };
        f.write_str(name)
    }
}

/// Public suffix table error types
#[derive(Error, Debug)]
pub enum PslError {
    #[error("Invalid input: {message}")]
    InvalidInput {
        kind: InputErrorKind,
        message: String,
    },

    #[error("Build overflow: {field} = {value} exceeds maximum {max}")]
    BuildOverflow {
        field: TableField,
        value: usize,
        max: usize,
    },

    #[error("Build inconsistency: {0}")]
    BuildInconsistency(String),

    #[error("Parse error at line {line}: {message}")]
    ParseErrorAtLine { line: usize, message: String },

    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl PslError {
    pub(crate) fn invalid_input(kind: InputErrorKind, message: impl Into<String>) -> Self {
        PslError::InvalidInput {
            kind,
            message: message.into(),
        }
    }

    /// Returns an overflow error if `value` does not fit in `max`.
    pub(crate) fn check_width(field: TableField, value: usize, max: usize) -> Result<()> {
        if value > max {
            return Err(PslError::BuildOverflow { field, value, max });
        }
        Ok(())
    }
}

pub type Result<T> = std::result::Result<T, PslError>;
