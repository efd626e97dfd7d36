//! Core types used throughout the project.

use std::fmt;

/// A location reference attached to a message (`<location filename=".." line=".."/>`).
///
/// Provenance metadata for translator tooling. Only `disambiguate` ever
/// consults it at lookup time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// File path as written in the catalog, usually relative to the `.ts` file.
    pub filename: String,
    /// 1-indexed line number, if the catalog recorded one.
    pub line: Option<u32>,
}

impl SourceLocation {
    #[must_use]
    pub fn new(filename: impl Into<String>, line: Option<u32>) -> Self {
        Self { filename: filename.into(), line }
    }

    /// Checks whether this location refers to the same place as `other`.
    ///
    /// A location without a line matches any line in the same file.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        if self.filename != other.filename {
            return false;
        }
        match (self.line, other.line) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{line}", self.filename),
            None => f.write_str(&self.filename),
        }
    }
}
