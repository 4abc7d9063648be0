//! Structured diagnostics for the transform and emission phases.
//!
//! Diagnostics are plain values handed back to the caller; the pipeline
//! never prints or logs them itself. Every diagnostic carries the source
//! reference of the rule or element that produced it so the caller can
//! point back at the originating line.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Location in a rule file or schema source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef {
    /// Originating file name
    pub file: String,
    /// 1-based line number
    pub line: u32,
}

impl SourceRef {
    /// Create a new source reference
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A single reported problem, tied to its source reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub source: SourceRef,
    pub message: String,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(source: SourceRef, message: impl Into<String>) -> Self {
        Self {
            source,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.message)
    }
}

/// Ordered accumulator for diagnostics.
///
/// The transform engine and the emitter both report through this type and
/// keep going; whether any accumulated entry is fatal to the run is the
/// caller's decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem at `source`
    pub fn report(&mut self, source: SourceRef, message: impl Into<String>) {
        self.entries.push(Diagnostic::new(source, message));
    }

    /// Append every entry of `other`
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// Whether anything was reported
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of reported entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate entries in report order
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let d = Diagnostic::new(SourceRef::new("rules.md", 12), "unknown property 'pkg'");
        assert_eq!(d.to_string(), "rules.md:12: unknown property 'pkg'");
    }

    #[test]
    fn test_accumulation_order() {
        let mut diags = Diagnostics::new();
        diags.report(SourceRef::new("a", 1), "first");
        diags.report(SourceRef::new("a", 2), "second");

        let messages: Vec<_> = diags.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }
}
