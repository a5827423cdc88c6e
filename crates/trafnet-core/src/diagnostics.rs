//! Issues noticed while importing a road table.
//!
//! Importers keep going past oddities that still leave a solvable network
//! (parallel segments, unusual speeds) and record them as warnings. Anything
//! that makes the network unusable is recorded as an error, and the import
//! fails once every row has been checked.
//!
//! ```
//! use trafnet_core::diagnostics::{Diagnostics, IssueCategory};
//!
//! let mut diag = Diagnostics::new();
//! diag.warn_segment(IssueCategory::Topology, "B", "parallel to segment 'A'");
//! diag.error_at_line(IssueCategory::Parse, 7, "missing speed");
//!
//! assert_eq!(diag.warning_count(), 1);
//! assert!(diag.has_errors());
//! assert_eq!(diag.summary(), "1 warning(s), 1 error(s)");
//! ```

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// What part of the input an issue concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    /// Row could not be read
    Parse,
    /// Names and endpoints: duplicates, parallel roads
    Topology,
    /// Lanes, speed, capacity and conductivity
    Rating,
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IssueCategory::Parse => "parse",
            IssueCategory::Topology => "topology",
            IssueCategory::Rating => "rating",
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticIssue {
    pub severity: Severity,
    pub category: IssueCategory,
    pub message: String,
    /// Line in the source table (header is line 1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
}

impl fmt::Display for DiagnosticIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{severity}[{}]", self.category)?;
        match (&self.segment, self.line) {
            (Some(segment), _) => write!(f, " segment '{segment}'")?,
            (None, Some(line)) => write!(f, " line {line}")?,
            (None, None) => {}
        }
        write!(f, ": {}", self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<DiagnosticIssue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning about a named segment.
    pub fn warn_segment(
        &mut self,
        category: IssueCategory,
        segment: &str,
        message: impl Into<String>,
    ) {
        self.issues.push(DiagnosticIssue {
            severity: Severity::Warning,
            category,
            message: message.into(),
            line: None,
            segment: Some(segment.to_string()),
        });
    }

    /// Record an error tied to a line of the source table.
    pub fn error_at_line(&mut self, category: IssueCategory, line: usize, message: impl Into<String>) {
        self.issues.push(DiagnosticIssue {
            severity: Severity::Error,
            category,
            message: message.into(),
            line: Some(line),
            segment: None,
        });
    }

    pub fn warnings(&self) -> impl Iterator<Item = &DiagnosticIssue> {
        self.with_severity(Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &DiagnosticIssue> {
        self.with_severity(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} warning(s), {} error(s)",
            self.warning_count(),
            self.error_count()
        )
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &DiagnosticIssue> {
        self.issues
            .iter()
            .filter(move |issue| issue.severity == severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefers_segment_over_line() {
        let mut diag = Diagnostics::new();
        diag.warn_segment(IssueCategory::Rating, "K", "unusual speed 150 km/hr");
        diag.error_at_line(IssueCategory::Topology, 4, "duplicate segment name 'K'");
        let rendered: Vec<String> = diag.issues.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            [
                "warning[rating] segment 'K': unusual speed 150 km/hr",
                "error[topology] line 4: duplicate segment name 'K'",
            ]
        );
    }

    #[test]
    fn counts_by_severity() {
        let mut diag = Diagnostics::new();
        assert!(diag.is_empty());
        diag.warn_segment(IssueCategory::Topology, "B", "parallel to segment 'A'");
        diag.warn_segment(IssueCategory::Rating, "B", "unusual lane count 12");
        assert!(!diag.has_errors());
        diag.error_at_line(IssueCategory::Parse, 3, "blank speed");
        assert_eq!(diag.warning_count(), 2);
        assert_eq!(diag.error_count(), 1);
        assert_eq!(diag.errors().next().unwrap().line, Some(3));
    }

    #[test]
    fn serializes_lowercase_tags() {
        let mut diag = Diagnostics::new();
        diag.warn_segment(IssueCategory::Rating, "A", "stored capacity differs");
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["issues"][0]["severity"], "warning");
        assert_eq!(json["issues"][0]["category"], "rating");
        assert!(json["issues"][0].get("line").is_none());
    }
}
