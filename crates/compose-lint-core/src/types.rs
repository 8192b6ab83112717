//! Core types for lint violations and results.

use std::fmt;
use std::path::PathBuf;

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{LintError, TraversalError};
use crate::tree::SyntaxTree;

/// Severity level for lint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source location of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, in characters).
    pub column: usize,
    /// Byte offset in the file.
    pub offset: usize,
}

impl Location {
    /// Creates a new location.
    #[must_use]
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

/// A lint violation found during analysis.
///
/// Serializes as `{line, column, ruleId, message, autoFixed}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Rule code (e.g., "CM001").
    pub code: String,
    /// Rule id (e.g., "compose:modifier-missing-check").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Whether the rule can fix this violation automatically.
    pub fixable: bool,
    /// Whether the fix was applied in this run.
    pub auto_fixed: bool,
}

impl Violation {
    /// Creates a new, non-fixable violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            fixable: false,
            auto_fixed: false,
        }
    }

    /// Sets the fixable and auto-fixed flags.
    #[must_use]
    pub fn with_fix(mut self, fixable: bool, auto_fixed: bool) -> Self {
        self.fixable = fixable;
        self.auto_fixed = fixable && auto_fixed;
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.location.line, self.location.column, self.severity, self.code, self.message
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ViolationRecord<'a> {
    line: usize,
    column: usize,
    rule_id: &'a str,
    message: &'a str,
    auto_fixed: bool,
}

impl Serialize for Violation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ViolationRecord {
            line: self.location.line,
            column: self.location.column,
            rule_id: &self.rule,
            message: &self.message,
            auto_fixed: self.auto_fixed,
        }
        .serialize(serializer)
    }
}

/// Converts a Violation to a miette Diagnostic for rich error display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            message: format!("[{}] {}", v.code, v.message),
            help: v
                .fixable
                .then(|| "run with fixes enabled to correct this automatically".to_string()),
            span: SourceSpan::from((v.location.offset, 0)),
            label_message: v.rule.clone(),
        }
    }
}

/// Violations of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// Path of the file.
    pub path: PathBuf,
    /// Violations ordered by line, column, then rule registration order.
    pub violations: Vec<Violation>,
    /// Set when traversal stopped early; violations up to that point are
    /// kept.
    pub aborted: Option<TraversalError>,
}

impl FileReport {
    /// Whether any violation can still be fixed automatically.
    #[must_use]
    pub fn has_unfixed_fixable(&self) -> bool {
        self.violations.iter().any(|v| v.fixable && !v.auto_fixed)
    }
}

/// Result of a fix run on one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedFile {
    /// Violations, positioned in the rewritten text.
    pub report: FileReport,
    /// The rewritten tree.
    pub tree: SyntaxTree,
    /// The rewritten source text.
    pub source: String,
}

/// A file that could not be linted.
#[derive(Debug)]
pub struct FileFailure {
    /// Path of the file.
    pub path: PathBuf,
    /// Why it failed.
    pub error: LintError,
}

/// Result of linting several files.
#[derive(Debug, Default)]
pub struct LintResult {
    /// Reports in input order.
    pub reports: Vec<FileReport>,
    /// Files whose configuration failed to resolve.
    pub failures: Vec<FileFailure>,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All violations, file by file.
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.reports.iter().flat_map(|report| &report.violations)
    }

    /// Total number of violations.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.reports.iter().map(|report| report.violations.len()).sum()
    }

    /// Returns true if there are any errors, including failed files.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.failures.is_empty() || self.violations().any(|v| v.severity == Severity::Error)
    }

    /// Counts violations by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        self.violations()
            .fold((0, 0, 0), |(errors, warnings, infos), v| match v.severity {
                Severity::Error => (errors + 1, warnings, infos),
                Severity::Warning => (errors, warnings + 1, infos),
                Severity::Info => (errors, warnings, infos + 1),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity) -> Violation {
        Violation::new(
            "CM002",
            "compose:modifier-missing-check",
            severity,
            Location::new(2, 5, 16),
            "Content-emitting UI function is missing a styling-handle parameter.",
        )
    }

    #[test]
    fn violation_display() {
        let v = make_violation(Severity::Warning);
        assert_eq!(
            v.to_string(),
            "2:5: warning [CM002] Content-emitting UI function is missing a styling-handle parameter."
        );
    }

    #[test]
    fn auto_fixed_requires_fixable() {
        let v = make_violation(Severity::Warning).with_fix(false, true);
        assert!(!v.auto_fixed);
        let v = make_violation(Severity::Warning).with_fix(true, true);
        assert!(v.auto_fixed);
    }

    #[test]
    fn diagnostic_points_at_offset() {
        let v = make_violation(Severity::Error).with_fix(true, false);
        let diagnostic = ViolationDiagnostic::from(&v);
        assert_eq!(diagnostic.span.offset(), 16);
        assert!(diagnostic.help.is_some());
        assert!(diagnostic.to_string().starts_with("[CM002]"));
    }

    #[test]
    fn result_counts() {
        let mut result = LintResult::new();
        result.reports.push(FileReport {
            path: PathBuf::from("a.kt"),
            violations: vec![
                make_violation(Severity::Warning),
                make_violation(Severity::Error),
            ],
            aborted: None,
        });
        result.reports.push(FileReport {
            path: PathBuf::from("b.kt"),
            violations: vec![make_violation(Severity::Info)],
            aborted: None,
        });
        assert_eq!(result.violation_count(), 3);
        assert_eq!(result.count_by_severity(), (1, 1, 1));
        assert!(result.has_errors());
    }
}
