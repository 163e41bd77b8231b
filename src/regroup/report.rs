//! Report types describing what a regrouping run did.
//!
//! The report is purely informational: nothing in it changes the output
//! dataset. It exists so an operator can see which source categories were
//! absorbed, which were dropped, and where the policy's tie-break rule
//! decided the outcome.

use serde::Serialize;
use std::fmt;

/// Summary of one regrouping run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RegroupReport {
    /// Name of the policy that was applied.
    pub policy: String,
    /// Counts from the input dataset.
    pub input: DatasetCounts,
    /// Counts in the output dataset.
    pub output: DatasetCounts,
    /// Issues discovered while resolving and filtering.
    pub issues: Vec<RegroupIssue>,
}

impl RegroupReport {
    /// Create a new empty report for a run of `policy`.
    pub fn new(policy: impl Into<String>) -> Self {
        Self {
            policy: policy.into(),
            ..Default::default()
        }
    }

    /// Add an issue to the report.
    pub fn add(&mut self, issue: RegroupIssue) {
        self.issues.push(issue);
    }

    /// Count of warning-level issues.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == RegroupSeverity::Warning)
            .count()
    }

    /// Count of info-level issues.
    pub fn info_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == RegroupSeverity::Info)
            .count()
    }

    /// Annotations present in the input but not in the output.
    pub fn dropped_annotations(&self) -> usize {
        self.input.annotations.saturating_sub(self.output.annotations)
    }

    /// Images present in the input but not in the output.
    pub fn dropped_images(&self) -> usize {
        self.input.images.saturating_sub(self.output.images)
    }

    /// Issues carrying the given code.
    pub fn issues_with(&self, code: RegroupIssueCode) -> impl Iterator<Item = &RegroupIssue> {
        self.issues.iter().filter(move |i| i.code == code)
    }
}

impl fmt::Display for RegroupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Policy '{}':", self.policy)?;
        writeln!(
            f,
            "  input:  {} images, {} annotations, {} categories",
            self.input.images, self.input.annotations, self.input.categories
        )?;
        writeln!(
            f,
            "  output: {} images, {} annotations, {} categories",
            self.output.images, self.output.annotations, self.output.categories
        )?;
        writeln!(
            f,
            "  dropped: {} annotation(s), {} image(s)",
            self.dropped_annotations(),
            self.dropped_images()
        )?;

        let warnings = self.warning_count();
        if warnings > 0 {
            writeln!(f)?;
            writeln!(f, "Warnings ({}):", warnings)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == RegroupSeverity::Warning)
            {
                writeln!(f, "  - {}", issue.message)?;
            }
        }

        let infos = self.info_count();
        if infos > 0 {
            writeln!(f)?;
            writeln!(f, "Notes ({}):", infos)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == RegroupSeverity::Info)
            {
                writeln!(f, "  - {}", issue.message)?;
            }
        }

        Ok(())
    }
}

/// Counts of dataset elements.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DatasetCounts {
    pub images: usize,
    pub annotations: usize,
    pub categories: usize,
}

/// A single issue discovered during a run.
#[derive(Clone, Debug, Serialize)]
pub struct RegroupIssue {
    pub severity: RegroupSeverity,
    pub code: RegroupIssueCode,
    pub message: String,
}

impl RegroupIssue {
    /// Create a warning-level issue.
    pub fn warning(code: RegroupIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: RegroupSeverity::Warning,
            code,
            message: message.into(),
        }
    }

    /// Create an info-level issue.
    pub fn info(code: RegroupIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: RegroupSeverity::Info,
            code,
            message: message.into(),
        }
    }
}

/// Severity level for regrouping issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegroupSeverity {
    /// The tie-break rule changed which target a category maps to.
    Warning,
    /// Expected exclusions and other notes.
    Info,
}

/// Stable issue codes for programmatic consumption.
///
/// These codes are part of the JSON report and should remain stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegroupIssueCode {
    /// A category was claimed by two targets; the later one won.
    MappingOverride,
    /// A policy source name matched no input category.
    UnmatchedSourceName,
    /// An input category is absorbed by no target and its annotations are dropped.
    ExcludedCategory,
    /// Annotations referenced category ids missing from the input categories.
    DanglingCategoryRef,
    /// Kept annotations referenced image ids missing from the input images.
    DanglingImageRef,
}
