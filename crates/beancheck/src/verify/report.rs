//! Verification reports
//!
//! Reports record a verdict per property or constructor shape and are
//! serializable. [`into_result`](BeanReport::into_result) turns a report into
//! a `Result` so a test can fail on it.

use serde::Serialize;
use thiserror::Error;

/// Outcome of checking one property
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PropertyVerdict {
    /// The value read back equals the value written
    Passed,
    /// The round trip failed
    Failed {
        /// What went wrong
        message: String,
    },
}

/// Verdict for a named property
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyResult {
    /// Property name
    pub property: String,
    /// Verdict
    pub verdict: PropertyVerdict,
}

/// Outcome of checking one exception constructor shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ShapeVerdict {
    /// An instance was built, raised and caught as the expected type
    Passed,
    /// The type declares no constructor of this shape
    Skipped,
    /// Construction failed or the caught value had the wrong type
    Failed {
        /// What went wrong
        message: String,
    },
}

/// Verdict for a constructor shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeResult {
    /// Parameter list of the shape, e.g. `(String, Throwable)`
    pub shape: String,
    /// Verdict
    pub verdict: ShapeVerdict,
}

/// A report that either holds or lists violations
pub trait Verdict {
    /// Name of the verified type
    fn subject(&self) -> &str;

    /// Violation messages; empty when the contract holds
    fn failures(&self) -> Vec<String>;

    /// Check whether the contract holds
    fn is_success(&self) -> bool {
        self.failures().is_empty()
    }
}

/// Contract violations found in a report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} contract violation(s) in {subject}: {}", .failures.len(), .failures.join("; "))]
pub struct VerificationFailure {
    /// Verified type, or a batch description
    pub subject: String,
    /// Violation messages
    pub failures: Vec<String>,
}

fn into_result<R: Verdict>(report: R) -> Result<R, VerificationFailure> {
    let failures = report.failures();
    if failures.is_empty() {
        Ok(report)
    } else {
        Err(VerificationFailure {
            subject: report.subject().to_string(),
            failures,
        })
    }
}

/// Result of verifying the accessors of one type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BeanReport {
    /// Verified type
    pub type_name: String,
    /// Verdict per accessor pair, sorted by property name
    pub properties: Vec<PropertyResult>,
    /// Read-only properties a constructor did not set as given
    pub warnings: Vec<String>,
}

impl BeanReport {
    /// Empty report for `type_name`
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Number of properties that passed
    pub fn passed(&self) -> usize {
        self.properties
            .iter()
            .filter(|p| p.verdict == PropertyVerdict::Passed)
            .count()
    }

    /// Verdict of a property
    pub fn verdict(&self, property: &str) -> Option<&PropertyVerdict> {
        self.properties
            .iter()
            .find(|p| p.property == property)
            .map(|p| &p.verdict)
    }

    /// The report, or the violations it holds
    pub fn into_result(self) -> Result<Self, VerificationFailure> {
        into_result(self)
    }

    /// Render as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Verdict for BeanReport {
    fn subject(&self) -> &str {
        &self.type_name
    }

    fn failures(&self) -> Vec<String> {
        self.properties
            .iter()
            .filter_map(|p| match &p.verdict {
                PropertyVerdict::Failed { message } => Some(message.clone()),
                PropertyVerdict::Passed => None,
            })
            .collect()
    }
}

/// Result of verifying the constructors of one exception type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExceptionReport {
    /// Verified type
    pub type_name: String,
    /// Verdict per shape in canonical order
    pub shapes: Vec<ShapeResult>,
}

impl ExceptionReport {
    /// Verdict of a shape, by parameter list
    pub fn verdict(&self, shape: &str) -> Option<&ShapeVerdict> {
        self.shapes
            .iter()
            .find(|s| s.shape == shape)
            .map(|s| &s.verdict)
    }

    /// Number of shapes that were exercised and passed
    pub fn passed(&self) -> usize {
        self.shapes
            .iter()
            .filter(|s| s.verdict == ShapeVerdict::Passed)
            .count()
    }

    /// The report, or the violations it holds
    pub fn into_result(self) -> Result<Self, VerificationFailure> {
        into_result(self)
    }

    /// Render as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Verdict for ExceptionReport {
    fn subject(&self) -> &str {
        &self.type_name
    }

    fn failures(&self) -> Vec<String> {
        self.shapes
            .iter()
            .filter_map(|s| match &s.verdict {
                ShapeVerdict::Failed { message } => {
                    Some(format!("{}{}: {}", self.type_name, s.shape, message))
                }
                _ => None,
            })
            .collect()
    }
}

/// Outcome of one type in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum BatchOutcome<R> {
    /// Verification ran; the report holds the verdicts
    Completed(R),
    /// Verification could not run for this type
    Errored(String),
}

/// Entry of a batch report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchEntry<R> {
    /// Verified type
    pub type_name: String,
    /// Outcome
    pub outcome: BatchOutcome<R>,
}

/// Per-type outcomes of a batch verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport<R> {
    /// Entries in input order
    pub entries: Vec<BatchEntry<R>>,
}

impl<R> Default for BatchReport<R> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<R: Verdict> BatchReport<R> {
    /// Record a completed verification
    pub fn push_completed(&mut self, report: R) {
        self.entries.push(BatchEntry {
            type_name: report.subject().to_string(),
            outcome: BatchOutcome::Completed(report),
        });
    }

    /// Record a verification that could not run
    pub fn push_errored(&mut self, type_name: impl Into<String>, error: impl ToString) {
        self.entries.push(BatchEntry {
            type_name: type_name.into(),
            outcome: BatchOutcome::Errored(error.to_string()),
        });
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check for an empty batch
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Report of a type, if its verification ran
    pub fn report(&self, type_name: &str) -> Option<&R> {
        self.entries
            .iter()
            .find(|e| e.type_name == type_name)
            .and_then(|e| match &e.outcome {
                BatchOutcome::Completed(report) => Some(report),
                BatchOutcome::Errored(_) => None,
            })
    }

    /// Every violation and error, prefixed by type name
    pub fn failures(&self) -> Vec<String> {
        let mut failures = Vec::new();
        for entry in &self.entries {
            match &entry.outcome {
                BatchOutcome::Completed(report) => failures.extend(report.failures()),
                BatchOutcome::Errored(error) => {
                    failures.push(format!("{}: {}", entry.type_name, error))
                }
            }
        }
        failures
    }

    /// Check whether every type was verified and holds
    pub fn is_success(&self) -> bool {
        self.failures().is_empty()
    }

    /// The report, or every violation it holds
    pub fn into_result(self) -> Result<Self, VerificationFailure> {
        let failures = self.failures();
        if failures.is_empty() {
            Ok(self)
        } else {
            Err(VerificationFailure {
                subject: format!("batch of {} types", self.entries.len()),
                failures,
            })
        }
    }
}

impl<R: Serialize> BatchReport<R> {
    /// Render as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
