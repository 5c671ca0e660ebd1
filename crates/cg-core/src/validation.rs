//! Validation report types
//!
//! A [`ValidationResult`] accumulates every finding of one validation run.
//! Failures are data, never errors: callers decide whether a document with
//! errors may still be stored for operator review.

use serde::Serialize;
use serde_json::{Map, Value};

/// Machine-readable code for a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    InvalidName,
    InvalidDescription,
    InvalidContextType,
    MissingDatasetId,
    InvalidDatasetId,
    DatasetNotFound,
    DuplicateDatasetId,
    ColumnNotFound,
    UnknownDatasetInRelationship,
    UnknownDatasetInMetric,
    InvalidJoinType,
    CircularDependency,
    DuplicateRelationship,
    NoRelationships,
    InvalidSeverity,
    InvalidRuleType,
    EmptyRuleCondition,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::InvalidName => "INVALID_NAME",
            IssueCode::InvalidDescription => "INVALID_DESCRIPTION",
            IssueCode::InvalidContextType => "INVALID_CONTEXT_TYPE",
            IssueCode::MissingDatasetId => "MISSING_DATASET_ID",
            IssueCode::InvalidDatasetId => "INVALID_DATASET_ID",
            IssueCode::DatasetNotFound => "DATASET_NOT_FOUND",
            IssueCode::DuplicateDatasetId => "DUPLICATE_DATASET_ID",
            IssueCode::ColumnNotFound => "COLUMN_NOT_FOUND",
            IssueCode::UnknownDatasetInRelationship => "UNKNOWN_DATASET_IN_RELATIONSHIP",
            IssueCode::UnknownDatasetInMetric => "UNKNOWN_DATASET_IN_METRIC",
            IssueCode::InvalidJoinType => "INVALID_JOIN_TYPE",
            IssueCode::CircularDependency => "CIRCULAR_DEPENDENCY",
            IssueCode::DuplicateRelationship => "DUPLICATE_RELATIONSHIP",
            IssueCode::NoRelationships => "NO_RELATIONSHIPS",
            IssueCode::InvalidSeverity => "INVALID_SEVERITY",
            IssueCode::InvalidRuleType => "INVALID_RULE_TYPE",
            IssueCode::EmptyRuleCondition => "EMPTY_RULE_CONDITION",
        }
    }
}

impl std::fmt::Display for IssueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation issue severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub code: IssueCode,
    pub message: String,
    pub field: Option<String>,
    pub severity: Severity,
    pub details: Map<String, Value>,
}

impl ValidationIssue {
    /// Attach a structured detail, returning the issue for chaining
    pub fn detail(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(
                f,
                "[{}] {}: {} ({})",
                self.severity, self.code, self.message, field
            ),
            None => write!(f, "[{}] {}: {}", self.severity, self.code, self.message),
        }
    }
}

/// Overall outcome derived from the collected issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Passed,
    Warning,
    Failed,
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationStatus::Passed => write!(f, "passed"),
            ValidationStatus::Warning => write!(f, "warning"),
            ValidationStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Accumulator for one validation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

/// The record persisted alongside a document
#[derive(Debug, Clone, Serialize)]
pub struct ValidationSummary<'a> {
    pub status: ValidationStatus,
    pub passed: bool,
    pub error_count: usize,
    pub warning_count: usize,
    pub errors: &'a [ValidationIssue],
    pub warnings: &'a [ValidationIssue],
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error
    pub fn error(
        &mut self,
        code: IssueCode,
        message: impl Into<String>,
        field: &str,
    ) -> &mut ValidationIssue {
        push_issue(&mut self.errors, Severity::Error, code, message.into(), field)
    }

    /// Record a warning
    pub fn warning(
        &mut self,
        code: IssueCode,
        message: impl Into<String>,
        field: &str,
    ) -> &mut ValidationIssue {
        push_issue(
            &mut self.warnings,
            Severity::Warning,
            code,
            message.into(),
            field,
        )
    }

    pub fn status(&self) -> ValidationStatus {
        if !self.errors.is_empty() {
            ValidationStatus::Failed
        } else if !self.warnings.is_empty() {
            ValidationStatus::Warning
        } else {
            ValidationStatus::Passed
        }
    }

    /// No errors were recorded (warnings allowed)
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// All issues, errors first, each group in discovery order
    pub fn issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.errors.iter().chain(self.warnings.iter())
    }

    /// Whether any issue carries the given code
    pub fn has_code(&self, code: IssueCode) -> bool {
        self.issues().any(|i| i.code == code)
    }

    /// Number of issues carrying the given code
    pub fn count_code(&self, code: IssueCode) -> usize {
        self.issues().filter(|i| i.code == code).count()
    }

    pub fn summary(&self) -> ValidationSummary<'_> {
        ValidationSummary {
            status: self.status(),
            passed: self.passed(),
            error_count: self.errors.len(),
            warning_count: self.warnings.len(),
            errors: &self.errors,
            warnings: &self.warnings,
        }
    }
}

fn push_issue<'a>(
    bucket: &'a mut Vec<ValidationIssue>,
    severity: Severity,
    code: IssueCode,
    message: String,
    field: &str,
) -> &'a mut ValidationIssue {
    bucket.push(ValidationIssue {
        code,
        message,
        field: Some(field.to_string()),
        severity,
        details: Map::new(),
    });
    let last = bucket.len() - 1;
    &mut bucket[last]
}
