use serde::{Deserialize, Serialize};

/// Reported when an evaluation produced no findings. Heuristic scalar, not a
/// calibrated probability; kept as a named constant so a real estimator can
/// replace it without touching rule logic.
pub const CONFIDENCE_BASELINE: f64 = 0.85;

/// Reported when at least one anomaly or warning exists.
pub const CONFIDENCE_FLAGGED: f64 = 0.92;

/// Ordered by reporting priority; findings are sorted by kind so results are
/// identical regardless of rule execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    HighDosage,
    OffLabelSpecies,
    FrequentUse,
    WithdrawalViolation,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::HighDosage => "high_dosage",
            FindingKind::OffLabelSpecies => "off_label_species",
            FindingKind::FrequentUse => "frequent_use",
            FindingKind::WithdrawalViolation => "withdrawal_violation",
        }
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Blocking severities land in `anomalies`; advisory ones in `warnings`.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub label: String,
    pub value: String,
}

impl DataPoint {
    pub fn new(label: &str, value: impl std::fmt::Display) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

/// One classified result from a safety check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    pub message: String,
    pub supporting_values: Vec<DataPoint>,
}

impl Finding {
    pub fn new(kind: FindingKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            supporting_values: Vec::new(),
        }
    }

    pub fn with_value(mut self, label: &str, value: impl std::fmt::Display) -> Self {
        self.supporting_values.push(DataPoint::new(label, value));
        self
    }
}

/// Aggregated output of one treatment evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub anomalies: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub confidence: f64,
    /// Check ids that could not run because a required lookup failed.
    #[serde(default)]
    pub skipped_checks: Vec<String>,
}

impl AnalysisResult {
    /// Single aggregation point: sorts findings by kind, splits blocking
    /// severities into anomalies, and assigns the two-level confidence.
    pub fn from_findings(mut findings: Vec<Finding>, skipped_checks: Vec<String>) -> Self {
        findings.sort_by_key(|f| f.kind);
        let (anomalies, warnings): (Vec<Finding>, Vec<Finding>) = findings
            .into_iter()
            .partition(|f| f.severity.is_blocking());

        let confidence = if anomalies.is_empty() && warnings.is_empty() {
            CONFIDENCE_BASELINE
        } else {
            CONFIDENCE_FLAGGED
        };

        Self {
            anomalies,
            warnings,
            confidence,
            skipped_checks,
        }
    }

    pub fn has_findings(&self) -> bool {
        !self.anomalies.is_empty() || !self.warnings.is_empty()
    }
}
