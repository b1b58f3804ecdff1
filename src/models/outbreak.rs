use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed confidence for the seasonal forecast. A heuristic marker, not a
/// fitted estimate; named so a calibrated value can replace it in one place.
pub const FORECAST_CONFIDENCE: f64 = 0.78;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DiseaseCategory {
    Respiratory,
    Gastrointestinal,
    Parasitic,
}

impl DiseaseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiseaseCategory::Respiratory => "Respiratory",
            DiseaseCategory::Gastrointestinal => "Gastrointestinal",
            DiseaseCategory::Parasitic => "Parasitic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().trim() {
            "respiratory" => Some(DiseaseCategory::Respiratory),
            "gastrointestinal" | "gi" => Some(DiseaseCategory::Gastrointestinal),
            "parasitic" => Some(DiseaseCategory::Parasitic),
            _ => None,
        }
    }

    pub fn all() -> &'static [DiseaseCategory] {
        &[
            DiseaseCategory::Respiratory,
            DiseaseCategory::Gastrointestinal,
            DiseaseCategory::Parasitic,
        ]
    }
}

impl std::fmt::Display for DiseaseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A suggested countermeasure for an elevated risk category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mitigation {
    pub action: String,
    pub priority: Priority,
    pub message: String,
    pub effectiveness: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutbreakRiskReport {
    pub farm_id: String,
    /// Per-category risk, always within the configured floor/ceiling.
    pub risks: BTreeMap<DiseaseCategory, f64>,
    pub recommendations: Vec<Mitigation>,
    pub confidence: f64,
    pub generated_at: DateTime<Utc>,
}
