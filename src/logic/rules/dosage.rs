use super::{RuleOutcome, TreatmentRule, UsageContext};
use crate::models::{DrugProfile, Finding, FindingKind, Severity, TreatmentEvent};
use regex_lite::Regex;

/// Gross-overdose check: the parsed dosage must stay within the per-species
/// ceiling times the configured margin. Species without a ceiling on record
/// are not checked.
pub struct DosageCeilingRule {
    margin: f64,
    numeric: Regex,
}

impl DosageCeilingRule {
    pub fn new(margin: f64) -> Self {
        Self {
            margin,
            numeric: Regex::new(r"\d+\.?\d*").unwrap(),
        }
    }

    /// First numeric substring of the dosage text. Ranges collapse to their
    /// lower bound ("10-20 mg/kg" parses as 10). Unparsable text parses as
    /// 0 so an unreadable dosage reads as under-dosage instead of silently
    /// passing the check.
    pub fn parse_dosage(&self, text: &str) -> f64 {
        match self
            .numeric
            .find(text)
            .and_then(|m| m.as_str().parse::<f64>().ok())
        {
            Some(value) => value,
            None => {
                tracing::warn!("Unparsable dosage text '{}', treating as 0", text);
                0.0
            }
        }
    }
}

impl TreatmentRule for DosageCeilingRule {
    fn id(&self) -> &'static str {
        "high_dosage"
    }

    fn name(&self) -> &'static str {
        "Dosage Ceiling"
    }

    fn evaluate(
        &self,
        event: &TreatmentEvent,
        drug: &DrugProfile,
        _usage: &UsageContext,
    ) -> RuleOutcome {
        let ceiling = match drug.dosage_ceiling(event.species) {
            Some(c) => c,
            None => return RuleOutcome::Clear,
        };

        let value = self.parse_dosage(&event.dosage_text);
        if value <= ceiling * self.margin {
            return RuleOutcome::Clear;
        }

        RuleOutcome::Finding(
            Finding::new(
                FindingKind::HighDosage,
                Severity::High,
                format!(
                    "Dosage ({}mg/kg) exceeds recommended limit for {}. Maximum: {}mg/kg",
                    value, event.species, ceiling
                ),
            )
            .with_value("Actual Dosage", format!("{}mg/kg", value))
            .with_value("Recommended Maximum", format!("{}mg/kg", ceiling)),
        )
    }
}
