use super::{
    dosage::DosageCeilingRule, frequency::FrequentUseRule, species::OffLabelSpeciesRule,
    RuleOutcome, TreatmentRule, UsageContext,
};
use crate::catalog::EvaluatorSettings;
use crate::models::{AnalysisResult, DrugProfile, TreatmentEvent};

pub struct RulesEngine {
    rules: Vec<Box<dyn TreatmentRule>>,
}

impl RulesEngine {
    pub fn new(settings: &EvaluatorSettings) -> Self {
        let rules: Vec<Box<dyn TreatmentRule>> = vec![
            Box::new(DosageCeilingRule::new(settings.overdose_margin)),
            Box::new(OffLabelSpeciesRule),
            Box::new(FrequentUseRule::new(
                settings.max_recent_uses,
                settings.usage_window_days,
            )),
        ];

        Self { rules }
    }

    /// Runs every check against one event; no check short-circuits another.
    /// Findings are sorted by kind during aggregation, so identical inputs
    /// yield identical results regardless of check order.
    pub fn evaluate(
        &self,
        event: &TreatmentEvent,
        drug: &DrugProfile,
        recent_usage: Option<u32>,
    ) -> AnalysisResult {
        let usage = UsageContext {
            recent_same_drug: recent_usage,
        };

        let mut findings = Vec::new();
        let mut skipped = Vec::new();

        for rule in &self.rules {
            match rule.evaluate(event, drug, &usage) {
                RuleOutcome::Finding(finding) => findings.push(finding),
                RuleOutcome::Clear => {}
                RuleOutcome::Skipped => {
                    tracing::warn!(
                        "Check '{}' skipped for group {}: required history unavailable",
                        rule.id(),
                        event.group_id
                    );
                    skipped.push(rule.id().to_string());
                }
            }
        }

        AnalysisResult::from_findings(findings, skipped)
    }

    pub fn list_rules(&self) -> Vec<(&'static str, &'static str)> {
        self.rules.iter().map(|r| (r.id(), r.name())).collect()
    }
}
