use super::{RuleOutcome, TreatmentRule, UsageContext};
use crate::models::{DrugProfile, Finding, FindingKind, Severity, TreatmentEvent};

/// Frequency-of-use check: warns when a group has already received the same
/// drug more than the allowed number of times inside the trailing window.
/// The count excludes the event under evaluation and is supplied by the
/// caller; when the lookup failed the check is skipped, never guessed.
pub struct FrequentUseRule {
    max_uses: u32,
    window_days: u32,
}

impl FrequentUseRule {
    pub fn new(max_uses: u32, window_days: u32) -> Self {
        Self {
            max_uses,
            window_days,
        }
    }
}

impl TreatmentRule for FrequentUseRule {
    fn id(&self) -> &'static str {
        "frequent_use"
    }

    fn name(&self) -> &'static str {
        "Frequent Use"
    }

    fn evaluate(
        &self,
        _event: &TreatmentEvent,
        drug: &DrugProfile,
        usage: &UsageContext,
    ) -> RuleOutcome {
        let count = match usage.recent_same_drug {
            Some(count) => count,
            None => return RuleOutcome::Skipped,
        };

        if count <= self.max_uses {
            return RuleOutcome::Clear;
        }

        RuleOutcome::Finding(
            Finding::new(
                FindingKind::FrequentUse,
                Severity::Medium,
                format!(
                    "Frequent use detected: {} treatments with {} in past {} days",
                    count, drug.name, self.window_days
                ),
            )
            .with_value("Recent Treatments", count)
            .with_value("Window", format!("{} days", self.window_days)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Species;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn penicillin() -> DrugProfile {
        DrugProfile {
            name: "Penicillin G".into(),
            description: None,
            default_dosage: None,
            dosage_ceilings: BTreeMap::new(),
            withdrawal_days: 10,
            approved_species: None,
        }
    }

    fn event() -> TreatmentEvent {
        TreatmentEvent::new(
            "Penicillin G",
            "group-1",
            Species::Cattle,
            "20,000 IU/kg",
            NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
        )
    }

    fn usage(count: u32) -> UsageContext {
        UsageContext {
            recent_same_drug: Some(count),
        }
    }

    #[test]
    fn over_threshold_warns() {
        let rule = FrequentUseRule::new(2, 30);
        match rule.evaluate(&event(), &penicillin(), &usage(3)) {
            RuleOutcome::Finding(f) => {
                assert_eq!(f.kind, FindingKind::FrequentUse);
                assert_eq!(f.severity, Severity::Medium);
                assert!(f.message.contains("3 treatments"));
                assert!(f.message.contains("30 days"));
            }
            _ => panic!("expected a finding"),
        }
    }

    #[test]
    fn at_threshold_is_clear() {
        let rule = FrequentUseRule::new(2, 30);
        assert!(matches!(
            rule.evaluate(&event(), &penicillin(), &usage(2)),
            RuleOutcome::Clear
        ));
        assert!(matches!(
            rule.evaluate(&event(), &penicillin(), &usage(0)),
            RuleOutcome::Clear
        ));
    }

    #[test]
    fn unavailable_history_skips() {
        let rule = FrequentUseRule::new(2, 30);
        assert!(matches!(
            rule.evaluate(&event(), &penicillin(), &UsageContext::default()),
            RuleOutcome::Skipped
        ));
    }
}
