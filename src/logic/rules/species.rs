use super::{RuleOutcome, TreatmentRule, UsageContext};
use crate::models::{DrugProfile, Finding, FindingKind, Severity, TreatmentEvent};

/// Off-label use check: warns when the treated species is outside the drug's
/// approved set. Advisory, not blocking; a vet may prescribe off-label.
pub struct OffLabelSpeciesRule;

impl TreatmentRule for OffLabelSpeciesRule {
    fn id(&self) -> &'static str {
        "off_label_species"
    }

    fn name(&self) -> &'static str {
        "Species Approval"
    }

    fn evaluate(
        &self,
        event: &TreatmentEvent,
        drug: &DrugProfile,
        _usage: &UsageContext,
    ) -> RuleOutcome {
        match drug.is_approved_for(event.species) {
            Some(false) => RuleOutcome::Finding(
                Finding::new(
                    FindingKind::OffLabelSpecies,
                    Severity::Medium,
                    format!(
                        "{} is not typically approved for {}. Consult veterinarian.",
                        drug.name, event.species
                    ),
                )
                .with_value("Drug", &drug.name)
                .with_value("Species", event.species),
            ),
            // Approved, or no approval data on record
            _ => RuleOutcome::Clear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Species;
    use chrono::NaiveDate;
    use std::collections::{BTreeMap, BTreeSet};

    fn enrofloxacin() -> DrugProfile {
        DrugProfile {
            name: "Enrofloxacin".into(),
            description: None,
            default_dosage: None,
            dosage_ceilings: BTreeMap::new(),
            withdrawal_days: 14,
            approved_species: Some(BTreeSet::from([
                Species::Poultry,
                Species::Swine,
                Species::Cattle,
            ])),
        }
    }

    fn event(species: Species) -> TreatmentEvent {
        TreatmentEvent::new(
            "Enrofloxacin",
            "group-1",
            species,
            "5 mg/kg",
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
        )
    }

    #[test]
    fn unapproved_species_warns() {
        let outcome =
            OffLabelSpeciesRule.evaluate(&event(Species::Sheep), &enrofloxacin(), &UsageContext::default());
        match outcome {
            RuleOutcome::Finding(f) => {
                assert_eq!(f.kind, FindingKind::OffLabelSpecies);
                assert_eq!(f.severity, Severity::Medium);
                assert!(f.message.contains("Sheep"));
            }
            _ => panic!("expected a finding"),
        }
    }

    #[test]
    fn approved_species_is_clear() {
        let outcome =
            OffLabelSpeciesRule.evaluate(&event(Species::Cattle), &enrofloxacin(), &UsageContext::default());
        assert!(matches!(outcome, RuleOutcome::Clear));
    }

    #[test]
    fn missing_approval_data_is_clear() {
        let mut profile = enrofloxacin();
        profile.approved_species = None;
        let outcome =
            OffLabelSpeciesRule.evaluate(&event(Species::Fish), &profile, &UsageContext::default());
        assert!(matches!(outcome, RuleOutcome::Clear));
    }
}
