use crate::catalog::RuleCatalog;
use crate::models::{Finding, FindingKind, Priority, Severity, TreatmentEvent};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Day-granular end of the withdrawal window. No timezone arithmetic.
pub fn withdrawal_end(administered_on: NaiveDate, withdrawal_days: u32) -> NaiveDate {
    administered_on + Duration::days(withdrawal_days as i64)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceCheck {
    pub compliant: bool,
    pub violation: Option<Finding>,
}

impl ComplianceCheck {
    fn compliant() -> Self {
        Self {
            compliant: true,
            violation: None,
        }
    }
}

/// A sale is compliant only strictly after the withdrawal window closes;
/// selling on the end date itself is a violation.
pub fn check_compliance(
    withdrawal_end: NaiveDate,
    planned_sale: NaiveDate,
    withdrawal_days: u32,
) -> ComplianceCheck {
    if planned_sale > withdrawal_end {
        return ComplianceCheck::compliant();
    }

    let violation = Finding::new(
        FindingKind::WithdrawalViolation,
        Severity::Critical,
        format!(
            "Sale planned before withdrawal period ends. Safe after: {}",
            withdrawal_end
        ),
    )
    .with_value("Required Period", format!("{} days", withdrawal_days))
    .with_value("Safe After", withdrawal_end);

    ComplianceCheck {
        compliant: false,
        violation: Some(violation),
    }
}

/// Compliance for one event against the catalog. A drug without a profile
/// carries no withdrawal requirement on record and passes by default.
pub fn check_sale(
    event: &TreatmentEvent,
    catalog: &RuleCatalog,
    planned_sale: NaiveDate,
) -> ComplianceCheck {
    match catalog.drug(&event.drug_name) {
        Some(profile) => check_compliance(
            withdrawal_end(event.administered_on, profile.withdrawal_days),
            planned_sale,
            profile.withdrawal_days,
        ),
        None => {
            tracing::debug!(
                "No withdrawal profile for '{}', sale treated as compliant",
                event.drug_name
            );
            ComplianceCheck::compliant()
        }
    }
}

/// Treatments whose withdrawal window is still open as of the given date.
/// The group is safe to sell only when this list is empty.
pub fn active_withdrawals<'a>(
    treatments: &'a [TreatmentEvent],
    catalog: &RuleCatalog,
    as_of: NaiveDate,
) -> Vec<&'a TreatmentEvent> {
    treatments
        .iter()
        .filter(|t| match catalog.drug(&t.drug_name) {
            Some(profile) => withdrawal_end(t.administered_on, profile.withdrawal_days) > as_of,
            None => false,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalHold {
    pub drug_name: String,
    pub withdrawal_days: u32,
    pub safe_after: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleReadiness {
    pub can_sell: bool,
    pub holds: Vec<WithdrawalHold>,
    pub checked_on: NaiveDate,
}

pub fn sale_readiness(
    treatments: &[TreatmentEvent],
    catalog: &RuleCatalog,
    as_of: NaiveDate,
) -> SaleReadiness {
    let holds: Vec<WithdrawalHold> = active_withdrawals(treatments, catalog, as_of)
        .into_iter()
        .filter_map(|t| {
            catalog.drug(&t.drug_name).map(|profile| WithdrawalHold {
                drug_name: profile.name.clone(),
                withdrawal_days: profile.withdrawal_days,
                safe_after: withdrawal_end(t.administered_on, profile.withdrawal_days),
            })
        })
        .collect();

    SaleReadiness {
        can_sell: holds.is_empty(),
        holds,
        checked_on: as_of,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalAlert {
    pub drug_name: String,
    pub group_id: String,
    pub ends_on: NaiveDate,
    pub days_left: i64,
    pub priority: Priority,
    pub action_required: bool,
    pub message: String,
}

/// Withdrawal windows closing within the horizon, for the alert feed.
/// Two days or less left escalates to a high-priority, action-required alert.
pub fn upcoming_expirations(
    treatments: &[TreatmentEvent],
    catalog: &RuleCatalog,
    as_of: NaiveDate,
    horizon_days: u32,
) -> Vec<WithdrawalAlert> {
    let mut alerts: Vec<WithdrawalAlert> = treatments
        .iter()
        .filter_map(|t| {
            let profile = catalog.drug(&t.drug_name)?;
            let ends_on = withdrawal_end(t.administered_on, profile.withdrawal_days);
            let days_left = (ends_on - as_of).num_days();
            if days_left < 0 || days_left > horizon_days as i64 {
                return None;
            }
            let urgent = days_left <= 2;
            Some(WithdrawalAlert {
                drug_name: profile.name.clone(),
                group_id: t.group_id.clone(),
                ends_on,
                days_left,
                priority: if urgent {
                    Priority::High
                } else {
                    Priority::Medium
                },
                action_required: urgent,
                message: format!(
                    "{} withdrawal period ends in {} day(s)",
                    profile.name, days_left
                ),
            })
        })
        .collect();

    alerts.sort_by_key(|a| a.ends_on);
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Species;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(drug: &str, administered: NaiveDate) -> TreatmentEvent {
        TreatmentEvent::new(drug, "group-1", Species::Cattle, "10 mg/kg", administered)
    }

    #[test]
    fn end_date_is_plain_day_addition() {
        assert_eq!(
            withdrawal_end(date(2024, 1, 1), 18),
            date(2024, 1, 19)
        );
        assert_eq!(withdrawal_end(date(2024, 2, 28), 2), date(2024, 3, 1));
        assert_eq!(withdrawal_end(date(2024, 5, 10), 0), date(2024, 5, 10));
    }

    #[test]
    fn sale_on_end_date_is_a_violation() {
        let check = check_compliance(date(2024, 1, 19), date(2024, 1, 19), 18);
        assert!(!check.compliant);
        let violation = check.violation.unwrap();
        assert_eq!(violation.kind, FindingKind::WithdrawalViolation);
        assert_eq!(violation.severity, Severity::Critical);
        assert!(violation.message.contains("2024-01-19"));
    }

    #[test]
    fn sale_day_after_end_is_compliant() {
        let check = check_compliance(date(2024, 1, 19), date(2024, 1, 20), 18);
        assert!(check.compliant);
        assert!(check.violation.is_none());
    }

    #[test]
    fn unknown_drug_is_compliant_by_default() {
        let catalog = RuleCatalog::builtin();
        let check = check_sale(
            &event("Unlisted Tonic", date(2024, 1, 1)),
            &catalog,
            date(2024, 1, 2),
        );
        assert!(check.compliant);
    }

    #[test]
    fn check_sale_uses_catalog_withdrawal_days() {
        let catalog = RuleCatalog::builtin();
        // Oxytetracycline: 18 days
        let treatment = event("Oxytetracycline", date(2024, 1, 1));
        assert!(!check_sale(&treatment, &catalog, date(2024, 1, 19)).compliant);
        assert!(check_sale(&treatment, &catalog, date(2024, 1, 20)).compliant);
    }

    #[test]
    fn active_withdrawals_filter() {
        let catalog = RuleCatalog::builtin();
        let treatments = vec![
            // Ends 2024-01-19: still active on the 10th
            event("Oxytetracycline", date(2024, 1, 1)),
            // Ends 2024-01-07: already cleared
            event("Flunixin Meglumine", date(2024, 1, 2)),
            // No profile: never holds a sale
            event("Unlisted Tonic", date(2024, 1, 9)),
        ];

        let active = active_withdrawals(&treatments, &catalog, date(2024, 1, 10));
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].drug_name, "Oxytetracycline");
    }

    #[test]
    fn sale_readiness_reports_holds() {
        let catalog = RuleCatalog::builtin();
        let treatments = vec![event("Ivermectin", date(2024, 3, 1))];

        let blocked = sale_readiness(&treatments, &catalog, date(2024, 3, 15));
        assert!(!blocked.can_sell);
        assert_eq!(blocked.holds.len(), 1);
        assert_eq!(blocked.holds[0].withdrawal_days, 28);
        assert_eq!(blocked.holds[0].safe_after, date(2024, 3, 29));

        let clear = sale_readiness(&treatments, &catalog, date(2024, 3, 30));
        assert!(clear.can_sell);
        assert!(clear.holds.is_empty());
    }

    #[test]
    fn upcoming_expirations_window_and_priority() {
        let catalog = RuleCatalog::builtin();
        let treatments = vec![
            // Penicillin G, 10 days: ends 2024-04-11 (1 day left -> urgent)
            event("Penicillin G", date(2024, 4, 1)),
            // Oxytetracycline, 18 days: ends 2024-04-16 (6 days left)
            event("Oxytetracycline", date(2024, 3, 29)),
            // Ivermectin, 28 days: ends 2024-05-03, outside the horizon
            event("Ivermectin", date(2024, 4, 5)),
        ];

        let alerts = upcoming_expirations(&treatments, &catalog, date(2024, 4, 10), 7);
        assert_eq!(alerts.len(), 2);

        assert_eq!(alerts[0].drug_name, "Penicillin G");
        assert_eq!(alerts[0].days_left, 1);
        assert_eq!(alerts[0].priority, Priority::High);
        assert!(alerts[0].action_required);

        assert_eq!(alerts[1].drug_name, "Oxytetracycline");
        assert_eq!(alerts[1].days_left, 6);
        assert_eq!(alerts[1].priority, Priority::Medium);
        assert!(!alerts[1].action_required);
    }

    #[test]
    fn expired_windows_do_not_alert() {
        let catalog = RuleCatalog::builtin();
        let treatments = vec![event("Flunixin Meglumine", date(2024, 1, 1))];
        let alerts = upcoming_expirations(&treatments, &catalog, date(2024, 2, 1), 7);
        assert!(alerts.is_empty());
    }
}
