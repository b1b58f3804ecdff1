use crate::catalog::RuleCatalog;
use crate::datasources::{GroupDirectory, TreatmentLedger, UsageHistory};
use crate::error::Result;
use crate::logic::fingerprint;
use crate::logic::rules::RulesEngine;
use crate::logic::withdrawal::{self, SaleReadiness};
use crate::models::{AnalysisResult, TreatmentEvent};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Everything attached to a treatment record at creation time. The three
/// parts are computed independently of one another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreatmentAssessment {
    pub analysis: AnalysisResult,
    pub withdrawal_end: NaiveDate,
    pub fingerprint: String,
}

/// Ties the rules engine to the catalog and the delegated lookups. Holds no
/// per-evaluation state; one instance serves concurrent callers.
pub struct TreatmentAnalyzer {
    catalog: Arc<RuleCatalog>,
    engine: RulesEngine,
}

impl TreatmentAnalyzer {
    pub fn new(catalog: Arc<RuleCatalog>) -> Self {
        let engine = RulesEngine::new(&catalog.evaluator);
        Self { catalog, engine }
    }

    /// Builds an event from a raw submission by resolving the group through
    /// the directory. An unknown group surfaces as `NotFound` and must be
    /// resolved by the caller before evaluation.
    pub async fn event_for_group(
        &self,
        drug_name: &str,
        group_id: &str,
        dosage_text: &str,
        administered_on: NaiveDate,
        directory: &dyn GroupDirectory,
    ) -> Result<TreatmentEvent> {
        let group = directory.lookup(group_id).await?;
        Ok(
            TreatmentEvent::new(drug_name, group_id, group.species, dosage_text, administered_on)
                .with_head_count(group.head_count),
        )
    }

    /// Evaluates one treatment event. An unknown drug surfaces as `NotFound`
    /// and is never retried here; a failed usage-history lookup degrades to
    /// a partial result with the frequent-use check flagged as skipped.
    pub async fn analyze(
        &self,
        event: &TreatmentEvent,
        usage_history: &dyn UsageHistory,
    ) -> Result<AnalysisResult> {
        let drug = self.catalog.require_drug(&event.drug_name)?;

        let recent = match usage_history
            .count_recent_treatments(
                &event.drug_name,
                &event.group_id,
                self.catalog.evaluator.usage_window_days,
            )
            .await
        {
            Ok(count) => Some(count),
            Err(e) => {
                tracing::warn!(
                    "Usage history unavailable for {} / group {}: {}",
                    event.drug_name,
                    event.group_id,
                    e
                );
                None
            }
        };

        Ok(self.engine.evaluate(event, drug, recent))
    }

    /// Creation-time bundle: analysis, withdrawal end date, and record
    /// fingerprint for one event.
    pub async fn assess(
        &self,
        event: &TreatmentEvent,
        usage_history: &dyn UsageHistory,
        nonce: &str,
    ) -> Result<TreatmentAssessment> {
        let drug = self.catalog.require_drug(&event.drug_name)?;
        let analysis = self.analyze(event, usage_history).await?;

        Ok(TreatmentAssessment {
            analysis,
            withdrawal_end: withdrawal::withdrawal_end(
                event.administered_on,
                drug.withdrawal_days,
            ),
            fingerprint: fingerprint::fingerprint_event(event, nonce),
        })
    }

    /// Sale-readiness for a group: fetches the group's treatments from the
    /// ledger and reports any withdrawal holds still open as of `as_of`.
    pub async fn sale_readiness(
        &self,
        group_id: &str,
        ledger: &dyn TreatmentLedger,
        as_of: NaiveDate,
    ) -> Result<SaleReadiness> {
        let treatments = ledger.treatments_for_group(group_id).await?;
        Ok(withdrawal::sale_readiness(
            &treatments,
            &self.catalog,
            as_of,
        ))
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn engine(&self) -> &RulesEngine {
        &self.engine
    }
}
