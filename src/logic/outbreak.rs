use crate::catalog::SeasonalConfig;
use crate::datasources::FarmHistory;
use crate::error::{HerdOpsError, Result};
use crate::models::{DiseaseCategory, Mitigation, OutbreakRiskReport, FORECAST_CONFIDENCE};
use chrono::{Datelike, Utc};
use std::collections::BTreeMap;

/// Seasonal outbreak-risk forecast. Deterministic table lookup with history
/// and winter adjustments; stateless and independent per farm.
pub struct OutbreakEstimator {
    seasonal: SeasonalConfig,
}

impl OutbreakEstimator {
    pub fn new(seasonal: SeasonalConfig) -> Self {
        Self { seasonal }
    }

    /// Forecast for the current calendar month.
    pub async fn estimate(
        &self,
        farm_id: &str,
        history: &dyn FarmHistory,
    ) -> Result<OutbreakRiskReport> {
        self.estimate_for_month(farm_id, Utc::now().month0(), history)
            .await
    }

    /// Month-explicit variant; `month0` is the zero-based calendar month.
    /// A failed history lookup aborts the whole report rather than producing
    /// a silently partial forecast.
    pub async fn estimate_for_month(
        &self,
        farm_id: &str,
        month0: u32,
        history: &dyn FarmHistory,
    ) -> Result<OutbreakRiskReport> {
        if month0 > 11 {
            return Err(HerdOpsError::InvalidData(format!(
                "Month index {} out of range (0-11)",
                month0
            )));
        }

        let outbreaks = history.outbreak_counts(farm_id).await.map_err(|e| {
            HerdOpsError::DataSourceUnavailable(format!(
                "Outbreak history for farm '{}': {}",
                farm_id, e
            ))
        })?;

        let in_winter = self.seasonal.winter_months.contains(&month0);
        let mut risks = BTreeMap::new();

        for (category, pattern) in &self.seasonal.categories {
            let mut risk = pattern.monthly_risk[month0 as usize];

            if outbreaks.get(category).copied().unwrap_or(0) > 0 {
                risk *= self.seasonal.history_multiplier;
            }

            if in_winter {
                risk *= pattern.winter_multiplier;
            }

            risks.insert(
                *category,
                risk.clamp(self.seasonal.risk_floor, self.seasonal.risk_ceiling),
            );
        }

        let recommendations = self.recommendations(&risks);
        tracing::debug!(
            "Outbreak forecast for farm '{}' month {}: {} categories, {} recommendations",
            farm_id,
            month0,
            risks.len(),
            recommendations.len()
        );

        Ok(OutbreakRiskReport {
            farm_id: farm_id.to_string(),
            risks,
            recommendations,
            confidence: FORECAST_CONFIDENCE,
            generated_at: Utc::now(),
        })
    }

    fn recommendations(&self, risks: &BTreeMap<DiseaseCategory, f64>) -> Vec<Mitigation> {
        self.seasonal
            .categories
            .iter()
            .filter_map(|(category, pattern)| {
                let risk = risks.get(category)?;
                if *risk <= pattern.alert_threshold {
                    return None;
                }
                Some(Mitigation {
                    action: pattern.mitigation.action.clone(),
                    priority: pattern.mitigation.priority,
                    message: pattern.mitigation.message.clone(),
                    effectiveness: pattern.mitigation.effectiveness.clone(),
                })
            })
            .collect()
    }
}
