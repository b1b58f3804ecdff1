pub mod memory;

pub use memory::{
    MemoryFarmHistory, MemoryGroupDirectory, MemoryTreatmentLedger, MemoryUsageHistory,
};

use crate::error::Result;
use crate::models::{DiseaseCategory, LivestockGroup, TreatmentEvent};
use async_trait::async_trait;
use std::collections::HashMap;

/// Resolves group identifiers to group records. Owned by the surrounding
/// application; the engine only consumes it.
#[async_trait]
pub trait GroupDirectory: Send + Sync {
    async fn lookup(&self, group_id: &str) -> Result<LivestockGroup>;
}

/// Supplies the frequency-of-use count for the frequent-use check.
#[async_trait]
pub trait UsageHistory: Send + Sync {
    /// Same-drug treatments recorded for the group within the trailing
    /// window, excluding the event currently under evaluation.
    async fn count_recent_treatments(
        &self,
        drug_name: &str,
        group_id: &str,
        window_days: u32,
    ) -> Result<u32>;
}

/// Supplies per-category prior outbreak counts for a farm.
#[async_trait]
pub trait FarmHistory: Send + Sync {
    async fn outbreak_counts(&self, farm_id: &str) -> Result<HashMap<DiseaseCategory, u32>>;
}

/// Supplies recorded treatments for sale-readiness checks.
#[async_trait]
pub trait TreatmentLedger: Send + Sync {
    async fn treatments_for_group(&self, group_id: &str) -> Result<Vec<TreatmentEvent>>;
}
