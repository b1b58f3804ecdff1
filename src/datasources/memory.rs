use super::{FarmHistory, GroupDirectory, TreatmentLedger, UsageHistory};
use crate::error::{HerdOpsError, Result};
use crate::models::{DiseaseCategory, LivestockGroup, TreatmentEvent};
use async_trait::async_trait;
use std::collections::HashMap;

// In-memory stand-ins for the persistence layer, used by tests and the CLI.
// Fakes of external collaborators, not a storage engine.

#[derive(Debug, Default)]
pub struct MemoryGroupDirectory {
    groups: HashMap<String, LivestockGroup>,
}

impl MemoryGroupDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, group: LivestockGroup) {
        self.groups.insert(group.id.clone(), group);
    }
}

#[async_trait]
impl GroupDirectory for MemoryGroupDirectory {
    async fn lookup(&self, group_id: &str) -> Result<LivestockGroup> {
        self.groups
            .get(group_id)
            .cloned()
            .ok_or_else(|| HerdOpsError::NotFound(format!("Livestock group '{}'", group_id)))
    }
}

#[derive(Debug, Default)]
pub struct MemoryUsageHistory {
    counts: HashMap<(String, String), u32>,
}

impl MemoryUsageHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_count(&mut self, drug_name: &str, group_id: &str, count: u32) {
        self.counts
            .insert((drug_name.to_string(), group_id.to_string()), count);
    }
}

#[async_trait]
impl UsageHistory for MemoryUsageHistory {
    async fn count_recent_treatments(
        &self,
        drug_name: &str,
        group_id: &str,
        _window_days: u32,
    ) -> Result<u32> {
        Ok(self
            .counts
            .get(&(drug_name.to_string(), group_id.to_string()))
            .copied()
            .unwrap_or(0))
    }
}

#[derive(Debug, Default)]
pub struct MemoryFarmHistory {
    outbreaks: HashMap<String, HashMap<DiseaseCategory, u32>>,
}

impl MemoryFarmHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_outbreaks(&mut self, farm_id: &str, category: DiseaseCategory, count: u32) {
        self.outbreaks
            .entry(farm_id.to_string())
            .or_default()
            .insert(category, count);
    }
}

#[async_trait]
impl FarmHistory for MemoryFarmHistory {
    async fn outbreak_counts(&self, farm_id: &str) -> Result<HashMap<DiseaseCategory, u32>> {
        Ok(self.outbreaks.get(farm_id).cloned().unwrap_or_default())
    }
}

#[derive(Debug, Default)]
pub struct MemoryTreatmentLedger {
    by_group: HashMap<String, Vec<TreatmentEvent>>,
}

impl MemoryTreatmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: TreatmentEvent) {
        self.by_group
            .entry(event.group_id.clone())
            .or_default()
            .push(event);
    }
}

#[async_trait]
impl TreatmentLedger for MemoryTreatmentLedger {
    async fn treatments_for_group(&self, group_id: &str) -> Result<Vec<TreatmentEvent>> {
        Ok(self.by_group.get(group_id).cloned().unwrap_or_default())
    }
}
