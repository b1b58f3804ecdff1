use super::Species;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Static reference data for one drug, looked up by name in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrugProfile {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Label dosage, kept as text ("0.2 mg/kg", "20,000 IU/kg").
    #[serde(default)]
    pub default_dosage: Option<String>,
    /// Maximum recommended dose (mg/kg) per species. Species without an entry
    /// have no ceiling on record and are not dosage-checked.
    #[serde(default)]
    pub dosage_ceilings: BTreeMap<Species, f64>,
    /// Days after administration before animals or products may be sold.
    pub withdrawal_days: u32,
    /// Species the drug is formally approved for. `None` means no approval
    /// data on record, which disables the off-label check entirely.
    #[serde(default)]
    pub approved_species: Option<BTreeSet<Species>>,
}

impl DrugProfile {
    pub fn dosage_ceiling(&self, species: Species) -> Option<f64> {
        self.dosage_ceilings.get(&species).copied()
    }

    /// `None` when no approval data exists for this drug.
    pub fn is_approved_for(&self, species: Species) -> Option<bool> {
        self.approved_species
            .as_ref()
            .map(|set| set.contains(&species))
    }
}
