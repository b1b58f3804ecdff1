use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    Cattle,
    Poultry,
    Swine,
    Sheep,
    Goat,
    Fish,
}

impl Species {
    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Cattle => "Cattle",
            Species::Poultry => "Poultry",
            Species::Swine => "Swine",
            Species::Sheep => "Sheep",
            Species::Goat => "Goat",
            Species::Fish => "Fish",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().trim() {
            "cattle" => Some(Species::Cattle),
            "poultry" => Some(Species::Poultry),
            "swine" => Some(Species::Swine),
            "sheep" => Some(Species::Sheep),
            "goat" => Some(Species::Goat),
            "fish" => Some(Species::Fish),
            _ => None,
        }
    }

    pub fn all() -> &'static [Species] {
        &[
            Species::Cattle,
            Species::Poultry,
            Species::Swine,
            Species::Sheep,
            Species::Goat,
            Species::Fish,
        ]
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A livestock group as resolved by the surrounding application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivestockGroup {
    pub id: String,
    pub name: String,
    pub species: Species,
    pub farm_id: String,
    pub head_count: u32,
}

/// One medication event. Created by the caller, consumed read-only by the
/// engine; the dosage stays as entered ("35 mg/kg", "20,000 IU/kg") and is
/// only interpreted numerically by the dosage rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentEvent {
    pub drug_name: String,
    pub dosage_text: String,
    pub administered_on: NaiveDate,
    pub group_id: String,
    pub species: Species,
    pub head_count: u32,
    pub notes: Option<String>,
}

impl TreatmentEvent {
    pub fn new(
        drug_name: impl Into<String>,
        group_id: impl Into<String>,
        species: Species,
        dosage_text: impl Into<String>,
        administered_on: NaiveDate,
    ) -> Self {
        Self {
            drug_name: drug_name.into(),
            dosage_text: dosage_text.into(),
            administered_on,
            group_id: group_id.into(),
            species,
            head_count: 0,
            notes: None,
        }
    }

    pub fn with_head_count(mut self, count: u32) -> Self {
        self.head_count = count;
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }
}
