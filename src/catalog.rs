use crate::error::{HerdOpsError, Result};
use crate::models::{DiseaseCategory, DrugProfile, Priority, Species};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// All reference tables the engine evaluates against: drug profiles, rule
/// thresholds, and the seasonal risk curves. Injected at construction so
/// deployments can revise the tables without touching rule code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleCatalog {
    pub drugs: BTreeMap<String, DrugProfile>,
    #[serde(default)]
    pub evaluator: EvaluatorSettings,
    pub seasonal: SeasonalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorSettings {
    /// Multiplier over the per-species ceiling before a dosage is flagged.
    /// Tolerates formulation and rounding noise while catching gross overdose.
    #[serde(default = "default_overdose_margin")]
    pub overdose_margin: f64,
    /// Same-drug treatments allowed per group within the window before the
    /// frequent-use warning fires.
    #[serde(default = "default_max_recent_uses")]
    pub max_recent_uses: u32,
    #[serde(default = "default_usage_window_days")]
    pub usage_window_days: u32,
}

fn default_overdose_margin() -> f64 {
    1.5
}

fn default_max_recent_uses() -> u32 {
    2
}

fn default_usage_window_days() -> u32 {
    30
}

impl Default for EvaluatorSettings {
    fn default() -> Self {
        Self {
            overdose_margin: default_overdose_margin(),
            max_recent_uses: default_max_recent_uses(),
            usage_window_days: default_usage_window_days(),
        }
    }
}

/// Seasonal outbreak tables. The winter window and its multipliers are
/// unvalidated heuristics kept as configuration so they can be revised
/// without touching the estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalConfig {
    pub categories: BTreeMap<DiseaseCategory, CategoryPattern>,
    /// Applied when the farm has at least one prior outbreak of a category.
    pub history_multiplier: f64,
    /// Zero-based month indices counted as winter.
    pub winter_months: Vec<u32>,
    pub risk_floor: f64,
    pub risk_ceiling: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPattern {
    /// Informational label for the peak season ("Winter", "Monsoon", ...).
    pub peak: String,
    /// Base risk per calendar month, January first.
    pub monthly_risk: [f64; 12],
    /// Applied during the winter window on top of the monthly base.
    pub winter_multiplier: f64,
    /// Risk level above which the category's mitigation is recommended.
    pub alert_threshold: f64,
    pub mitigation: MitigationTemplate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MitigationTemplate {
    pub action: String,
    pub priority: Priority,
    pub message: String,
    pub effectiveness: String,
}

impl RuleCatalog {
    pub fn drug(&self, name: &str) -> Option<&DrugProfile> {
        self.drugs.get(name)
    }

    pub fn require_drug(&self, name: &str) -> Result<&DrugProfile> {
        self.drug(name)
            .ok_or_else(|| HerdOpsError::NotFound(format!("Drug '{}'", name)))
    }

    /// Loads the catalog from `path_override`, then `config/catalog.yaml`,
    /// then the XDG config directory. Falls back to the compiled-in tables
    /// when no file exists, so the engine works with zero configuration.
    pub fn load(path_override: Option<PathBuf>) -> Result<Self> {
        let path = match path_override {
            Some(p) => {
                if !p.exists() {
                    return Err(HerdOpsError::Config(format!(
                        "Catalog file not found at {:?}",
                        p
                    )));
                }
                Some(p)
            }
            None => Self::find_catalog_path(),
        };

        match path {
            Some(p) => {
                tracing::info!("Loading rule catalog from {}", p.display());
                let raw = std::fs::read_to_string(&p)
                    .map_err(|e| HerdOpsError::Config(format!("Failed to read catalog: {}", e)))?;
                Self::from_yaml_str(&raw)
            }
            None => {
                tracing::debug!("No catalog file found, using built-in tables");
                Ok(Self::builtin())
            }
        }
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let substituted = Self::substitute_env_vars(raw);
        let catalog: RuleCatalog = serde_yaml::from_str(&substituted)
            .map_err(|e| HerdOpsError::Config(format!("Failed to parse catalog: {}", e)))?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<()> {
        if self.seasonal.risk_floor >= self.seasonal.risk_ceiling {
            return Err(HerdOpsError::Config(format!(
                "Risk floor {} must be below ceiling {}",
                self.seasonal.risk_floor, self.seasonal.risk_ceiling
            )));
        }
        if let Some(month) = self.seasonal.winter_months.iter().find(|m| **m > 11) {
            return Err(HerdOpsError::Config(format!(
                "Winter month index {} out of range (0-11)",
                month
            )));
        }
        Ok(())
    }

    fn find_catalog_path() -> Option<PathBuf> {
        let local = PathBuf::from("config/catalog.yaml");
        if local.exists() {
            return Some(local);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg = config_dir.join("herdops").join("catalog.yaml");
            if xdg.exists() {
                return Some(xdg);
            }
        }

        None
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        // Find all ${VAR_NAME} patterns and substitute
        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }

    /// Reference tables for the five drugs the original field deployments
    /// tracked, plus the seasonal disease curves.
    pub fn builtin() -> Self {
        let mut drugs = BTreeMap::new();

        drugs.insert(
            "Oxytetracycline".to_string(),
            DrugProfile {
                name: "Oxytetracycline".into(),
                description: Some(
                    "Antibiotic for respiratory and gastrointestinal infections".into(),
                ),
                default_dosage: Some("10 mg/kg".into()),
                dosage_ceilings: BTreeMap::from([
                    (Species::Cattle, 20.0),
                    (Species::Poultry, 15.0),
                    (Species::Swine, 15.0),
                    (Species::Sheep, 18.0),
                    (Species::Goat, 16.0),
                    (Species::Fish, 10.0),
                ]),
                withdrawal_days: 18,
                approved_species: Some(BTreeSet::from([
                    Species::Cattle,
                    Species::Poultry,
                    Species::Swine,
                    Species::Sheep,
                    Species::Goat,
                    Species::Fish,
                ])),
            },
        );

        drugs.insert(
            "Penicillin G".to_string(),
            DrugProfile {
                name: "Penicillin G".into(),
                description: Some("Broad-spectrum antibiotic for bacterial infections".into()),
                default_dosage: Some("20,000 IU/kg".into()),
                dosage_ceilings: BTreeMap::from([
                    (Species::Cattle, 25.0),
                    (Species::Poultry, 20.0),
                    (Species::Swine, 22.0),
                    (Species::Sheep, 24.0),
                    (Species::Goat, 21.0),
                ]),
                withdrawal_days: 10,
                approved_species: Some(BTreeSet::from([
                    Species::Cattle,
                    Species::Poultry,
                    Species::Swine,
                    Species::Sheep,
                    Species::Goat,
                ])),
            },
        );

        drugs.insert(
            "Ivermectin".to_string(),
            DrugProfile {
                name: "Ivermectin".into(),
                description: Some("Antiparasitic for internal and external parasites".into()),
                default_dosage: Some("0.2 mg/kg".into()),
                dosage_ceilings: BTreeMap::from([
                    (Species::Cattle, 0.2),
                    (Species::Swine, 0.3),
                    (Species::Sheep, 0.25),
                    (Species::Goat, 0.22),
                ]),
                withdrawal_days: 28,
                approved_species: Some(BTreeSet::from([
                    Species::Cattle,
                    Species::Swine,
                    Species::Sheep,
                    Species::Goat,
                ])),
            },
        );

        drugs.insert(
            "Flunixin Meglumine".to_string(),
            DrugProfile {
                name: "Flunixin Meglumine".into(),
                description: Some("Anti-inflammatory for pain and fever".into()),
                default_dosage: Some("2.2 mg/kg".into()),
                dosage_ceilings: BTreeMap::from([
                    (Species::Cattle, 2.2),
                    (Species::Swine, 2.0),
                    (Species::Sheep, 1.8),
                ]),
                withdrawal_days: 5,
                approved_species: Some(BTreeSet::from([
                    Species::Cattle,
                    Species::Swine,
                    Species::Sheep,
                ])),
            },
        );

        drugs.insert(
            "Enrofloxacin".to_string(),
            DrugProfile {
                name: "Enrofloxacin".into(),
                description: Some("Broad-spectrum antibiotic for serious infections".into()),
                default_dosage: Some("5 mg/kg".into()),
                dosage_ceilings: BTreeMap::from([
                    (Species::Cattle, 5.0),
                    (Species::Poultry, 3.5),
                    (Species::Swine, 4.5),
                ]),
                withdrawal_days: 14,
                approved_species: Some(BTreeSet::from([
                    Species::Poultry,
                    Species::Swine,
                    Species::Cattle,
                ])),
            },
        );

        let mut categories = BTreeMap::new();

        categories.insert(
            DiseaseCategory::Respiratory,
            CategoryPattern {
                peak: "Winter".into(),
                monthly_risk: [0.1, 0.3, 0.8, 0.6, 0.2, 0.1, 0.1, 0.2, 0.3, 0.5, 0.7, 0.9],
                winter_multiplier: 1.4,
                alert_threshold: 0.6,
                mitigation: MitigationTemplate {
                    action: "enhanced_biosecurity".into(),
                    priority: Priority::High,
                    message: "High respiratory disease risk. Improve ventilation and isolation \
                              protocols. Consider vaccination."
                        .into(),
                    effectiveness: "85% risk reduction".into(),
                },
            },
        );

        categories.insert(
            DiseaseCategory::Gastrointestinal,
            CategoryPattern {
                peak: "Monsoon".into(),
                monthly_risk: [0.3, 0.2, 0.1, 0.1, 0.2, 0.6, 0.9, 0.8, 0.4, 0.2, 0.1, 0.2],
                winter_multiplier: 0.8,
                alert_threshold: 0.5,
                mitigation: MitigationTemplate {
                    action: "water_sanitation".into(),
                    priority: Priority::Medium,
                    message: "Elevated GI disease risk. Check water quality, feed sanitation, \
                              and parasite control."
                        .into(),
                    effectiveness: "70% risk reduction".into(),
                },
            },
        );

        categories.insert(
            DiseaseCategory::Parasitic,
            CategoryPattern {
                peak: "Summer".into(),
                monthly_risk: [0.2, 0.3, 0.5, 0.7, 0.9, 0.8, 0.6, 0.4, 0.3, 0.2, 0.1, 0.2],
                winter_multiplier: 0.8,
                alert_threshold: 0.4,
                mitigation: MitigationTemplate {
                    action: "parasite_control".into(),
                    priority: Priority::Medium,
                    message: "Increased parasitic disease risk. Implement strategic deworming \
                              program."
                        .into(),
                    effectiveness: "90% risk reduction".into(),
                },
            },
        );

        Self {
            drugs,
            evaluator: EvaluatorSettings::default(),
            seasonal: SeasonalConfig {
                categories,
                history_multiplier: 1.3,
                winter_months: vec![11, 0, 1],
                risk_floor: 0.10,
                risk_ceiling: 0.95,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_reference_drugs() {
        let catalog = RuleCatalog::builtin();
        for name in [
            "Oxytetracycline",
            "Penicillin G",
            "Ivermectin",
            "Flunixin Meglumine",
            "Enrofloxacin",
        ] {
            assert!(catalog.drug(name).is_some(), "missing {}", name);
        }

        let oxy = catalog.drug("Oxytetracycline").unwrap();
        assert_eq!(oxy.withdrawal_days, 18);
        assert_eq!(oxy.dosage_ceiling(Species::Cattle), Some(20.0));
        assert_eq!(oxy.is_approved_for(Species::Fish), Some(true));
    }

    #[test]
    fn require_drug_unknown_is_not_found() {
        let catalog = RuleCatalog::builtin();
        let err = catalog.require_drug("Tylosin").unwrap_err();
        assert!(matches!(err, HerdOpsError::NotFound(_)));
    }

    #[test]
    fn builtin_seasonal_tables() {
        let seasonal = RuleCatalog::builtin().seasonal;
        assert_eq!(seasonal.winter_months, vec![11, 0, 1]);
        assert_eq!(seasonal.history_multiplier, 1.3);

        let respiratory = &seasonal.categories[&DiseaseCategory::Respiratory];
        assert_eq!(respiratory.monthly_risk[11], 0.9);
        assert_eq!(respiratory.winter_multiplier, 1.4);
        assert_eq!(respiratory.alert_threshold, 0.6);
    }

    #[test]
    fn yaml_round_trip() {
        let catalog = RuleCatalog::builtin();
        let yaml = serde_yaml::to_string(&catalog).unwrap();
        let parsed = RuleCatalog::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed.drugs.len(), catalog.drugs.len());
        assert_eq!(
            parsed.seasonal.categories.len(),
            catalog.seasonal.categories.len()
        );
    }

    #[test]
    fn invalid_winter_month_rejected() {
        let mut catalog = RuleCatalog::builtin();
        catalog.seasonal.winter_months = vec![12];
        let yaml = serde_yaml::to_string(&catalog).unwrap();
        assert!(RuleCatalog::from_yaml_str(&yaml).is_err());
    }
}
