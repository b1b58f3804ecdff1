pub mod catalog;
pub mod datasources;
pub mod error;
pub mod logic;
pub mod models;

pub use catalog::RuleCatalog;
pub use error::{HerdOpsError, Result};
pub use logic::{OutbreakEstimator, RulesEngine, TreatmentAnalyzer};
