pub mod analyzer;
pub mod fingerprint;
pub mod outbreak;
pub mod rules;
pub mod withdrawal;

pub use analyzer::{TreatmentAnalyzer, TreatmentAssessment};
pub use outbreak::OutbreakEstimator;
pub use rules::RulesEngine;
