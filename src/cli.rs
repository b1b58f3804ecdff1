use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use herdops::models::{DiseaseCategory, Species};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "herdops", version, about = "Livestock treatment safety and compliance checks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to catalog.yaml (defaults to config/catalog.yaml, then XDG,
    /// then the built-in tables)
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate one treatment event and print the creation-time assessment
    Analyze {
        #[arg(long)]
        drug: String,
        #[arg(long, value_parser = parse_species)]
        species: Species,
        /// Dosage as entered, e.g. "35 mg/kg"
        #[arg(long)]
        dosage: String,
        #[arg(long)]
        group: String,
        /// Administration date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Same-drug treatments for this group in the past 30 days
        #[arg(long)]
        recent_uses: Option<u32>,
    },
    /// Compute the withdrawal end date and check a planned sale against it
    Withdrawal {
        #[arg(long)]
        drug: String,
        /// Administration date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Planned sale date (YYYY-MM-DD)
        #[arg(long)]
        sale: Option<NaiveDate>,
    },
    /// Forecast per-category outbreak risk for a farm
    Outbreak {
        #[arg(long)]
        farm: String,
        /// Calendar month 1-12, defaults to the current month
        #[arg(long)]
        month: Option<u32>,
        /// Prior outbreak counts, e.g. --prior Respiratory=2 (repeatable)
        #[arg(long, value_parser = parse_prior)]
        prior: Vec<(DiseaseCategory, u32)>,
    },
    /// List the drugs in the active catalog
    Drugs,
}

fn parse_species(s: &str) -> Result<Species, String> {
    Species::from_str(s).ok_or_else(|| {
        format!(
            "unknown species '{}' (expected one of: {})",
            s,
            Species::all()
                .iter()
                .map(|sp| sp.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    })
}

fn parse_prior(s: &str) -> Result<(DiseaseCategory, u32), String> {
    let (name, count) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CATEGORY=COUNT, got '{}'", s))?;
    let category = DiseaseCategory::from_str(name)
        .ok_or_else(|| format!("unknown disease category '{}'", name))?;
    let count: u32 = count
        .parse()
        .map_err(|_| format!("invalid count '{}'", count))?;
    Ok((category, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prior_pairs_parse() {
        assert_eq!(
            parse_prior("Respiratory=2"),
            Ok((DiseaseCategory::Respiratory, 2))
        );
        assert!(parse_prior("Respiratory").is_err());
        assert!(parse_prior("Scurvy=1").is_err());
        assert!(parse_prior("Parasitic=many").is_err());
    }

    #[test]
    fn species_parser_rejects_unknown() {
        assert_eq!(parse_species("goat"), Ok(Species::Goat));
        assert!(parse_species("llama").is_err());
    }
}
