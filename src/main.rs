mod cli;

use anyhow::Context;
use chrono::{Datelike, Utc};
use clap::Parser;
use cli::{Cli, Commands};
use herdops::datasources::{MemoryFarmHistory, MemoryUsageHistory};
use herdops::logic::withdrawal;
use herdops::models::TreatmentEvent;
use herdops::{OutbreakEstimator, RuleCatalog, TreatmentAnalyzer};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "herdops=debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let catalog = Arc::new(RuleCatalog::load(cli.catalog.clone()).context("loading catalog")?);

    match cli.command {
        Commands::Analyze {
            drug,
            species,
            dosage,
            group,
            date,
            recent_uses,
        } => {
            let administered = date.unwrap_or_else(|| Utc::now().date_naive());
            let event = TreatmentEvent::new(&drug, &group, species, &dosage, administered);

            let mut usage = MemoryUsageHistory::new();
            usage.set_count(&drug, &group, recent_uses.unwrap_or(0));

            let analyzer = TreatmentAnalyzer::new(catalog);
            let nonce = Utc::now().timestamp_millis().to_string();
            let assessment = analyzer.assess(&event, &usage, &nonce).await?;

            println!("{}", serde_json::to_string_pretty(&assessment)?);
        }
        Commands::Withdrawal { drug, date, sale } => {
            let profile = catalog.require_drug(&drug)?;
            let end = withdrawal::withdrawal_end(date, profile.withdrawal_days);

            let output = serde_json::json!({
                "drug": profile.name,
                "administered_on": date,
                "withdrawal_days": profile.withdrawal_days,
                "withdrawal_end": end,
                "compliance": sale.map(|s| {
                    withdrawal::check_compliance(end, s, profile.withdrawal_days)
                }),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Outbreak { farm, month, prior } => {
            let month0 = match month {
                Some(m) if (1..=12).contains(&m) => m - 1,
                Some(m) => anyhow::bail!("month {} out of range (1-12)", m),
                None => Utc::now().month0(),
            };

            let mut history = MemoryFarmHistory::new();
            for (category, count) in prior {
                history.record_outbreaks(&farm, category, count);
            }

            let estimator = OutbreakEstimator::new(catalog.seasonal.clone());
            let report = estimator.estimate_for_month(&farm, month0, &history).await?;

            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Drugs => {
            let drugs: Vec<_> = catalog
                .drugs
                .values()
                .map(|d| {
                    serde_json::json!({
                        "name": d.name,
                        "description": d.description,
                        "default_dosage": d.default_dosage,
                        "withdrawal_days": d.withdrawal_days,
                        "approved_species": d.approved_species,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&drugs)?);
        }
    }

    Ok(())
}
