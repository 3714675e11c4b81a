//! Sprout CLI - track a child's developmental milestones.

use std::path::PathBuf;
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sprout_core::{AgeMonths, ChildProfile, FullState, ObservationKey, ObservationStatus};
use sprout_progress::{display_name, format_percent, BasicProgressTracker, ProgressTracker, RecommendationKind};
use sprout_storage::{JsonStorage, Storage, StorageConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sprout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Developmental milestone tracker", long_about = None)]
struct Cli {
    /// Data directory
    #[arg(long, global = true, env = "SPROUT_DATA_DIR", default_value = ".sprout")]
    data_dir: PathBuf,

    /// Catalog file used on first init and on reset (built-in catalog if unset)
    #[arg(long, global = true, env = "SPROUT_CATALOG")]
    catalog: Option<PathBuf>,

    /// Log filter, e.g. `info` or `sprout_storage=debug`
    #[arg(long, global = true, env = "SPROUT_LOG", default_value = "info")]
    log_level: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and seed the catalog
    Init,
    /// Set the child profile
    Child {
        /// Child's name
        #[arg(long)]
        name: String,
        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        birth_date: NaiveDate,
        /// Age in months (derived from the birth date if omitted)
        #[arg(long)]
        age: Option<AgeMonths>,
    },
    /// Record a milestone status
    Record {
        /// Area key
        area: String,
        /// Milestone key
        milestone: String,
        /// achieved, not_yet, not_applicable or unset
        status: String,
        /// Age bucket (defaults to the child's current age)
        #[arg(long)]
        age: Option<AgeMonths>,
        /// Notes to store with the observation
        #[arg(long)]
        notes: Option<String>,
    },
    /// Set notes on a milestone without changing its status
    Note {
        /// Area key
        area: String,
        /// Milestone key
        milestone: String,
        /// Notes text
        notes: String,
        /// Age bucket (defaults to the child's current age)
        #[arg(long)]
        age: Option<AgeMonths>,
    },
    /// List age-appropriate milestones with their status
    Checklist,
    /// Show the readiness score
    Score,
    /// Show recommendations
    Recommend,
    /// Show the observation history summary
    Summary {
        /// Number of recent updates to show
        #[arg(long, default_value = "5")]
        limit: usize,
    },
    /// Write the full state as JSON
    Export {
        /// Output file (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Replace the full state from a JSON file
    Import {
        /// Input file
        path: PathBuf,
    },
    /// Restore the catalog and clear all data
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = StorageConfig::new(&cli.data_dir);
    if let Some(catalog) = &cli.catalog {
        config = config.with_catalog(catalog);
    }
    let storage = JsonStorage::new(config)
        .await
        .with_context(|| format!("opening data directory {}", cli.data_dir.display()))?;
    let tracker = BasicProgressTracker::new(storage);

    match cli.command {
        Commands::Init => {
            let catalog = tracker.storage().load_catalog().await?;
            info!("Data directory ready at {}", tracker.storage().root().display());
            println!(
                "Catalog: {} areas, {} milestones",
                catalog.areas().len(),
                catalog.len()
            );
        }
        Commands::Child { name, birth_date, age } => {
            let profile = match age {
                Some(age) => ChildProfile::new(name, birth_date, age)?,
                None => ChildProfile::from_birth_date(name, birth_date, Utc::now().date_naive())?,
            };
            let profile = tracker.set_profile(profile).await?;
            println!("Saved {} ({} months)", profile.name, profile.current_age_months);
        }
        Commands::Record { area, milestone, status, age, notes } => {
            let status = parse_status(&status)?;
            let age = resolve_age(&tracker, age).await?;
            let record = tracker
                .record_observation(ObservationKey::new(age, area, milestone), status, notes)
                .await?;
            if cli.json {
                print_json(&record)?;
            } else {
                println!("Recorded: {}", format_status(record.observed));
            }
        }
        Commands::Note { area, milestone, notes, age } => {
            let age = resolve_age(&tracker, age).await?;
            let record = tracker
                .record_notes(ObservationKey::new(age, area, milestone), notes)
                .await?;
            if cli.json {
                print_json(&record)?;
            } else {
                println!("Notes saved ({})", format_status(record.observed));
            }
        }
        Commands::Checklist => {
            let entries = tracker.checklist().await?;
            if cli.json {
                print_json(&entries)?;
            } else if entries.is_empty() {
                println!("No age-appropriate milestones. Set up the child profile first.");
            } else {
                let mut current_area = "";
                for entry in &entries {
                    if entry.area != current_area {
                        println!("{}", display_name(&entry.area).to_uppercase());
                        current_area = entry.area.as_str();
                    }
                    println!(
                        "  [{}] {} ({}-{} months, {})",
                        format_status(entry.record.observed),
                        entry.description,
                        entry.typical_age_range.min,
                        entry.typical_age_range.max,
                        entry.importance,
                    );
                }
            }
        }
        Commands::Score => {
            let report = tracker.report().await?;
            if cli.json {
                print_json(&report)?;
            } else if let Some(profile) = &report.profile {
                println!("{} ({} months)", profile.name, profile.current_age_months);
                println!(
                    "  Progress: {} of {} age-appropriate milestones achieved ({}%)",
                    report.overview.achieved,
                    report.overview.total,
                    format_percent(report.overview.achieved, report.overview.total)
                );
                println!(
                    "  Readiness: {}% ({}/{})",
                    report.readiness.percentage, report.readiness.score, report.readiness.max_score
                );
                for area in &report.readiness.per_area {
                    println!(
                        "  {}: {}/{} ({}%)",
                        display_name(&area.area),
                        area.achieved,
                        area.total,
                        format_percent(area.achieved, area.total)
                    );
                }
                for warning in &report.readiness.warnings {
                    println!("  warning: {}", warning);
                }
            } else {
                println!("No child profile set.");
            }
        }
        Commands::Recommend => {
            let report = tracker.report().await?;
            if cli.json {
                print_json(&report.recommendations)?;
            } else if !report.has_profile() {
                println!("No child profile set.");
            } else if report.recommendations.is_empty() {
                println!("No specific recommendations at this time. Keep up the good work!");
            } else {
                for rec in &report.recommendations {
                    println!("[{}] {}", format_kind(rec.kind), rec.message);
                    for item in rec.items.iter().flatten() {
                        println!("    - {}", item);
                    }
                }
            }
        }
        Commands::Summary { limit } => {
            let summary = tracker.summary().await?;
            if cli.json {
                print_json(&summary)?;
            } else {
                println!("Total observations: {}", summary.total_observations);
                println!("Areas tracked: {}", summary.areas_tracked());
                for (area, counts) in &summary.per_area {
                    println!("  {}: {}/{}", display_name(area), counts.achieved, counts.total);
                }
                println!("Latest updates:");
                for update in summary.latest(limit) {
                    println!(
                        "  {} {} ({})",
                        update.date,
                        update.description.as_deref().unwrap_or(&update.milestone),
                        display_name(&update.area)
                    );
                }
                for warning in &summary.warnings {
                    println!("warning: {}", warning);
                }
            }
        }
        Commands::Export { output } => {
            let state = tracker.export().await?;
            let json = serde_json::to_string_pretty(&state)?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, json)
                        .await
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!("Exported state to {}", path.display());
                }
                None => println!("{}", json),
            }
        }
        Commands::Import { path } => {
            let json = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            let state: FullState = serde_json::from_str(&json)
                .with_context(|| format!("{} is not a valid export", path.display()))?;
            let summary = tracker.import(state).await?;
            println!("Imported {} observations", summary.total_observations);
            for warning in &summary.warnings {
                println!("warning: {}", warning);
            }
        }
        Commands::Reset => {
            tracker.reset().await?;
            println!("Data reset");
        }
    }

    Ok(())
}

async fn resolve_age<S: Storage + 'static>(
    tracker: &BasicProgressTracker<S>,
    age: Option<AgeMonths>,
) -> Result<AgeMonths> {
    if let Some(age) = age {
        return Ok(age);
    }
    tracker
        .export()
        .await?
        .current_age()
        .ok_or_else(|| anyhow::anyhow!("No child profile set; pass --age or run `sprout child` first"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_status(s: &str) -> Result<ObservationStatus> {
    s.parse().map_err(|e: String| anyhow::anyhow!(e))
}

fn format_status(status: ObservationStatus) -> &'static str {
    match status {
        ObservationStatus::Achieved => "ACHIEVED",
        ObservationStatus::NotYet => "NOT YET",
        ObservationStatus::NotApplicable => "N/A",
        ObservationStatus::Unset => "-",
    }
}

fn format_kind(kind: RecommendationKind) -> &'static str {
    match kind {
        RecommendationKind::Warning => "WARNING",
        RecommendationKind::Priority => "PRIORITY",
        RecommendationKind::Success => "SUCCESS",
        RecommendationKind::Alert => "ALERT",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_record_command() {
        let cli = Cli::try_parse_from([
            "sprout", "record", "language", "first_words", "achieved", "--age", "12", "--notes", "mama",
        ])
        .unwrap();
        match cli.command {
            Commands::Record { area, milestone, status, age, notes } => {
                assert_eq!(area, "language");
                assert_eq!(milestone, "first_words");
                assert_eq!(parse_status(&status).unwrap(), ObservationStatus::Achieved);
                assert_eq!(age, Some(AgeMonths::new(12)));
                assert_eq!(notes.as_deref(), Some("mama"));
            }
            _ => panic!("expected record command"),
        }
    }

    #[test]
    fn test_negative_age_is_rejected() {
        let err = Cli::try_parse_from(["sprout", "note", "motor", "walk", "x", "--age=-3"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(err.to_string().contains("Invalid age"));

        let cli = Cli::try_parse_from(["sprout", "note", "motor", "walk", "x", "--age=7"]).unwrap();
        assert!(matches!(cli.command, Commands::Note { age: Some(age), .. } if age == AgeMonths::new(7)));
    }

    #[test]
    fn test_parse_status_variants() {
        assert_eq!(parse_status("not-yet").unwrap(), ObservationStatus::NotYet);
        assert_eq!(parse_status("N/A").unwrap(), ObservationStatus::NotApplicable);
        assert!(parse_status("soon").is_err());
    }
}
