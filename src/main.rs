use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{Datelike, Local, NaiveDateTime};
use clap::{Parser, Subcommand};

mod availability;
mod models;
mod plan;
mod schedule;

use models::{PlanRow, Provider, SearchResponse};

#[derive(Parser)]
#[command(name = "sprechzeiten")]
#[command(about = "Phone office-hours planner for saved 116117 therapist search results", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List providers reachable by phone at the reference instant
    Now {
        /// Saved JSON search response
        #[arg(long)]
        input: PathBuf,
        /// Reference instant as "YYYY-MM-DD HH:MM" (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },
    /// List the next upcoming phone reachability windows within seven days
    Next {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        at: Option<String>,
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Export contact and weekly plan sheets as CSV
    Export {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "praxisdaten.csv")]
        contacts: PathBuf,
        #[arg(long, default_value = "wochenplan.csv")]
        plan: PathBuf,
    },
    /// Show today's call list from an exported weekly plan
    Today {
        #[arg(long)]
        plan: PathBuf,
        #[arg(long)]
        at: Option<String>,
    },
}

fn parse_at(at: Option<&str>) -> anyhow::Result<NaiveDateTime> {
    match at {
        Some(raw) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M")
            .with_context(|| format!("invalid --at value '{raw}', expected YYYY-MM-DD HH:MM")),
        None => Ok(Local::now().naive_local()),
    }
}

fn load_providers(path: &Path) -> anyhow::Result<Vec<Provider>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let response: SearchResponse = serde_json::from_str(&raw).with_context(|| {
        format!(
            "{} is not a valid search response (missing 'arztPraxisDatas'?)",
            path.display()
        )
    })?;
    Ok(response.providers)
}

fn load_plan(path: &Path) -> anyhow::Result<Vec<PlanRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut rows = Vec::new();
    for result in reader.deserialize::<PlanRow>() {
        rows.push(result.with_context(|| format!("malformed plan row in {}", path.display()))?);
    }
    Ok(rows)
}

fn write_csv<T: serde::Serialize>(path: &Path, rows: &[T]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Now { input, at } => {
            let providers = load_providers(&input)?;
            let at = parse_at(at.as_deref())?;
            let day = schedule::weekday_label(at.date().weekday());

            let mut reachable = 0usize;
            for provider in &providers {
                if !availability::reachable_now(provider, at) {
                    continue;
                }
                reachable += 1;
                let windows = availability::today_windows(provider, at);
                println!(
                    "- {} (Tel: {}) today {}",
                    provider.name,
                    provider.tel,
                    windows.join(", ")
                );
            }

            if reachable == 0 {
                println!("No providers reachable on {} at {}.", day, at.format("%H:%M"));
            } else {
                println!("{reachable} providers reachable right now.");
            }
        }
        Commands::Next { input, at, limit } => {
            let providers = load_providers(&input)?;
            let at = parse_at(at.as_deref())?;
            let windows = availability::next_available_windows(&providers, at, limit);

            if windows.is_empty() {
                println!("No upcoming phone windows within the next seven days.");
                return Ok(());
            }

            println!("Next reachable phone windows:");
            for window in &windows {
                let place = if window.ort.is_empty() {
                    String::new()
                } else {
                    format!(", {}", window.ort)
                };
                println!(
                    "- {} {} {}-{}: {} (Tel: {}){}",
                    schedule::weekday_label(window.start.date().weekday()),
                    window.start.format("%Y-%m-%d"),
                    window.start.format("%H:%M"),
                    window.end.format("%H:%M"),
                    window.name,
                    window.tel,
                    place
                );
            }
        }
        Commands::Export {
            input,
            contacts,
            plan: plan_path,
        } => {
            let providers = load_providers(&input)?;

            let contact_rows = plan::contact_rows(&providers);
            write_csv(&contacts, &contact_rows)?;

            let plan_rows = plan::weekly_plan(&providers);
            write_csv(&plan_path, &plan_rows)?;

            println!(
                "Wrote {} contacts to {} and {} plan rows to {}.",
                contact_rows.len(),
                contacts.display(),
                plan_rows.len(),
                plan_path.display()
            );
        }
        Commands::Today { plan: plan_path, at } => {
            let rows = load_plan(&plan_path)?;
            let at = parse_at(at.as_deref())?;
            let day = schedule::weekday_label(at.date().weekday());
            let today = plan::rows_for_day(&rows, at);

            if today.is_empty() {
                println!("No contacts scheduled for {day}.");
                return Ok(());
            }

            println!("Contacts for {day}:");
            for row in &today {
                println!("- {} Uhr: {}", row.uhrzeit, row.kontakte);
            }
            println!("{} calls on today's list.", today.len());
        }
    }

    Ok(())
}
