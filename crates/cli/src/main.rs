//! sprintcast CLI - sprint velocity and completion date projections.

mod load;
mod teams;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use sprintcast_core::normalize_date;
use sprintcast_projection::{SprintCalendar, TimelineBuilder};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sprintcast")]
#[command(about = "Sprint velocity and completion date projections", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a per-day projected timeline from an event log
    Project {
        /// Events file (JSON)
        #[arg(long)]
        events: PathBuf,
        /// Configuration file (JSON)
        #[arg(long)]
        config: PathBuf,
        /// Start of the upcoming sprint (defaults to the next boundary after today)
        #[arg(long)]
        next_sprint_start: Option<String>,
        /// Only project events of this team
        #[arg(long)]
        team: Option<String>,
        /// Project every team separately
        #[arg(long, conflicts_with = "team")]
        by_team: bool,
        /// Write the timeline here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// List the sprint boundaries in a date range
    Boundaries {
        /// Configuration file (JSON)
        #[arg(long)]
        config: PathBuf,
        /// First day of the range
        #[arg(long)]
        from: String,
        /// Last day of the range
        #[arg(long)]
        to: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Project {
            events,
            config,
            next_sprint_start,
            team,
            by_team,
            output,
            pretty,
        } => {
            let config = load::read_config(&config).await?;
            let mut events = load::read_events(&events).await?;
            let builder = TimelineBuilder::new(config)?;

            let next_sprint_start = match next_sprint_start {
                Some(value) => parse_date_arg("--next-sprint-start", &value)?,
                None => builder.calendar().next_boundary_after(Local::now().date_naive()),
            };

            if let Some(team) = &team {
                events = teams::filter_team(events, team);
                info!("Projecting {} events for team {}", events.len(), team);
            }

            let json = if by_team {
                let timelines = teams::project_by_team(builder, events, next_sprint_start).await?;
                to_json(&timelines, pretty)?
            } else {
                let records = builder.build(&events, next_sprint_start)?;
                to_json(&records, pretty)?
            };

            match output {
                Some(path) => {
                    tokio::fs::write(&path, json)
                        .await
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!("Timeline written to {}", path.display());
                }
                None => println!("{}", json),
            }
        }
        Commands::Boundaries { config, from, to } => {
            let config = load::read_config(&config).await?;
            let calendar = SprintCalendar::new(config.any_sprint_boundary, config.days_in_sprint)?;
            let from = parse_date_arg("--from", &from)?;
            let to = parse_date_arg("--to", &to)?;

            for boundary in calendar.boundaries_between(from, to) {
                println!("{}", boundary);
            }
        }
    }

    Ok(())
}

fn parse_date_arg(name: &str, value: &str) -> Result<NaiveDate> {
    normalize_date(value).with_context(|| format!("invalid {} value", name))
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
