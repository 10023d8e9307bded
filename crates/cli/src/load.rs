//! Reading event logs and configuration files.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use sprintcast_core::{Configuration, RawEvent};
use tokio::fs;
use tracing::debug;

/// Accepted layouts of an events file.
#[derive(Deserialize)]
#[serde(untagged)]
enum EventsDocument {
    /// A bare array of events
    Events(Vec<RawEvent>),
    /// The extractor's output, with titles alongside the events
    Extracted { events: Vec<RawEvent> },
}

/// Load events from a JSON file.
pub async fn read_events(path: &Path) -> Result<Vec<RawEvent>> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read events from {}", path.display()))?;

    let document: EventsDocument = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse events in {}", path.display()))?;

    let events = match document {
        EventsDocument::Events(events) => events,
        EventsDocument::Extracted { events } => events,
    };

    debug!("Loaded {} events from {}", events.len(), path.display());
    Ok(events)
}

/// Load and validate a configuration from a JSON file.
pub async fn read_config(path: &Path) -> Result<Configuration> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read configuration from {}", path.display()))?;

    let config: Configuration = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse configuration in {}", path.display()))?;

    config.validate()?;
    Ok(config)
}
