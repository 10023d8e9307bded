//! Per-team splitting and projection.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sprintcast_core::{RawEvent, TimelineRecord};
use sprintcast_projection::TimelineBuilder;
use tracing::info;

/// Team key for events that carry no team.
pub const NO_TEAM: &str = "(none)";

/// Keep only the events of `team`.
pub fn filter_team(events: Vec<RawEvent>, team: &str) -> Vec<RawEvent> {
    events
        .into_iter()
        .filter(|event| event.team.as_deref() == Some(team))
        .collect()
}

/// Split events by team; events without one go under [`NO_TEAM`].
pub fn partition_by_team(events: Vec<RawEvent>) -> BTreeMap<String, Vec<RawEvent>> {
    let mut teams: BTreeMap<String, Vec<RawEvent>> = BTreeMap::new();

    for event in events {
        let team = event.team.clone().unwrap_or_else(|| NO_TEAM.to_string());
        teams.entry(team).or_default().push(event);
    }

    teams
}

/// Run one independent projection per team, concurrently.
pub async fn project_by_team(
    builder: TimelineBuilder,
    events: Vec<RawEvent>,
    next_sprint_start: NaiveDate,
) -> Result<BTreeMap<String, Vec<TimelineRecord>>> {
    let builder = Arc::new(builder);
    let mut handles = Vec::new();

    for (team, team_events) in partition_by_team(events) {
        let builder = Arc::clone(&builder);
        let handle = tokio::task::spawn_blocking(move || builder.build(&team_events, next_sprint_start));
        handles.push((team, handle));
    }

    info!("Projecting {} teams", handles.len());

    let mut timelines = BTreeMap::new();
    for (team, handle) in handles {
        let records = handle
            .await?
            .with_context(|| format!("projection failed for team {}", team))?;
        timelines.insert(team, records);
    }

    Ok(timelines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprintcast_core::{Configuration, StateBuckets, StatsTriple};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sized(date: &str, remaining: f64, completed: f64) -> RawEvent {
        RawEvent::new(date).with_features_estimated_size(StateBuckets::new(0.0, 0.0, remaining, completed))
    }

    #[test]
    fn test_partition_by_team() {
        let events = vec![
            RawEvent::new("2023-01-01").with_team("Core"),
            RawEvent::new("2023-01-01"),
            RawEvent::new("2023-01-02").with_team("Core"),
            RawEvent::new("2023-01-02").with_team("Web"),
        ];

        let teams = partition_by_team(events.clone());
        assert_eq!(teams.keys().collect::<Vec<_>>(), vec![NO_TEAM, "Core", "Web"]);
        assert_eq!(teams["Core"].len(), 2);

        assert_eq!(filter_team(events, "Web").len(), 1);
    }

    #[tokio::test]
    async fn test_project_by_team_keeps_teams_apart() {
        let events = vec![
            sized("2023-01-01", 40.0, 10.0).with_team("Core"),
            sized("2023-01-15", 30.0, 30.0).with_team("Core"),
            sized("2023-01-01", 5.0, 2.0).with_team("Web"),
            sized("2023-01-03", 4.0, 3.0).with_team("Web"),
            sized("2023-01-10", 1.0, 0.0),
        ];
        let builder = TimelineBuilder::new(Configuration::new(ymd(2023, 1, 1))).unwrap();

        let timelines = project_by_team(builder, events, ymd(2023, 1, 15)).await.unwrap();

        assert_eq!(timelines.keys().collect::<Vec<_>>(), vec![NO_TEAM, "Core", "Web"]);

        let core = &timelines["Core"];
        assert_eq!(core.len(), 15);
        assert_eq!(core[0].velocity, Some(10.0));
        assert_eq!(core[14].velocity, Some(20.0));
        assert_eq!(core[14].velocity_stats, Some(StatsTriple::new(10.0, 15.0, 20.0)));

        // Web's velocity comes from its own completed size only
        let web = &timelines["Web"];
        assert_eq!(web.len(), 3);
        assert_eq!(web[0].velocity, Some(2.0));
        assert_eq!(web[2].estimated_remaining_size(), 4.0);

        let teamless = &timelines[NO_TEAM];
        assert_eq!(teamless.len(), 1);
        assert_eq!(teamless[0].date, ymd(2023, 1, 10));
        assert!(teamless[0].velocity.is_none());
    }
}
