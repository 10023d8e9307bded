//! Timeline construction - walks the event log one calendar day at a time.

use chrono::NaiveDate;
use sprintcast_core::{
    compare_dates, days_between, increment_date, normalize_date, Configuration, ProjectionError,
    RawEvent, Result, TimelineRecord,
};
use tracing::{debug, info, warn};

use crate::aggregate::DayAggregate;
use crate::projector::DateProjector;
use crate::sprint::SprintCalendar;
use crate::velocity::VelocityCalculator;

/// Builds per-day timeline records from an event log.
///
/// The builder itself is immutable; every [`build`](Self::build) call walks
/// with its own state, so one builder can serve concurrent runs.
#[derive(Debug, Clone)]
pub struct TimelineBuilder {
    config: Configuration,
    calendar: SprintCalendar,
    projector: DateProjector,
}

impl TimelineBuilder {
    /// Create a builder, rejecting unusable configurations.
    pub fn new(config: Configuration) -> Result<Self> {
        config.validate()?;

        let calendar = SprintCalendar::new(config.any_sprint_boundary, config.days_in_sprint)?;
        let projector = DateProjector::new(config.days_in_sprint);

        Ok(Self {
            config,
            calendar,
            projector,
        })
    }

    /// The run configuration.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// The sprint boundary grid.
    pub fn calendar(&self) -> &SprintCalendar {
        &self.calendar
    }

    /// Produce one record per day from the first to the last event date.
    ///
    /// Events may arrive in any order. Days without events carry the previous
    /// day's totals forward with no changes. `next_sprint_start` anchors
    /// projections until the walk reaches its first sprint boundary.
    ///
    /// Fails on the first event whose date cannot be normalized; no partial
    /// timeline is returned.
    pub fn build(&self, events: &[RawEvent], next_sprint_start: NaiveDate) -> Result<Vec<TimelineRecord>> {
        self.build_with_velocity(events, next_sprint_start)
            .map(|(records, _)| records)
    }

    /// Like [`build`](Self::build), also returning the velocity samples
    /// taken at each sprint boundary of the walk.
    pub fn build_with_velocity(
        &self,
        events: &[RawEvent],
        next_sprint_start: NaiveDate,
    ) -> Result<(Vec<TimelineRecord>, VelocityCalculator)> {
        let dated = normalize_events(events)?;
        let window = self.config.use_previous_n_sprints_for_average_velocity;

        let (Some(&(first_date, _)), Some(&(last_date, _))) = (dated.first(), dated.last()) else {
            info!("No events, timeline is empty");
            return Ok((Vec::new(), VelocityCalculator::new(window)));
        };

        info!(
            events = events.len(),
            first = %first_date,
            last = %last_date,
            "Building timeline"
        );

        if !self.calendar.is_boundary(next_sprint_start) {
            warn!(
                next_sprint_start = %next_sprint_start,
                anchor = %self.calendar.anchor(),
                "Next sprint start is not on the sprint boundary grid"
            );
        }

        let mut walk = TimelineWalk::new(self, last_date, next_sprint_start);
        let capacity = usize::try_from(days_between(first_date, last_date) + 1).unwrap_or(0);
        let mut records = Vec::with_capacity(capacity);

        let mut index = 0;
        let mut expected_date = first_date;

        while index < dated.len() {
            let this_date = dated[index].0;

            // Fill in missing dates
            while expected_date < this_date {
                records.push(walk.record(expected_date, None)?);
                expected_date = increment_date(expected_date, 1);
            }

            // Group all events associated with this day
            let start = index;
            while index < dated.len() && dated[index].0 == this_date {
                index += 1;
            }

            let aggregate = DayAggregate::from_events(dated[start..index].iter().map(|(_, event)| *event));
            records.push(walk.record(this_date, Some(aggregate))?);
            expected_date = increment_date(this_date, 1);
        }

        info!(
            records = records.len(),
            sprints = walk.velocity.history().len(),
            "Timeline built"
        );

        Ok((records, walk.velocity))
    }
}

/// Build a timeline in one call.
pub fn create_timeline(
    events: &[RawEvent],
    config: Configuration,
    next_sprint_start: NaiveDate,
) -> Result<Vec<TimelineRecord>> {
    TimelineBuilder::new(config)?.build(events, next_sprint_start)
}

/// Pair each event with its normalized date, sorted ascending (stable).
fn normalize_events(events: &[RawEvent]) -> Result<Vec<(NaiveDate, &RawEvent)>> {
    let mut dated = events
        .iter()
        .enumerate()
        .map(|(index, event)| {
            normalize_date(&event.date)
                .map(|date| (date, event))
                .map_err(|_| ProjectionError::InvalidDate {
                    index,
                    value: event.date.clone(),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    dated.sort_by(|a, b| compare_dates(a.0, b.0));
    Ok(dated)
}

/// State carried across the days of one build.
struct TimelineWalk<'a> {
    builder: &'a TimelineBuilder,
    last_date: NaiveDate,
    next_sprint_start: NaiveDate,
    seen_boundary: bool,
    velocity: VelocityCalculator,
    previous: Option<DayAggregate>,
}

impl<'a> TimelineWalk<'a> {
    fn new(builder: &'a TimelineBuilder, last_date: NaiveDate, next_sprint_start: NaiveDate) -> Self {
        Self {
            builder,
            last_date,
            next_sprint_start,
            seen_boundary: false,
            velocity: VelocityCalculator::new(builder.config.use_previous_n_sprints_for_average_velocity),
            previous: None,
        }
    }

    /// Emit the record for `date`; `fresh` is `None` on gap-filled days.
    fn record(&mut self, date: NaiveDate, fresh: Option<DayAggregate>) -> Result<TimelineRecord> {
        let changes = match fresh {
            Some(mut aggregate) => {
                let changes = std::mem::take(&mut aggregate.changes);
                self.previous = Some(aggregate);
                changes
            }
            None => Vec::new(),
        };

        let aggregate = self.previous.as_ref().ok_or_else(|| {
            ProjectionError::UnexpectedState(format!("no aggregate to carry forward to {}", date))
        })?;

        let config = &self.builder.config;
        let calendar = &self.builder.calendar;
        let projector = &self.builder.projector;

        let is_sprint_boundary = calendar.is_boundary(date);

        let sprint_start = if is_sprint_boundary {
            self.velocity.update(aggregate.completed_size());
            self.seen_boundary = true;
            debug!(date = %date, velocity = ?self.velocity.latest(), "Sprint boundary");
            date
        } else if self.seen_boundary {
            calendar.current_sprint_start(date)
        } else {
            self.next_sprint_start
        };

        let velocity_stats = match config.velocity_overrides {
            Some(overrides) if config.use_velocity_overrides_for_all_dates || date == self.last_date => {
                Some(overrides)
            }
            _ => self.velocity.stats(),
        };

        let estimated_remaining = aggregate.estimated_remaining_size();
        let epics_unestimated_size = aggregate.unestimated_epics_size(config.unestimated_epic_size);
        let features_unestimated_size = aggregate.unestimated_features_size(config.unestimated_feature_size);

        let estimated = projector.project_date_range(sprint_start, estimated_remaining, velocity_stats.as_ref());
        let estimated_and_unestimated = projector.project_combined_range(
            sprint_start,
            estimated_remaining,
            epics_unestimated_size + features_unestimated_size,
            config.unestimated_velocity_factors,
            velocity_stats.as_ref(),
        )?;

        Ok(TimelineRecord {
            date,
            is_sprint_boundary,
            estimated,
            estimated_and_unestimated,
            velocity: self.velocity.latest(),
            velocity_stats,
            epics_estimated_num: aggregate.epics_estimated_num,
            epics_unestimated_num: aggregate.epics_unestimated_num,
            epics_unestimated_size,
            features_estimated_num: aggregate.features_estimated_num,
            features_unestimated_num: aggregate.features_unestimated_num,
            features_estimated_size: aggregate.features_estimated_size,
            features_unestimated_size,
            changes,
        })
    }
}
