//! Completion date projection.

use chrono::NaiveDate;
use sprintcast_core::{add_days, days_between, increment_date, ProjectionError, Result, StatsTriple};

use crate::sprint::align_to_boundary;

/// Date reported when velocity is zero or negative.
///
/// Kept finite so charts built from the timeline stay readable.
pub fn far_future_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2100, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Projects when remaining work runs out, snapped to sprint boundaries.
#[derive(Debug, Clone, Copy)]
pub struct DateProjector {
    days_in_sprint: u32,
}

impl DateProjector {
    /// Create a projector for sprints of `days_in_sprint` days.
    pub fn new(days_in_sprint: u32) -> Self {
        Self {
            days_in_sprint: days_in_sprint.max(1),
        }
    }

    /// Date at which `remaining_size` is exhausted at `velocity` points per sprint.
    ///
    /// Boundaries are taken on the grid running through `sprint_start`. A
    /// velocity that is not positive never finishes.
    pub fn project_date(&self, sprint_start: NaiveDate, remaining_size: f64, velocity: f64) -> NaiveDate {
        if velocity <= 0.0 {
            return far_future_date();
        }

        let velocity_per_day = velocity / f64::from(self.days_in_sprint);
        let remaining_days = remaining_size / velocity_per_day;
        let completion_date = add_days(sprint_start, remaining_days);

        align_to_boundary(sprint_start, self.days_in_sprint, completion_date)
    }

    /// Best, average and worst completion dates for `remaining_size`.
    ///
    /// Returns `None` when there is nothing to project: no velocity stats,
    /// no positive remaining size, or an all-zero velocity triple.
    pub fn project_date_range(
        &self,
        sprint_start: NaiveDate,
        remaining_size: f64,
        velocity_stats: Option<&StatsTriple<f64>>,
    ) -> Option<StatsTriple<NaiveDate>> {
        let stats = velocity_stats?;

        if remaining_size <= 0.0 || stats.is_zero() {
            return None;
        }

        // Highest velocity finishes first
        Some(StatsTriple::new(
            self.project_date(sprint_start, remaining_size, stats.max),
            self.project_date(sprint_start, remaining_size, stats.average),
            self.project_date(sprint_start, remaining_size, stats.min),
        ))
    }

    /// Completion range for sized plus unsized work.
    ///
    /// Unsized work is scaled by the low and high factor to get two
    /// projections. The result spans the earliest date of the low one to the
    /// latest date of the high one, with the boundary at or after their
    /// midpoint as the average.
    ///
    /// With factors `0 <= low <= high` and a non-negative
    /// `unestimated_remaining`, the high projection exists whenever the low
    /// one does; anything else is reported as [`ProjectionError::UnexpectedState`].
    pub fn project_combined_range(
        &self,
        sprint_start: NaiveDate,
        estimated_remaining: f64,
        unestimated_remaining: f64,
        factors: (f64, f64),
        velocity_stats: Option<&StatsTriple<f64>>,
    ) -> Result<Option<StatsTriple<NaiveDate>>> {
        let (low_factor, high_factor) = factors;

        let Some(low) = self.project_date_range(
            sprint_start,
            estimated_remaining + unestimated_remaining * low_factor,
            velocity_stats,
        ) else {
            return Ok(None);
        };

        let high = self
            .project_date_range(
                sprint_start,
                estimated_remaining + unestimated_remaining * high_factor,
                velocity_stats,
            )
            .ok_or_else(|| {
                ProjectionError::UnexpectedState(
                    "high-factor projection missing after low-factor projection succeeded".to_string(),
                )
            })?;

        let midpoint = increment_date(low.min, days_between(low.min, high.max).div_euclid(2));
        let average = align_to_boundary(sprint_start, self.days_in_sprint, midpoint);

        Ok(Some(StatsTriple::new(low.min, average, high.max)))
    }
}
