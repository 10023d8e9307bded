//! Timeline output model - one record per calendar day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::event::{EventChange, StateBuckets};
use crate::stats::StatsTriple;

/// Aggregated statistics and completion forecasts for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineRecord {
    /// The calendar day
    pub date: NaiveDate,

    /// Whether the day is a sprint boundary
    pub is_sprint_boundary: bool,

    /// Projected completion of estimated work (best, average, worst)
    pub estimated: Option<StatsTriple<NaiveDate>>,

    /// Projected completion of estimated plus unestimated work
    pub estimated_and_unestimated: Option<StatsTriple<NaiveDate>>,

    /// Most recent per-sprint velocity sample
    pub velocity: Option<f64>,

    /// Velocity range used for the projections
    pub velocity_stats: Option<StatsTriple<f64>>,

    /// Sized epics
    pub epics_estimated_num: StateBuckets<u32>,
    /// Unsized epics
    pub epics_unestimated_num: StateBuckets<u32>,
    /// Remaining unsized epics at the fallback epic size
    pub epics_unestimated_size: f64,

    /// Sized features
    pub features_estimated_num: StateBuckets<u32>,
    /// Unsized features
    pub features_unestimated_num: StateBuckets<u32>,
    /// Story points of sized features
    pub features_estimated_size: Option<StateBuckets<f64>>,
    /// Remaining unsized features at the fallback feature size
    pub features_unestimated_size: f64,

    /// Changes observed on this day; empty on gap-filled days
    pub changes: Vec<EventChange>,
}

impl TimelineRecord {
    /// Remaining sized work in story points.
    pub fn estimated_remaining_size(&self) -> f64 {
        self.features_estimated_size
            .map(|size| size.remaining())
            .unwrap_or(0.0)
    }

    /// Remaining unsized work at the fallback sizes.
    pub fn unestimated_remaining_size(&self) -> f64 {
        self.epics_unestimated_size + self.features_unestimated_size
    }
}
